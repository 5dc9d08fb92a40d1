use std::sync::Arc;

use crate::core::Matcher;
use crate::models::Recommendation;
use crate::services::store::{MatchLedger, ProfileStore, RematchOutcome, StoreError};

/// Runs both matching modes against injected stores
///
/// Each call takes a fresh corpus snapshot. Unknown users and empty
/// corpora yield empty results; only store failures are errors.
#[derive(Clone)]
pub struct MatchService {
    profiles: Arc<dyn ProfileStore>,
    ledger: Arc<dyn MatchLedger>,
    matcher: Matcher,
}

impl MatchService {
    pub fn new(profiles: Arc<dyn ProfileStore>, ledger: Arc<dyn MatchLedger>, matcher: Matcher) -> Self {
        Self {
            profiles,
            ledger,
            matcher,
        }
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    pub fn ledger(&self) -> &Arc<dyn MatchLedger> {
        &self.ledger
    }

    /// Stateless top matches for the profile with this authentication id
    pub async fn recommend(&self, user_id: &str) -> Result<Vec<Recommendation>, StoreError> {
        let corpus = self.profiles.list_all().await?;
        if corpus.is_empty() {
            tracing::debug!("Empty corpus, no recommendations for {}", user_id);
            return Ok(Vec::new());
        }

        let Some(requester) = self.profiles.find_by_auth_id(user_id).await? else {
            tracing::debug!("Unknown user {}, no recommendations", user_id);
            return Ok(Vec::new());
        };

        let recommendations = self.matcher.recommend(&corpus, requester.id);

        tracing::info!(
            "Recommended {} profiles for user {} (corpus: {})",
            recommendations.len(),
            user_id,
            corpus.len()
        );

        Ok(recommendations)
    }

    /// Replace the requester's pairing with its two best unpaired matches
    ///
    /// The requester is released from the ledger, then the two highest
    /// ranked candidates that are not in any pairing are committed as a
    /// pair with each other. The requester itself is not stored in the new
    /// row. With fewer than two free candidates nothing is committed, but
    /// the release still takes effect.
    pub async fn request_match(&self, user_id: &str) -> Result<RematchOutcome, StoreError> {
        let corpus = self.profiles.list_all().await?;
        if corpus.is_empty() {
            return Ok(RematchOutcome::default());
        }

        let Some(requester) = self.profiles.find_by_auth_id(user_id).await? else {
            tracing::debug!("Unknown user {}, ledger untouched", user_id);
            return Ok(RematchOutcome::default());
        };

        if !corpus.iter().any(|entry| entry.id == requester.id) {
            tracing::warn!("User {} missing from corpus snapshot, ledger untouched", user_id);
            return Ok(RematchOutcome::default());
        }

        let ranked_names = self.matcher.ranked_names(&corpus, requester.id);
        let outcome = self.ledger.rematch(&requester.name, &ranked_names).await?;

        if let Some(commit) = outcome.commit {
            if !commit.is_committed() {
                tracing::warn!("Pairing {:?} for {} was rejected as duplicate", outcome.matched, user_id);
            }
        }

        tracing::info!(
            "Matched user {} with {:?} (released: {}, committed: {})",
            user_id,
            outcome.matched,
            outcome.released,
            outcome.committed()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pairing;
    use crate::services::memory::{MemoryLedger, MemoryProfileStore};

    async fn service_with(profiles: &[(&str, &str)]) -> (MatchService, Arc<MemoryLedger>) {
        let store = Arc::new(MemoryProfileStore::new());
        for (name, interests) in profiles {
            let login = name.to_lowercase();
            store
                .add(name, interests, &format!("{}@example.edu", login), &login)
                .await
                .unwrap();
        }

        let ledger = Arc::new(MemoryLedger::default());
        let service = MatchService::new(store, ledger.clone(), Matcher::new());
        (service, ledger)
    }

    #[tokio::test]
    async fn test_recommend_unknown_user_is_empty() {
        let (service, _) = service_with(&[("Alice", "chess"), ("Bob", "chess")]).await;
        assert!(service.recommend("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recommend_empty_corpus() {
        let (service, _) = service_with(&[]).await;
        assert!(service.recommend("alice").await.unwrap().is_empty());
        assert_eq!(service.request_match("alice").await.unwrap(), RematchOutcome::default());
    }

    #[tokio::test]
    async fn test_request_match_never_stores_requester() {
        let (service, ledger) =
            service_with(&[("Alice", "ai ml"), ("Bob", "ai ml"), ("Carol", "ai")]).await;

        let outcome = service.request_match("alice").await.unwrap();

        assert_eq!(outcome.matched, vec!["Bob", "Carol"]);
        assert_eq!(ledger.pairings().await.unwrap(), vec![Pairing::new("Bob", "Carol")]);
    }

    #[tokio::test]
    async fn test_request_match_unknown_user_keeps_ledger() {
        let (service, ledger) = service_with(&[("Alice", "go"), ("Bob", "go")]).await;
        ledger.commit("Alice", "Bob").await.unwrap();

        let outcome = service.request_match("nobody").await.unwrap();

        assert!(outcome.matched.is_empty());
        assert_eq!(ledger.pairings().await.unwrap().len(), 1);
    }
}
