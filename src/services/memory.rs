use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::core::{select_unpaired, MAX_MATCHES};
use crate::models::{CommitOutcome, CorpusEntry, PairUniqueness, Pairing, Profile};
use crate::services::store::{paired_names, MatchLedger, ProfileStore, RematchOutcome, StoreError};

/// In-process profile store
///
/// Profiles are kept sorted by id, which is the corpus order.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(mut profiles: Vec<Profile>) -> Self {
        profiles.sort_by_key(|p| p.id);
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Insert a profile with the next free id
    ///
    /// Email and user id must be unique, as in the backing table.
    pub async fn add(
        &self,
        name: &str,
        interests: &str,
        email: &str,
        user_id: &str,
    ) -> Result<i64, StoreError> {
        let mut profiles = self.profiles.write().await;

        if profiles.iter().any(|p| p.email == email || p.user_id == user_id) {
            return Err(StoreError::Conflict(format!(
                "email {} or user id {} already exists",
                email, user_id
            )));
        }

        let id = profiles.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        profiles.push(Profile {
            id,
            name: name.to_string(),
            department: String::new(),
            year: 1,
            interests: interests.to_string(),
            linkedin_id: None,
            phone_number: None,
            email: email.to_string(),
            user_id: user_id.to_string(),
        });

        Ok(id)
    }

    pub async fn update_interests(&self, id: i64, interests: &str) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", id)))?;
        profile.interests = interests.to_string();
        Ok(())
    }

    /// Remove a profile; returns whether it existed
    pub async fn remove(&self, id: i64) -> bool {
        let mut profiles = self.profiles.write().await;
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        profiles.len() != before
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn list_all(&self) -> Result<Vec<CorpusEntry>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().map(Profile::corpus_entry).collect())
    }

    async fn find_by_auth_id(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == user_id).cloned())
    }
}

/// In-process match ledger
///
/// A single mutex guards the rows, so `rematch` holds it across release,
/// selection and commit.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<Vec<Pairing>>,
    uniqueness: PairUniqueness,
}

impl MemoryLedger {
    pub fn new(uniqueness: PairUniqueness) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            uniqueness,
        }
    }

    fn release_rows(rows: &mut Vec<Pairing>, name: &str) -> u64 {
        let before = rows.len();
        rows.retain(|p| !p.involves(name));
        (before - rows.len()) as u64
    }

    fn commit_row(&self, rows: &mut Vec<Pairing>, member_a: &str, member_b: &str) -> CommitOutcome {
        if rows
            .iter()
            .any(|existing| self.uniqueness.conflicts(existing, member_a, member_b))
        {
            return CommitOutcome::Duplicate;
        }

        rows.push(Pairing::new(member_a, member_b));
        CommitOutcome::Committed
    }
}

#[async_trait]
impl MatchLedger for MemoryLedger {
    async fn release(&self, name: &str) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().await;
        Ok(Self::release_rows(&mut rows, name))
    }

    async fn commit(&self, member_a: &str, member_b: &str) -> Result<CommitOutcome, StoreError> {
        let mut rows = self.rows.lock().await;
        Ok(self.commit_row(&mut rows, member_a, member_b))
    }

    async fn active_names(&self) -> Result<HashSet<String>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(paired_names(rows.iter()))
    }

    async fn pairings(&self) -> Result<Vec<Pairing>, StoreError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn rematch(&self, requester: &str, ranked_names: &[String]) -> Result<RematchOutcome, StoreError> {
        let mut rows = self.rows.lock().await;

        let released = Self::release_rows(&mut rows, requester);
        let paired = paired_names(rows.iter());
        let matched = select_unpaired(ranked_names, &paired, MAX_MATCHES);

        let commit = match matched.as_slice() {
            [a, b] => Some(self.commit_row(&mut rows, a, b)),
            _ => None,
        };

        Ok(RematchOutcome {
            matched,
            released,
            commit,
        })
    }
}
