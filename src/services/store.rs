use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CommitOutcome, CorpusEntry, Pairing, Profile};

/// Errors raised by profile stores and match ledgers
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Read access to profile records
///
/// `list_all` must return a stable order (ascending id) so ranking ties
/// resolve the same way between calls on an unchanged corpus.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Snapshot of every profile's matching columns
    async fn list_all(&self) -> Result<Vec<CorpusEntry>, StoreError>;

    /// Look a profile up by its authentication identifier
    async fn find_by_auth_id(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Result of releasing a requester and pairing its best free candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RematchOutcome {
    /// Selected candidate names, best first (never the requester)
    pub matched: Vec<String>,
    /// Ledger rows removed for the requester
    pub released: u64,
    /// Set when exactly two candidates were selected and an insert was tried
    pub commit: Option<CommitOutcome>,
}

impl RematchOutcome {
    pub fn committed(&self) -> bool {
        self.commit.map(|c| c.is_committed()).unwrap_or(false)
    }
}

/// Persisted pairing state for the stateful matching mode
///
/// Each name is meant to appear in at most one row. `rematch` is the
/// operation that upholds this: it releases the requester, reads the set of
/// paired names, picks unpaired candidates and commits them as a single
/// atomic step.
#[async_trait]
pub trait MatchLedger: Send + Sync {
    /// Delete every row mentioning `name`; returns how many were removed
    async fn release(&self, name: &str) -> Result<u64, StoreError>;

    /// Insert the pairing `(member_a, member_b)`
    async fn commit(&self, member_a: &str, member_b: &str) -> Result<CommitOutcome, StoreError>;

    /// Names currently present in any pairing
    async fn active_names(&self) -> Result<HashSet<String>, StoreError>;

    async fn pairings(&self) -> Result<Vec<Pairing>, StoreError>;

    /// Release `requester`, then pair the top two unpaired names of
    /// `ranked_names`
    async fn rematch(&self, requester: &str, ranked_names: &[String]) -> Result<RematchOutcome, StoreError>;
}

/// Collect the members of every pairing into a name set
pub fn paired_names<'a>(pairings: impl IntoIterator<Item = &'a Pairing>) -> HashSet<String> {
    pairings
        .into_iter()
        .flat_map(|p| [p.member_a.clone(), p.member_b.clone()])
        .collect()
}
