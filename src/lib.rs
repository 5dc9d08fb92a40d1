//! Interest Match - interest-based matching service
//!
//! Profiles are compared by the TF-IDF cosine similarity of their free-text
//! interests. Two modes are offered: a stateless recommender returning the
//! two closest profiles, and a stateful mode that records one pairing per
//! profile in a match ledger.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Matcher, TfIdfMatrix, similarity_row, MAX_MATCHES};
pub use models::{Profile, CorpusEntry, Recommendation, Pairing, CommitOutcome, PairUniqueness};
pub use services::{MatchService, MatchLedger, ProfileStore, RematchOutcome, StoreError};
