// Service exports
pub mod matching;
pub mod memory;
pub mod postgres;
pub mod store;

pub use matching::MatchService;
pub use memory::{MemoryLedger, MemoryProfileStore};
pub use postgres::PostgresClient;
pub use store::{MatchLedger, ProfileStore, RematchOutcome, StoreError, paired_names};
