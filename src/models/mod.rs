// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, CorpusEntry, ScoredCandidate, Recommendation, Pairing, CommitOutcome, PairUniqueness};
pub use requests::{MatchRequest, ReleaseRequest};
pub use responses::{RecommendResponse, PairingResponse, PairingsResponse, ReleaseResponse, HealthResponse, ErrorResponse};
