use serde::{Deserialize, Serialize};
use crate::models::domain::{Pairing, Recommendation};

/// Response for the stateless recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matches: Vec<Recommendation>,
}

/// Response for the stateful pairing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub matched: Vec<String>,
    pub committed: bool,
}

/// Current ledger contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingsResponse {
    pub pairings: Vec<Pairing>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseResponse {
    pub name: String,
    pub released: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
