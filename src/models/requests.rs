use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for stateless recommendations or a stateful pairing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to drop every pairing a profile appears in
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReleaseRequest {
    #[validate(length(min = 1))]
    pub name: String,
}
