use crate::core::models::vote::VoteOutcome;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub outcome: VoteOutcome,
}
