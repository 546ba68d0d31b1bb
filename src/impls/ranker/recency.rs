use crate::core::models::question::QuestionSummary;
use crate::core::ports::ranking::RelatedRanker;
use crate::core::ports::repository::{QuestionCommon, Store};
use crate::error::Error;

/// Newest other public questions. Ignores content entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recency;

impl RelatedRanker for Recency {
    async fn related<S>(&self, store: &mut S, question_id: i32, limit: i64) -> Result<Vec<QuestionSummary>, Error>
    where
        S: Store,
    {
        QuestionCommon::recent_public(store, question_id, limit).await
    }
}
