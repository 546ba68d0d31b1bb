use crate::core::models::question::QuestionSummary;
use crate::core::ports::repository::Store;
use crate::error::Error;

pub const RELATED_LIMIT: i64 = 5;

/// Picks the questions shown next to a question page.
pub trait RelatedRanker {
    async fn related<S>(&self, store: &mut S, question_id: i32, limit: i64) -> Result<Vec<QuestionSummary>, Error>
    where
        S: Store;
}
