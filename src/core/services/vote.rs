use crate::core::cache::Revalidator;
use crate::core::models::question::canonical_path;
use crate::core::models::vote::{Direction, Subject, VoteOutcome};
use crate::core::ports::repository::{AnswerCommon, QuestionCommon, TxStore, VoteCommon};
use crate::error::Error;

/// Question id whose page displays the subject.
async fn owning_question<S>(store: &mut S, subject: Subject, subject_id: i32) -> Result<Option<i32>, Error>
where
    S: TxStore,
{
    match subject {
        Subject::Question => Ok(QuestionCommon::get_slug(store, subject_id).await?.map(|_| subject_id)),
        Subject::Answer => AnswerCommon::get_question_id(store, subject_id).await,
    }
}

pub async fn reconcile_vote<T, R>(mut store: T, pages: &R, subject: Subject, subject_id: i32, user_id: i32, direction: Direction) -> Result<VoteOutcome, Error>
where
    T: TxStore,
    R: Revalidator,
{
    let question_id = match owning_question(&mut store, subject, subject_id).await? {
        Some(qid) => qid,
        None => {
            store.rollback().await?;
            return Err(Error::NotFound(format!("{:?}", subject).to_lowercase()));
        }
    };
    let outcome = VoteCommon::reconcile(&mut store, subject, subject_id, user_id, direction).await?;
    let slug = QuestionCommon::get_slug(&mut store, question_id).await?;
    store.commit().await?;
    log::info!("user {} voted {} on {:?} {}: {:?}", user_id, direction.value(), subject, subject_id, outcome);
    if let Some(slug) = slug {
        pages.revalidate(&canonical_path(question_id, &slug));
    }
    Ok(outcome)
}
