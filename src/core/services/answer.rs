use crate::core::cache::Revalidator;
use crate::core::models::answer::{Answer, Insert as AnswerInsert, Submit};
use crate::core::models::question::canonical_path;
use crate::core::ports::repository::{AnswerCommon, QuestionCommon, TxStore};
use crate::error::Error;
use validator::Validate;

pub async fn add_answer<T, R>(mut store: T, pages: &R, user_id: i32, question_id: i32, submit: Submit) -> Result<Answer, Error>
where
    T: TxStore,
    R: Revalidator,
{
    submit.validate()?;
    let content = submit.content.trim();
    if content.is_empty() {
        return Err(Error::Validation("answer must not be empty".into()));
    }
    let slug = match QuestionCommon::get_slug(&mut store, question_id).await? {
        Some(slug) => slug,
        None => {
            store.rollback().await?;
            return Err(Error::NotFound("question".into()));
        }
    };
    let answer = AnswerCommon::insert(
        &mut store,
        AnswerInsert {
            question_id,
            content: content.to_owned(),
            author_id: user_id,
        },
    )
    .await?;
    store.commit().await?;
    log::info!("user {} answered question {} with answer {}", user_id, question_id, answer.id);
    pages.revalidate(&canonical_path(question_id, &slug));
    Ok(answer)
}
