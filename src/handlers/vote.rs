use crate::context::UserInfo;
use crate::core::cache::PageCache;
use crate::core::models::vote::{Direction, Subject, VoteOutcome};
use crate::core::ports::repository::Manager;
use crate::core::services::{page::QuestionContent, vote::reconcile_vote};
use crate::error::Error;
use crate::request::VoteBody;
use crate::response::VoteResponse;
use actix_web::web::{Data, Json, Path};

async fn cast<M>(subject: Subject, subject_id: i32, user: UserInfo, body: VoteBody, manager: &M, pages: &PageCache<QuestionContent>) -> Result<VoteOutcome, Error>
where
    M: Manager,
{
    let direction = Direction::try_from(body.value)?;
    let tx = manager.tx().await?;
    reconcile_vote(tx, pages, subject, subject_id, user.id, direction).await
}

pub async fn question<M>(user: UserInfo, id: Path<(i32,)>, Json(body): Json<VoteBody>, manager: Data<M>, pages: Data<PageCache<QuestionContent>>) -> Result<Json<VoteResponse>, Error>
where
    M: Manager + 'static,
{
    let outcome = cast(Subject::Question, id.into_inner().0, user, body, manager.get_ref(), &pages).await?;
    Ok(Json(VoteResponse { outcome }))
}

pub async fn answer<M>(user: UserInfo, id: Path<(i32,)>, Json(body): Json<VoteBody>, manager: Data<M>, pages: Data<PageCache<QuestionContent>>) -> Result<Json<VoteResponse>, Error>
where
    M: Manager + 'static,
{
    let outcome = cast(Subject::Answer, id.into_inner().0, user, body, manager.get_ref(), &pages).await?;
    Ok(Json(VoteResponse { outcome }))
}
