use crate::context::UserInfo;
use crate::core::cache::PageCache;
use crate::core::models::answer::Submit;
use crate::core::ports::repository::Manager;
use crate::core::services::{answer, page::QuestionContent};
use crate::error::Error;
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

pub async fn create<M>(user: UserInfo, question_id: Path<(i32,)>, Json(submit): Json<Submit>, manager: Data<M>, pages: Data<PageCache<QuestionContent>>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let question_id = question_id.into_inner().0;
    let tx = manager.tx().await?;
    let answer = answer::add_answer(tx, pages.get_ref(), user.id, question_id, submit).await?;
    Ok(HttpResponse::Created().json(answer))
}
