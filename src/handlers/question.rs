use crate::context::UserInfo;
use crate::core::cache::PageCache;
use crate::core::models::question::Ask;
use crate::core::ports::{permission::PermissionGate, ranking::RelatedRanker, repository::Manager};
use crate::core::services::{
    page::{question_page, QuestionContent},
    question,
};
use crate::error::Error;
use crate::handlers::respond;
use actix_web::{
    web::{Data, Json, Path},
    HttpResponse,
};

pub async fn page<M, R, G>(
    path: Path<(String, String)>,
    user: Option<UserInfo>,
    manager: Data<M>,
    ranker: Data<R>,
    gate: Data<G>,
    pages: Data<PageCache<QuestionContent>>,
) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
    R: RelatedRanker + 'static,
    G: PermissionGate + 'static,
{
    let (id, slug) = path.into_inner();
    let page = question_page(manager.get_ref(), ranker.get_ref(), gate.get_ref(), &pages, user.map(|u| u.id), &id, &slug).await?;
    Ok(respond(page))
}

pub async fn ask<M>(user: UserInfo, Json(ask): Json<Ask>, manager: Data<M>, pages: Data<PageCache<QuestionContent>>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let tx = manager.tx().await?;
    let created = question::ask_question(tx, pages.get_ref(), user.id, ask).await?;
    Ok(HttpResponse::Created().json(created))
}
