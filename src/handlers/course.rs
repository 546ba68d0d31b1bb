use crate::context::UserInfo;
use crate::core::ports::repository::Manager;
use crate::core::services::course;
use crate::error::Error;
use crate::handlers::{redirect, respond};
use actix_web::{
    web::{Data, Path},
    HttpResponse,
};

pub async fn page<M>(path: Path<(String, String)>, user: Option<UserInfo>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let (id, slug) = path.into_inner();
    let page = course::course_page(manager.get_ref(), user.map(|u| u.id), &id, &slug).await?;
    Ok(respond(page))
}

pub async fn continue_learning<M>(path: Path<(String, String)>, user: Option<UserInfo>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let (id, slug) = path.into_inner();
    let destination = course::continue_learning(manager.get_ref(), user.map(|u| u.id), &id, &slug).await?;
    Ok(redirect(&destination))
}

pub async fn enroll<M>(user: UserInfo, id: Path<(i32,)>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let tx = manager.tx().await?;
    course::enroll(tx, id.into_inner().0, user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
