pub mod answer;
pub mod course;
pub mod question;
pub mod vote;

use crate::core::auth::{AuthConfig, Provider};
use crate::core::models::user::{Profile, SignIn, SignUp};
use crate::core::ports::repository::Manager;
use crate::core::services::{auth, page::Page};
use crate::error::Error;
use crate::middlewares::jwt::JWT_TOKEN;
use actix_web::{
    cookie::{time::Duration, Cookie},
    http::{header::LOCATION, StatusCode},
    web::{Data, Json},
    HttpResponse,
};
use serde::Serialize;
use serde_json::json;

/// Turns a page result into either its JSON view or a temporary redirect.
pub(crate) fn respond<T: Serialize>(page: Page<T>) -> HttpResponse {
    match page {
        Page::Render(view) => HttpResponse::Ok().json(view),
        Page::Redirect(path) => redirect(&path),
    }
}

pub(crate) fn redirect(path: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::TEMPORARY_REDIRECT).insert_header((LOCATION, path)).finish()
}

#[derive(Debug, Serialize)]
pub struct Session {
    token: String,
    user: Profile,
}

pub async fn signin<M>(Json(credentials): Json<SignIn>, manager: Data<M>, config: Data<AuthConfig>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let mut db = manager.db().await?;
    let (user, token) = auth::sign_in(&mut db, &config, credentials).await?;
    let cookie = Cookie::build(JWT_TOKEN, token.clone())
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(config.session_max_age))
        .finish();
    Ok(HttpResponse::Ok().cookie(cookie).json(Session {
        token,
        user: Profile::from(&user),
    }))
}

pub async fn signup<M>(Json(signup): Json<SignUp>, manager: Data<M>) -> Result<HttpResponse, Error>
where
    M: Manager + 'static,
{
    let tx = manager.tx().await?;
    let id = auth::sign_up(tx, signup).await?;
    Ok(HttpResponse::Created().json(json!({ "id": id })))
}

pub async fn signout() -> HttpResponse {
    let mut cookie = Cookie::build(JWT_TOKEN, "").path("/").http_only(true).finish();
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).finish()
}

pub async fn providers(config: Data<AuthConfig>) -> Json<Vec<Provider>> {
    Json(config.providers.clone())
}
