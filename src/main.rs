mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod privilege;
mod request;
mod response;

use crate::config::Config;
use crate::core::auth::AuthConfig;
use crate::core::cache::PageCache;
use crate::core::services::page::QuestionContent;
use crate::database::sqlx::PgSqlxManager;
use crate::error::Error;
use crate::impls::ranker::recency::Recency;
use crate::privilege::casbin::CasbinGate;
use actix_web::web::{get, post, resource, scope, Data};
use actix_web::{middleware::Logger, App, HttpServer};
use middlewares::jwt::JWTMiddleware;
use sqlx::postgres::PgPoolOptions;

type Manager = PgSqlxManager;
type Gate = CasbinGate;

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new().max_connections(config.max_connections).connect(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let manager = Data::new(PgSqlxManager::new(pool));
    let auth = Data::new(AuthConfig::from_config(&config));
    let gate = Data::new(CasbinGate::new(&config.casbin_model, &config.casbin_policy).await?);
    let pages = Data::new(PageCache::<QuestionContent>::new());
    let ranker = Data::new(Recency);
    let secret = auth.secret.clone();

    log::info!("listening on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(JWTMiddleware::new(secret.clone()))
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(auth.clone())
            .app_data(gate.clone())
            .app_data(pages.clone())
            .app_data(ranker.clone())
            .service(resource("/signin").route(post().to(handlers::signin::<Manager>)))
            .service(resource("/signup").route(post().to(handlers::signup::<Manager>)))
            .service(resource("/signout").route(post().to(handlers::signout)))
            .service(resource("/auth/providers").route(get().to(handlers::providers)))
            .service(
                scope("/questions")
                    .route("", post().to(handlers::question::ask::<Manager>))
                    .route("/{id}/answers", post().to(handlers::answer::create::<Manager>))
                    .route("/{id}/votes", post().to(handlers::vote::question::<Manager>))
                    .route("/{id}/{slug}", get().to(handlers::question::page::<Manager, Recency, Gate>)),
            )
            .service(scope("/answers").route("/{id}/votes", post().to(handlers::vote::answer::<Manager>)))
            .service(
                scope("/courses")
                    .route("/{id}/enroll", post().to(handlers::course::enroll::<Manager>))
                    .route("/{id}/{slug}", get().to(handlers::course::page::<Manager>))
                    .route("/{id}/{slug}/continue", get().to(handlers::course::continue_learning::<Manager>)),
            )
    })
    .bind(&config.bind_addr)
    .map_err(|e| Error::ServerError(e.to_string()))?
    .run()
    .await
    .map_err(|e| Error::ServerError(e.to_string()))
}
