use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("You must be logged in")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("casbin error: {0}")]
    Casbin(#[from] casbin::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    ServerError(String),
}

impl From<validator::ValidationErrors> for Error {
    fn from(errs: validator::ValidationErrors) -> Self {
        let fields = errs.field_errors().into_keys().collect::<Vec<_>>().join(", ");
        Error::Validation(format!("invalid fields: {}", fields))
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "internal server error".to_owned()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}
