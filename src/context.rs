use crate::error::Error;
use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

/// The signed-in caller, attached to the request by the session middleware.
///
/// Extracting `UserInfo` directly rejects anonymous callers with 401;
/// extract `Option<UserInfo>` where anonymous access is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Self>() {
            Some(user) => ready(Ok(*user)),
            None => ready(Err(Error::Unauthenticated)),
        }
    }
}
