use crate::context::UserInfo;
use crate::core::tokener::{Claim, Tokener};
use crate::impls::tokener::jwt::JWT;
use actix_web::{
    dev::{Service, ServiceRequest, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};

pub static JWT_TOKEN: &str = "JWT_TOKEN";

/// Resolves the session token, from the `JWT_TOKEN` cookie or a bearer header, into a `UserInfo` extension.
/// Requests without a valid token pass through anonymously; handlers decide whether that is allowed.
pub(crate) struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTService {
            tokener: JWT::new(self.secret.clone()),
            next_service: service,
        }))
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

fn bearer(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(|t| t.trim().to_owned())
}

/// Cookie first, then bearer header. A stale cookie must not hide a valid header.
fn session_tokens(req: &ServiceRequest) -> Vec<String> {
    req.cookie(JWT_TOKEN).map(|c| c.value().to_owned()).into_iter().chain(bearer(req)).collect()
}

impl<S> JWTService<S> {
    fn identify(&self, token: &str) -> Option<UserInfo> {
        match <JWT as Tokener<Claim>>::verify_token(&self.tokener, token) {
            Ok(claim) => claim.user_id().map(|id| UserInfo { id }),
            Err(e) => {
                log::debug!("ignoring session token: {}", e);
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = S::Response;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(next_service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(user) = session_tokens(&req).iter().find_map(|token| self.identify(token)) {
            req.extensions_mut().insert(user);
        }
        let res_fut = self.next_service.call(req);
        Box::pin(res_fut)
    }
}

#[cfg(test)]
pub(crate) fn session_cookie(secret: &[u8], user_id: i32) -> actix_web::cookie::Cookie<'static> {
    let token = JWT::new(secret.to_vec()).gen_token(&Claim::new(user_id, 3600)).unwrap_or_default();
    actix_web::cookie::Cookie::new(JWT_TOKEN, token)
}
