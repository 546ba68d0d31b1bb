use crate::error::Error;
use serde::{Deserialize, Serialize};

pub trait Payload: Serialize + for<'d> Deserialize<'d> {
    fn user(&self) -> &str;
}

pub trait Tokener<P: Payload> {
    fn gen_token(&self, payload: &P) -> Result<String, Error>;
    fn verify_token(&self, token: &str) -> Result<P, Error>;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

impl Claim {
    pub fn new(user_id: i32, max_age: i64) -> Self {
        Self {
            user: user_id.to_string(),
            exp: chrono::Utc::now().timestamp() + max_age,
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.user.parse().ok()
    }
}
