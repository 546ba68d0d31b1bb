use crate::error::Error;
use std::str::FromStr;

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub static BIND_ADDR: &str = "BIND_ADDR";
pub static JWT_SECRET: &str = "JWT_SECRET";
pub static SESSION_MAX_AGE: &str = "SESSION_MAX_AGE";
pub static CASBIN_MODEL: &str = "CASBIN_MODEL";
pub static CASBIN_POLICY: &str = "CASBIN_POLICY";
pub static GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub session_max_age: i64,
    pub casbin_model: String,
    pub casbin_policy: String,
    pub google_client_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| Error::Config(format!("environment variable {} not been set", key)));
        Ok(Self {
            database_url: required(DATABASE_URL)?,
            max_connections: parse_or(&lookup, DATABASE_MAX_CONNECTIONS, 5)?,
            bind_addr: lookup(BIND_ADDR).unwrap_or_else(|| "0.0.0.0:8000".into()),
            jwt_secret: required(JWT_SECRET)?,
            session_max_age: parse_or(&lookup, SESSION_MAX_AGE, 60 * 60)?,
            casbin_model: lookup(CASBIN_MODEL).unwrap_or_else(|| "src/privilege/casbin.conf".into()),
            casbin_policy: lookup(CASBIN_POLICY).unwrap_or_else(|| "src/privilege/policies.csv".into()),
            google_client_id: lookup(GOOGLE_CLIENT_ID).filter(|v| !v.is_empty()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| Error::Config(format!("invalid value for {}: {}", key, v))),
    }
}
