use crate::core::auth::AuthConfig;
use crate::core::models::user::{Insert as UserInsert, Role, SignIn, SignUp, User};
use crate::core::ports::repository::{Store, TxStore, UserCommon};
use crate::core::tokener::{Claim, Tokener};
use crate::error::Error;
use hex::ToHex;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use validator::Validate;

const SALT_CHARS: &[u8] = b"1234567890abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    let mut rng = thread_rng();
    (0..32).map(|_| SALT_CHARS[rng.gen_range(0..SALT_CHARS.len())] as char).collect()
}

pub fn issue_session(config: &AuthConfig, user_id: i32) -> Result<String, Error> {
    let claim = Claim::new(user_id, config.session_max_age);
    config.tokener().gen_token(&claim)
}

/// Checks email and password against the stored salted hash and returns the user with a fresh session token.
pub async fn sign_in<S>(store: &mut S, config: &AuthConfig, credentials: SignIn) -> Result<(User, String), Error>
where
    S: Store,
{
    if !config.allows_credentials() {
        return Err(Error::Forbidden("credentials sign-in is disabled".into()));
    }
    credentials.validate()?;
    let user = UserCommon::get_by_email(store, &credentials.email.to_lowercase())
        .await?
        .ok_or_else(|| Error::Validation("Invalid email or password".into()))?;
    let (password, salt) = match (&user.password, &user.salt) {
        (Some(password), Some(salt)) => (password, salt),
        _ => return Err(Error::Validation("Please sign in with OAuth provider".into())),
    };
    if &hash_password(&credentials.password, salt) != password {
        log::info!("rejected sign-in for user {}", user.id);
        return Err(Error::Validation("Invalid email or password".into()));
    }
    let token = issue_session(config, user.id)?;
    Ok((user, token))
}

pub async fn sign_up<T>(mut store: T, signup: SignUp) -> Result<i32, Error>
where
    T: TxStore,
{
    signup.validate()?;
    let email = signup.email.to_lowercase();
    if UserCommon::get_by_email(&mut store, &email).await?.is_some() {
        store.rollback().await?;
        return Err(Error::Validation("email has already been registered".into()));
    }
    let salt = random_salt();
    let id = UserCommon::insert(
        &mut store,
        UserInsert {
            name: signup.name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty()),
            email,
            password: Some(hash_password(&signup.password, &salt)),
            salt: Some(salt),
            role: Role::Student,
        },
    )
    .await?;
    store.commit().await?;
    log::info!("user {} signed up", id);
    Ok(id)
}

/// The caller's user record, `None` for anonymous callers or users that no longer exist.
pub async fn get_auth_user<S>(store: &mut S, user_id: Option<i32>) -> Result<Option<User>, Error>
where
    S: Store,
{
    match user_id {
        None => Ok(None),
        Some(id) => UserCommon::get(store, id).await,
    }
}
