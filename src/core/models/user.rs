use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Student,
    Educator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Educator => "EDUCATOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "EDUCATOR" => Ok(Role::Educator),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("unknown role({})", s)),
        }
    }
}

/// Privileged actions gated per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Manage,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Manage => "MANAGE",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub role: Role,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = row.role.parse().unwrap_or_else(|e| {
            log::warn!("user {}: {}, falling back to student", row.id, e);
            Role::Student
        });
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            image: row.image,
            password: row.password,
            salt: row.salt,
            role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub name: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub salt: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Profile {
    pub id: i32,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: Role,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Profile {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            image: user.image.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignIn {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignUp {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
}
