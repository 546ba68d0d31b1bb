use serde::Serialize;
use sqlx::FromRow;

/// The public face of a user attached to questions and answers.
#[derive(Debug, Clone, Serialize, FromRow, Default, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: i32,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Created {
    pub id: i32,
    pub slug: String,
    pub path: String,
}
