use crate::core::models::{common::AuthorSummary, vote::VoteRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Answer {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
    pub author_id: i32,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnswerDetails {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub votes: Vec<VoteRecord>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: i32,
    pub content: String,
    pub author_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Submit {
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
}
