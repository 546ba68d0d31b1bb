use crate::core::models::{common::AuthorSummary, tag::Tag, vote::VoteRecord};
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use validator::Validate;

pub const SLUG_MAX_LEN: usize = 80;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            _ => Err(Error::ServerError(format!("invalid question visibility({})", s))),
        }
    }
}

/// A question with everything the detail page needs: author, raw votes and tags.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionDetails {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub course_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub votes: Vec<VoteRecord>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct QuestionSummary {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub visibility: Visibility,
    pub course_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Ask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 5))]
    pub tags: Vec<String>,
    pub visibility: Option<Visibility>,
    #[serde(rename = "courseId")]
    pub course_id: Option<i32>,
}

pub fn canonical_path(id: i32, slug: &str) -> String {
    format!("/questions/{}/{}", id, slug)
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a single `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= SLUG_MAX_LEN {
            break;
        }
    }
    slug.truncate(SLUG_MAX_LEN);
    let slug = slug.trim_end_matches('-').to_owned();
    if slug.is_empty() {
        "question".into()
    } else {
        slug
    }
}
