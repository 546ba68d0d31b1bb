use crate::core::cache::PageCache;
use crate::core::models::{
    answer::AnswerDetails,
    common::AuthorSummary,
    question::{canonical_path, QuestionDetails, QuestionSummary, Visibility},
    tag::Tag,
    user::{Capability, Profile, User},
    vote::{user_vote, Tally},
};
use crate::core::ports::{permission::PermissionGate, ranking::RelatedRanker, repository::Manager};
use crate::core::services::{auth::get_auth_user, question};
use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<T> {
    Render(T),
    Redirect(String),
}

/// Caller-independent data of a question page, the unit stored in the page cache.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionContent {
    pub question: QuestionDetails,
    pub answers: Vec<AnswerDetails>,
    pub related: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionView {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub tags: Vec<Tag>,
    pub tally: Tally,
    pub current_user_vote: Option<i16>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnswerView {
    pub id: i32,
    pub content: String,
    pub is_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub tally: Tally,
    pub current_user_vote: Option<i16>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct QuestionPage {
    pub question: QuestionView,
    pub answers: Vec<AnswerView>,
    pub related: Vec<QuestionSummary>,
    pub can_moderate: bool,
    pub viewer: Option<Profile>,
}

pub fn compose_question_page<G>(content: &QuestionContent, user: Option<&User>, gate: &G) -> QuestionPage
where
    G: PermissionGate,
{
    let uid = user.map(|u| u.id);
    let q = &content.question;
    QuestionPage {
        question: QuestionView {
            id: q.id,
            slug: q.slug.clone(),
            title: q.title.clone(),
            content: q.content.clone(),
            visibility: q.visibility,
            created_at: q.created_at,
            author: q.author.clone(),
            tags: q.tags.clone(),
            tally: Tally::of(&q.votes),
            current_user_vote: user_vote(&q.votes, uid),
        },
        answers: content
            .answers
            .iter()
            .map(|a| AnswerView {
                id: a.id,
                content: a.content.clone(),
                is_accepted: a.is_accepted,
                created_at: a.created_at,
                author: a.author.clone(),
                tally: Tally::of(&a.votes),
                current_user_vote: user_vote(&a.votes, uid),
            })
            .collect(),
        related: content.related.clone(),
        can_moderate: gate.has_permission(user, Capability::Manage),
        viewer: user.map(Profile::from),
    }
}

async fn fetch_content<M, R>(manager: &M, ranker: &R, id: i32, user_id: Option<i32>) -> Result<(Option<QuestionContent>, Option<User>), Error>
where
    M: Manager,
    R: RelatedRanker,
{
    let (details, answers, related, user) = futures::try_join!(
        async {
            let mut db = manager.db().await?;
            question::get_question_details(&mut db, id).await
        },
        async {
            let mut db = manager.db().await?;
            question::get_question_answers(&mut db, id).await
        },
        async {
            let mut db = manager.db().await?;
            question::get_related_questions(&mut db, ranker, id).await
        },
        async {
            let mut db = manager.db().await?;
            get_auth_user(&mut db, user_id).await
        },
    )?;
    let content = details.map(|question| QuestionContent { question, answers, related });
    Ok((content, user))
}

/// Question detail page. Only canonical paths are ever cached, so a cache hit needs no slug check.
/// Data loaded while the path gets revalidated is served once but not cached.
pub async fn question_page<M, R, G>(manager: &M, ranker: &R, gate: &G, pages: &PageCache<QuestionContent>, user_id: Option<i32>, id: &str, slug: &str) -> Result<Page<QuestionPage>, Error>
where
    M: Manager,
    R: RelatedRanker,
    G: PermissionGate,
{
    let id: i32 = id.parse().map_err(|_| Error::NotFound("question".into()))?;
    let path = canonical_path(id, slug);
    let stamp = pages.stamp(&path);
    let (content, user) = match pages.get(&path) {
        Some(content) => {
            let mut db = manager.db().await?;
            (content, get_auth_user(&mut db, user_id).await?)
        }
        None => {
            let (content, user) = fetch_content(manager, ranker, id, user_id).await?;
            let content = content.ok_or_else(|| Error::NotFound("question".into()))?;
            if content.question.slug != slug {
                return Ok(Page::Redirect(canonical_path(id, &content.question.slug)));
            }
            let content = Arc::new(content);
            pages.insert(path, stamp, content.clone());
            (content, user)
        }
    };
    Ok(Page::Render(compose_question_page(&content, user.as_ref(), gate)))
}
