use crate::core::models::{
    answer::AnswerDetails,
    common::Created,
    question::{canonical_path, slugify, Ask, Insert as QuestionInsert, QuestionDetails, QuestionSummary, Visibility},
    tag,
};
use crate::core::cache::Revalidator;
use crate::core::ports::ranking::{RelatedRanker, RELATED_LIMIT};
use crate::core::ports::repository::{AnswerCommon, CourseCommon, QuestionCommon, Store, TagCommon, TxStore};
use crate::error::Error;
use validator::Validate;

pub async fn get_question_details<S>(store: &mut S, id: i32) -> Result<Option<QuestionDetails>, Error>
where
    S: Store,
{
    QuestionCommon::get(store, id).await
}

pub async fn get_question_answers<S>(store: &mut S, question_id: i32) -> Result<Vec<AnswerDetails>, Error>
where
    S: Store,
{
    AnswerCommon::query_by_question(store, question_id).await
}

pub async fn get_related_questions<S, R>(store: &mut S, ranker: &R, question_id: i32) -> Result<Vec<QuestionSummary>, Error>
where
    S: Store,
    R: RelatedRanker,
{
    let mut related = ranker.related(store, question_id, RELATED_LIMIT).await?;
    related.retain(|q| q.id != question_id);
    related.truncate(RELATED_LIMIT as usize);
    Ok(related)
}

fn slug_candidate(base: &str, n: u32) -> String {
    if n == 1 {
        base.to_owned()
    } else {
        format!("{}-{}", base, n)
    }
}

/// Creates a question under the first free slug derived from its title. Public questions show up in every
/// page's related list, so asking one revalidates all cached pages.
pub async fn ask_question<T, R>(mut store: T, pages: &R, author_id: i32, ask: Ask) -> Result<Created, Error>
where
    T: TxStore,
    R: Revalidator,
{
    ask.validate()?;
    let title = ask.title.trim();
    let content = ask.content.trim();
    if title.is_empty() || content.is_empty() {
        return Err(Error::Validation("title and content must not be empty".into()));
    }
    if let Some(course_id) = ask.course_id {
        if CourseCommon::get(&mut store, course_id).await?.is_none() {
            store.rollback().await?;
            return Err(Error::NotFound("course".into()));
        }
    }
    let visibility = ask.visibility.unwrap_or_default();
    let base = slugify(title);
    let mut n = 1;
    let (id, slug) = loop {
        let slug = slug_candidate(&base, n);
        n += 1;
        if QuestionCommon::slug_exists(&mut store, &slug).await? {
            continue;
        }
        let insert = QuestionInsert {
            slug: slug.clone(),
            title: title.to_owned(),
            content: content.to_owned(),
            author_id,
            visibility,
            course_id: ask.course_id,
        };
        match QuestionCommon::insert(&mut store, insert).await? {
            Some(id) => break (id, slug),
            None => log::info!("slug {} was taken concurrently, trying the next one", slug),
        }
    };
    for name in tag::normalize(ask.tags) {
        let tag_id = TagCommon::upsert(&mut store, &name).await?;
        TagCommon::attach(&mut store, id, tag_id).await?;
    }
    store.commit().await?;
    log::info!("user {} asked question {} ({})", author_id, id, slug);
    if visibility == Visibility::Public {
        pages.revalidate_all();
    }
    Ok(Created {
        id,
        path: canonical_path(id, &slug),
        slug,
    })
}
