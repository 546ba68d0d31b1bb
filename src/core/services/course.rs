use crate::core::models::course::{canonical_path, Course, CourseCounts, CourseModule, CoursePage, Sidebar, SidebarStats};
use crate::core::ports::repository::{CourseCommon, Manager, Store, TxStore};
use crate::core::services::page::Page;
use crate::error::Error;

/// Where "Continue Learning" leads; only enrolled users get one.
pub fn continue_destination(course: &Course, modules: &[CourseModule], counts: &CourseCounts, is_enrolled: bool) -> Option<String> {
    if !is_enrolled {
        return None;
    }
    let base = canonical_path(course.id, &course.slug);
    if course.has_new_structure {
        (counts.volume_count > 0).then(|| format!("{}/volumes", base))
    } else {
        modules.first().map(|m| format!("{}/modules/{}", base, m.id))
    }
}

pub fn compose_sidebar(course: &Course, modules: &[CourseModule], counts: &CourseCounts, is_enrolled: bool, is_logged_in: bool) -> Sidebar {
    let (volumes, chapters) = if course.has_new_structure {
        (Some(counts.volume_count), Some(counts.chapter_count))
    } else {
        (None, None)
    };
    Sidebar {
        is_enrolled,
        is_logged_in,
        continue_learning: continue_destination(course, modules, counts, is_enrolled),
        ask_question: format!("/questions/ask?courseId={}", course.id),
        stats: SidebarStats {
            modules: counts.module_count,
            questions: counts.question_count,
            created_at: course.created_at,
            volumes,
            chapters,
        },
    }
}

async fn enrollment<S>(store: &mut S, course_id: i32, user_id: Option<i32>) -> Result<bool, Error>
where
    S: Store,
{
    match user_id {
        None => Ok(false),
        Some(uid) => CourseCommon::is_enrolled(store, course_id, uid).await,
    }
}

pub async fn course_page<M>(manager: &M, user_id: Option<i32>, id: &str, slug: &str) -> Result<Page<CoursePage>, Error>
where
    M: Manager,
{
    let id: i32 = id.parse().map_err(|_| Error::NotFound("course".into()))?;
    let (course, modules, counts, is_enrolled) = futures::try_join!(
        async {
            let mut db = manager.db().await?;
            CourseCommon::get(&mut db, id).await
        },
        async {
            let mut db = manager.db().await?;
            CourseCommon::modules(&mut db, id).await
        },
        async {
            let mut db = manager.db().await?;
            CourseCommon::counts(&mut db, id).await
        },
        async {
            let mut db = manager.db().await?;
            enrollment(&mut db, id, user_id).await
        },
    )?;
    let course = course.ok_or_else(|| Error::NotFound("course".into()))?;
    if course.slug != slug {
        return Ok(Page::Redirect(canonical_path(course.id, &course.slug)));
    }
    let sidebar = compose_sidebar(&course, &modules, &counts, is_enrolled, user_id.is_some());
    Ok(Page::Render(CoursePage { course, modules, sidebar }))
}

/// Redirect target of the "continue" route: the continue destination, or the course page itself.
pub async fn continue_learning<M>(manager: &M, user_id: Option<i32>, id: &str, slug: &str) -> Result<String, Error>
where
    M: Manager,
{
    match course_page(manager, user_id, id, slug).await? {
        Page::Redirect(path) => Ok(format!("{}/continue", path)),
        Page::Render(page) => Ok(page
            .sidebar
            .continue_learning
            .unwrap_or_else(|| canonical_path(page.course.id, &page.course.slug))),
    }
}

pub async fn enroll<T>(mut store: T, course_id: i32, user_id: i32) -> Result<(), Error>
where
    T: TxStore,
{
    if CourseCommon::get(&mut store, course_id).await?.is_none() {
        store.rollback().await?;
        return Err(Error::NotFound("course".into()));
    }
    if !CourseCommon::is_enrolled(&mut store, course_id, user_id).await? {
        CourseCommon::enroll(&mut store, course_id, user_id).await?;
        log::info!("user {} enrolled in course {}", user_id, course_id);
    }
    store.commit().await?;
    Ok(())
}
