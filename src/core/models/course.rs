use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Course {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub has_new_structure: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct CourseModule {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, Copy, Serialize, FromRow, Default, PartialEq, Eq)]
pub struct CourseCounts {
    pub module_count: i64,
    pub question_count: i64,
    pub volume_count: i64,
    pub chapter_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SidebarStats {
    pub modules: i64,
    pub questions: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Sidebar {
    pub is_enrolled: bool,
    pub is_logged_in: bool,
    pub continue_learning: Option<String>,
    pub ask_question: String,
    pub stats: SidebarStats,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CoursePage {
    pub course: Course,
    pub modules: Vec<CourseModule>,
    pub sidebar: Sidebar,
}

pub fn canonical_path(id: i32, slug: &str) -> String {
    format!("/courses/{}/{}", id, slug)
}
