//! In-process store used by the tests. Writes apply immediately; commit and rollback are no-ops.

use crate::core::models::{
    answer::{Answer, AnswerDetails, Insert as AnswerInsert},
    common::AuthorSummary,
    course::{Course, CourseCounts, CourseModule},
    question::{Insert as QuestionInsert, QuestionDetails, QuestionSummary, Visibility},
    tag::Tag,
    user::{Insert as UserInsert, Role, User},
    vote::{Direction, Subject, VoteAction, VoteOutcome, VoteRecord},
};
use crate::core::ports::repository::{AnswerCommon, Common, CourseCommon, Manager, QuestionCommon, Store, TagCommon, TxStore, UserCommon, VoteCommon};
use crate::core::services::auth::hash_password;
use crate::error::Error;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct MemQuestion {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub author_id: i32,
    pub visibility: Visibility,
    pub course_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MemVote {
    pub id: i32,
    pub subject_id: i32,
    pub user_id: i32,
    pub value: i16,
}

#[derive(Debug, Default)]
pub struct MemState {
    pub users: Vec<User>,
    pub questions: Vec<MemQuestion>,
    pub tags: Vec<Tag>,
    pub question_tags: Vec<(i32, i32)>,
    pub answers: Vec<Answer>,
    pub question_votes: Vec<MemVote>,
    pub answer_votes: Vec<MemVote>,
    pub courses: Vec<Course>,
    pub modules: Vec<CourseModule>,
    pub volumes: Vec<(i32, i32)>,
    pub chapters: Vec<(i32, i32)>,
    pub enrollments: Vec<(i32, i32)>,
    blind_slug_lookup: bool,
    next_id: i32,
}

impl MemState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn votes_mut(&mut self, subject: Subject) -> &mut Vec<MemVote> {
        match subject {
            Subject::Question => &mut self.question_votes,
            Subject::Answer => &mut self.answer_votes,
        }
    }

    fn votes(&self, subject: Subject, subject_id: i32) -> Vec<VoteRecord> {
        let votes = match subject {
            Subject::Question => &self.question_votes,
            Subject::Answer => &self.answer_votes,
        };
        votes
            .iter()
            .filter(|v| v.subject_id == subject_id)
            .map(|v| VoteRecord {
                id: v.id,
                value: v.value,
                user_id: v.user_id,
            })
            .collect()
    }

    fn author(&self, id: i32) -> AuthorSummary {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| AuthorSummary {
                id: u.id,
                name: u.name.clone(),
                image: u.image.clone(),
            })
            .unwrap_or(AuthorSummary { id, ..Default::default() })
    }
}

#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<MemState>>,
}

impl MemStore {
    fn lock(&self) -> MutexGuard<'_, MemState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemManager {
    store: MemStore,
}

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn user(id: i32, name: &str, email: &str, password: Option<&str>, role: Role) -> User {
    let salt = password.map(|_| format!("salt-{}", id));
    User {
        id,
        name: Some(name.into()),
        email: email.into(),
        image: None,
        password: password.zip(salt.as_deref()).map(|(p, s)| hash_password(p, s)),
        salt,
        role,
    }
}

fn question(id: i32, slug: &str, title: &str, visibility: Visibility, course_id: Option<i32>, minutes: i64) -> MemQuestion {
    MemQuestion {
        id,
        slug: slug.into(),
        title: title.into(),
        content: format!("content of {}", title),
        author_id: 1,
        visibility,
        course_id,
        created_at: at(minutes),
    }
}

impl MemManager {
    /// Fixture data:
    /// users 1 Ada (EDUCATOR, "correct-horse"), 2 Bo (STUDENT, "hunter22hunter"), 3 Cy (STUDENT, OAuth only);
    /// questions 40..48 oldest to newest, 41 private, 42 `intro-to-calculus` tagged `calculus` in course 1;
    /// answers 7 (by Bo) and 8 (by Ada, newer) on 42; Cy upvoted 42, Bo downvoted answer 8;
    /// courses 1 `calculus-i` (flat modules 10, 11 with 11 first), 2 `linear-algebra` (2 volumes, 3 chapters),
    /// 3 `empty` (new structure, nothing in it); Bo is enrolled in 1 and 2.
    pub fn seeded() -> Self {
        let manager = Self::default();
        {
            let mut s = manager.store.lock();
            s.users = vec![
                user(1, "Ada", "ada@example.com", Some("correct-horse"), Role::Educator),
                user(2, "Bo", "bo@example.com", Some("hunter22hunter"), Role::Student),
                user(3, "Cy", "cy@example.com", None, Role::Student),
            ];
            s.questions = vec![
                question(40, "limits", "Limits", Visibility::Public, None, 0),
                question(41, "private-notes", "Private notes", Visibility::Private, None, 1),
                question(42, "intro-to-calculus", "Intro to Calculus", Visibility::Public, Some(1), 2),
                question(43, "derivatives", "Derivatives", Visibility::Public, None, 3),
            ];
            for id in 44..=48 {
                s.questions.push(question(id, &format!("question-{}", id), &format!("Question {}", id), Visibility::Public, None, id as i64 - 40));
            }
            s.tags = vec![Tag { id: 1, name: "calculus".into() }];
            s.question_tags = vec![(42, 1)];
            s.answers = vec![
                Answer {
                    id: 7,
                    question_id: 42,
                    content: "Start with limits.".into(),
                    author_id: 2,
                    is_accepted: false,
                    created_at: at(10),
                },
                Answer {
                    id: 8,
                    question_id: 42,
                    content: "Read chapter one.".into(),
                    author_id: 1,
                    is_accepted: false,
                    created_at: at(11),
                },
            ];
            s.question_votes = vec![MemVote {
                id: 1,
                subject_id: 42,
                user_id: 3,
                value: 1,
            }];
            s.answer_votes = vec![MemVote {
                id: 2,
                subject_id: 8,
                user_id: 2,
                value: -1,
            }];
            s.courses = vec![
                Course {
                    id: 1,
                    slug: "calculus-i".into(),
                    title: "Calculus I".into(),
                    description: "Limits and derivatives".into(),
                    has_new_structure: false,
                    created_at: at(0),
                },
                Course {
                    id: 2,
                    slug: "linear-algebra".into(),
                    title: "Linear Algebra".into(),
                    description: "Vectors and matrices".into(),
                    has_new_structure: true,
                    created_at: at(0),
                },
                Course {
                    id: 3,
                    slug: "empty".into(),
                    title: "Empty".into(),
                    description: String::new(),
                    has_new_structure: true,
                    created_at: at(0),
                },
            ];
            s.modules = vec![
                CourseModule {
                    id: 10,
                    course_id: 1,
                    title: "Derivatives".into(),
                    position: 2,
                },
                CourseModule {
                    id: 11,
                    course_id: 1,
                    title: "Limits".into(),
                    position: 1,
                },
            ];
            s.volumes = vec![(20, 2), (21, 2)];
            s.chapters = vec![(30, 20), (31, 20), (32, 21)];
            s.enrollments = vec![(1, 2), (2, 2)];
            s.next_id = 100;
        }
        manager
    }

    pub fn vote_rows(&self, subject: Subject, subject_id: i32, user_id: i32) -> usize {
        self.store.lock().votes(subject, subject_id).iter().filter(|v| v.user_id == user_id).count()
    }

    /// Makes slug lookups miss, as if another writer took the slug after the lookup.
    pub fn blind_slug_lookup(&self) {
        self.store.lock().blind_slug_lookup = true;
    }

    pub fn answer_count(&self) -> usize {
        self.store.lock().answers.len()
    }

    pub fn question_count(&self) -> usize {
        self.store.lock().questions.len()
    }

    pub fn add_answer_directly(&self, question_id: i32, author_id: i32, content: &str) -> i32 {
        let mut s = self.store.lock();
        let id = s.next_id();
        s.answers.push(Answer {
            id,
            question_id,
            content: content.into(),
            author_id,
            is_accepted: false,
            created_at: Utc::now(),
        });
        id
    }
}

impl QuestionCommon for MemStore {
    async fn insert(&mut self, question: QuestionInsert) -> Result<Option<i32>, Error> {
        let mut s = self.lock();
        if s.questions.iter().any(|q| q.slug == question.slug) {
            return Ok(None);
        }
        let id = s.next_id();
        s.questions.push(MemQuestion {
            id,
            slug: question.slug,
            title: question.title,
            content: question.content,
            author_id: question.author_id,
            visibility: question.visibility,
            course_id: question.course_id,
            created_at: Utc::now(),
        });
        Ok(Some(id))
    }

    async fn get(&mut self, id: i32) -> Result<Option<QuestionDetails>, Error> {
        let s = self.lock();
        let Some(q) = s.questions.iter().find(|q| q.id == id) else {
            return Ok(None);
        };
        let tags = s
            .question_tags
            .iter()
            .filter(|(qid, _)| *qid == id)
            .filter_map(|(_, tid)| s.tags.iter().find(|t| t.id == *tid).cloned())
            .collect();
        Ok(Some(QuestionDetails {
            id: q.id,
            slug: q.slug.clone(),
            title: q.title.clone(),
            content: q.content.clone(),
            visibility: q.visibility,
            course_id: q.course_id,
            created_at: q.created_at,
            author: s.author(q.author_id),
            votes: s.votes(Subject::Question, id),
            tags,
        }))
    }

    async fn get_slug(&mut self, id: i32) -> Result<Option<String>, Error> {
        Ok(self.lock().questions.iter().find(|q| q.id == id).map(|q| q.slug.clone()))
    }

    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error> {
        let s = self.lock();
        Ok(!s.blind_slug_lookup && s.questions.iter().any(|q| q.slug == slug))
    }

    async fn recent_public(&mut self, exclude_id: i32, limit: i64) -> Result<Vec<QuestionSummary>, Error> {
        let s = self.lock();
        let mut questions: Vec<&MemQuestion> = s.questions.iter().filter(|q| q.id != exclude_id && q.visibility == Visibility::Public).collect();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(questions
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|q| QuestionSummary {
                id: q.id,
                title: q.title.clone(),
                content: q.content.clone(),
                slug: q.slug.clone(),
            })
            .collect())
    }
}

impl TagCommon for MemStore {
    async fn upsert(&mut self, name: &str) -> Result<i32, Error> {
        let mut s = self.lock();
        if let Some(tag) = s.tags.iter().find(|t| t.name == name) {
            return Ok(tag.id);
        }
        let id = s.next_id();
        s.tags.push(Tag { id, name: name.into() });
        Ok(id)
    }

    async fn attach(&mut self, question_id: i32, tag_id: i32) -> Result<(), Error> {
        let mut s = self.lock();
        if !s.question_tags.contains(&(question_id, tag_id)) {
            s.question_tags.push((question_id, tag_id));
        }
        Ok(())
    }
}

impl AnswerCommon for MemStore {
    async fn insert(&mut self, answer: AnswerInsert) -> Result<Answer, Error> {
        let mut s = self.lock();
        let id = s.next_id();
        let answer = Answer {
            id,
            question_id: answer.question_id,
            content: answer.content,
            author_id: answer.author_id,
            is_accepted: false,
            created_at: Utc::now(),
        };
        s.answers.push(answer.clone());
        Ok(answer)
    }

    async fn query_by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetails>, Error> {
        let s = self.lock();
        let mut answers: Vec<AnswerDetails> = s
            .answers
            .iter()
            .filter(|a| a.question_id == question_id)
            .map(|a| AnswerDetails {
                id: a.id,
                question_id: a.question_id,
                content: a.content.clone(),
                is_accepted: a.is_accepted,
                created_at: a.created_at,
                author: s.author(a.author_id),
                votes: s.votes(Subject::Answer, a.id),
            })
            .collect();
        answers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(answers)
    }

    async fn get_question_id(&mut self, id: i32) -> Result<Option<i32>, Error> {
        Ok(self.lock().answers.iter().find(|a| a.id == id).map(|a| a.question_id))
    }
}

impl VoteCommon for MemStore {
    async fn reconcile(&mut self, subject: Subject, subject_id: i32, user_id: i32, direction: Direction) -> Result<VoteOutcome, Error> {
        let mut s = self.lock();
        let id = s.next_id();
        let votes = s.votes_mut(subject);
        let existing = votes.iter().position(|v| v.subject_id == subject_id && v.user_id == user_id);
        let action = VoteAction::decide(existing.map(|i| votes[i].value), direction);
        match (action, existing) {
            (VoteAction::Create, _) => votes.push(MemVote {
                id,
                subject_id,
                user_id,
                value: direction.value(),
            }),
            (VoteAction::Update, Some(i)) => votes[i].value = direction.value(),
            (VoteAction::Delete, Some(i)) => {
                votes.remove(i);
            }
            _ => unreachable!("only creation happens without an existing vote"),
        }
        Ok(action.into())
    }

    async fn get(&mut self, subject: Subject, subject_id: i32, user_id: i32) -> Result<Option<VoteRecord>, Error> {
        Ok(self.lock().votes(subject, subject_id).into_iter().find(|v| v.user_id == user_id))
    }
}

impl UserCommon for MemStore {
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let mut s = self.lock();
        let id = s.next_id();
        s.users.push(User {
            id,
            name: user.name,
            email: user.email,
            image: None,
            password: user.password,
            salt: user.salt,
            role: user.role,
        });
        Ok(id)
    }
}

impl CourseCommon for MemStore {
    async fn get(&mut self, id: i32) -> Result<Option<Course>, Error> {
        Ok(self.lock().courses.iter().find(|c| c.id == id).cloned())
    }

    async fn modules(&mut self, course_id: i32) -> Result<Vec<CourseModule>, Error> {
        let mut modules: Vec<CourseModule> = self.lock().modules.iter().filter(|m| m.course_id == course_id).cloned().collect();
        modules.sort_by_key(|m| (m.position, m.id));
        Ok(modules)
    }

    async fn counts(&mut self, course_id: i32) -> Result<CourseCounts, Error> {
        let s = self.lock();
        let volumes: Vec<i32> = s.volumes.iter().filter(|(_, cid)| *cid == course_id).map(|(id, _)| *id).collect();
        Ok(CourseCounts {
            module_count: s.modules.iter().filter(|m| m.course_id == course_id).count() as i64,
            question_count: s.questions.iter().filter(|q| q.course_id == Some(course_id)).count() as i64,
            volume_count: volumes.len() as i64,
            chapter_count: s.chapters.iter().filter(|(_, vid)| volumes.contains(vid)).count() as i64,
        })
    }

    async fn is_enrolled(&mut self, course_id: i32, user_id: i32) -> Result<bool, Error> {
        Ok(self.lock().enrollments.contains(&(course_id, user_id)))
    }

    async fn enroll(&mut self, course_id: i32, user_id: i32) -> Result<(), Error> {
        let mut s = self.lock();
        if !s.enrollments.contains(&(course_id, user_id)) {
            s.enrollments.push((course_id, user_id));
        }
        Ok(())
    }
}

impl Common for MemStore {}
impl Store for MemStore {}

impl TxStore for MemStore {
    async fn commit(self) -> Result<(), Error> {
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        Ok(())
    }
}

impl Manager for MemManager {
    type Store = MemStore;
    type Tx = MemStore;

    async fn db(&self) -> Result<MemStore, Error> {
        Ok(self.store.clone())
    }

    async fn tx(&self) -> Result<MemStore, Error> {
        Ok(self.store.clone())
    }
}
