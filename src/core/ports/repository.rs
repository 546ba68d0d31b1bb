use crate::core::models::{
    answer::{Answer, AnswerDetails, Insert as AnswerInsert},
    course::{Course, CourseCounts, CourseModule},
    question::{Insert as QuestionInsert, QuestionDetails, QuestionSummary},
    user::{Insert as UserInsert, User},
    vote::{Direction, Subject, VoteOutcome, VoteRecord},
};
use crate::error::Error;

pub trait QuestionCommon {
    /// `None` when the slug is already taken; the surrounding transaction stays usable.
    async fn insert(&mut self, question: QuestionInsert) -> Result<Option<i32>, Error>;
    async fn get(&mut self, id: i32) -> Result<Option<QuestionDetails>, Error>;
    async fn get_slug(&mut self, id: i32) -> Result<Option<String>, Error>;
    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error>;
    /// Newest public questions, `exclude_id` left out.
    async fn recent_public(&mut self, exclude_id: i32, limit: i64) -> Result<Vec<QuestionSummary>, Error>;
}

pub trait TagCommon {
    async fn upsert(&mut self, name: &str) -> Result<i32, Error>;
    async fn attach(&mut self, question_id: i32, tag_id: i32) -> Result<(), Error>;
}

pub trait AnswerCommon {
    async fn insert(&mut self, answer: AnswerInsert) -> Result<Answer, Error>;
    /// Newest first.
    async fn query_by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetails>, Error>;
    async fn get_question_id(&mut self, id: i32) -> Result<Option<i32>, Error>;
}

pub trait VoteCommon {
    /// Creates, flips or clears the vote of `user_id` on the subject in a single step.
    async fn reconcile(&mut self, subject: Subject, subject_id: i32, user_id: i32, direction: Direction) -> Result<VoteOutcome, Error>;
    async fn get(&mut self, subject: Subject, subject_id: i32, user_id: i32) -> Result<Option<VoteRecord>, Error>;
}

pub trait UserCommon {
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error>;
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
}

pub trait CourseCommon {
    async fn get(&mut self, id: i32) -> Result<Option<Course>, Error>;
    async fn modules(&mut self, course_id: i32) -> Result<Vec<CourseModule>, Error>;
    async fn counts(&mut self, course_id: i32) -> Result<CourseCounts, Error>;
    async fn is_enrolled(&mut self, course_id: i32, user_id: i32) -> Result<bool, Error>;
    async fn enroll(&mut self, course_id: i32, user_id: i32) -> Result<(), Error>;
}

pub trait Common: QuestionCommon + TagCommon + AnswerCommon + VoteCommon + UserCommon + CourseCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;
    type Tx: TxStore;
    async fn db(&self) -> Result<Self::Store, Error>;
    async fn tx(&self) -> Result<Self::Tx, Error>;
}
