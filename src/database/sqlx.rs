use crate::core::models::{
    answer::{Answer, AnswerDetails, Insert as AnswerInsert},
    common::AuthorSummary,
    course::{Course, CourseCounts, CourseModule},
    question::{Insert as QuestionInsert, QuestionDetails, QuestionSummary},
    tag::Tag,
    user::{Insert as UserInsert, User, UserRow},
    vote::{Direction, Subject, VoteOutcome, VoteRecord},
};
use crate::core::ports::repository::{AnswerCommon, Common, CourseCommon, Manager, QuestionCommon, Store, TagCommon, TxStore, UserCommon, VoteCommon};
use crate::error::Error;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use sqlx::pool::PoolConnection;
use sqlx::{query, query_as, query_scalar, Executor, FromRow, PgPool, Postgres, Transaction};

pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: i32,
    slug: String,
    title: String,
    content: String,
    visibility: String,
    course_id: Option<i32>,
    created_at: DateTime<Utc>,
    author_id: i32,
    author_name: Option<String>,
    author_image: Option<String>,
}

#[derive(FromRow)]
struct AnswerRow {
    id: i32,
    question_id: i32,
    content: String,
    is_accepted: bool,
    created_at: DateTime<Utc>,
    author_id: i32,
    author_name: Option<String>,
    author_image: Option<String>,
}

#[derive(FromRow)]
struct AnswerVoteRow {
    answer_id: i32,
    id: i32,
    value: i16,
    user_id: i32,
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, question: QuestionInsert) -> Result<Option<i32>, Error> {
        let id = query_scalar(
            "
        INSERT INTO questions (slug, title, content, author_id, visibility, course_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (slug) DO NOTHING
        RETURNING id",
        )
            .bind(question.slug)
            .bind(question.title)
            .bind(question.content)
            .bind(question.author_id)
            .bind(question.visibility.as_str())
            .bind(question.course_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i32) -> Result<Option<QuestionDetails>, Error> {
        let row: Option<QuestionRow> = query_as(
            "
        SELECT
            q.id, q.slug, q.title, q.content, q.visibility, q.course_id, q.created_at,
            u.id AS author_id,
            u.name AS author_name,
            u.image AS author_image
        FROM questions AS q
        JOIN users AS u ON u.id = q.author_id
        WHERE q.id = $1",
        )
        .bind(id)
        .fetch_optional(&mut self.executor)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let votes = query_as("SELECT id, value, user_id FROM question_votes WHERE question_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(&mut self.executor)
            .await?;
        let tags = query_as(
            "
        SELECT t.id, t.name
        FROM tags AS t
        JOIN question_tags AS qt ON qt.tag_id = t.id
        WHERE qt.question_id = $1
        ORDER BY t.name",
        )
        .bind(id)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(Some(QuestionDetails {
            id: row.id,
            slug: row.slug,
            title: row.title,
            content: row.content,
            visibility: row.visibility.parse()?,
            course_id: row.course_id,
            created_at: row.created_at,
            author: AuthorSummary {
                id: row.author_id,
                name: row.author_name,
                image: row.author_image,
            },
            votes,
            tags,
        }))
    }

    async fn get_slug(&mut self, id: i32) -> Result<Option<String>, Error> {
        let slug = query_scalar("SELECT slug FROM questions WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(slug)
    }

    async fn slug_exists(&mut self, slug: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT * FROM questions WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(exists)
    }

    async fn recent_public(&mut self, exclude_id: i32, limit: i64) -> Result<Vec<QuestionSummary>, Error> {
        let questions = query_as(
            "
        SELECT id, title, content, slug
        FROM questions
        WHERE visibility = 'PUBLIC' AND id <> $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2",
        )
        .bind(exclude_id)
        .bind(limit)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(questions)
    }
}

impl<E> TagCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn upsert(&mut self, name: &str) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id")
            .bind(name)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }

    async fn attach(&mut self, question_id: i32, tag_id: i32) -> Result<(), Error> {
        query("INSERT INTO question_tags (question_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(question_id)
            .bind(tag_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> AnswerCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn insert(&mut self, answer: AnswerInsert) -> Result<Answer, Error> {
        let answer = query_as("INSERT INTO answers (question_id, content, author_id) VALUES ($1, $2, $3) RETURNING *")
            .bind(answer.question_id)
            .bind(answer.content)
            .bind(answer.author_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(answer)
    }

    async fn query_by_question(&mut self, question_id: i32) -> Result<Vec<AnswerDetails>, Error> {
        let rows: Vec<AnswerRow> = query_as(
            "
        SELECT
            a.id, a.question_id, a.content, a.is_accepted, a.created_at,
            u.id AS author_id,
            u.name AS author_name,
            u.image AS author_image
        FROM answers AS a
        JOIN users AS u ON u.id = a.author_id
        WHERE a.question_id = $1
        ORDER BY a.created_at DESC, a.id DESC",
        )
        .bind(question_id)
        .fetch_all(&mut self.executor)
        .await?;
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let votes: Vec<AnswerVoteRow> = query_as("SELECT answer_id, id, value, user_id FROM answer_votes WHERE answer_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(&mut self.executor)
            .await?;
        let mut votes = votes
            .into_iter()
            .map(|v| {
                (
                    v.answer_id,
                    VoteRecord {
                        id: v.id,
                        value: v.value,
                        user_id: v.user_id,
                    },
                )
            })
            .into_group_map();
        Ok(rows
            .into_iter()
            .map(|r| AnswerDetails {
                votes: votes.remove(&r.id).unwrap_or_default(),
                id: r.id,
                question_id: r.question_id,
                content: r.content,
                is_accepted: r.is_accepted,
                created_at: r.created_at,
                author: AuthorSummary {
                    id: r.author_id,
                    name: r.author_name,
                    image: r.author_image,
                },
            })
            .collect())
    }

    async fn get_question_id(&mut self, id: i32) -> Result<Option<i32>, Error> {
        let qid = query_scalar("SELECT question_id FROM answers WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(qid)
    }
}

impl<E> VoteCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    /// Insert or flip through one upsert; when the upsert touches nothing the stored vote already points the
    /// same way and gets deleted. The unique (subject, user) key keeps concurrent calls from duplicating rows.
    async fn reconcile(&mut self, subject: Subject, subject_id: i32, user_id: i32, direction: Direction) -> Result<VoteOutcome, Error> {
        let (table, column) = (subject.table(), subject.column());
        let upsert = format!(
            "
        INSERT INTO {table} ({column}, user_id, value) VALUES ($1, $2, $3)
        ON CONFLICT ({column}, user_id) DO UPDATE SET value = EXCLUDED.value
        WHERE {table}.value <> EXCLUDED.value
        RETURNING (xmax = 0) AS inserted"
        );
        let inserted: Option<bool> = query_scalar(&upsert)
            .bind(subject_id)
            .bind(user_id)
            .bind(direction.value())
            .fetch_optional(&mut self.executor)
            .await?;
        match inserted {
            Some(true) => Ok(VoteOutcome::Created),
            Some(false) => Ok(VoteOutcome::Flipped),
            None => {
                query(&format!("DELETE FROM {table} WHERE {column} = $1 AND user_id = $2 AND value = $3"))
                    .bind(subject_id)
                    .bind(user_id)
                    .bind(direction.value())
                    .execute(&mut self.executor)
                    .await?;
                Ok(VoteOutcome::Cleared)
            }
        }
    }

    async fn get(&mut self, subject: Subject, subject_id: i32, user_id: i32) -> Result<Option<VoteRecord>, Error> {
        let vote = query_as(&format!("SELECT id, value, user_id FROM {} WHERE {} = $1 AND user_id = $2", subject.table(), subject.column()))
            .bind(subject_id)
            .bind(user_id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(vote)
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: i32) -> Result<Option<User>, Error> {
        let user: Option<UserRow> = query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(user.map(User::from))
    }

    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let user: Option<UserRow> = query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(&mut self.executor).await?;
        Ok(user.map(User::from))
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO users (name, email, password, salt, role) VALUES ($1, $2, $3, $4, $5) RETURNING id")
            .bind(user.name)
            .bind(user.email)
            .bind(user.password)
            .bind(user.salt)
            .bind(user.role.as_str())
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }
}

impl<E> CourseCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: i32) -> Result<Option<Course>, Error> {
        let course = query_as("SELECT * FROM courses WHERE id = $1").bind(id).fetch_optional(&mut self.executor).await?;
        Ok(course)
    }

    async fn modules(&mut self, course_id: i32) -> Result<Vec<CourseModule>, Error> {
        let modules = query_as("SELECT id, course_id, title, position FROM course_modules WHERE course_id = $1 ORDER BY position, id")
            .bind(course_id)
            .fetch_all(&mut self.executor)
            .await?;
        Ok(modules)
    }

    async fn counts(&mut self, course_id: i32) -> Result<CourseCounts, Error> {
        let counts = query_as(
            "
        SELECT
            (SELECT COUNT(*) FROM course_modules WHERE course_id = $1) AS module_count,
            (SELECT COUNT(*) FROM questions WHERE course_id = $1) AS question_count,
            (SELECT COUNT(*) FROM course_volumes WHERE course_id = $1) AS volume_count,
            (SELECT COUNT(*) FROM course_chapters AS c JOIN course_volumes AS v ON v.id = c.volume_id WHERE v.course_id = $1) AS chapter_count",
        )
        .bind(course_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(counts)
    }

    async fn is_enrolled(&mut self, course_id: i32, user_id: i32) -> Result<bool, Error> {
        let res = query_scalar("SELECT EXISTS(SELECT * FROM enrollments WHERE course_id = $1 AND user_id = $2)")
            .bind(course_id)
            .bind(user_id)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(res)
    }

    async fn enroll(&mut self, course_id: i32, user_id: i32) -> Result<(), Error> {
        query("INSERT INTO enrollments (course_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(course_id)
            .bind(user_id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl Common for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Common for PgSqlx<Transaction<'a, Postgres>> {}
impl Store for PgSqlx<PoolConnection<Postgres>> {}
impl<'a> Store for PgSqlx<Transaction<'a, Postgres>> {}

impl<'a> TxStore for PgSqlx<Transaction<'a, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Manager for PgSqlxManager {
    type Store = PgSqlx<PoolConnection<Postgres>>;
    type Tx = PgSqlx<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgSqlx::new(conn))
    }

    async fn tx(&self) -> Result<Self::Tx, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgSqlx::new(tx))
    }
}
