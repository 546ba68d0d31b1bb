use crate::error::Error;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The kind of entity a vote is cast on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Question,
    Answer,
}

impl Subject {
    pub fn table(&self) -> &'static str {
        match self {
            Subject::Question => "question_votes",
            Subject::Answer => "answer_votes",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Subject::Question => "question_id",
            Subject::Answer => "answer_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn value(&self) -> i16 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl TryFrom<i16> for Direction {
    type Error = Error;
    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            -1 => Ok(Direction::Down),
            v => Err(Error::Validation(format!("invalid vote value({}), expect 1 or -1", v))),
        }
    }
}

/// What has to happen to the (subject, voter) row for a new vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Create,
    Update,
    Delete,
}

impl VoteAction {
    /// Repeating the current direction clears the vote, the opposite direction flips it.
    pub fn decide(existing: Option<i16>, direction: Direction) -> Self {
        match existing {
            None => VoteAction::Create,
            Some(v) if v == direction.value() => VoteAction::Delete,
            Some(_) => VoteAction::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOutcome {
    Created,
    Flipped,
    Cleared,
}

impl From<VoteAction> for VoteOutcome {
    fn from(action: VoteAction) -> Self {
        match action {
            VoteAction::Create => VoteOutcome::Created,
            VoteAction::Update => VoteOutcome::Flipped,
            VoteAction::Delete => VoteOutcome::Cleared,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: i32,
    pub value: i16,
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq, Eq)]
pub struct Tally {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

impl Tally {
    pub fn of(votes: &[VoteRecord]) -> Self {
        let upvotes = votes.iter().filter(|v| v.value == 1).count() as i64;
        let downvotes = votes.iter().filter(|v| v.value == -1).count() as i64;
        Tally {
            upvotes,
            downvotes,
            score: upvotes - downvotes,
        }
    }
}

pub fn user_vote(votes: &[VoteRecord], user_id: Option<i32>) -> Option<i16> {
    let uid = user_id?;
    votes.iter().find(|v| v.user_id == uid).map(|v| v.value)
}
