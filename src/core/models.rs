pub mod answer;
pub mod common;
pub mod course;
pub mod question;
pub mod tag;
pub mod user;
pub mod vote;
