pub mod answer;
pub mod auth;
pub mod course;
pub mod page;
pub mod question;
pub mod vote;
