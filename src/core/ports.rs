pub mod permission;
pub mod ranking;
pub mod repository;
