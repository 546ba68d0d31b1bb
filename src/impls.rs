pub mod ranker;
pub mod tokener;
