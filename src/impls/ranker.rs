pub mod recency;
