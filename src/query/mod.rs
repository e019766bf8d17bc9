pub mod aggregate;
pub mod engine;

pub use aggregate::{TopSkill, count_skill_usage};
pub use engine::{QueryEngine, SearchResults, SEARCH_LIMIT};
