//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - profiles(name, email, education, urls, timestamps)
//! - skills(profile_id, name, proficiency, years_experience)
//! - projects(profile_id, title, description, link, skills_used, dates)
//! - work_experience(profile_id, company, role, dates, description, is_current)
//!
//! Child rows reference `profiles` with `ON DELETE CASCADE`.

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, PortfolioStore};
