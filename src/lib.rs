//! # Folio - Personal Portfolio Content API
//!
//! Folio serves one person's portfolio content over a small JSON API.
//!
//! Folio provides:
//! - SQLite-backed storage for a profile and its skills, projects and work history
//! - Query operations with ordering and exact-tag project filtering
//! - Derived views: skill usage frequency and cross-entity text search
//! - An axum HTTP server with a uniform `{success, data, error}` envelope

pub mod model;
pub mod validate;
pub mod storage;
pub mod query;
pub mod seed;
pub mod server;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{Profile, ProfileInput, ProfileWithRelations, Project, Skill, WorkExperience};
pub use query::{SearchResults, TopSkill};
pub use storage::PortfolioStore;

/// Result type alias for Folio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Folio operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),
}
