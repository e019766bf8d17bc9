//! Seeding - replace the database contents with a TOML document
//!
//! ```toml
//! [profile]
//! name = "Ada Lovelace"
//! email = "ada@example.com"
//!
//! [[skills]]
//! name = "Rust"
//! proficiency = "Intermediate"
//! yearsExperience = 1
//!
//! [[projects]]
//! title = "Folio"
//! skillsUsed = ["Rust", "SQLite"]
//! startDate = "2025-12-13"
//!
//! [[work]]
//! company = "Acme"
//! role = "Engineer"
//! startDate = "2024-01-01"
//! isCurrent = true
//! ```
//!
//! Dates are quoted `YYYY-MM-DD` strings.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{NewProject, NewSkill, NewWorkExperience, ProfileInput};
use crate::storage::PortfolioStore;
use crate::validate::describe;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDocument {
    pub profile: ProfileInput,
    #[serde(default)]
    pub skills: Vec<NewSkill>,
    #[serde(default)]
    pub projects: Vec<NewProject>,
    #[serde(default)]
    pub work: Vec<NewWorkExperience>,
}

/// Row counts written by a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub profile_id: i64,
    pub skills: usize,
    pub projects: usize,
    pub work: usize,
}

impl SeedDocument {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let doc = toml::from_str(&contents)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        Ok(doc)
    }

    /// Validate every record, prefixing each failure with its location
    pub fn validate(&self) -> Result<()> {
        let mut failures = Vec::new();

        if let Err(errors) = self.profile.validate() {
            failures.push(format!("profile: {}", describe(&errors)));
        }
        for (i, skill) in self.skills.iter().enumerate() {
            if let Err(errors) = skill.validate() {
                failures.push(format!("skills[{i}]: {}", describe(&errors)));
            }
        }
        for (i, project) in self.projects.iter().enumerate() {
            if let Err(errors) = project.validate() {
                failures.push(format!("projects[{i}]: {}", describe(&errors)));
            }
        }
        for (i, work) in self.work.iter().enumerate() {
            if let Err(errors) = work.validate() {
                failures.push(format!("work[{i}]: {}", describe(&errors)));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(failures.join("; ")))
        }
    }
}

/// Clear the store and load `doc` in a single transaction
pub fn seed(store: &mut PortfolioStore, doc: &SeedDocument) -> Result<SeedSummary> {
    doc.validate()?;

    store.begin_transaction()?;
    match write_all(store, doc) {
        Ok(summary) => {
            store.commit()?;
            tracing::info!(
                "Seeded profile {} with {} skills, {} projects, {} work entries",
                summary.profile_id,
                summary.skills,
                summary.projects,
                summary.work
            );
            Ok(summary)
        }
        Err(e) => Err(abandon(store, e)),
    }
}

/// Roll back a failed seed; the write error is kept even if rollback fails
fn abandon(store: &mut PortfolioStore, err: Error) -> Error {
    if let Err(rollback) = store.rollback() {
        tracing::error!("Rollback after failed seed also failed: {}", rollback);
    }
    err
}

fn write_all(store: &PortfolioStore, doc: &SeedDocument) -> Result<SeedSummary> {
    store.clear_all()?;
    let profile = store.create_profile(&doc.profile)?;

    for skill in &doc.skills {
        store.insert_skill(profile.id, skill)?;
    }
    for project in &doc.projects {
        store.insert_project(profile.id, project)?;
    }
    for work in &doc.work {
        if work.has_current_conflict() {
            tracing::warn!(
                "{} at {} is marked current but has an end date; storing as given",
                work.role,
                work.company
            );
        }
        store.insert_work(profile.id, work)?;
    }

    Ok(SeedSummary {
        profile_id: profile.id,
        skills: doc.skills.len(),
        projects: doc.projects.len(),
        work: doc.work.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
[profile]
name = "Ada Lovelace"
email = "ada@example.com"
githubUrl = "https://github.com/ada"

[[skills]]
name = "Rust"
proficiency = "Intermediate"
yearsExperience = 1

[[skills]]
name = "JavaScript"
yearsExperience = 3

[[projects]]
title = "TechBlog Backend"
description = "Blog API"
skillsUsed = ["Node.js", "PostgreSQL"]
startDate = "2025-01-10"

[[work]]
company = "Acme"
role = "Engineer"
startDate = "2024-01-01"
endDate = "2024-06-01"
isCurrent = true
"#;

    fn parse(s: &str) -> SeedDocument {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_seed_loads_everything() {
        let mut store = PortfolioStore::open_in_memory().unwrap();
        let summary = seed(&mut store, &parse(SEED)).unwrap();

        assert_eq!((summary.skills, summary.projects, summary.work), (2, 1, 1));
        let full = store.get_profile_with_relations().unwrap();
        assert_eq!(full.profile.github_url.as_deref(), Some("https://github.com/ada"));
        assert_eq!(full.skills[0].name, "JavaScript");
        assert_eq!(full.projects[0].skills_used, vec!["Node.js", "PostgreSQL"]);
        assert!(full.work[0].is_current);
        assert!(full.work[0].end_date.is_some());
    }

    #[test]
    fn test_reseed_replaces_previous_data() {
        let mut store = PortfolioStore::open_in_memory().unwrap();
        let doc = parse(SEED);
        seed(&mut store, &doc).unwrap();
        seed(&mut store, &doc).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!((stats.profiles, stats.skills, stats.projects, stats.work), (1, 2, 1, 1));
    }

    #[test]
    fn test_invalid_seed_leaves_store_untouched() {
        let mut store = PortfolioStore::open_in_memory().unwrap();
        seed(&mut store, &parse(SEED)).unwrap();

        let mut bad = parse(SEED);
        bad.skills[1].years_experience = Some(-2);
        bad.projects[0].title.clear();

        let err = seed(&mut store, &bad).unwrap_err();
        let Error::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("skills[1]"));
        assert!(msg.contains("projects[0]"));
        assert_eq!(store.count_skills().unwrap(), 2);
    }

    #[test]
    fn test_failed_rollback_keeps_write_error() {
        let mut store = PortfolioStore::open_in_memory().unwrap();
        // No transaction is open, so the rollback itself fails
        let err = abandon(&mut store, Error::Conflict("duplicate".to_string()));
        assert!(matches!(err, Error::Conflict(ref msg) if msg == "duplicate"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.toml");
        std::fs::write(&path, SEED).unwrap();

        let doc = SeedDocument::load(&path).unwrap();
        assert_eq!(doc.profile.name, "Ada Lovelace");
        assert_eq!(doc.work.len(), 1);
    }
}
