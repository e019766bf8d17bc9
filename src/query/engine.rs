//! Query engine implementation
//!
//! Provides the read-side views that span more than one table:
//! - Top skills: usage frequency of `skills_used` tags across projects
//! - Search: independent case-insensitive substring matches per entity

use serde::Serialize;

use super::aggregate::{TopSkill, count_skill_usage};
use crate::Result;
use crate::model::{Project, Skill, WorkExperience};
use crate::storage::PortfolioStore;

/// Per-entity cap on search matches
pub const SEARCH_LIMIT: usize = 10;

/// Three independent match lists; no ranking across them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub work: Vec<WorkExperience>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.skills.is_empty() && self.work.is_empty()
    }
}

/// Query engine over a portfolio store
pub struct QueryEngine<'a> {
    store: &'a PortfolioStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a PortfolioStore) -> Self {
        Self { store }
    }

    /// Skill names ranked by how many projects list them
    pub fn top_skills(&self) -> Result<Vec<TopSkill>> {
        let lists = self.store.all_skills_used()?;
        Ok(count_skill_usage(lists))
    }

    /// Search projects (title, description), skills (name) and work
    /// entries (company, role, description) for `query`.
    ///
    /// A missing or empty query yields empty lists rather than an error.
    pub fn search(&self, query: Option<&str>) -> Result<SearchResults> {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return Ok(SearchResults::default());
        };

        tracing::debug!("Searching portfolio for {:?}", query);
        Ok(SearchResults {
            projects: self.store.search_projects(query, SEARCH_LIMIT)?,
            skills: self.store.search_skills(query, SEARCH_LIMIT)?,
            work: self.store.search_work(query, SEARCH_LIMIT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewProject, NewSkill, NewWorkExperience, ProfileInput};
    use chrono::NaiveDate;

    fn seeded_store() -> PortfolioStore {
        let store = PortfolioStore::open_in_memory().unwrap();
        let profile = store
            .create_profile(&ProfileInput::new("Ada", "ada@example.com"))
            .unwrap();

        store
            .insert_project(profile.id, &NewProject::new("Dashboard", &["React", "Next.js"]))
            .unwrap();
        store
            .insert_project(profile.id, &NewProject::new("TechBlog Backend", &["React"]))
            .unwrap();
        store
            .insert_project(profile.id, &NewProject::new("Desktop Notes", &["Rust"]))
            .unwrap();
        store
            .insert_skill(
                profile.id,
                &NewSkill {
                    name: "Blogging".to_string(),
                    proficiency: None,
                    years_experience: Some(1),
                },
            )
            .unwrap();
        store
            .insert_work(
                profile.id,
                &NewWorkExperience {
                    company: "Acme".to_string(),
                    role: "Backend Engineer".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    end_date: None,
                    description: Some("Maintained the company blog platform".to_string()),
                    is_current: true,
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_top_skills_from_store() {
        let store = seeded_store();
        let engine = QueryEngine::new(&store);
        assert_eq!(
            engine.top_skills().unwrap(),
            vec![
                TopSkill::new("React", 2),
                TopSkill::new("Next.js", 1),
                TopSkill::new("Rust", 1),
            ]
        );
    }

    #[test]
    fn test_search_hits_every_entity() {
        let store = seeded_store();
        let results = QueryEngine::new(&store).search(Some("blog")).unwrap();

        assert_eq!(results.projects.len(), 1);
        assert_eq!(results.projects[0].title, "TechBlog Backend");
        assert_eq!(results.skills[0].name, "Blogging");
        assert_eq!(results.work[0].company, "Acme");
    }

    #[test]
    fn test_search_matches_work_role() {
        let store = seeded_store();
        let results = QueryEngine::new(&store).search(Some("BACKEND ENG")).unwrap();
        assert!(results.projects.is_empty());
        assert_eq!(results.work.len(), 1);
    }

    #[test]
    fn test_search_folds_unicode_case() {
        let store = seeded_store();
        let profile = store.get_profile_with_relations().unwrap().profile;
        store
            .insert_project(profile.id, &NewProject::new("Café Ölçer", &["Rust"]))
            .unwrap();

        let results = QueryEngine::new(&store).search(Some("CAFÉ")).unwrap();
        assert_eq!(results.projects.len(), 1);
        assert_eq!(results.projects[0].title, "Café Ölçer");
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let store = seeded_store();
        let engine = QueryEngine::new(&store);
        assert!(engine.search(Some("")).unwrap().is_empty());
        assert!(engine.search(None).unwrap().is_empty());
    }
}
