//! Response shapes
//!
//! Store records are projected into these camelCase views; ids and foreign
//! keys are only exposed where callers need them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::{Profile, ProfileWithRelations, Project, Skill, WorkExperience};
use crate::query::SearchResults;

/// Uniform success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub education: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub skills: Vec<SkillView>,
    pub projects: Vec<ProjectView>,
    pub work: Vec<WorkView>,
}

impl From<ProfileWithRelations> for ProfileView {
    fn from(full: ProfileWithRelations) -> Self {
        let Profile {
            id,
            name,
            email,
            education,
            github_url,
            linkedin_url,
            portfolio_url,
            avatar_url,
            ..
        } = full.profile;

        Self {
            id,
            name,
            email,
            education,
            github_url,
            linkedin_url,
            portfolio_url,
            avatar_url,
            skills: full.skills.into_iter().map(SkillView::from).collect(),
            projects: full.projects.into_iter().map(ProjectView::from).collect(),
            work: full.work.into_iter().map(WorkView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillView {
    pub name: String,
    pub proficiency: Option<String>,
    pub years: Option<i64>,
}

impl From<Skill> for SkillView {
    fn from(skill: Skill) -> Self {
        Self {
            name: skill.name,
            proficiency: skill.proficiency,
            years: skill.years_experience,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub skills_used: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            link: project.link,
            skills_used: project.skills_used,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkView {
    pub company: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_current: bool,
}

impl From<WorkExperience> for WorkView {
    fn from(work: WorkExperience) -> Self {
        Self {
            company: work.company,
            role: work.role,
            start_date: work.start_date,
            end_date: work.end_date,
            description: work.description,
            is_current: work.is_current,
        }
    }
}

// ========== Search hits ==========

#[derive(Debug, Serialize)]
pub struct ProjectHit {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SkillHit {
    pub name: String,
    pub proficiency: Option<String>,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WorkHit {
    pub company: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SearchView {
    pub projects: Vec<ProjectHit>,
    pub skills: Vec<SkillHit>,
    pub work: Vec<WorkHit>,
}

impl From<SearchResults> for SearchView {
    fn from(results: SearchResults) -> Self {
        Self {
            projects: results
                .projects
                .into_iter()
                .map(|p| ProjectHit {
                    id: p.id,
                    title: p.title,
                    description: p.description,
                    kind: "project",
                })
                .collect(),
            skills: results
                .skills
                .into_iter()
                .map(|s| SkillHit {
                    name: s.name,
                    proficiency: s.proficiency,
                    kind: "skill",
                })
                .collect(),
            work: results
                .work
                .into_iter()
                .map(|w| WorkHit {
                    company: w.company,
                    role: w.role,
                    kind: "work",
                })
                .collect(),
        }
    }
}
