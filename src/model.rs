//! Portfolio entities
//!
//! A single [`Profile`] owns every other record:
//! - `Skill`: a named skill with an optional proficiency tier and years of experience
//! - `Project`: a piece of work tagged with free-text `skills_used`
//! - `WorkExperience`: an employment entry
//!
//! The `New*` and [`ProfileInput`] types are the caller-supplied halves of
//! each record; ids and timestamps are assigned by the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// An empty optional string is treated as absent
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

/// The owning identity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub education: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full set of caller-supplied profile fields.
///
/// Used for both create and update; an update overwrites every field,
/// so an omitted optional field is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        length(max = 255, message = "length must be less than or equal to 255 characters long")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        email(message = "must be a valid email"),
        length(max = 255, message = "length must be less than or equal to 255 characters long")
    )]
    pub email: String,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        url(message = "must be a valid uri"),
        length(max = 500, message = "length must be less than or equal to 500 characters long")
    )]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        url(message = "must be a valid uri"),
        length(max = 500, message = "length must be less than or equal to 500 characters long")
    )]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        url(message = "must be a valid uri"),
        length(max = 500, message = "length must be less than or equal to 500 characters long")
    )]
    pub portfolio_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        url(message = "must be a valid uri"),
        length(max = 500, message = "length must be less than or equal to 500 characters long")
    )]
    pub avatar_url: Option<String>,
}

impl ProfileInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    /// Free-text tier such as "Advanced"; not an enum
    pub proficiency: Option<String>,
    pub years_experience: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        length(max = 100, message = "length must be less than or equal to 100 characters long")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "length must be less than or equal to 50 characters long"))]
    pub proficiency: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub years_experience: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Denormalized tag list; entries need not match any `Skill::name`
    pub skills_used: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        length(max = 255, message = "length must be less than or equal to 255 characters long")
    )]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(
        url(message = "must be a valid uri"),
        length(max = 500, message = "length must be less than or equal to 500 characters long")
    )]
    pub link: Option<String>,
    #[serde(default)]
    pub skills_used: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, skills_used: &[&str]) -> Self {
        Self {
            title: title.into(),
            skills_used: skills_used.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

/// An employment entry.
///
/// `is_current` and `end_date` are independent columns: a current role
/// conventionally has no end date, but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: i64,
    pub profile_id: i64,
    pub company: String,
    pub role: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkExperience {
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        length(max = 255, message = "length must be less than or equal to 255 characters long")
    )]
    pub company: String,
    #[serde(default)]
    #[validate(
        custom(function = "crate::validate::required"),
        length(max = 255, message = "length must be less than or equal to 255 characters long")
    )]
    pub role: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_current: bool,
}

impl NewWorkExperience {
    /// True when the entry is flagged current but still carries an end date
    pub fn has_current_conflict(&self) -> bool {
        self.is_current && self.end_date.is_some()
    }
}

/// A profile together with all of its children, each list already ordered
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWithRelations {
    pub profile: Profile,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub work: Vec<WorkExperience>,
}
