//! Input validation for caller-supplied records
//!
//! Rules are declared with `#[derive(Validate)]` on the input types in
//! [`crate::model`]. This module turns the collected `ValidationErrors`
//! into a single `Error::Validation` message such as
//! `"email" must be a valid email, "name" is required`.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::Error;

/// Rejects the empty string; whitespace counts as a value
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::new("required").with_message(Cow::Borrowed("is required")))
    } else {
        Ok(())
    }
}

/// Render every violation as `"field" message`, fields in name order
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut messages = Vec::new();
    for (field, errs) in fields {
        let name = camel_case(&field);
        for err in errs.iter() {
            let message = err.message.as_deref().unwrap_or("is invalid");
            messages.push(format!("\"{name}\" {message}"));
        }
    }
    messages.join(", ")
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(describe(&errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewProject, NewSkill, NewWorkExperience, ProfileInput};
    use validator::Validate;

    fn message(result: Result<(), ValidationErrors>) -> String {
        match result {
            Err(errors) => describe(&errors),
            Ok(()) => panic!("expected validation errors"),
        }
    }

    #[test]
    fn test_valid_profile() {
        let mut input = ProfileInput::new("Ada Lovelace", "ada@example.com");
        input.github_url = Some("https://github.com/ada".to_string());
        input.education = Some(String::new());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_empty_urls_are_absent() {
        let input: ProfileInput = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","linkedinUrl":""}"#,
        )
        .unwrap();
        assert_eq!(input.linkedin_url, None);
        assert!(input.validate().is_ok());

        let project: NewProject = serde_json::from_str(r#"{"title":"Folio","link":""}"#).unwrap();
        assert_eq!(project.link, None);
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_whitespace_name_is_a_value() {
        assert!(ProfileInput::new("  ", "ada@example.com").validate().is_ok());
    }

    #[test]
    fn test_missing_name_and_email_reported_together() {
        let msg = message(ProfileInput::default().validate());
        assert!(msg.contains("\"name\" is required"));
        assert!(msg.contains("\"email\" is required"));
    }

    #[test]
    fn test_bad_email_and_uri() {
        let mut input = ProfileInput::new("Ada", "not-an-email");
        input.portfolio_url = Some("portfolio".to_string());
        let msg = message(input.validate());
        assert!(msg.contains("\"email\" must be a valid email"));
        assert!(msg.contains("\"portfolioUrl\" must be a valid uri"));
    }

    #[test]
    fn test_name_length_limit() {
        let input = ProfileInput::new("x".repeat(256), "a@b.io");
        let msg = message(input.validate());
        assert!(msg.contains("\"name\" length must be less than or equal to 255"));
    }

    #[test]
    fn test_negative_years_rejected() {
        let skill = NewSkill {
            name: "Rust".to_string(),
            proficiency: None,
            years_experience: Some(-1),
        };
        assert!(message(skill.validate()).contains("\"yearsExperience\""));
    }

    #[test]
    fn test_project_requires_title() {
        let project = NewProject::new("", &["Rust"]);
        assert!(message(project.validate()).contains("\"title\" is required"));
    }

    #[test]
    fn test_work_requires_company_and_role() {
        let work: NewWorkExperience = serde_json::from_str(r#"{"startDate":"2024-01-01"}"#).unwrap();
        let msg = message(work.validate());
        assert_eq!(msg, "\"company\" is required, \"role\" is required");
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: Error = NewProject::new("", &[]).validate().unwrap_err().into();
        assert!(matches!(err, Error::Validation(ref msg) if msg == "\"title\" is required"));
    }
}
