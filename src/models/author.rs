//! Author model and related types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FieldError};

/// Maximum length of either name part
pub const NAME_MAX_LEN: usize = 100;

/// Full author record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "family_name, first_name", or empty when either part is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Years between birth and death; absent unless both dates are known
    pub fn lifespan(&self) -> Option<i32> {
        match (self.date_of_birth, self.date_of_death) {
            (Some(birth), Some(death)) => Some(death.year() - birth.year()),
            _ => None,
        }
    }

    pub fn date_of_birth_formatted(&self) -> String {
        format_optional_date(self.date_of_birth)
    }

    pub fn date_of_death_formatted(&self) -> String {
        format_optional_date(self.date_of_death)
    }

    pub fn url(&self) -> String {
        Self::url_for(self.id)
    }

    pub fn url_for(id: Uuid) -> String {
        format!("/catalog/author/{}", id)
    }
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Validated author fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorData {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author form submission (also used to re-populate the form)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "First name must be specified"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Family name must be specified"))]
    pub family_name: String,
    /// ISO-8601 date, may be empty
    #[serde(default)]
    pub date_of_birth: String,
    /// ISO-8601 date, may be empty
    #[serde(default)]
    pub date_of_death: String,
}

impl AuthorForm {
    pub const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    /// Trim, validate and escape the submission.
    ///
    /// The form is left sanitized whatever the outcome so it can be
    /// re-rendered as-is.
    pub fn process(&mut self) -> Result<AuthorData, Vec<FieldError>> {
        validation::trim(&mut self.first_name);
        validation::trim(&mut self.family_name);
        validation::trim(&mut self.date_of_birth);
        validation::trim(&mut self.date_of_death);

        let mut extra = Vec::new();
        check_name_part(&self.first_name, "first_name", "First name", &mut extra);
        check_name_part(&self.family_name, "family_name", "Family name", &mut extra);
        let date_of_birth = validation::optional_date(
            &self.date_of_birth,
            "date_of_birth",
            "Invalid date of birth",
            &mut extra,
        );
        let date_of_death = validation::optional_date(
            &self.date_of_death,
            "date_of_death",
            "Invalid date of death",
            &mut extra,
        );

        let errors = validation::ordered_errors(Self::FIELDS, self.validate(), extra);

        validation::escape(&mut self.first_name);
        validation::escape(&mut self.family_name);
        validation::escape(&mut self.date_of_birth);
        validation::escape(&mut self.date_of_death);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(AuthorData {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}

// Presence is reported by the derived rule; only non-empty values are checked here.
fn check_name_part(value: &str, field: &str, label: &str, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        return;
    }
    if !validation::is_alphanumeric(value) {
        errors.push(FieldError::new(
            field,
            format!("{} has non-alphanumeric characters.", label),
        ));
    }
    if value.chars().count() > NAME_MAX_LEN {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", label, NAME_MAX_LEN),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, family: &str) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(author("Patrick", "Rothfuss").name(), "Rothfuss, Patrick");
        assert_eq!(author("", "Rothfuss").name(), "");
        assert_eq!(author("Patrick", "").name(), "");
    }

    #[test]
    fn test_lifespan_requires_both_dates() {
        let mut a = author("Isaac", "Asimov");
        assert_eq!(a.lifespan(), None);
        a.date_of_birth = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(a.lifespan(), None);
        a.date_of_death = NaiveDate::from_ymd_opt(1992, 4, 6);
        assert_eq!(a.lifespan(), Some(72));
    }

    #[test]
    fn test_formatted_dates() {
        let mut a = author("Isaac", "Asimov");
        assert_eq!(a.date_of_birth_formatted(), "");
        a.date_of_birth = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(a.date_of_birth_formatted(), "1920-01-02");
        assert_eq!(a.date_of_death_formatted(), "");
        assert_eq!(a.url(), format!("/catalog/author/{}", a.id));
    }

    #[test]
    fn test_process_valid_form() {
        let mut form = AuthorForm {
            first_name: "  Ben ".into(),
            family_name: "Bova".into(),
            date_of_birth: "1932-11-08".into(),
            date_of_death: String::new(),
        };
        let data = form.process().unwrap();
        assert_eq!(data.first_name, "Ben");
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(1932, 11, 8));
        assert_eq!(data.date_of_death, None);
        assert_eq!(form.first_name, "Ben");
    }

    #[test]
    fn test_process_empty_first_name() {
        let mut form = AuthorForm {
            first_name: "   ".into(),
            family_name: "Bova".into(),
            ..Default::default()
        };
        let errors = form.process().unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::new("first_name", "First name must be specified")]
        );
    }

    #[test]
    fn test_process_collects_every_failure_in_order() {
        let mut form = AuthorForm {
            first_name: "J.R.R.".into(),
            family_name: String::new(),
            date_of_birth: "yesterday".into(),
            date_of_death: "1973-09-02".into(),
        };
        let errors = form.process().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth"]);
        assert_eq!(errors[0].message, "First name has non-alphanumeric characters.");
        assert_eq!(errors[2].message, "Invalid date of birth");
    }

    #[test]
    fn test_process_escapes_rejected_values() {
        let mut form = AuthorForm {
            first_name: "<i>Ann</i>".into(),
            family_name: "Leckie".into(),
            ..Default::default()
        };
        assert!(form.process().is_err());
        assert_eq!(form.first_name, "&lt;i&gt;Ann&lt;&#x2F;i&gt;");
    }

    #[test]
    fn test_process_rejects_long_names() {
        let mut form = AuthorForm {
            first_name: "a".repeat(101),
            family_name: "Long".into(),
            ..Default::default()
        };
        let errors = form.process().unwrap_err();
        assert_eq!(errors[0].message, "First name must be at most 100 characters");
    }
}
