//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FieldError};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;

/// Genre record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        Self::url_for(self.id)
    }

    pub fn url_for(id: Uuid) -> String {
        format!("/catalog/genre/{}", id)
    }
}

/// Validated genre fields
#[derive(Debug, Clone, PartialEq)]
pub struct GenreData {
    pub name: String,
}

/// Genre form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenreForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Genre name required"))]
    pub name: String,
}

impl GenreForm {
    pub const FIELDS: &'static [&'static str] = &["name"];

    pub fn from_genre(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }

    /// Trim, escape and validate the submission. The length bounds apply to
    /// the escaped name, which is what gets stored.
    pub fn process(&mut self) -> Result<GenreData, Vec<FieldError>> {
        validation::trim(&mut self.name);
        validation::escape(&mut self.name);

        let mut extra = Vec::new();
        let len = self.name.chars().count();
        if len > 0 && !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
            extra.push(FieldError::new(
                "name",
                format!(
                    "Genre name must be between {} and {} characters",
                    NAME_MIN_LEN, NAME_MAX_LEN
                ),
            ));
        }

        let errors = validation::ordered_errors(Self::FIELDS, self.validate(), extra);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(GenreData {
            name: self.name.clone(),
        })
    }
}
