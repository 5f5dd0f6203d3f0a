//! Book instance (physical copy) model and related types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FieldError};

/// Copy availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown book instance status: {}", s))
    }
}

/// Book instance record from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn url(&self) -> String {
        Self::url_for(self.id)
    }

    pub fn url_for(id: Uuid) -> String {
        format!("/catalog/bookinstance/{}", id)
    }

    /// Long form, e.g. "October 16th, 2026"
    pub fn due_back_formatted(&self) -> String {
        let day = self.due_back.day();
        format!(
            "{} {}{}, {}",
            self.due_back.format("%B"),
            day,
            ordinal_suffix(day),
            self.due_back.year()
        )
    }

    /// Value for a date input, e.g. "2026-10-16"
    pub fn due_back_update(&self) -> String {
        self.due_back.format("%Y-%m-%d").to_string()
    }

    pub fn is_available(&self) -> bool {
        self.status == BookInstanceStatus::Available
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Validated book instance fields
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceData {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

/// Book instance form submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInstanceForm {
    /// Book id
    #[serde(default)]
    #[validate(length(min = 1, message = "Book must be specified"))]
    pub book: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    /// One of the status names; empty means Maintenance
    #[serde(default)]
    pub status: String,
    /// ISO-8601 date; empty means `today`
    #[serde(default)]
    pub due_back: String,
}

impl BookInstanceForm {
    pub const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    pub fn from_instance(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            due_back: instance.due_back_update(),
        }
    }

    /// Trim, validate and escape the submission. `today` fills an empty due date.
    pub fn process(&mut self, today: NaiveDate) -> Result<BookInstanceData, Vec<FieldError>> {
        validation::trim(&mut self.book);
        validation::trim(&mut self.imprint);
        validation::trim(&mut self.status);
        validation::trim(&mut self.due_back);

        let mut extra = Vec::new();
        let book = validation::reference(&self.book, "book", "Book must be a valid selection", &mut extra);
        let status = if self.status.is_empty() {
            Some(BookInstanceStatus::default())
        } else {
            let parsed = self.status.parse::<BookInstanceStatus>().ok();
            if parsed.is_none() {
                extra.push(FieldError::new("status", "Invalid status"));
            }
            parsed
        };
        let due_back = validation::optional_date(&self.due_back, "due_back", "Invalid date", &mut extra);

        let errors = validation::ordered_errors(Self::FIELDS, self.validate(), extra);

        validation::escape(&mut self.book);
        validation::escape(&mut self.imprint);
        validation::escape(&mut self.status);
        validation::escape(&mut self.due_back);

        match (book, status) {
            (Some(book), Some(status)) if errors.is_empty() => Ok(BookInstanceData {
                book,
                imprint: self.imprint.clone(),
                status,
                due_back: due_back.unwrap_or(today),
            }),
            _ => Err(errors),
        }
    }
}
