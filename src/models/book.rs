//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, FieldError};

/// Book record from the store. `author` and `genre` hold references only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn url(&self) -> String {
        Self::url_for(self.id)
    }

    pub fn url_for(id: Uuid) -> String {
        format!("/catalog/book/{}", id)
    }
}

/// Validated book fields
#[derive(Debug, Clone, PartialEq)]
pub struct BookData {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

/// Book form submission.
///
/// `genre` arrives as zero, one or many repeated form keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    /// Author id
    #[serde(default)]
    #[validate(length(min = 1, message = "Author must not be empty."))]
    pub author: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    /// Genre ids
    #[serde(default)]
    pub genre: Vec<String>,
}

impl BookForm {
    pub const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(Uuid::to_string).collect(),
        }
    }

    /// Collapse the genre selection into a clean list: trimmed, no blanks,
    /// no repeats, submission order kept.
    pub fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.genre.len());
        for value in self.genre.drain(..) {
            let value = value.trim().to_string();
            if !value.is_empty() && !seen.contains(&value) {
                seen.push(value);
            }
        }
        self.genre = seen;
    }

    /// Whether the given genre is part of the selection
    pub fn is_selected(&self, genre: Uuid) -> bool {
        let id = genre.to_string();
        self.genre.iter().any(|g| *g == id)
    }

    /// Normalize, trim, validate and escape the submission
    pub fn process(&mut self) -> Result<BookData, Vec<FieldError>> {
        self.normalize();
        validation::trim(&mut self.title);
        validation::trim(&mut self.author);
        validation::trim(&mut self.summary);
        validation::trim(&mut self.isbn);

        let mut extra = Vec::new();
        let author = validation::reference(
            &self.author,
            "author",
            "Author must be a valid selection.",
            &mut extra,
        );
        let mut genre = Vec::with_capacity(self.genre.len());
        for value in &self.genre {
            if let Some(id) =
                validation::reference(value, "genre", "Genre must be a valid selection.", &mut extra)
            {
                genre.push(id);
            }
        }

        let errors = validation::ordered_errors(Self::FIELDS, self.validate(), extra);

        validation::escape(&mut self.title);
        validation::escape(&mut self.author);
        validation::escape(&mut self.summary);
        validation::escape(&mut self.isbn);
        for value in self.genre.iter_mut() {
            validation::escape(value);
        }

        match author {
            Some(author) if errors.is_empty() => Ok(BookData {
                title: self.title.clone(),
                author,
                summary: self.summary.clone(),
                isbn: self.isbn.clone(),
                genre,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> BookForm {
        BookForm {
            title: "The Name of the Wind".into(),
            author: Uuid::new_v4().to_string(),
            summary: "A young man grows to be the most notorious wizard.".into(),
            isbn: "9781473211896".into(),
            genre: vec![],
        }
    }

    #[test]
    fn test_normalize_genre_selection() {
        let a = Uuid::new_v4().to_string();
        let b = Uuid::new_v4().to_string();
        let mut form = BookForm {
            genre: vec![format!(" {} ", a), String::new(), b.clone(), a.clone()],
            ..Default::default()
        };
        form.normalize();
        assert_eq!(form.genre, vec![a, b]);
    }

    #[test]
    fn test_process_valid_form() {
        let genre = Uuid::new_v4();
        let mut form = valid_form();
        form.genre = vec![genre.to_string()];
        let data = form.process().unwrap();
        assert_eq!(data.genre, vec![genre]);
        assert_eq!(data.author.to_string(), form.author);
    }

    #[test]
    fn test_process_reports_missing_fields_in_order() {
        let mut form = BookForm::default();
        let errors = form.process().unwrap_err();
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Title must not be empty.",
                "Author must not be empty.",
                "Summary must not be empty.",
                "ISBN must not be empty",
            ]
        );
    }

    #[test]
    fn test_process_rejects_unknown_references() {
        let mut form = valid_form();
        form.author = "not-an-id".into();
        form.genre = vec!["also-bad".into()];
        let errors = form.process().unwrap_err();
        assert_eq!(errors[0], FieldError::new("author", "Author must be a valid selection."));
        assert_eq!(errors[1], FieldError::new("genre", "Genre must be a valid selection."));
    }

    #[test]
    fn test_is_selected() {
        let genre = Uuid::new_v4();
        let form = BookForm {
            genre: vec![genre.to_string()],
            ..Default::default()
        };
        assert!(form.is_selected(genre));
        assert!(!form.is_selected(Uuid::new_v4()));
    }
}
