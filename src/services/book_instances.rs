//! Book instance (copy) workflows

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{FormOutcome, FormState};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInstance, BookInstanceForm},
    repository::Repository,
    validation::FieldError,
};

/// A copy with its book expanded; empty when the book reference dangles
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceEntry {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

/// Books offered on the copy form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookInstanceChoices {
    pub books: Vec<Book>,
}

pub type BookInstanceFormState = FormState<BookInstanceForm, BookInstanceChoices>;

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies ordered by due date, with books expanded
    pub async fn list(&self) -> AppResult<Vec<BookInstanceEntry>> {
        let instances = self.repository.book_instances.list().await?;

        let mut book_ids: Vec<Uuid> = instances.iter().map(|i| i.book).collect();
        book_ids.sort_unstable();
        book_ids.dedup();
        let books: HashMap<Uuid, Book> = self
            .repository
            .books
            .find_many(&book_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(instances
            .into_iter()
            .map(|instance| BookInstanceEntry {
                book: books.get(&instance.book).cloned(),
                instance,
            })
            .collect())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceEntry> {
        self.find_entry(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book copy not found".to_string()))
    }

    /// Empty create form with every book to choose from
    pub async fn create_form(&self) -> AppResult<BookInstanceFormState> {
        let books = self.repository.books.list().await?;
        Ok(FormState::new(
            BookInstanceForm::default(),
            BookInstanceChoices { books },
        ))
    }

    /// Validate and create a copy
    pub async fn create(&self, mut form: BookInstanceForm) -> AppResult<FormOutcome<BookInstanceFormState>> {
        match form.process(Utc::now().date_naive()) {
            Ok(data) => {
                let instance = self.repository.book_instances.create(&data).await?;
                tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
                Ok(FormOutcome::Saved(instance.id))
            }
            Err(errors) => self.reject(form, errors).await,
        }
    }

    /// Pre-filled update form
    pub async fn update_form(&self, id: Uuid) -> AppResult<BookInstanceFormState> {
        let (books, instance) = tokio::try_join!(
            self.repository.books.list(),
            self.repository.book_instances.find_by_id(id),
        )?;
        let instance = instance.ok_or_else(|| AppError::NotFound("BookInstance not found".to_string()))?;
        Ok(FormState::new(
            BookInstanceForm::from_instance(&instance),
            BookInstanceChoices { books },
        ))
    }

    /// Validate and replace a copy's fields
    pub async fn update(
        &self,
        id: Uuid,
        mut form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceFormState>> {
        match form.process(Utc::now().date_naive()) {
            Ok(data) => {
                let instance = self.repository.book_instances.update(id, &data).await?;
                tracing::info!("Updated book instance {}", instance.id);
                Ok(FormOutcome::Saved(instance.id))
            }
            Err(errors) => self.reject(form, errors).await,
        }
    }

    /// Data for the delete confirmation; `None` when the copy is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<BookInstanceEntry>> {
        self.find_entry(id).await
    }

    /// Copies have no dependents and are removed unconditionally.
    /// Returns `false` when there was nothing to remove.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        match self.repository.book_instances.remove(id).await {
            Ok(()) => {
                tracing::info!("Deleted book instance {}", id);
                Ok(true)
            }
            Err(AppError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn find_entry(&self, id: Uuid) -> AppResult<Option<BookInstanceEntry>> {
        let Some(instance) = self.repository.book_instances.find_by_id(id).await? else {
            return Ok(None);
        };
        let book = self.repository.books.find_by_id(instance.book).await?;
        if book.is_none() {
            tracing::warn!("Book instance {} references missing book {}", instance.id, instance.book);
        }
        Ok(Some(BookInstanceEntry { instance, book }))
    }

    async fn reject(
        &self,
        form: BookInstanceForm,
        errors: Vec<FieldError>,
    ) -> AppResult<FormOutcome<BookInstanceFormState>> {
        tracing::debug!("Book instance form rejected with {} error(s)", errors.len());
        let books = self.repository.books.list().await?;
        Ok(FormOutcome::NeedsCorrection(FormState {
            form,
            choices: BookInstanceChoices { books },
            errors,
        }))
    }
}
