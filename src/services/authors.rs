//! Author catalog workflows

use uuid::Uuid;

use super::{commit_delete, DeleteOutcome, FormOutcome, FormState};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book},
    repository::Repository,
};

/// An author with the books that reference it
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors ordered by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author and their books, looked up concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        self.gather(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Validate and create an author
    pub async fn create(&self, mut form: AuthorForm) -> AppResult<FormOutcome<FormState<AuthorForm>>> {
        match form.process() {
            Ok(data) => {
                let author = self.repository.authors.create(&data).await?;
                tracing::info!("Created author {} ({})", author.id, author.name());
                Ok(FormOutcome::Saved(author.id))
            }
            Err(errors) => {
                tracing::debug!("Author form rejected with {} error(s)", errors.len());
                Ok(FormOutcome::NeedsCorrection(FormState {
                    form,
                    choices: (),
                    errors,
                }))
            }
        }
    }

    /// Author update has no defined behavior yet
    pub async fn update(&self, _id: Uuid) -> AppResult<FormOutcome<FormState<AuthorForm>>> {
        Err(AppError::NotImplemented("Author update".to_string()))
    }

    /// Data for the delete confirmation; `None` when the author is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        self.gather(id).await
    }

    /// Delete the author unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<Author, Book>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_by_author(id),
        )?;
        let outcome = commit_delete(author, books, || self.repository.authors.remove(id)).await?;
        match &outcome {
            DeleteOutcome::Deleted => tracing::info!("Deleted author {}", id),
            DeleteOutcome::Blocked { dependents, .. } => {
                tracing::info!("Author {} still has {} book(s), not deleted", id, dependents.len())
            }
            DeleteOutcome::AlreadyGone => tracing::debug!("Author {} already gone", id),
        }
        Ok(outcome)
    }

    async fn gather(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find_by_id(id),
            self.repository.books.find_by_author(id),
        )?;
        Ok(author.map(|author| AuthorDetail { author, books }))
    }
}
