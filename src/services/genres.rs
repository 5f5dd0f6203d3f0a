//! Genre catalog workflows

use uuid::Uuid;

use super::{commit_delete, DeleteOutcome, FormOutcome, FormState};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreForm},
    repository::Repository,
};

/// A genre with the books tagged with it
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDetail {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Genre and its books, looked up concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        self.gather(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Validate and create a genre.
    ///
    /// Creation is idempotent by name: when a genre with exactly the same
    /// (sanitized) name exists, its id is returned and nothing is inserted.
    /// The check is a look-up before insert, not a store constraint.
    pub async fn create(&self, mut form: GenreForm) -> AppResult<FormOutcome<FormState<GenreForm>>> {
        let data = match form.process() {
            Ok(data) => data,
            Err(errors) => {
                return Ok(FormOutcome::NeedsCorrection(FormState {
                    form,
                    choices: (),
                    errors,
                }))
            }
        };

        if let Some(existing) = self.repository.genres.find_by_name(&data.name).await? {
            tracing::debug!("Genre '{}' already exists as {}", existing.name, existing.id);
            return Ok(FormOutcome::Saved(existing.id));
        }

        let genre = self.repository.genres.create(&data).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(FormOutcome::Saved(genre.id))
    }

    /// Pre-filled update form
    pub async fn update_form(&self, id: Uuid) -> AppResult<FormState<GenreForm>> {
        let genre = self
            .repository
            .genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok(FormState::new(GenreForm::from_genre(&genre), ()))
    }

    /// Validate and rename a genre
    pub async fn update(&self, id: Uuid, mut form: GenreForm) -> AppResult<FormOutcome<FormState<GenreForm>>> {
        match form.process() {
            Ok(data) => {
                let genre = self.repository.genres.update(id, &data).await?;
                tracing::info!("Updated genre {} ({})", genre.id, genre.name);
                Ok(FormOutcome::Saved(genre.id))
            }
            Err(errors) => Ok(FormOutcome::NeedsCorrection(FormState {
                form,
                choices: (),
                errors,
            })),
        }
    }

    /// Data for the delete confirmation; `None` when the genre is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        self.gather(id).await
    }

    /// Delete the genre unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<Genre, Book>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_by_genre(id),
        )?;
        let outcome = commit_delete(genre, books, || self.repository.genres.remove(id)).await?;
        if outcome == DeleteOutcome::Deleted {
            tracing::info!("Deleted genre {}", id);
        }
        Ok(outcome)
    }

    async fn gather(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find_by_id(id),
            self.repository.books.find_by_genre(id),
        )?;
        Ok(genre.map(|genre| GenreDetail { genre, books }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookData;

    fn form(name: &str) -> GenreForm {
        GenreForm { name: name.into() }
    }

    fn saved(outcome: AppResult<FormOutcome<FormState<GenreForm>>>) -> Uuid {
        match outcome.unwrap() {
            FormOutcome::Saved(id) => id,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_is_idempotent_by_name() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());

        let first = saved(service.create(form("Fantasy")).await);
        let second = saved(service.create(form("  Fantasy ")).await);
        assert_eq!(first, second);
        assert_eq!(repository.genres.count().await.unwrap(), 1);

        // Exact match only
        let other = saved(service.create(form("fantasy")).await);
        assert_ne!(first, other);
        assert_eq!(repository.genres.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_short_name() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());

        let outcome = service.create(form("SF")).await.unwrap();
        let FormOutcome::NeedsCorrection(state) = outcome else {
            panic!("expected a rejected form");
        };
        assert_eq!(state.form.name, "SF");
        assert_eq!(state.errors.len(), 1);
        assert_eq!(repository.genres.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_form_and_update() {
        let service = GenresService::new(Repository::in_memory());
        let id = saved(service.create(form("Poetry")).await);

        assert_eq!(service.update_form(id).await.unwrap().form.name, "Poetry");
        assert!(matches!(
            service.update_form(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        assert_eq!(saved(service.update(id, form("Verse")).await), id);
        assert_eq!(service.detail(id).await.unwrap().genre.name, "Verse");

        let rejected = service.update(id, form("")).await.unwrap();
        assert!(matches!(rejected, FormOutcome::NeedsCorrection(_)));
        assert_eq!(service.detail(id).await.unwrap().genre.name, "Verse");
    }

    #[tokio::test]
    async fn test_delete_guarded_by_books() {
        let repository = Repository::in_memory();
        let service = GenresService::new(repository.clone());
        let id = saved(service.create(form("Fantasy")).await);
        let book = repository
            .books
            .create(&BookData {
                title: "The Hobbit".into(),
                author: Uuid::new_v4(),
                summary: "There and back again.".into(),
                isbn: "9780261102217".into(),
                genre: vec![id],
            })
            .await
            .unwrap();

        let outcome = service.delete(id).await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::Blocked { .. }));
        assert_eq!(repository.genres.count().await.unwrap(), 1);

        repository.books.remove(book.id).await.unwrap();
        assert_eq!(service.delete(id).await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(repository.genres.count().await.unwrap(), 0);
        assert!(service.delete_preview(id).await.unwrap().is_none());
    }
}
