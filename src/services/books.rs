//! Book catalog workflows

use std::collections::HashMap;

use uuid::Uuid;

use super::{commit_delete, DeleteOutcome, FormOutcome, FormState};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookForm, BookInstance, Genre},
    repository::Repository,
    validation::FieldError,
};

/// A book with its author expanded. A dangling author reference leaves
/// `author` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BookEntry {
    pub book: Book,
    pub author: Option<Author>,
}

/// A book with its references expanded and its copies
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

/// A genre offered on the book form
#[derive(Debug, Clone, PartialEq)]
pub struct GenreChoice {
    pub genre: Genre,
    pub checked: bool,
}

/// Reference lists the book form needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookChoices {
    pub authors: Vec<Author>,
    pub genres: Vec<GenreChoice>,
}

pub type BookFormState = FormState<BookForm, BookChoices>;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books ordered by title, with authors expanded
    pub async fn list(&self) -> AppResult<Vec<BookEntry>> {
        let books = self.repository.books.list().await?;

        let mut author_ids: Vec<Uuid> = books.iter().map(|b| b.author).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors: HashMap<Uuid, Author> = self
            .repository
            .authors
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| BookEntry {
                author: authors.get(&book.author).cloned(),
                book,
            })
            .collect())
    }

    /// Book with author, genres and copies
    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        self.gather(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Empty create form with every author and genre to choose from
    pub async fn create_form(&self) -> AppResult<BookFormState> {
        let form = BookForm::default();
        let choices = self.choices(&form).await?;
        Ok(FormState::new(form, choices))
    }

    /// Validate and create a book
    pub async fn create(&self, mut form: BookForm) -> AppResult<FormOutcome<BookFormState>> {
        match form.process() {
            Ok(data) => {
                let book = self.repository.books.create(&data).await?;
                tracing::info!("Created book {} ({})", book.id, book.title);
                Ok(FormOutcome::Saved(book.id))
            }
            Err(errors) => self.reject(form, errors).await,
        }
    }

    /// Pre-filled update form with the book's genres checked
    pub async fn update_form(&self, id: Uuid) -> AppResult<BookFormState> {
        let book = self
            .repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let form = BookForm::from_book(&book);
        let choices = self.choices(&form).await?;
        Ok(FormState::new(form, choices))
    }

    /// Validate and replace a book's fields
    pub async fn update(&self, id: Uuid, mut form: BookForm) -> AppResult<FormOutcome<BookFormState>> {
        match form.process() {
            Ok(data) => {
                let book = self.repository.books.update(id, &data).await?;
                tracing::info!("Updated book {} ({})", book.id, book.title);
                Ok(FormOutcome::Saved(book.id))
            }
            Err(errors) => self.reject(form, errors).await,
        }
    }

    /// Data for the delete confirmation; `None` when the book is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        self.gather(id).await
    }

    /// Delete the book unless copies of it still exist. A blocked delete
    /// carries the same expanded detail as the confirmation.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<BookDetail, BookInstance>> {
        let detail = self.gather(id).await?;
        let instances = detail
            .as_ref()
            .map(|d| d.instances.clone())
            .unwrap_or_default();
        let outcome = commit_delete(detail, instances, || self.repository.books.remove(id)).await?;
        if outcome == DeleteOutcome::Deleted {
            tracing::info!("Deleted book {}", id);
        }
        Ok(outcome)
    }

    async fn gather(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let (book, instances) = tokio::try_join!(
            self.repository.books.find_by_id(id),
            self.repository.book_instances.find_by_book(id),
        )?;
        let Some(book) = book else {
            return Ok(None);
        };

        let (author, genres) = tokio::try_join!(
            self.repository.authors.find_by_id(book.author),
            self.repository.genres.find_many(&book.genre),
        )?;
        if author.is_none() {
            tracing::warn!("Book {} references missing author {}", book.id, book.author);
        }
        if genres.len() < book.genre.len() {
            tracing::warn!("Book {} references missing genre(s)", book.id);
        }

        Ok(Some(BookDetail {
            book,
            author,
            genres,
            instances,
        }))
    }

    async fn choices(&self, form: &BookForm) -> AppResult<BookChoices> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors.list(),
            self.repository.genres.list(),
        )?;
        let genres = genres
            .into_iter()
            .map(|genre| GenreChoice {
                checked: form.is_selected(genre.id),
                genre,
            })
            .collect();
        Ok(BookChoices { authors, genres })
    }

    async fn reject(
        &self,
        form: BookForm,
        errors: Vec<FieldError>,
    ) -> AppResult<FormOutcome<BookFormState>> {
        tracing::debug!("Book form rejected with {} error(s)", errors.len());
        let choices = self.choices(&form).await?;
        Ok(FormOutcome::NeedsCorrection(FormState {
            form,
            choices,
            errors,
        }))
    }
}
