//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use std::future::Future;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
    validation::FieldError,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository),
        }
    }
}

/// A form ready to (re-)render: sanitized values, the reference choices it
/// needs, and the ordered field errors.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F, C = ()> {
    pub form: F,
    pub choices: C,
    pub errors: Vec<FieldError>,
}

impl<F, C> FormState<F, C> {
    pub fn new(form: F, choices: C) -> Self {
        Self {
            form,
            choices,
            errors: Vec::new(),
        }
    }
}

/// Result of a create or update submission
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome<S> {
    /// Persisted, or matched an existing record; carries its id
    Saved(Uuid),
    /// At least one field rule failed; nothing was persisted
    NeedsCorrection(S),
}

/// Result of a guarded delete
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<T, D> {
    /// The target did not exist (or vanished before the commit)
    AlreadyGone,
    /// Dependents still reference the target; nothing was removed
    Blocked { target: T, dependents: Vec<D> },
    Deleted,
}

/// Guard, block, then commit a delete from an already gathered target and
/// its dependents.
///
/// Gather and commit are not atomic: a dependent created in between is not
/// seen, and a target removed in between is reported as already gone.
pub(crate) async fn commit_delete<T, D, R, Fut>(
    target: Option<T>,
    dependents: Vec<D>,
    remove: R,
) -> AppResult<DeleteOutcome<T, D>>
where
    R: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    let Some(target) = target else {
        return Ok(DeleteOutcome::AlreadyGone);
    };
    if !dependents.is_empty() {
        return Ok(DeleteOutcome::Blocked { target, dependents });
    }
    match remove().await {
        Ok(()) => Ok(DeleteOutcome::Deleted),
        Err(AppError::NotFound(_)) => Ok(DeleteOutcome::AlreadyGone),
        Err(e) => Err(e),
    }
}
