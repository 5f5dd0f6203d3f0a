//! Entity Store: one store trait per entity kind, with a Postgres and an
//! in-memory implementation.
//!
//! Reads never expand references; services join explicitly with
//! `find_many` when a view needs the referenced records.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorData, Book, BookData, BookInstance, BookInstanceData, BookInstanceStatus,
        Genre, GenreData,
    },
};

/// Author collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn create(&self, data: &AuthorData) -> AppResult<Author>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>>;
    /// All authors ordered by family name
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn count(&self) -> AppResult<i64>;
    async fn update(&self, id: Uuid, data: &AuthorData) -> AppResult<Author>;
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Genre collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    async fn create(&self, data: &GenreData) -> AppResult<Genre>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;
    /// Exact, case-sensitive name match
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>>;
    /// All genres ordered by name
    async fn list(&self) -> AppResult<Vec<Genre>>;
    async fn count(&self) -> AppResult<i64>;
    async fn update(&self, id: Uuid, data: &GenreData) -> AppResult<Genre>;
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Book collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create(&self, data: &BookData) -> AppResult<Book>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>>;
    /// Books written by the given author
    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;
    /// Books tagged with the given genre
    async fn find_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>>;
    /// All books ordered by title
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn count(&self) -> AppResult<i64>;
    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Book>;
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Book instance collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceStore: Send + Sync {
    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    /// Copies of the given book
    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>>;
    /// All copies ordered by due date
    async fn list(&self) -> AppResult<Vec<BookInstance>>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
    async fn update(&self, id: Uuid, data: &BookInstanceData) -> AppResult<BookInstance>;
    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Main repository struct holding one store per entity kind
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub books: Arc<dyn BookStore>,
    pub book_instances: Arc<dyn BookInstanceStore>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::BookInstancesRepository::new(pool)),
        }
    }

    /// Create a repository whose collections live in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            authors: store.clone(),
            genres: store.clone(),
            books: store.clone(),
            book_instances: store,
        }
    }
}
