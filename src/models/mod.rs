//! Catalog entity models.
//!
//! Records hold stored fields only; display values (names, formatted dates,
//! urls) are computed on demand.

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorData, AuthorForm};
pub use book::{Book, BookData, BookForm};
pub use book_instance::{BookInstance, BookInstanceData, BookInstanceForm, BookInstanceStatus};
pub use genre::{Genre, GenreData, GenreForm};
