//! Rendered documents returned by the catalog pages.
//!
//! Each page is a JSON document with a `title`, its primary entity or list,
//! and for forms the re-populated values plus ordered field errors. Derived
//! display fields are computed here from the stored records.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{
        Author, AuthorForm, Book, BookForm, BookInstance, BookInstanceForm, BookInstanceStatus,
        Genre, GenreForm,
    },
    services::{
        authors::AuthorDetail,
        book_instances::{BookInstanceEntry, BookInstanceFormState},
        books::{BookDetail, BookEntry, BookFormState, GenreChoice},
        catalog::{HomeCounts, HomeSummary},
        genres::GenreDetail,
        FormState,
    },
    validation::FieldError,
};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorView {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    /// "family, first", empty when either part is missing
    pub name: String,
    /// Years between birth and death; absent unless both dates are known
    pub lifespan: Option<i32>,
    pub date_of_birth_formatted: String,
    pub date_of_death_formatted: String,
    pub url: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author.name(),
            lifespan: author.lifespan(),
            date_of_birth_formatted: author.date_of_birth_formatted(),
            date_of_death_formatted: author.date_of_death_formatted(),
            url: author.url(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            url: genre.url(),
        }
    }
}

/// Book as listed under an author, a genre or a copy
#[derive(Debug, Serialize, ToSchema)]
pub struct BookRefView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub url: String,
}

impl From<&Book> for BookRefView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            url: book.url(),
        }
    }
}

/// Book with its references expanded. `author` is absent when the stored
/// reference no longer resolves.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<AuthorView>,
    pub genre: Vec<GenreView>,
    pub url: String,
}

impl BookView {
    fn new(book: &Book, author: Option<&Author>, genres: &[Genre]) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            author: author.map(AuthorView::from),
            genre: genres.iter().map(GenreView::from).collect(),
            url: book.url(),
        }
    }
}

impl From<&BookEntry> for BookView {
    fn from(entry: &BookEntry) -> Self {
        Self::new(&entry.book, entry.author.as_ref(), &[])
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: String,
    pub due_back_formatted: String,
    pub book: Option<BookRefView>,
    pub url: String,
}

impl BookInstanceView {
    fn new(instance: &BookInstance, book: Option<&Book>) -> Self {
        Self {
            id: instance.id,
            imprint: instance.imprint.clone(),
            status: instance.status,
            due_back: instance.due_back_update(),
            due_back_formatted: instance.due_back_formatted(),
            book: book.map(BookRefView::from),
            url: instance.url(),
        }
    }
}

impl From<&BookInstanceEntry> for BookInstanceView {
    fn from(entry: &BookInstanceEntry) -> Self {
        Self::new(&entry.instance, entry.book.as_ref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreChoiceView {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

impl From<&GenreChoice> for GenreChoiceView {
    fn from(choice: &GenreChoice) -> Self {
        Self {
            id: choice.genre.id,
            name: choice.genre.name.clone(),
            checked: choice.checked,
        }
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub title: String,
    /// Set when one or more counts could not be read
    pub error: Option<String>,
    pub data: HomeCounts,
}

impl From<HomeSummary> for HomePage {
    fn from(summary: HomeSummary) -> Self {
        Self {
            title: "Local Library Home".to_string(),
            error: summary.error,
            data: summary.counts,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorListPage {
    pub title: String,
    pub author_list: Vec<AuthorView>,
}

impl AuthorListPage {
    pub fn new(authors: &[Author]) -> Self {
        Self {
            title: "Author List".to_string(),
            author_list: authors.iter().map(AuthorView::from).collect(),
        }
    }
}

/// Author detail and delete confirmation share this shape
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorPage {
    pub title: String,
    pub author: AuthorView,
    pub author_books: Vec<BookRefView>,
}

impl AuthorPage {
    pub fn detail(detail: &AuthorDetail) -> Self {
        Self::new("Author Detail", detail)
    }

    pub fn delete(detail: &AuthorDetail) -> Self {
        Self::new("Delete Author", detail)
    }

    pub fn blocked(author: &Author, books: &[Book]) -> Self {
        Self {
            title: "Delete Author".to_string(),
            author: author.into(),
            author_books: books.iter().map(BookRefView::from).collect(),
        }
    }

    fn new(title: &str, detail: &AuthorDetail) -> Self {
        Self {
            title: title.to_string(),
            author: (&detail.author).into(),
            author_books: detail.books.iter().map(BookRefView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorFormPage {
    pub title: String,
    pub author: AuthorForm,
    pub errors: Vec<FieldError>,
}

impl AuthorFormPage {
    pub fn create(state: FormState<AuthorForm>) -> Self {
        Self {
            title: "Create Author".to_string(),
            author: state.form,
            errors: state.errors,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreListPage {
    pub title: String,
    pub genre_list: Vec<GenreView>,
}

impl GenreListPage {
    pub fn new(genres: &[Genre]) -> Self {
        Self {
            title: "Genre List".to_string(),
            genre_list: genres.iter().map(GenreView::from).collect(),
        }
    }
}

/// Genre detail and delete confirmation share this shape
#[derive(Debug, Serialize, ToSchema)]
pub struct GenrePage {
    pub title: String,
    pub genre: GenreView,
    pub genre_books: Vec<BookRefView>,
}

impl GenrePage {
    pub fn detail(detail: &GenreDetail) -> Self {
        Self::new("Genre Detail", &detail.genre, &detail.books)
    }

    pub fn delete(detail: &GenreDetail) -> Self {
        Self::new("Delete Genre", &detail.genre, &detail.books)
    }

    pub fn blocked(genre: &Genre, books: &[Book]) -> Self {
        Self::new("Delete Genre", genre, books)
    }

    fn new(title: &str, genre: &Genre, books: &[Book]) -> Self {
        Self {
            title: title.to_string(),
            genre: genre.into(),
            genre_books: books.iter().map(BookRefView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreFormPage {
    pub title: String,
    pub genre: GenreForm,
    pub errors: Vec<FieldError>,
}

impl GenreFormPage {
    pub fn new(title: &str, state: FormState<GenreForm>) -> Self {
        Self {
            title: title.to_string(),
            genre: state.form,
            errors: state.errors,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookListPage {
    pub title: String,
    pub book_list: Vec<BookView>,
}

impl BookListPage {
    pub fn new(entries: &[BookEntry]) -> Self {
        Self {
            title: "Book List".to_string(),
            book_list: entries.iter().map(BookView::from).collect(),
        }
    }
}

/// Book detail and delete confirmation share this shape
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    pub title: String,
    pub book: BookView,
    pub book_instances: Vec<BookInstanceView>,
}

impl BookPage {
    pub fn detail(detail: &BookDetail) -> Self {
        Self::new(detail.book.title.clone(), detail)
    }

    pub fn delete(detail: &BookDetail) -> Self {
        Self::new("Delete Book".to_string(), detail)
    }

    fn new(title: String, detail: &BookDetail) -> Self {
        Self {
            title,
            book: BookView::new(&detail.book, detail.author.as_ref(), &detail.genres),
            book_instances: detail
                .instances
                .iter()
                .map(|i| BookInstanceView::new(i, None))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookFormPage {
    pub title: String,
    pub book: BookForm,
    pub authors: Vec<AuthorView>,
    pub genres: Vec<GenreChoiceView>,
    pub errors: Vec<FieldError>,
}

impl BookFormPage {
    pub fn new(title: &str, state: BookFormState) -> Self {
        Self {
            title: title.to_string(),
            authors: state.choices.authors.iter().map(AuthorView::from).collect(),
            genres: state.choices.genres.iter().map(GenreChoiceView::from).collect(),
            book: state.form,
            errors: state.errors,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookInstanceListPage {
    pub title: String,
    pub bookinstance_list: Vec<BookInstanceView>,
}

impl BookInstanceListPage {
    pub fn new(entries: &[BookInstanceEntry]) -> Self {
        Self {
            title: "Book Instance List".to_string(),
            bookinstance_list: entries.iter().map(BookInstanceView::from).collect(),
        }
    }
}

/// Copy detail and delete confirmation share this shape
#[derive(Debug, Serialize, ToSchema)]
pub struct BookInstancePage {
    pub title: String,
    pub bookinstance: BookInstanceView,
}

impl BookInstancePage {
    pub fn detail(entry: &BookInstanceEntry) -> Self {
        let title = entry.book.as_ref().map(|b| b.title.as_str()).unwrap_or_default();
        Self {
            title: format!("Copy: {}", title),
            bookinstance: entry.into(),
        }
    }

    pub fn delete(entry: &BookInstanceEntry) -> Self {
        Self {
            title: "Delete BookInstance".to_string(),
            bookinstance: entry.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookInstanceFormPage {
    pub title: String,
    pub bookinstance: BookInstanceForm,
    pub book_list: Vec<BookRefView>,
    pub statuses: Vec<BookInstanceStatus>,
    pub errors: Vec<FieldError>,
}

impl BookInstanceFormPage {
    pub fn new(title: &str, state: BookInstanceFormState) -> Self {
        Self {
            title: title.to_string(),
            book_list: state.choices.books.iter().map(BookRefView::from).collect(),
            statuses: BookInstanceStatus::ALL.to_vec(),
            bookinstance: state.form,
            errors: state.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn author() -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: "Ursula".into(),
            family_name: "Le Guin".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1929, 10, 21),
            date_of_death: NaiveDate::from_ymd_opt(2018, 1, 22),
        }
    }

    #[test]
    fn test_author_view_derived_fields() {
        let author = author();
        let view = AuthorView::from(&author);
        assert_eq!(view.name, "Le Guin, Ursula");
        assert_eq!(view.lifespan, Some(89));
        assert_eq!(view.date_of_birth_formatted, "1929-10-21");
        assert_eq!(view.url, format!("/catalog/author/{}", author.id));
    }

    #[test]
    fn test_copy_title_uses_book_title() {
        let book = Book {
            id: Uuid::new_v4(),
            title: "The Dispossessed".into(),
            author: Uuid::new_v4(),
            summary: "Anarres and Urras.".into(),
            isbn: "9780060512750".into(),
            genre: vec![],
        };
        let entry = BookInstanceEntry {
            instance: BookInstance {
                id: Uuid::new_v4(),
                book: book.id,
                imprint: "Harper, 1974".into(),
                status: BookInstanceStatus::Loaned,
                due_back: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            },
            book: Some(book),
        };

        let page = BookInstancePage::detail(&entry);
        assert_eq!(page.title, "Copy: The Dispossessed");
        assert_eq!(page.bookinstance.due_back_formatted, "October 16th, 2026");
        assert_eq!(page.bookinstance.due_back, "2026-10-16");

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["bookinstance"]["status"], "Loaned");
    }

    #[test]
    fn test_instance_form_lists_every_status() {
        let page = BookInstanceFormPage::new("Create BookInstance", FormState::new(Default::default(), Default::default()));
        assert_eq!(page.statuses.len(), 4);
        assert!(page.errors.is_empty());
    }
}
