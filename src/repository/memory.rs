//! In-memory Entity Store.
//!
//! Each collection is an insertion-ordered map behind its own lock. Sorting
//! is stable, so records with equal keys keep their insertion order.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorStore, BookInstanceStore, BookStore, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorData, Book, BookData, BookInstance, BookInstanceData, BookInstanceStatus,
        Genre, GenreData,
    },
};

#[derive(Default)]
pub struct MemoryStore {
    authors: RwLock<IndexMap<Uuid, Author>>,
    genres: RwLock<IndexMap<Uuid, Genre>>,
    books: RwLock<IndexMap<Uuid, Book>>,
    book_instances: RwLock<IndexMap<Uuid, BookInstance>>,
}

fn pick<T: Clone>(map: &IndexMap<Uuid, T>, ids: &[Uuid]) -> Vec<T> {
    map.iter()
        .filter(|(id, _)| ids.contains(*id))
        .map(|(_, value)| value.clone())
        .collect()
}

fn count<T>(map: &IndexMap<Uuid, T>) -> i64 {
    i64::try_from(map.len()).unwrap_or(i64::MAX)
}

fn not_found(kind: &str, id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", kind, id))
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn create(&self, data: &AuthorData) -> AppResult<Author> {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: data.first_name.clone(),
            family_name: data.family_name.clone(),
            date_of_birth: data.date_of_birth,
            date_of_death: data.date_of_death,
        };
        self.authors.write().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        Ok(pick(&*self.authors.read().await, ids))
    }

    async fn list(&self) -> AppResult<Vec<Author>> {
        let mut authors: Vec<Author> = self.authors.read().await.values().cloned().collect();
        authors.sort_by(|a, b| {
            a.family_name
                .cmp(&b.family_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(authors)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&*self.authors.read().await))
    }

    async fn update(&self, id: Uuid, data: &AuthorData) -> AppResult<Author> {
        let mut authors = self.authors.write().await;
        let author = authors.get_mut(&id).ok_or_else(|| not_found("Author", id))?;
        author.first_name = data.first_name.clone();
        author.family_name = data.family_name.clone();
        author.date_of_birth = data.date_of_birth;
        author.date_of_death = data.date_of_death;
        Ok(author.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.authors
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Author", id))
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn create(&self, data: &GenreData) -> AppResult<Genre> {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: data.name.clone(),
        };
        self.genres.write().await.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.genres.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        Ok(self
            .genres
            .read()
            .await
            .values()
            .find(|genre| genre.name == name)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let mut genres = pick(&*self.genres.read().await, ids);
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn list(&self) -> AppResult<Vec<Genre>> {
        let mut genres: Vec<Genre> = self.genres.read().await.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&*self.genres.read().await))
    }

    async fn update(&self, id: Uuid, data: &GenreData) -> AppResult<Genre> {
        let mut genres = self.genres.write().await;
        let genre = genres.get_mut(&id).ok_or_else(|| not_found("Genre", id))?;
        genre.name = data.name.clone();
        Ok(genre.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.genres
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Genre", id))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, data: &BookData) -> AppResult<Book> {
        let book = Book {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            author: data.author,
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            genre: data.genre.clone(),
        };
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        Ok(pick(&*self.books.read().await, ids))
    }

    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .await
            .values()
            .filter(|book| book.author == author)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .await
            .values()
            .filter(|book| book.genre.contains(&genre))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&*self.books.read().await))
    }

    async fn update(&self, id: Uuid, data: &BookData) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let book = books.get_mut(&id).ok_or_else(|| not_found("Book", id))?;
        book.title = data.title.clone();
        book.author = data.author;
        book.summary = data.summary.clone();
        book.isbn = data.isbn.clone();
        book.genre = data.genre.clone();
        Ok(book.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.books
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Book", id))
    }
}

#[async_trait]
impl BookInstanceStore for MemoryStore {
    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book: data.book,
            imprint: data.imprint.clone(),
            status: data.status,
            due_back: data.due_back,
        };
        self.book_instances
            .write()
            .await
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.book_instances.read().await.get(&id).cloned())
    }

    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let mut instances: Vec<BookInstance> = self
            .book_instances
            .read()
            .await
            .values()
            .filter(|instance| instance.book == book)
            .cloned()
            .collect();
        instances.sort_by_key(|instance| instance.due_back);
        Ok(instances)
    }

    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let mut instances: Vec<BookInstance> =
            self.book_instances.read().await.values().cloned().collect();
        instances.sort_by_key(|instance| instance.due_back);
        Ok(instances)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(&*self.book_instances.read().await))
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let matching = self
            .book_instances
            .read()
            .await
            .values()
            .filter(|instance| instance.status == status)
            .count();
        Ok(i64::try_from(matching).unwrap_or(i64::MAX))
    }

    async fn update(&self, id: Uuid, data: &BookInstanceData) -> AppResult<BookInstance> {
        let mut instances = self.book_instances.write().await;
        let instance = instances
            .get_mut(&id)
            .ok_or_else(|| not_found("BookInstance", id))?;
        instance.book = data.book;
        instance.imprint = data.imprint.clone();
        instance.status = data.status;
        instance.due_back = data.due_back;
        Ok(instance.clone())
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.book_instances
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("BookInstance", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn author_data(first: &str, family: &str) -> AuthorData {
        AuthorData {
            first_name: first.into(),
            family_name: family.into(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[tokio::test]
    async fn test_authors_sorted_by_family_then_first_name() {
        let store = MemoryStore::default();
        AuthorStore::create(&store, &author_data("Janet", "Asimov")).await.unwrap();
        AuthorStore::create(&store, &author_data("Patrick", "Rothfuss")).await.unwrap();
        AuthorStore::create(&store, &author_data("Isaac", "Asimov")).await.unwrap();
        AuthorStore::create(&store, &author_data("Ben", "Bova")).await.unwrap();

        let names: Vec<String> = AuthorStore::list(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(
            names,
            vec!["Asimov, Isaac", "Asimov, Janet", "Bova, Ben", "Rothfuss, Patrick"]
        );
    }

    #[tokio::test]
    async fn test_update_and_remove_missing_are_not_found() {
        let store = MemoryStore::default();
        let id = Uuid::new_v4();
        let update = GenreStore::update(&store, id, &GenreData { name: "Poetry".into() }).await;
        assert!(matches!(update, Err(AppError::NotFound(_))));
        assert!(matches!(GenreStore::remove(&store, id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_book_reference_lookups() {
        let store = MemoryStore::default();
        let author = Uuid::new_v4();
        let fantasy = Uuid::new_v4();
        let data = BookData {
            title: "The Wise Man's Fear".into(),
            author,
            summary: "Day two.".into(),
            isbn: "9780756407919".into(),
            genre: vec![fantasy],
        };
        let book = BookStore::create(&store, &data).await.unwrap();

        assert_eq!(store.find_by_author(author).await.unwrap(), vec![book.clone()]);
        assert_eq!(store.find_by_genre(fantasy).await.unwrap(), vec![book.clone()]);
        assert!(store.find_by_genre(Uuid::new_v4()).await.unwrap().is_empty());
        assert_eq!(BookStore::find_many(&store, &[book.id]).await.unwrap(), vec![book]);
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let store = MemoryStore::default();
        let due_back = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        for status in [
            BookInstanceStatus::Available,
            BookInstanceStatus::Available,
            BookInstanceStatus::Loaned,
        ] {
            let data = BookInstanceData {
                book: Uuid::new_v4(),
                imprint: "Imprint".into(),
                status,
                due_back,
            };
            BookInstanceStore::create(&store, &data).await.unwrap();
        }
        assert_eq!(BookInstanceStore::count(&store).await.unwrap(), 3);
        assert_eq!(store.count_by_status(BookInstanceStatus::Available).await.unwrap(), 2);
        assert_eq!(store.count_by_status(BookInstanceStatus::Reserved).await.unwrap(), 0);
    }
}
