//! Book instances repository for database operations

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use super::BookInstanceStore;
use crate::{
    error::{AppError, AppResult},
    models::{BookInstance, BookInstanceData, BookInstanceStatus},
};

/// Row shape; `status` is stored as its name
#[derive(FromRow)]
struct BookInstanceRow {
    id: Uuid,
    book: Uuid,
    imprint: String,
    status: String,
    due_back: NaiveDate,
}

impl TryFrom<BookInstanceRow> for BookInstance {
    type Error = AppError;

    fn try_from(row: BookInstanceRow) -> Result<Self, Self::Error> {
        Ok(BookInstance {
            id: row.id,
            book: row.book,
            imprint: row.imprint,
            status: row.status.parse::<BookInstanceStatus>().map_err(AppError::Internal)?,
            due_back: row.due_back,
        })
    }
}

fn into_instances(rows: Vec<BookInstanceRow>) -> AppResult<Vec<BookInstance>> {
    rows.into_iter().map(BookInstance::try_from).collect()
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceStore for BookInstancesRepository {
    async fn create(&self, data: &BookInstanceData) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstanceRow>(
            r#"
            INSERT INTO book_instances (id, book, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        sqlx::query_as::<_, BookInstanceRow>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BookInstance::try_from)
            .transpose()
    }

    async fn find_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            "SELECT * FROM book_instances WHERE book = $1 ORDER BY due_back",
        )
        .bind(book)
        .fetch_all(&self.pool)
        .await?;
        into_instances(rows)
    }

    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstanceRow>(
            "SELECT * FROM book_instances ORDER BY due_back ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        into_instances(rows)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: Uuid, data: &BookInstanceData) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstanceRow>(
            r#"
            UPDATE book_instances
            SET book = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("BookInstance {} not found", id)))?
        .try_into()
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("BookInstance {} not found", id)));
        }
        Ok(())
    }
}
