//! Catalog-wide service: home page summary and store readiness

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::BookInstanceStatus,
    repository::Repository,
};

/// Collection counts shown on the home page. A count is absent when its
/// query failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct HomeCounts {
    pub book_count: Option<i64>,
    pub book_instance_count: Option<i64>,
    pub book_instance_available_count: Option<i64>,
    pub author_count: Option<i64>,
    pub genre_count: Option<i64>,
}

/// Home summary: whatever counts succeeded, plus the failures if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeSummary {
    pub counts: HomeCounts,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Count every collection concurrently.
    ///
    /// Never fails: a failed count is left empty and reported in `error`,
    /// so the result is informational rather than a consistent snapshot.
    pub async fn home_summary(&self) -> HomeSummary {
        let repo = &self.repository;
        let (books, instances, available, authors, genres) = tokio::join!(
            repo.books.count(),
            repo.book_instances.count(),
            repo.book_instances.count_by_status(BookInstanceStatus::Available),
            repo.authors.count(),
            repo.genres.count(),
        );

        let mut failures = Vec::new();
        let counts = HomeCounts {
            book_count: settle("book", books, &mut failures),
            book_instance_count: settle("book instance", instances, &mut failures),
            book_instance_available_count: settle("available book instance", available, &mut failures),
            author_count: settle("author", authors, &mut failures),
            genre_count: settle("genre", genres, &mut failures),
        };

        HomeSummary {
            counts,
            error: if failures.is_empty() {
                None
            } else {
                Some(failures.join("; "))
            },
        }
    }

    /// Fails when any collection cannot be reached
    pub async fn check_ready(&self) -> AppResult<()> {
        let repo = &self.repository;
        tokio::try_join!(
            repo.authors.count(),
            repo.genres.count(),
            repo.books.count(),
            repo.book_instances.count(),
        )?;
        Ok(())
    }
}

fn settle(name: &str, result: AppResult<i64>, failures: &mut Vec<String>) -> Option<i64> {
    match result {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("Home summary: {} count failed: {}", name, e);
            failures.push(format!("{} count unavailable: {}", name, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::{
        error::AppError,
        models::{BookInstanceData, GenreData},
        repository::MockGenreStore,
    };

    #[tokio::test]
    async fn test_home_summary_counts() {
        let repository = Repository::in_memory();
        repository
            .genres
            .create(&GenreData { name: "Fantasy".into() })
            .await
            .unwrap();
        for status in [BookInstanceStatus::Available, BookInstanceStatus::Loaned] {
            repository
                .book_instances
                .create(&BookInstanceData {
                    book: Uuid::new_v4(),
                    imprint: "Imprint".into(),
                    status,
                    due_back: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                })
                .await
                .unwrap();
        }

        let summary = CatalogService::new(repository).home_summary().await;
        assert_eq!(summary.error, None);
        assert_eq!(
            summary.counts,
            HomeCounts {
                book_count: Some(0),
                book_instance_count: Some(2),
                book_instance_available_count: Some(1),
                author_count: Some(0),
                genre_count: Some(1),
            }
        );
    }

    #[tokio::test]
    async fn test_home_summary_keeps_counts_that_succeeded() {
        let mut genres = MockGenreStore::new();
        genres
            .expect_count()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let repository = Repository {
            genres: Arc::new(genres),
            ..Repository::in_memory()
        };

        let summary = CatalogService::new(repository).home_summary().await;
        assert_eq!(summary.counts.genre_count, None);
        assert_eq!(summary.counts.book_count, Some(0));
        assert_eq!(summary.counts.author_count, Some(0));
        assert_eq!(summary.counts.book_instance_available_count, Some(0));
        let error = summary.error.expect("error indicator");
        assert!(error.starts_with("genre count unavailable"));
    }

    #[tokio::test]
    async fn test_check_ready_fails_on_unreachable_collection() {
        let mut genres = MockGenreStore::new();
        genres
            .expect_count()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        let repository = Repository {
            genres: Arc::new(genres),
            ..Repository::in_memory()
        };

        let service = CatalogService::new(repository);
        assert!(matches!(service.check_ready().await, Err(AppError::Database(_))));
        assert!(CatalogService::new(Repository::in_memory()).check_ready().await.is_ok());
    }
}
