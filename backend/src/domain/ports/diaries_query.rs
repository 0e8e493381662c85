//! Driving port for register listings and diary detail.

use async_trait::async_trait;
use pagination::{Cursor, Page};
use uuid::Uuid;

use crate::domain::diary::Diary;
use crate::domain::error::Error;
use crate::domain::movement::Movement;
use crate::domain::search::DiaryFilter;

/// A diary together with its ordered movement history.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryWithMovements {
    /// The diary.
    pub diary: Diary,
    /// Movements in history order.
    pub movements: Vec<Movement>,
    /// Register-style plain rendering of the history.
    pub history_plain: String,
}

/// Domain use-case port for reading the register.
#[async_trait]
pub trait DiariesQuery: Send + Sync {
    /// Filtered listing page: year descending, then sequence ascending.
    async fn list(&self, filter: &DiaryFilter, cursor: Cursor) -> Result<Page<Diary>, Error>;

    /// One diary with its full movement history.
    async fn fetch(&self, id: Uuid) -> Result<DiaryWithMovements, Error>;
}

/// Fixture query used until a database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDiariesQuery;

#[async_trait]
impl DiariesQuery for FixtureDiariesQuery {
    async fn list(&self, _filter: &DiaryFilter, cursor: Cursor) -> Result<Page<Diary>, Error> {
        Ok(Page::new(Vec::new(), 0, cursor, pagination::DEFAULT_PAGE_SIZE))
    }

    async fn fetch(&self, _id: Uuid) -> Result<DiaryWithMovements, Error> {
        Err(Error::not_found("diary not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;

    #[tokio::test]
    async fn fixture_listing_is_empty() {
        let page = FixtureDiariesQuery
            .list(&DiaryFilter::default(), Cursor::first())
            .await
            .expect("list");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn fixture_fetch_is_not_found() {
        let err = FixtureDiariesQuery
            .fetch(Uuid::nil())
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
