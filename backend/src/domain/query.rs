//! Read-side services over the persistence ports.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Cursor, DEFAULT_PAGE_SIZE, Page};
use uuid::Uuid;

use crate::domain::diary::Diary;
use crate::domain::error::Error;
use crate::domain::movement::render_history_plain;
use crate::domain::office::Office;
use crate::domain::ports::{
    DiariesQuery, DiaryRepository, DiaryWithMovements, MovementRepository, OfficeRepository,
    OfficesQuery,
};
use crate::domain::registration::{
    map_diary_repository_error, map_movement_repository_error, map_office_repository_error,
};
use crate::domain::search::DiaryFilter;

/// Register listing and detail service.
#[derive(Clone)]
pub struct RegisterQueryService<D, M> {
    diaries: Arc<D>,
    movements: Arc<M>,
    page_size: u32,
}

impl<D, M> RegisterQueryService<D, M> {
    /// Create a new service with the register's page size.
    pub const fn new(diaries: Arc<D>, movements: Arc<M>) -> Self {
        Self {
            diaries,
            movements,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[async_trait]
impl<D, M> DiariesQuery for RegisterQueryService<D, M>
where
    D: DiaryRepository,
    M: MovementRepository,
{
    async fn list(&self, filter: &DiaryFilter, cursor: Cursor) -> Result<Page<Diary>, Error> {
        let (items, total) = self
            .diaries
            .search(filter, cursor, self.page_size)
            .await
            .map_err(map_diary_repository_error)?;
        Ok(Page::new(items, total, cursor, self.page_size))
    }

    async fn fetch(&self, id: Uuid) -> Result<DiaryWithMovements, Error> {
        let diary = self
            .diaries
            .find(id)
            .await
            .map_err(map_diary_repository_error)?
            .ok_or_else(|| Error::not_found("diary not found"))?;
        let movements = self
            .movements
            .list_for_diary(id)
            .await
            .map_err(map_movement_repository_error)?;
        let history_plain = render_history_plain(&movements);
        Ok(DiaryWithMovements {
            diary,
            movements,
            history_plain,
        })
    }
}

/// Office directory service.
#[derive(Clone)]
pub struct OfficeDirectoryService<O> {
    offices: Arc<O>,
}

impl<O> OfficeDirectoryService<O> {
    /// Create a new service over the office repository.
    pub const fn new(offices: Arc<O>) -> Self {
        Self { offices }
    }
}

#[async_trait]
impl<O> OfficesQuery for OfficeDirectoryService<O>
where
    O: OfficeRepository,
{
    async fn directory(&self) -> Result<Vec<Office>, Error> {
        self.offices
            .list()
            .await
            .map_err(map_office_repository_error)
    }
}
