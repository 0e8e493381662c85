//! Driving port for the office directory listing.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::office::Office;

/// Domain use-case port for reading the office directory.
#[async_trait]
pub trait OfficesQuery: Send + Sync {
    /// The directory in alphabetical order.
    async fn directory(&self) -> Result<Vec<Office>, Error>;
}

/// Fixture directory used until a database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOfficesQuery;

#[async_trait]
impl OfficesQuery for FixtureOfficesQuery {
    async fn directory(&self) -> Result<Vec<Office>, Error> {
        Ok(Vec::new())
    }
}
