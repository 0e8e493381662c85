//! Outbound port for the office directory.

use async_trait::async_trait;

use crate::domain::office::{Office, OfficeName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by office repository adapters.
    pub enum OfficeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "office repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "office repository query failed: {message}",
    }
}

/// Port for the office directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OfficeRepository: Send + Sync {
    /// Ensure an office exists in the directory (idempotent).
    async fn record(&self, name: &OfficeName) -> Result<(), OfficeRepositoryError>;

    /// The directory in alphabetical order.
    async fn list(&self) -> Result<Vec<Office>, OfficeRepositoryError>;
}

/// Fixture directory used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOfficeRepository;

#[async_trait]
impl OfficeRepository for FixtureOfficeRepository {
    async fn record(&self, _name: &OfficeName) -> Result<(), OfficeRepositoryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Office>, OfficeRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_directory_accepts_and_forgets() {
        let repo = FixtureOfficeRepository;
        let name = OfficeName::new("Accounts").expect("name");
        repo.record(&name).await.expect("record");
        assert!(repo.list().await.expect("list").is_empty());
    }
}
