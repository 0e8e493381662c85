//! Driving port for the year register and dashboard aggregates.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::report::{DashboardSummary, YearReport, dashboard_summary, year_report};

/// Domain use-case port for reporting.
#[async_trait]
pub trait ReportsQuery: Send + Sync {
    /// The year register, one row per diary with its movement history.
    async fn year_register(&self, year: i32) -> Result<YearReport, Error>;

    /// Per-status counts for a year.
    async fn dashboard(&self, year: i32) -> Result<DashboardSummary, Error>;
}

/// Fixture reports used until a database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReportsQuery;

#[async_trait]
impl ReportsQuery for FixtureReportsQuery {
    async fn year_register(&self, year: i32) -> Result<YearReport, Error> {
        Ok(year_report(year, Vec::new()))
    }

    async fn dashboard(&self, year: i32) -> Result<DashboardSummary, Error> {
        Ok(dashboard_summary(year, &[]))
    }
}
