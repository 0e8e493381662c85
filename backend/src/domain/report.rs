//! Year register rows and dashboard aggregates.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::diary::{Diary, DiaryNumber, DiaryStatus, DocumentKind};
use super::movement::{HistoryEntry, Movement, movement_history, render_history_plain};

/// One row of the year register table.
///
/// Columns mirror the physical register: the movement history sits in the
/// final column.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearReportRow {
    /// Register number.
    #[schema(value_type = String, example = "2026-000012")]
    pub number: DiaryNumber,
    /// Register date.
    pub diary_date: NaiveDate,
    /// Source office or sender.
    pub received_from: String,
    /// Sender's own reference.
    pub received_diary_no: String,
    /// Document kind.
    pub kind: DocumentKind,
    /// Folder count.
    pub folders: u32,
    /// Subject line.
    pub subject: String,
    /// Current holder office.
    pub marked_to: String,
    /// Lifecycle status.
    pub status: DiaryStatus,
    /// Structured movement history.
    pub history: Vec<HistoryEntry>,
    /// Register-style plain rendering of the history.
    pub history_plain: String,
}

/// The year register.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearReport {
    /// Register year.
    pub year: i32,
    /// Rows in sequence order.
    pub rows: Vec<YearReportRow>,
}

/// Build the year register from diaries paired with their ordered movements.
///
/// Rows come out in sequence order regardless of input order.
#[must_use]
pub fn year_report(year: i32, mut entries: Vec<(Diary, Vec<Movement>)>) -> YearReport {
    entries.sort_by_key(|(diary, _)| diary.number);
    let rows = entries
        .into_iter()
        .map(|(diary, movements)| YearReportRow {
            number: diary.number,
            diary_date: diary.diary_date,
            received_from: diary.received_from,
            received_diary_no: diary.received_diary_no,
            kind: diary.kind,
            folders: diary.folders,
            subject: diary.subject,
            marked_to: diary.marked_to,
            status: diary.status,
            history: movement_history(&movements),
            history_plain: render_history_plain(&movements),
        })
        .collect();
    YearReport { year, rows }
}

/// Count of diaries in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// The status.
    pub status: DiaryStatus,
    /// How many diaries of the year hold it.
    pub count: u64,
}

/// Per-year dashboard aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Register year.
    pub year: i32,
    /// Total diaries registered in the year.
    pub total: u64,
    /// Diaries still in circulation (neither closed nor disposed).
    pub open: u64,
    /// Counts per status in lifecycle order, zero-filled.
    pub by_status: Vec<StatusCount>,
}

/// Fold raw status counts into the dashboard aggregate.
///
/// Statuses absent from the input appear with a zero count so dashboards
/// render a stable set of tiles.
#[must_use]
pub fn dashboard_summary(year: i32, counts: &[(DiaryStatus, u64)]) -> DashboardSummary {
    let count_for = |status: DiaryStatus| -> u64 {
        counts
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .sum()
    };
    let by_status: Vec<StatusCount> = DiaryStatus::all()
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: count_for(status),
        })
        .collect();
    let total = by_status.iter().map(|entry| entry.count).sum();
    let open = by_status
        .iter()
        .filter(|entry| entry.status.is_open())
        .map(|entry| entry.count)
        .sum();
    DashboardSummary {
        year,
        total,
        open,
        by_status,
    }
}
