//! Reporting service: the year register and dashboard aggregates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::Error;
use crate::domain::movement::Movement;
use crate::domain::ports::{DiaryRepository, MovementRepository, ReportsQuery};
use crate::domain::registration::{map_diary_repository_error, map_movement_repository_error};
use crate::domain::report::{DashboardSummary, YearReport, dashboard_summary, year_report};

/// Reporting service over the persistence ports.
#[derive(Clone)]
pub struct ReportingService<D, M> {
    diaries: Arc<D>,
    movements: Arc<M>,
}

impl<D, M> ReportingService<D, M> {
    /// Create a new service with the given repositories.
    pub const fn new(diaries: Arc<D>, movements: Arc<M>) -> Self {
        Self { diaries, movements }
    }
}

#[async_trait]
impl<D, M> ReportsQuery for ReportingService<D, M>
where
    D: DiaryRepository,
    M: MovementRepository,
{
    async fn year_register(&self, year: i32) -> Result<YearReport, Error> {
        let diaries = self
            .diaries
            .list_year(year)
            .await
            .map_err(map_diary_repository_error)?;
        let movements = self
            .movements
            .list_for_year(year)
            .await
            .map_err(map_movement_repository_error)?;

        // Group per diary; input is already in history order and grouping
        // preserves it.
        let mut grouped: HashMap<Uuid, Vec<Movement>> = HashMap::new();
        for movement in movements {
            grouped.entry(movement.diary_id).or_default().push(movement);
        }
        let entries = diaries
            .into_iter()
            .map(|diary| {
                let history = grouped.remove(&diary.id).unwrap_or_default();
                (diary, history)
            })
            .collect();
        Ok(year_report(year, entries))
    }

    async fn dashboard(&self, year: i32) -> Result<DashboardSummary, Error> {
        let counts = self
            .diaries
            .status_counts(year)
            .await
            .map_err(map_diary_repository_error)?;
        Ok(dashboard_summary(year, &counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diary::{Diary, DiaryNumber, DiaryStatus, DocumentKind};
    use crate::domain::movement::MovementAction;
    use crate::domain::ports::{MockDiaryRepository, MockMovementRepository};
    use crate::domain::user::UserId;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::rstest;

    fn diary(sequence: u32) -> Diary {
        Diary {
            id: Uuid::new_v4(),
            number: DiaryNumber::new(2026, sequence).expect("number"),
            diary_date: NaiveDate::from_ymd_opt(2026, 6, 1).expect("date"),
            received_from: "Office X".to_owned(),
            received_diary_no: String::new(),
            kind: DocumentKind::Letter,
            folders: 0,
            subject: String::new(),
            remarks: String::new(),
            marked_to: String::new(),
            marked_date: None,
            status: DiaryStatus::Forwarded,
            created_by: UserId::random(),
            created_at: Utc::now(),
        }
    }

    fn movement(diary: &Diary, to_office: &str, day: u32) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            diary_id: diary.id,
            number: diary.number,
            from_office: String::new(),
            to_office: to_office.to_owned(),
            action: MovementAction::Forwarded,
            action_at: Utc
                .with_ymd_and_hms(2026, 6, day, 9, 0, 0)
                .single()
                .expect("timestamp"),
            remarks: String::new(),
            created_by: UserId::random(),
            created_on: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn year_register_attaches_each_diarys_history() {
        let first = diary(1);
        let second = diary(2);
        let year_movements = vec![
            movement(&first, "OFFICE_PDF_B", 1),
            movement(&first, "OFFICE_PDF_C", 2),
            movement(&second, "OFFICE_OTHER", 3),
        ];

        let mut diaries = MockDiaryRepository::new();
        let rows = vec![first, second];
        diaries
            .expect_list_year()
            .returning(move |_| Ok(rows.clone()));

        let mut movements = MockMovementRepository::new();
        movements
            .expect_list_for_year()
            .returning(move |_| Ok(year_movements.clone()));

        let report = ReportingService::new(Arc::new(diaries), Arc::new(movements))
            .year_register(2026)
            .await
            .expect("report");

        assert_eq!(report.rows.len(), 2);
        let first_row = report.rows.first().expect("first row");
        assert!(first_row.history_plain.contains("OFFICE_PDF_B"));
        assert!(first_row.history_plain.contains("OFFICE_PDF_C"));
        let second_row = report.rows.get(1).expect("second row");
        assert_eq!(second_row.history.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn dashboard_folds_status_counts() {
        let mut diaries = MockDiaryRepository::new();
        diaries
            .expect_status_counts()
            .returning(|_| Ok(vec![(DiaryStatus::Created, 4), (DiaryStatus::Disposed, 1)]));

        let summary = ReportingService::new(
            Arc::new(diaries),
            Arc::new(MockMovementRepository::new()),
        )
        .dashboard(2026)
        .await
        .expect("summary");
        assert_eq!(summary.total, 5);
        assert_eq!(summary.open, 4);
    }
}
