//! Shared world for HTTP integration tests.
//!
//! The real domain services run over in-memory repositories, so the full
//! request path is exercised without a database.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use pagination::Cursor;
use uuid::Uuid;

use backend::Trace;
use backend::domain::ports::{
    DiaryRepository, DiaryRepositoryError, FixtureCredentialsCommand, FixtureLoginService,
    MovementRepository, MovementRepositoryError, NewDiaryRecord, NewMovementRecord,
    OfficeRepository, OfficeRepositoryError, PositionUpdate,
};
use backend::domain::{
    Diary, DiaryFilter, DiaryNumber, DiaryRegistrationService, DiaryStatus, Movement,
    MovementLogService, Office, OfficeDirectoryService, OfficeName, RegisterQueryService,
    ReportingService, SearchTerm,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};

/// Shared backing store for the in-memory repositories.
#[derive(Default)]
pub struct Store {
    diaries: Mutex<Vec<Diary>>,
    movements: Mutex<Vec<(u64, Movement)>>,
    offices: Mutex<Vec<Office>>,
    movement_counter: AtomicU64,
}

/// In-memory [`DiaryRepository`] with the Diesel adapter's semantics.
#[derive(Clone)]
pub struct InMemoryDiaries(pub Arc<Store>);

/// In-memory [`MovementRepository`] preserving insertion order.
#[derive(Clone)]
pub struct InMemoryMovements(pub Arc<Store>);

/// In-memory [`OfficeRepository`] deduplicating by name.
#[derive(Clone)]
pub struct InMemoryOffices(pub Arc<Store>);

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn matches_term(diary: &Diary, term: &SearchTerm) -> bool {
    match term {
        SearchTerm::Number(number) => diary.number == *number,
        SearchTerm::Sequence(sequence) => diary.number.sequence() == *sequence,
        SearchTerm::Text(text) => {
            let needle = text.to_lowercase();
            [
                diary.subject.as_str(),
                diary.received_from.as_str(),
                diary.received_diary_no.as_str(),
                diary.kind.as_str(),
                diary.marked_to.as_str(),
                diary.remarks.as_str(),
            ]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
        }
    }
}

#[async_trait]
impl DiaryRepository for InMemoryDiaries {
    async fn create_with_next_sequence(
        &self,
        record: NewDiaryRecord,
    ) -> Result<Diary, DiaryRepositoryError> {
        let mut diaries = lock(&self.0.diaries);
        let next = diaries
            .iter()
            .filter(|diary| diary.number.year() == record.year)
            .map(|diary| diary.number.sequence())
            .max()
            .unwrap_or(0)
            + 1;
        let number = DiaryNumber::new(record.year, next)
            .map_err(|err| DiaryRepositoryError::query(err.to_string()))?;
        let diary = Diary {
            id: record.id,
            number,
            diary_date: record.attributes.diary_date,
            received_from: record.attributes.received_from,
            received_diary_no: record.attributes.received_diary_no,
            kind: record.attributes.kind,
            folders: record.attributes.folders,
            subject: record.attributes.subject,
            remarks: record.attributes.remarks,
            marked_to: record.attributes.marked_to,
            marked_date: None,
            status: record.status,
            created_by: record.created_by,
            created_at: record.created_at,
        };
        diaries.push(diary.clone());
        Ok(diary)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Diary>, DiaryRepositoryError> {
        Ok(lock(&self.0.diaries).iter().find(|d| d.id == id).cloned())
    }

    async fn update_attributes(
        &self,
        id: Uuid,
        attributes: backend::domain::DiaryAttributes,
    ) -> Result<Option<Diary>, DiaryRepositoryError> {
        let mut diaries = lock(&self.0.diaries);
        let Some(diary) = diaries.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        diary.diary_date = attributes.diary_date;
        diary.received_from = attributes.received_from;
        diary.received_diary_no = attributes.received_diary_no;
        diary.kind = attributes.kind;
        diary.folders = attributes.folders;
        diary.subject = attributes.subject;
        diary.marked_to = attributes.marked_to;
        diary.remarks = attributes.remarks;
        Ok(Some(diary.clone()))
    }

    async fn update_position(
        &self,
        id: Uuid,
        position: PositionUpdate,
    ) -> Result<bool, DiaryRepositoryError> {
        let mut diaries = lock(&self.0.diaries);
        let Some(diary) = diaries.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        diary.marked_to = position.marked_to;
        diary.marked_date = Some(position.marked_date);
        diary.status = position.status;
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DiaryRepositoryError> {
        let mut diaries = lock(&self.0.diaries);
        let before = diaries.len();
        diaries.retain(|d| d.id != id);
        let removed = diaries.len() < before;
        if removed {
            lock(&self.0.movements).retain(|(_, m)| m.diary_id != id);
        }
        Ok(removed)
    }

    async fn search(
        &self,
        filter: &DiaryFilter,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<(Vec<Diary>, u64), DiaryRepositoryError> {
        let diaries = lock(&self.0.diaries);
        let mut matched: Vec<Diary> = diaries
            .iter()
            .filter(|diary| filter.year.is_none_or(|year| diary.number.year() == year))
            .filter(|diary| filter.status.is_none_or(|status| diary.status == status))
            .filter(|diary| {
                filter
                    .term
                    .as_ref()
                    .is_none_or(|term| matches_term(diary, term))
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            b.number
                .year()
                .cmp(&a.number.year())
                .then(a.number.sequence().cmp(&b.number.sequence()))
        });
        let total = matched.len() as u64;
        let start = usize::try_from(cursor.offset(page_size)).unwrap_or(usize::MAX);
        let page: Vec<Diary> = matched
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_year(&self, year: i32) -> Result<Vec<Diary>, DiaryRepositoryError> {
        let diaries = lock(&self.0.diaries);
        let mut rows: Vec<Diary> = diaries
            .iter()
            .filter(|diary| diary.number.year() == year)
            .cloned()
            .collect();
        rows.sort_by_key(|diary| diary.number.sequence());
        Ok(rows)
    }

    async fn status_counts(
        &self,
        year: i32,
    ) -> Result<Vec<(DiaryStatus, u64)>, DiaryRepositoryError> {
        let diaries = lock(&self.0.diaries);
        let mut counts: Vec<(DiaryStatus, u64)> = Vec::new();
        for diary in diaries.iter().filter(|d| d.number.year() == year) {
            match counts.iter_mut().find(|(status, _)| *status == diary.status) {
                Some((_, count)) => *count += 1,
                None => counts.push((diary.status, 1)),
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl MovementRepository for InMemoryMovements {
    async fn append(&self, record: NewMovementRecord) -> Result<Movement, MovementRepositoryError> {
        let movement = Movement {
            id: record.id,
            diary_id: record.diary_id,
            number: record.number,
            from_office: record.from_office,
            to_office: record.to_office,
            action: record.action,
            action_at: record.action_at,
            remarks: record.remarks,
            created_by: record.created_by,
            created_on: record.action_at,
        };
        let index = self.0.movement_counter.fetch_add(1, Ordering::SeqCst);
        lock(&self.0.movements).push((index, movement.clone()));
        Ok(movement)
    }

    async fn list_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Vec<Movement>, MovementRepositoryError> {
        let movements = lock(&self.0.movements);
        let mut rows: Vec<(u64, Movement)> = movements
            .iter()
            .filter(|(_, m)| m.diary_id == diary_id)
            .cloned()
            .collect();
        rows.sort_by(|(ai, a), (bi, b)| a.action_at.cmp(&b.action_at).then(ai.cmp(bi)));
        Ok(rows.into_iter().map(|(_, m)| m).collect())
    }

    async fn latest_for_diary(
        &self,
        diary_id: Uuid,
    ) -> Result<Option<Movement>, MovementRepositoryError> {
        Ok(self.list_for_diary(diary_id).await?.pop())
    }

    async fn list_for_year(&self, year: i32) -> Result<Vec<Movement>, MovementRepositoryError> {
        let movements = lock(&self.0.movements);
        let mut rows: Vec<(u64, Movement)> = movements
            .iter()
            .filter(|(_, m)| m.number.year() == year)
            .cloned()
            .collect();
        rows.sort_by(|(ai, a), (bi, b)| {
            a.number
                .sequence()
                .cmp(&b.number.sequence())
                .then(a.action_at.cmp(&b.action_at))
                .then(ai.cmp(bi))
        });
        Ok(rows.into_iter().map(|(_, m)| m).collect())
    }
}

#[async_trait]
impl OfficeRepository for InMemoryOffices {
    async fn record(&self, name: &OfficeName) -> Result<(), OfficeRepositoryError> {
        let mut offices = lock(&self.0.offices);
        if offices.iter().any(|office| office.name == *name) {
            return Ok(());
        }
        offices.push(Office {
            id: Uuid::new_v4(),
            name: name.clone(),
            created_at: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Office>, OfficeRepositoryError> {
        let mut offices = lock(&self.0.offices).clone();
        offices.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
        Ok(offices)
    }
}

/// HTTP state wired through the real domain services over one shared
/// in-memory store.
#[must_use]
pub fn in_memory_state() -> HttpState {
    let store = Arc::new(Store::default());
    let diaries = Arc::new(InMemoryDiaries(store.clone()));
    let movements = Arc::new(InMemoryMovements(store.clone()));
    let offices = Arc::new(InMemoryOffices(store));
    let clock: Arc<dyn mockable::Clock> = Arc::new(DefaultClock);

    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        credentials: Arc::new(FixtureCredentialsCommand),
        register: Arc::new(DiaryRegistrationService::new(
            diaries.clone(),
            movements.clone(),
            offices.clone(),
            clock.clone(),
        )),
        movements: Arc::new(MovementLogService::new(
            diaries.clone(),
            movements.clone(),
            offices.clone(),
            clock,
        )),
        diaries: Arc::new(RegisterQueryService::new(
            diaries.clone(),
            movements.clone(),
        )),
        reports: Arc::new(ReportingService::new(diaries, movements)),
        offices: Arc::new(OfficeDirectoryService::new(offices)),
    })
}

/// Assemble the full API surface over the given state.
#[must_use]
pub fn api_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    use backend::inbound::http::auth::{change_password, login, logout};
    use backend::inbound::http::diaries::{
        create_diary, delete_diary, get_diary, list_diaries, update_diary,
    };
    use backend::inbound::http::movements::record_movement;
    use backend::inbound::http::offices::list_offices;
    use backend::inbound::http::reports::{
        dashboard, dashboard_year, year_report, year_report_csv, year_report_pdf,
    };

    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .service(login)
                .service(logout)
                .service(change_password)
                .service(list_diaries)
                .service(create_diary)
                .service(get_diary)
                .service(update_diary)
                .service(delete_diary)
                .service(record_movement)
                .service(list_offices)
                .service(year_report)
                .service(year_report_csv)
                .service(year_report_pdf)
                .service(dashboard)
                .service(dashboard_year),
        )
}

/// Log in with the fixture credentials and return the session cookie.
pub async fn login_cookie(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> actix_web::cookie::Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(serde_json::json!({"username": "admin", "password": "password"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "fixture login should succeed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
