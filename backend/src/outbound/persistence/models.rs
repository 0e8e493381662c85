//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain. Field order matches the `table!` column
//! order so plain `Queryable` loads line up.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    Diary, DiaryNumber, DiaryStatus, DocumentKind, Movement, MovementAction, Office, OfficeName,
    UserId,
};

use super::schema::{diaries, diary_movements, offices, users};

/// Clamp a database count to the domain's unsigned folder count.
#[expect(
    clippy::cast_sign_loss,
    reason = "the schema CHECK keeps folder counts non-negative"
)]
pub(crate) const fn folders_from_db(folders: i32) -> u32 {
    folders as u32
}

/// Widen a domain folder count for storage.
#[expect(
    clippy::cast_possible_wrap,
    reason = "folder counts are small positive integers"
)]
pub(crate) const fn folders_for_db(folders: u32) -> i32 {
    folders as i32
}

#[expect(
    clippy::cast_sign_loss,
    reason = "sequences start at 1 in the database"
)]
pub(crate) const fn sequence_from_db(sequence: i32) -> u32 {
    sequence as u32
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "sequences are far below the i32 ceiling"
)]
pub(crate) const fn sequence_for_db(sequence: u32) -> i32 {
    sequence as i32
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "audit column, read for completeness")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column, read for completeness")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating operator accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub display_name: &'a str,
    pub password_hash: &'a str,
}

/// Changeset applied when a password is replaced.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct PasswordUpdate<'a> {
    pub password_hash: &'a str,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Offices
// ---------------------------------------------------------------------------

/// Row struct for reading from the offices table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = offices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OfficeRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for directory upserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = offices)]
pub(crate) struct NewOfficeRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

impl OfficeRow {
    /// Convert to the domain office, dropping rows whose stored name no
    /// longer satisfies validation.
    pub(crate) fn into_domain(self) -> Option<Office> {
        match OfficeName::new(self.name) {
            Ok(name) => Some(Office {
                id: self.id,
                name,
                created_at: self.created_at,
            }),
            Err(err) => {
                warn!(office = %self.id, error = %err, "dropping invalid office row");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Diaries
// ---------------------------------------------------------------------------

/// Row struct for reading from the diaries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = diaries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DiaryRow {
    pub id: Uuid,
    pub year: i32,
    pub sequence: i32,
    pub diary_date: NaiveDate,
    pub received_from: String,
    pub received_diary_no: String,
    pub kind: String,
    pub folders: i32,
    pub subject: String,
    pub remarks: String,
    pub marked_to: String,
    pub marked_date: Option<NaiveDate>,
    pub status: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering diaries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diaries)]
pub(crate) struct NewDiaryRow<'a> {
    pub id: Uuid,
    pub year: i32,
    pub sequence: i32,
    pub diary_date: NaiveDate,
    pub received_from: &'a str,
    pub received_diary_no: &'a str,
    pub kind: &'a str,
    pub folders: i32,
    pub subject: &'a str,
    pub remarks: &'a str,
    pub marked_to: &'a str,
    pub status: &'a str,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Changeset for editing the descriptive fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = diaries)]
pub(crate) struct DiaryAttributesUpdate<'a> {
    pub diary_date: NaiveDate,
    pub received_from: &'a str,
    pub received_diary_no: &'a str,
    pub kind: &'a str,
    pub folders: i32,
    pub subject: &'a str,
    pub marked_to: &'a str,
    pub remarks: &'a str,
}

/// Changeset for the position snapshot after a movement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = diaries)]
pub(crate) struct DiaryPositionUpdate<'a> {
    pub marked_to: &'a str,
    pub marked_date: NaiveDate,
    pub status: &'a str,
}

/// Parse a stored label, defaulting (with a warning) on unknown values so a
/// single bad row cannot poison listings.
fn parse_label_or_default<T>(raw: &str, row: Uuid, what: &str) -> T
where
    T: std::str::FromStr + Default,
{
    raw.parse().unwrap_or_else(|_| {
        warn!(row = %row, value = raw, "unrecognised {what} label, using default");
        T::default()
    })
}

impl DiaryRow {
    /// Convert to the domain diary.
    pub(crate) fn into_domain(self) -> Diary {
        let number = DiaryNumber::new(self.year, sequence_from_db(self.sequence))
            .unwrap_or_else(|err| {
                warn!(row = %self.id, error = %err, "stored register number out of range");
                // The schema enforces sane values; fall back to the smallest
                // representable number rather than failing the whole listing.
                DiaryNumber::new(self.year.clamp(1000, 9999), 1)
                    .unwrap_or_else(|_| unreachable_number())
            });
        Diary {
            id: self.id,
            number,
            diary_date: self.diary_date,
            received_from: self.received_from,
            received_diary_no: self.received_diary_no,
            kind: parse_label_or_default(&self.kind, self.id, "kind"),
            folders: folders_from_db(self.folders),
            subject: self.subject,
            remarks: self.remarks,
            marked_to: self.marked_to,
            marked_date: self.marked_date,
            status: parse_label_or_default(&self.status, self.id, "status"),
            created_by: UserId::from_uuid(self.created_by),
            created_at: self.created_at,
        }
    }
}

// 1000-000001 is always constructible; this path only exists to avoid a
// panic site in conversion code.
#[expect(clippy::unwrap_used, reason = "constant arguments are in range")]
fn unreachable_number() -> DiaryNumber {
    DiaryNumber::new(1000, 1).unwrap()
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// Row struct for reading from the diary_movements table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = diary_movements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovementRow {
    pub id: Uuid,
    pub diary_id: Uuid,
    pub year: i32,
    pub sequence: i32,
    pub from_office: String,
    pub to_office: String,
    pub action: String,
    pub action_at: DateTime<Utc>,
    pub remarks: String,
    pub created_by: Uuid,
    pub created_on: DateTime<Utc>,
}

/// Insertable struct for appending movements.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = diary_movements)]
pub(crate) struct NewMovementRow<'a> {
    pub id: Uuid,
    pub diary_id: Uuid,
    pub year: i32,
    pub sequence: i32,
    pub from_office: &'a str,
    pub to_office: &'a str,
    pub action: &'a str,
    pub action_at: DateTime<Utc>,
    pub remarks: &'a str,
    pub created_by: Uuid,
}

impl MovementRow {
    /// Convert to the domain movement.
    pub(crate) fn into_domain(self) -> Movement {
        let number = DiaryNumber::new(self.year, sequence_from_db(self.sequence))
            .unwrap_or_else(|_| unreachable_number());
        let action = self.action.parse().unwrap_or_else(|_| {
            warn!(row = %self.id, value = %self.action, "unrecognised action label, treating as marked");
            MovementAction::Marked
        });
        Movement {
            id: self.id,
            diary_id: self.diary_id,
            number,
            from_office: self.from_office,
            to_office: self.to_office,
            action,
            action_at: self.action_at,
            remarks: self.remarks,
            created_by: UserId::from_uuid(self.created_by),
            created_on: self.created_on,
        }
    }
}
