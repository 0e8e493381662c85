//! Diary aggregate: the register entry for a tracked file or letter.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserId;

/// Validation errors raised while shaping diary data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiaryValidationError {
    /// The register year is outside the four-digit range.
    #[error("year must be a four-digit number")]
    YearOutOfRange,
    /// The sequence must start at 1.
    #[error("sequence must be 1 or more")]
    SequenceOutOfRange,
    /// The input is not a `YYYY-N` register number.
    #[error("register number must look like 2026-000012")]
    MalformedNumber,
    /// Folder count missing for a kind that requires folders.
    #[error("number of folders is required for {kind}")]
    FoldersRequired {
        /// The document kind demanding a folder count.
        kind: DocumentKind,
    },
    /// Folder count below 1 for a kind that requires folders.
    #[error("number of folders must be 1 or more for {kind}")]
    FoldersTooFew {
        /// The document kind demanding a folder count.
        kind: DocumentKind,
    },
    /// The status or kind label is unknown.
    #[error("unknown label: {input}")]
    UnknownLabel {
        /// The unrecognised input.
        input: String,
    },
}

/// Year-wise register number, rendered `YYYY-SSSSSS`.
///
/// Sequences are dense per year and start at 1; the pair is unique across
/// the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiaryNumber {
    year: i32,
    sequence: u32,
}

impl DiaryNumber {
    /// Construct a register number from its parts.
    ///
    /// # Errors
    /// The year must have four digits and the sequence must be at least 1.
    pub const fn new(year: i32, sequence: u32) -> Result<Self, DiaryValidationError> {
        if year < 1000 || year > 9999 {
            return Err(DiaryValidationError::YearOutOfRange);
        }
        if sequence == 0 {
            return Err(DiaryValidationError::SequenceOutOfRange);
        }
        Ok(Self { year, sequence })
    }

    /// Register year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Per-year sequence, starting at 1.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Parse the `YYYY-N` form, tolerating surrounding whitespace and
    /// whitespace around the dash, as register clerks type it.
    ///
    /// # Errors
    /// Returns [`DiaryValidationError::MalformedNumber`] unless the year has
    /// exactly four digits and the remainder is a positive number.
    pub fn parse(raw: &str) -> Result<Self, DiaryValidationError> {
        let trimmed = raw.trim();
        let (year_part, seq_part) = trimmed
            .split_once('-')
            .ok_or(DiaryValidationError::MalformedNumber)?;
        let year_part = year_part.trim();
        let seq_part = seq_part.trim();
        if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(DiaryValidationError::MalformedNumber);
        }
        if seq_part.is_empty() || !seq_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(DiaryValidationError::MalformedNumber);
        }
        let year: i32 = year_part
            .parse()
            .map_err(|_| DiaryValidationError::MalformedNumber)?;
        let sequence: u32 = seq_part
            .parse()
            .map_err(|_| DiaryValidationError::MalformedNumber)?;
        Self::new(year, sequence).map_err(|_| DiaryValidationError::MalformedNumber)
    }
}

impl fmt::Display for DiaryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:06}", self.year, self.sequence)
    }
}

impl From<DiaryNumber> for String {
    fn from(value: DiaryNumber) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DiaryNumber {
    type Error = DiaryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl std::str::FromStr for DiaryNumber {
    type Err = DiaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lifecycle status of a diary, mirroring the last recorded action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DiaryStatus {
    /// Registered but no movement recorded yet.
    #[default]
    Pending,
    /// Initial movement recorded.
    Created,
    /// Marked to an office.
    Marked,
    /// Forwarded onwards.
    Forwarded,
    /// Returned to the registry.
    Returned,
    /// Closed; no further movements expected.
    Closed,
    /// Disposed of.
    Disposed,
}

impl DiaryStatus {
    /// Database and API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Created => "created",
            Self::Marked => "marked",
            Self::Forwarded => "forwarded",
            Self::Returned => "returned",
            Self::Closed => "closed",
            Self::Disposed => "disposed",
        }
    }

    /// All statuses in lifecycle order, for filters and dashboards.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Pending,
            Self::Created,
            Self::Marked,
            Self::Forwarded,
            Self::Returned,
            Self::Closed,
            Self::Disposed,
        ]
    }

    /// Whether the diary is still in circulation.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed | Self::Disposed)
    }
}

impl fmt::Display for DiaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiaryStatus {
    type Err = DiaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "created" => Ok(Self::Created),
            "marked" => Ok(Self::Marked),
            "forwarded" => Ok(Self::Forwarded),
            "returned" => Ok(Self::Returned),
            "closed" => Ok(Self::Closed),
            "disposed" => Ok(Self::Disposed),
            other => Err(DiaryValidationError::UnknownLabel {
                input: other.to_owned(),
            }),
        }
    }
}

/// Kind of document tracked by a diary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A multi-folder file.
    File,
    /// A single letter.
    #[default]
    Letter,
    /// A service book.
    ServiceBook,
    /// An application.
    Application,
}

impl DocumentKind {
    /// Database and API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Letter => "letter",
            Self::ServiceBook => "service_book",
            Self::Application => "application",
        }
    }

    /// Whether this kind carries a folder count.
    #[must_use]
    pub const fn requires_folders(self) -> bool {
        matches!(self, Self::File | Self::ServiceBook)
    }

    /// Apply the register's folder rules.
    ///
    /// Kinds without folders force the count to 0 regardless of input;
    /// kinds with folders require an explicit count of at least 1.
    ///
    /// # Errors
    /// Returns [`DiaryValidationError::FoldersRequired`] or
    /// [`DiaryValidationError::FoldersTooFew`] when the rules are violated.
    pub const fn normalise_folders(
        self,
        folders: Option<u32>,
    ) -> Result<u32, DiaryValidationError> {
        if !self.requires_folders() {
            return Ok(0);
        }
        match folders {
            None => Err(DiaryValidationError::FoldersRequired { kind: self }),
            Some(0) => Err(DiaryValidationError::FoldersTooFew { kind: self }),
            Some(n) => Ok(n),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = DiaryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "letter" => Ok(Self::Letter),
            "service_book" => Ok(Self::ServiceBook),
            "application" => Ok(Self::Application),
            other => Err(DiaryValidationError::UnknownLabel {
                input: other.to_owned(),
            }),
        }
    }
}

/// Descriptive fields shared by registration and edits.
///
/// Construct with [`DiaryAttributes::validated`] so the folder rules hold
/// before anything reaches a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryAttributes {
    /// Register date.
    pub diary_date: NaiveDate,
    /// Source office or sender; may be blank.
    pub received_from: String,
    /// Sender's own reference; may be blank.
    pub received_diary_no: String,
    /// Document kind.
    pub kind: DocumentKind,
    /// Folder count after normalisation.
    pub folders: u32,
    /// Subject line.
    pub subject: String,
    /// Destination office noted at registration; may be blank.
    pub marked_to: String,
    /// Free remarks.
    pub remarks: String,
}

impl DiaryAttributes {
    /// Validate raw attribute input, applying the folder rules.
    ///
    /// # Errors
    /// Propagates folder-rule violations from
    /// [`DocumentKind::normalise_folders`].
    pub fn validated(
        diary_date: NaiveDate,
        received_from: String,
        received_diary_no: String,
        kind: DocumentKind,
        folders: Option<u32>,
        subject: String,
        marked_to: String,
        remarks: String,
    ) -> Result<Self, DiaryValidationError> {
        let folders = kind.normalise_folders(folders)?;
        Ok(Self {
            diary_date,
            received_from: received_from.trim().to_owned(),
            received_diary_no: received_diary_no.trim().to_owned(),
            kind,
            folders,
            subject,
            marked_to: marked_to.trim().to_owned(),
            remarks,
        })
    }
}

/// A register entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diary {
    /// Stable identifier.
    pub id: Uuid,
    /// Year-wise register number.
    pub number: DiaryNumber,
    /// Register date.
    pub diary_date: NaiveDate,
    /// Source office or sender; may be blank.
    pub received_from: String,
    /// Sender's own reference; may be blank.
    pub received_diary_no: String,
    /// Document kind.
    pub kind: DocumentKind,
    /// Folder count.
    pub folders: u32,
    /// Subject line.
    pub subject: String,
    /// Free remarks.
    pub remarks: String,
    /// Current holder office; blank until marked.
    pub marked_to: String,
    /// Date of the last movement.
    pub marked_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: DiaryStatus,
    /// Registering operator.
    pub created_by: UserId,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl Diary {
    /// Whether the diary is still in circulation.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.status.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn number_renders_zero_padded() {
        let number = DiaryNumber::new(2026, 12).expect("valid number");
        assert_eq!(number.to_string(), "2026-000012");
    }

    #[rstest]
    #[case("2026-12", 2026, 12)]
    #[case("  2026 - 000012  ", 2026, 12)]
    fn number_parse_accepts_register_forms(
        #[case] raw: &str,
        #[case] year: i32,
        #[case] sequence: u32,
    ) {
        let number = DiaryNumber::parse(raw).expect("parse");
        assert_eq!((number.year(), number.sequence()), (year, sequence));
    }

    #[rstest]
    #[case("202-12")]
    #[case("20261-2")]
    #[case("2026-")]
    #[case("2026-abc")]
    #[case("2026")]
    #[case("2026-0")]
    fn number_parse_rejects_malformed_input(#[case] raw: &str) {
        assert!(DiaryNumber::parse(raw).is_err());
    }

    #[rstest]
    fn number_rejects_out_of_range_parts() {
        assert_eq!(
            DiaryNumber::new(999, 1),
            Err(DiaryValidationError::YearOutOfRange)
        );
        assert_eq!(
            DiaryNumber::new(2026, 0),
            Err(DiaryValidationError::SequenceOutOfRange)
        );
    }

    #[rstest]
    #[case(DocumentKind::Letter, None, Ok(0))]
    #[case(DocumentKind::Letter, Some(4), Ok(0))]
    #[case(DocumentKind::Application, Some(2), Ok(0))]
    #[case(
        DocumentKind::File,
        None,
        Err(DiaryValidationError::FoldersRequired { kind: DocumentKind::File })
    )]
    #[case(
        DocumentKind::ServiceBook,
        Some(0),
        Err(DiaryValidationError::FoldersTooFew { kind: DocumentKind::ServiceBook })
    )]
    #[case(DocumentKind::File, Some(3), Ok(3))]
    fn folder_rules_follow_document_kind(
        #[case] kind: DocumentKind,
        #[case] folders: Option<u32>,
        #[case] expected: Result<u32, DiaryValidationError>,
    ) {
        assert_eq!(kind.normalise_folders(folders), expected);
    }

    #[rstest]
    fn attributes_trim_office_fields() {
        let attrs = DiaryAttributes::validated(
            NaiveDate::from_ymd_opt(2026, 7, 1).expect("date"),
            "  Accounts ".to_owned(),
            " REF-1 ".to_owned(),
            DocumentKind::Letter,
            None,
            "Subject".to_owned(),
            " Audit ".to_owned(),
            String::new(),
        )
        .expect("valid attributes");
        assert_eq!(attrs.received_from, "Accounts");
        assert_eq!(attrs.received_diary_no, "REF-1");
        assert_eq!(attrs.marked_to, "Audit");
        assert_eq!(attrs.folders, 0);
    }

    #[rstest]
    fn status_knows_which_states_are_open() {
        assert!(DiaryStatus::Forwarded.is_open());
        assert!(!DiaryStatus::Closed.is_open());
        assert!(!DiaryStatus::Disposed.is_open());
    }

    #[rstest]
    fn status_round_trips_through_labels() {
        for status in DiaryStatus::all() {
            let parsed: DiaryStatus = status.as_str().parse().expect("parse own label");
            assert_eq!(parsed, status);
        }
    }
}
