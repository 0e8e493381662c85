//! Office directory types.
//!
//! Offices are free-text destinations on diaries and movements. Every
//! non-blank name that appears on a record is folded into the directory so
//! later entries can autocomplete against it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default office used when a record does not name one.
pub const REGISTRY_OFFICE: &str = "Registry";

/// Maximum accepted office name length.
pub const OFFICE_NAME_MAX: usize = 255;

/// Validation errors for office names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficeValidationError {
    /// The name is blank after trimming.
    EmptyName,
    /// The name exceeds the storage limit.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

impl fmt::Display for OfficeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "office name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "office name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for OfficeValidationError {}

/// Trimmed, non-blank office name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OfficeName(String);

impl OfficeName {
    /// Validate and construct an [`OfficeName`].
    ///
    /// # Errors
    /// Rejects blank and over-long values.
    pub fn new(name: impl Into<String>) -> Result<Self, OfficeValidationError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(OfficeValidationError::EmptyName);
        }
        if trimmed.chars().count() > OFFICE_NAME_MAX {
            return Err(OfficeValidationError::NameTooLong {
                max: OFFICE_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }

    /// Parse free text, returning `None` for blank input.
    ///
    /// Records store office fields as plain strings that are frequently
    /// empty; this is the lenient entry point used when folding them into
    /// the directory.
    #[must_use]
    pub fn from_record_field(raw: &str) -> Option<Self> {
        Self::new(raw).ok()
    }

    /// The default registry office.
    #[must_use]
    pub fn registry() -> Self {
        Self(REGISTRY_OFFICE.to_owned())
    }
}

impl AsRef<str> for OfficeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OfficeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<OfficeName> for String {
    fn from(value: OfficeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for OfficeName {
    type Error = OfficeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Directory entry for a known office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Office {
    /// Stable identifier.
    pub id: Uuid,
    /// Unique office name.
    #[schema(value_type = String, example = "Accounts Section")]
    pub name: OfficeName,
    /// When the office first appeared on a record.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case(" Accounts ", Some("Accounts"))]
    fn record_fields_are_trimmed_or_dropped(#[case] raw: &str, #[case] expected: Option<&str>) {
        let parsed = OfficeName::from_record_field(raw);
        assert_eq!(parsed.as_ref().map(AsRef::as_ref), expected);
    }

    #[rstest]
    fn over_long_names_are_rejected() {
        let raw = "x".repeat(OFFICE_NAME_MAX + 1);
        assert_eq!(
            OfficeName::new(raw),
            Err(OfficeValidationError::NameTooLong {
                max: OFFICE_NAME_MAX
            })
        );
    }

    #[rstest]
    fn registry_is_the_default_office() {
        assert_eq!(OfficeName::registry().as_ref(), "Registry");
    }
}
