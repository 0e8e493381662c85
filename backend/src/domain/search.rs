//! Interpretation of the register listing filters.

use serde::{Deserialize, Serialize};

use super::diary::{DiaryNumber, DiaryStatus};

/// Interpretation of the free-text search box.
///
/// Clerks type register numbers, bare sequences, or arbitrary text; each is
/// matched differently, in that priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchTerm {
    /// `YYYY-N`: match the exact register number.
    Number(DiaryNumber),
    /// All digits: match the sequence in any year.
    Sequence(u32),
    /// Anything else: case-insensitive substring over the text columns
    /// (subject, received-from, reference, kind, marked-to, remarks).
    Text(String),
}

impl SearchTerm {
    /// Interpret a raw search box value. Blank input means no term.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(number) = DiaryNumber::parse(trimmed) {
            return Some(Self::Number(number));
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(sequence) = trimmed.parse::<u32>() {
                return Some(Self::Sequence(sequence));
            }
        }
        Some(Self::Text(trimmed.to_owned()))
    }
}

/// Filter for the register listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiaryFilter {
    /// Restrict to a register year.
    pub year: Option<i32>,
    /// Restrict to a status.
    pub status: Option<DiaryStatus>,
    /// Free-text search interpretation.
    pub term: Option<SearchTerm>,
}

impl DiaryFilter {
    /// Whether the filter restricts the listing at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.year.is_none() && self.status.is_none() && self.term.is_none()
    }
}
