//! Shared validation helpers for request payloads.
//!
//! Every rejection carries a structured `details` object naming the field
//! and a stable code, so clients can highlight the offending input.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use crate::domain::Error;

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_value_error(field: &'static str, value: &str, expected: &str) -> Error {
    Error::invalid_request(format!("{field} must be {expected}")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_value",
    }))
}

/// Parse an ISO `YYYY-MM-DD` date field.
pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid_value_error(field, value, "an ISO date (YYYY-MM-DD)"))
}

/// Parse an optional ISO date field.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(raw, field)).transpose()
}

/// Parse an RFC 3339 timestamp field into UTC.
pub(crate) fn parse_timestamp(value: &str, field: &'static str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| invalid_value_error(field, value, "an RFC 3339 timestamp"))
}

/// Parse an optional RFC 3339 timestamp field.
pub(crate) fn parse_optional_timestamp(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>, Error> {
    value.map(|raw| parse_timestamp(raw, field)).transpose()
}

/// Parse a labelled enum field via its `FromStr`.
pub(crate) fn parse_label<T>(value: &str, field: &'static str, expected: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
{
    value
        .parse()
        .map_err(|_| invalid_value_error(field, value, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiaryStatus, ErrorCode};
    use rstest::rstest;

    #[rstest]
    fn missing_field_names_the_field() {
        let err = missing_field_error("toOffice");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], "toOffice");
        assert_eq!(details["code"], "missing_field");
    }

    #[rstest]
    fn dates_parse_iso_only() {
        assert!(parse_date("2026-07-01", "diaryDate").is_ok());
        assert!(parse_date("01-07-2026", "diaryDate").is_err());
    }

    #[rstest]
    fn timestamps_normalise_to_utc() {
        let parsed = parse_timestamp("2026-07-01T12:00:00+05:00", "actionAt").expect("timestamp");
        assert_eq!(parsed.to_rfc3339(), "2026-07-01T07:00:00+00:00");
    }

    #[rstest]
    fn optional_parsers_pass_none_through() {
        assert_eq!(
            parse_optional_date(None, "diaryDate").expect("none"),
            None
        );
        assert_eq!(
            parse_optional_timestamp(None, "actionAt").expect("none"),
            None
        );
    }

    #[rstest]
    fn labels_parse_through_from_str() {
        let status: DiaryStatus =
            parse_label("closed", "status", "a diary status").expect("status");
        assert_eq!(status, DiaryStatus::Closed);
        let err = parse_label::<DiaryStatus>("lost", "status", "a diary status")
            .expect_err("unknown status");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
