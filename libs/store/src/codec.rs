//! Column encoding shared by the repositories
//!
//! Timestamps are stored as RFC 3339 text with microsecond precision and
//! dates as `YYYY-MM-DD`, so the same columns work on every backend. A value
//! that cannot be decoded back is reported as [`DatabaseError::Corrupt`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{Row, any::AnyRow};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn text(row: &AnyRow, column: &'static str) -> DatabaseResult<String> {
    Ok(row.try_get::<String, _>(column)?)
}

pub(crate) fn optional_text(row: &AnyRow, column: &'static str) -> DatabaseResult<Option<String>> {
    Ok(row.try_get::<Option<String>, _>(column)?)
}

pub(crate) fn integer(row: &AnyRow, column: &'static str) -> DatabaseResult<i64> {
    Ok(row.try_get::<i64, _>(column)?)
}

pub(crate) fn timestamp(row: &AnyRow, column: &'static str) -> DatabaseResult<DateTime<Utc>> {
    let raw = text(row, column)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt(column, &raw, e))
}

pub(crate) fn date(row: &AnyRow, column: &'static str) -> DatabaseResult<NaiveDate> {
    let raw = text(row, column)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|e| corrupt(column, &raw, e))
}

pub(crate) fn closed<T>(row: &AnyRow, column: &'static str) -> DatabaseResult<T>
where
    T: FromStr<Err = DatabaseError>,
{
    let raw = text(row, column)?;
    raw.parse().map_err(|e| corrupt(column, &raw, e))
}

pub(crate) fn optional_closed<T>(row: &AnyRow, column: &'static str) -> DatabaseResult<Option<T>>
where
    T: FromStr<Err = DatabaseError>,
{
    optional_text(row, column)?
        .map(|raw| raw.parse().map_err(|e| corrupt(column, &raw, e)))
        .transpose()
}

fn corrupt(column: &'static str, raw: &str, cause: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Corrupt {
        column,
        detail: format!("{raw:?}: {cause}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_keep_microseconds() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 9).unwrap()
            + chrono::Duration::microseconds(123_456);
        let encoded = encode_timestamp(ts);
        assert_eq!(encoded, "2024-05-17T13:45:09.123456Z");
        let decoded = DateTime::parse_from_rfc3339(&encoded).unwrap();
        assert_eq!(decoded.with_timezone(&Utc), ts);
    }

    #[test]
    fn dates_are_iso_formatted() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(encode_date(date), "2024-02-09");
    }

    #[test]
    fn corrupt_names_column() {
        let err = corrupt("frequency", "Daily", "Invalid frequency: Daily");
        assert!(err.to_string().contains("frequency"));
    }
}
