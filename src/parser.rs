//! CSV ingestion for post exports.
//!
//! Accepts the column names `timestamp`, `body`, `like_count`, `repost_count`
//! and `id`, or the Japanese headers written by the original dashboard
//! (`時間`, `ツイート本文`, `いいね`, `リツイート`, `ID`). Other columns are ignored.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{RaterError, Result};
use crate::post::{NormalizedRecord, PostRecord, normalize};

/// Required columns and the alternative header accepted for each.
const REQUIRED_COLUMNS: &[(&str, &str)] = &[
    ("timestamp", "時間"),
    ("body", "ツイート本文"),
    ("like_count", "いいね"),
    ("repost_count", "リツイート"),
    ("id", "ID"),
];

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "時間")]
    timestamp: String,
    #[serde(alias = "ツイート本文")]
    body: String,
    #[serde(alias = "いいね")]
    like_count: i64,
    #[serde(alias = "リツイート")]
    repost_count: i64,
    #[serde(alias = "ID")]
    id: String,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<PostRecord> {
        let timestamp = parse_timestamp(&self.timestamp)
            .map_err(|reason| RaterError::malformed(Some(row), reason))?;

        if self.id.trim().is_empty() {
            return Err(RaterError::malformed(Some(row), "id is empty"));
        }

        Ok(PostRecord {
            timestamp,
            body: self.body,
            like_count: non_negative(self.like_count, "like_count", row)?,
            repost_count: non_negative(self.repost_count, "repost_count", row)?,
            id: self.id.trim().to_string(),
        })
    }
}

fn non_negative(value: i64, column: &str, row: usize) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| RaterError::malformed(Some(row), format!("{column} is negative ({value})")))
}

/// Parses a zone-qualified timestamp.
///
/// Accepts RFC 3339 (`2023-01-05T03:04:05Z`) and the space-separated form
/// pandas writes (`2023-01-05 03:04:05+00:00`). Timestamps without an offset
/// are rejected.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }

    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => raw.to_string(),
    };
    for format in ZONED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(&zoned, format) {
            return Ok(ts);
        }
    }

    if NAIVE_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(raw, format).is_ok())
    {
        return Err(format!("timestamp '{raw}' has no time zone"));
    }

    Err(format!("timestamp '{raw}' is not a valid date-time"))
}

fn check_headers(headers: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|(name, alias)| !headers.iter().any(|h| h == *name || h == *alias))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RaterError::malformed(
            None,
            format!("missing column(s): {}", missing.join(", ")),
        ))
    }
}

/// Reads and validates every row of a posts CSV.
///
/// # Errors
///
/// Any invalid row aborts the whole batch with [`RaterError::MalformedInput`];
/// rows are never skipped.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<PostRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    check_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = i + 1;
        let raw = result.map_err(|e| RaterError::malformed(Some(row), e.to_string()))?;
        records.push(raw.into_record(row)?);
    }

    debug!(rows = records.len(), "CSV rows parsed");
    Ok(records)
}

/// Reads a posts CSV from any reader and normalizes it.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<NormalizedRecord>> {
    Ok(normalize(parse_records(reader)?))
}

/// Opens and normalizes the posts CSV at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<NormalizedRecord>> {
    let file = File::open(path.as_ref())?;
    let records = read_records(file)?;
    info!(record_count = records.len(), "Posts loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::Grade;

    #[test]
    fn test_parse_english_headers() {
        let csv = "timestamp,body,like_count,repost_count,id\n\
                   2023-01-05T00:15:00Z,hello,12,1,100\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hour_of_day(), 9);
        assert_eq!(records[0].grade(), Grade::D);
        assert_eq!(records[0].id(), "100");
        assert_eq!(records[0].repost_count(), 1);
    }

    #[test]
    fn test_parse_japanese_headers_and_extra_columns() {
        let csv = "時間,ツイート本文,いいね,リツイート,ID,url\n\
                   2023-01-05 14:00:00+00:00,こんにちは,120,3,1,https://twitter.com/x/status/1\n";
        let records = read_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].hour_of_day(), 23);
        assert_eq!(records[0].grade(), Grade::A);
        assert_eq!(records[0].body(), "こんにちは");
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "timestamp,body,like_count,repost_count,id\n";
        assert!(read_records(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_column() {
        let csv = "timestamp,body,like_count,id\n2023-01-05T00:15:00Z,hi,1,1\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            RaterError::MalformedInput { row, reason } => {
                assert_eq!(row, None);
                assert!(reason.contains("repost_count"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_like_count_aborts_batch() {
        let csv = "timestamp,body,like_count,repost_count,id\n\
                   2023-01-05T00:15:00Z,ok,1,0,1\n\
                   2023-01-05T00:15:00Z,bad,-4,0,2\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RaterError::MalformedInput { row: Some(2), .. }));
    }

    #[test]
    fn test_non_numeric_count() {
        let csv = "timestamp,body,like_count,repost_count,id\n\
                   2023-01-05T00:15:00Z,bad,many,0,1\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RaterError::MalformedInput { row: Some(1), .. }));
    }

    #[test]
    fn test_timestamp_without_zone_is_rejected() {
        let csv = "timestamp,body,like_count,repost_count,id\n\
                   2023-01-05 00:15:00,naive,1,0,1\n";
        match read_records(csv.as_bytes()).unwrap_err() {
            RaterError::MalformedInput { row, reason } => {
                assert_eq!(row, Some(1));
                assert!(reason.contains("no time zone"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = DateTime::parse_from_rfc3339("2023-01-05T03:04:05+00:00").unwrap();
        assert_eq!(parse_timestamp("2023-01-05T03:04:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-05 03:04:05+00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-05 03:04:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2023-01-05 12:04:05+09:00").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2023-01-05 03:04:05.000+00:00").unwrap(),
            expected
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let csv = "timestamp,body,like_count,repost_count,id\n\
                   2023-01-05T00:15:00Z,x,1,0,\n";
        assert!(matches!(
            read_records(csv.as_bytes()).unwrap_err(),
            RaterError::MalformedInput { row: Some(1), .. }
        ));
    }
}
