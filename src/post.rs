//! Post records as ingested, and their normalized form used by the analyzers.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

use crate::analyzers::grade::Grade;

/// Offset every timestamp is converted to before the hour of day is taken (JST).
pub const TARGET_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed analysis time zone, UTC+9.
pub const TARGET_ZONE: FixedOffset = match FixedOffset::east_opt(TARGET_UTC_OFFSET_SECS) {
    Some(offset) => offset,
    None => panic!("target offset out of range"),
};

/// A single post as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub body: String,
    pub like_count: u64,
    pub repost_count: u64,
    pub id: String,
}

/// A [`PostRecord`] converted to the analysis time zone, with its hour of day
/// and engagement grade derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    record: PostRecord,
    hour_of_day: u32,
    grade: Grade,
}

impl NormalizedRecord {
    pub fn from_record(record: PostRecord) -> Self {
        let local = record.timestamp.with_timezone(&TARGET_ZONE);
        let grade = Grade::from_likes(record.like_count);

        NormalizedRecord {
            hour_of_day: local.hour(),
            grade,
            record: PostRecord {
                timestamp: local,
                ..record
            },
        }
    }

    /// Timestamp expressed in UTC+9.
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.record.timestamp
    }

    pub fn body(&self) -> &str {
        &self.record.body
    }

    pub fn like_count(&self) -> u64 {
        self.record.like_count
    }

    pub fn repost_count(&self) -> u64 {
        self.record.repost_count
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Hour component (0–23) of the converted timestamp.
    pub fn hour_of_day(&self) -> u32 {
        self.hour_of_day
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    /// Body length in Unicode scalar values.
    pub fn char_length(&self) -> usize {
        self.record.body.chars().count()
    }

    pub fn record(&self) -> &PostRecord {
        &self.record
    }
}

/// Normalizes a batch of records, preserving input order.
pub fn normalize(records: Vec<PostRecord>) -> Vec<NormalizedRecord> {
    records.into_iter().map(NormalizedRecord::from_record).collect()
}
