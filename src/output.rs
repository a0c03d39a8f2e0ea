//! Output formatting and persistence for posts and analysis reports.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use chrono::{DateTime, FixedOffset};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::AnalysisReport;
use crate::errors::Result;
use crate::post::PostRecord;

const POST_COLUMNS: [&str; 6] = ["timestamp", "body", "like_count", "repost_count", "id", "url"];

#[derive(Serialize)]
struct PostRow<'a> {
    timestamp: DateTime<FixedOffset>,
    body: &'a str,
    like_count: u64,
    repost_count: u64,
    id: &'a str,
    url: String,
}

/// Link to a post on the public site.
pub fn post_url(username: &str, id: &str) -> String {
    format!("https://twitter.com/{username}/status/{id}")
}

/// Writes posts as CSV, most-liked first, with a `url` column per post.
///
/// The header matches what [`crate::parser::parse_records`] reads back and
/// is written even when `posts` is empty.
pub fn write_posts<W: Write>(writer: W, username: &str, posts: &[PostRecord]) -> Result<()> {
    let mut sorted: Vec<&PostRecord> = posts.iter().collect();
    sorted.sort_by(|a, b| b.like_count.cmp(&a.like_count));

    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(POST_COLUMNS)?;

    for post in sorted {
        wtr.serialize(PostRow {
            timestamp: post.timestamp,
            body: &post.body,
            like_count: post.like_count,
            repost_count: post.repost_count,
            id: &post.id,
            url: post_url(username, &post.id),
        })?;
    }
    wtr.flush()?;

    Ok(())
}

/// Creates (or truncates) `path` and writes the posts CSV to it.
pub fn save_posts(path: impl AsRef<Path>, username: &str, posts: &[PostRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_posts(file, username, posts)?;
    info!(path = %path.display(), rows = posts.len(), "Posts CSV written");
    Ok(())
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &AnalysisReport) {
    debug!("{:#?}", report);
}

/// Renders a report as pretty-printed JSON.
pub fn to_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the JSON report to `path`.
pub fn save_report(path: impl AsRef<Path>, report: &AnalysisReport) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_json(report)?)?;
    info!(path = %path.display(), "Report written");
    Ok(())
}
