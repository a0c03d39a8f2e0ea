//! Output rows produced by the analysis pipeline.

use serde::Serialize;

use crate::analyzers::grade::Grade;

/// One half-open like-count bin `[bin_start, bin_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub bin_start: u64,
    pub bin_end: u64,
    pub frequency: usize,
}

/// Mean likes and post volume for one hour of the day (UTC+9).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub mean_engagement: f64,
    pub tweet_count: usize,
}

/// Mean body length of the posts that received a grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeLength {
    pub grade: Grade,
    pub mean_char_length: f64,
}

/// A surface form and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordFrequency {
    pub surface_form: String,
    pub count: usize,
}

/// Ranked frequent words for one grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeWords {
    pub grade: Grade,
    pub post_count: usize,
    pub words: Vec<WordFrequency>,
}

/// Everything the dashboard renders for one uploaded dataset.
///
/// `lexical_error` is set when the tokenizer could not be used; the
/// aggregate tables are still populated in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub record_count: usize,
    pub histogram: Vec<HistogramBin>,
    pub hourly: Vec<HourlyBucket>,
    pub length_by_grade: Vec<GradeLength>,
    pub words: Vec<GradeWords>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical_error: Option<String>,
}
