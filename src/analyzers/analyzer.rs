use crate::analyzers::aggregate::{engagement_histogram, hourly_trend, length_by_grade};
use crate::analyzers::grade::Grade;
use crate::analyzers::lexical::{PartOfSpeechFilter, frequent_words};
use crate::analyzers::types::{AnalysisReport, GradeWords};
use crate::errors::Result;
use crate::parser::load_records;
use crate::post::NormalizedRecord;
use crate::tokenizer::Tokenizer;
use std::path::Path;
use tracing::{error, info};

/// Per-run analysis settings, passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Grades to rank frequent words for, in output order.
    pub grades: Vec<Grade>,
    pub filter: PartOfSpeechFilter,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grades: Grade::ALL.to_vec(),
            filter: PartOfSpeechFilter::default(),
        }
    }
}

/// Ranks frequent words for each configured grade, stopping at the first
/// tokenizer failure.
pub fn words_by_grade<T: Tokenizer>(
    records: &[NormalizedRecord],
    config: &AnalysisConfig,
    tokenizer: &T,
) -> Result<Vec<GradeWords>> {
    config
        .grades
        .iter()
        .map(|&grade| frequent_words(records, grade, config.filter, tokenizer))
        .collect()
}

/// Runs every aggregation over `records`.
///
/// A tokenizer failure only affects the word rankings: it is recorded in
/// [`AnalysisReport::lexical_error`] and the other tables are still filled.
/// Rankings finished before the failing grade are kept; later grades are
/// not attempted.
#[tracing::instrument(skip_all, fields(record_count = records.len()))]
pub fn analyze<T: Tokenizer>(
    records: &[NormalizedRecord],
    config: &AnalysisConfig,
    tokenizer: &T,
) -> AnalysisReport {
    let mut words = Vec::with_capacity(config.grades.len());
    let mut lexical_error = None;

    for &grade in &config.grades {
        match frequent_words(records, grade, config.filter, tokenizer) {
            Ok(ranked) => words.push(ranked),
            Err(e) => {
                error!(
                    error = %e,
                    grade = %grade,
                    "Word ranking failed, continuing with aggregates only"
                );
                lexical_error = Some(e.to_string());
                break;
            }
        }
    }

    let report = AnalysisReport {
        record_count: records.len(),
        histogram: engagement_histogram(records),
        hourly: hourly_trend(records),
        length_by_grade: length_by_grade(records),
        words,
        lexical_error,
    };

    info!(
        bins = report.histogram.len(),
        grades_present = report.length_by_grade.len(),
        "Analysis complete"
    );
    report
}

/// Loads a posts CSV and analyzes it.
///
/// # Errors
///
/// Returns [`RaterError::MalformedInput`](crate::errors::RaterError::MalformedInput)
/// if any row fails validation; nothing is computed in that case.
pub fn analyze_file<T: Tokenizer>(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
    tokenizer: &T,
) -> Result<AnalysisReport> {
    let records = load_records(path)?;
    Ok(analyze(&records, config, tokenizer))
}
