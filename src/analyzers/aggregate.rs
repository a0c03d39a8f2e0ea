use crate::analyzers::grade::Grade;
use crate::analyzers::types::{GradeLength, HistogramBin, HourlyBucket};
use crate::analyzers::utility::mean;
use crate::post::NormalizedRecord;
use std::collections::BTreeMap;

/// Width of each like-count histogram bin.
pub const BIN_WIDTH: u64 = 5;

const HOURS_PER_DAY: u32 = 24;

/// Largest number of bins emitted with empty gaps zero-filled. Beyond this
/// only occupied bins are returned.
pub const MAX_DENSE_BINS: u64 = 10_000;

/// Buckets like counts into fixed-width bins covering `[0, max]`.
///
/// The last bin always contains the maximum, so the frequencies sum to the
/// number of records. Empty input yields no bins. Empty bins are included
/// while the range needs at most [`MAX_DENSE_BINS`] bins; wider ranges list
/// occupied bins only.
pub fn engagement_histogram(records: &[NormalizedRecord]) -> Vec<HistogramBin> {
    let mut occupied: BTreeMap<u64, usize> = BTreeMap::new();
    for record in records {
        *occupied.entry(record.like_count() / BIN_WIDTH).or_default() += 1;
    }

    let Some(&last) = occupied.keys().next_back() else {
        return Vec::new();
    };

    let bin = |index: u64, frequency: usize| {
        let bin_start = index * BIN_WIDTH;
        HistogramBin {
            bin_start,
            bin_end: bin_start.saturating_add(BIN_WIDTH),
            frequency,
        }
    };

    if last < MAX_DENSE_BINS {
        (0..=last)
            .map(|i| bin(i, occupied.get(&i).copied().unwrap_or(0)))
            .collect()
    } else {
        occupied.into_iter().map(|(i, f)| bin(i, f)).collect()
    }
}

/// Mean likes and post count for every hour 0–23, zero-filled for hours
/// without posts.
pub fn hourly_trend(records: &[NormalizedRecord]) -> Vec<HourlyBucket> {
    let mut series: Vec<Vec<f64>> = vec![Vec::new(); HOURS_PER_DAY as usize];

    for record in records {
        series[record.hour_of_day() as usize].push(record.like_count() as f64);
    }

    series
        .iter()
        .zip(0..HOURS_PER_DAY)
        .map(|(likes, hour)| HourlyBucket {
            hour,
            mean_engagement: mean(likes),
            tweet_count: likes.len(),
        })
        .collect()
}

/// Mean body length per grade, for grades that actually occur, in `A..E` order.
pub fn length_by_grade(records: &[NormalizedRecord]) -> Vec<GradeLength> {
    let mut series: BTreeMap<Grade, Vec<f64>> = BTreeMap::new();

    for record in records {
        series
            .entry(record.grade())
            .or_default()
            .push(record.char_length() as f64);
    }

    series
        .into_iter()
        .map(|(grade, lengths)| GradeLength {
            grade,
            mean_char_length: mean(&lengths),
        })
        .collect()
}
