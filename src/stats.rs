//! Descriptive statistics over trip record series.
//!
//! Every function takes a plain series (an iterator aligned to the record set's
//! row order) rather than the record set itself, so derived series like start
//! hours or "From: X, To: Y" labels tabulate the same way as raw columns.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// Mode and mean are undefined over nothing; callers check before asking.
    #[error("cannot compute a statistic over an empty series")]
    EmptySeries,
}

/// The most frequent value of a series with its count and share of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeStat<T> {
    pub value: T,
    pub count: usize,
    /// Share of rows, pre-formatted to exactly two decimals (e.g. "33.33").
    pub percent: String,
}

/// Birth-year summary over the non-null entries of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
    /// How many rows had no birth year recorded.
    pub missing: usize,
}

/// Formats `part / total` as a percentage with exactly two decimals.
pub fn percent_of(part: usize, total: usize) -> String {
    format!("{:.2}", part as f64 / total as f64 * 100.0)
}

/// Computes the modal value of `values` with its count and percentage of rows.
///
/// Counts accumulate in an ordered map and a later value only wins with a
/// strictly greater count, so ties break toward the smallest value.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if the series yields no values.
pub fn mode_stat<T>(values: impl IntoIterator<Item = T>) -> Result<ModeStat<T>, StatsError>
where
    T: Ord,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        total += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        match &best {
            Some((_, best_count)) if *best_count >= count => {}
            _ => best = Some((value, count)),
        }
    }

    match best {
        Some((value, count)) => Ok(ModeStat {
            value,
            count,
            percent: percent_of(count, total),
        }),
        None => Err(StatsError::EmptySeries),
    }
}

/// Sums a duration series in seconds. An empty series sums to 0.
pub fn total_duration(durations: impl IntoIterator<Item = f64>) -> f64 {
    durations.into_iter().sum()
}

/// Averages a duration series in seconds.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if the series yields no values — the mean of
/// nothing is undefined, never a silent default.
pub fn mean_duration(durations: impl IntoIterator<Item = f64>) -> Result<f64, StatsError> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for duration in durations {
        sum += duration;
        count += 1;
    }

    if count == 0 {
        return Err(StatsError::EmptySeries);
    }
    Ok(sum / count as f64)
}

/// Tabulates `values` into `(value, count, percent)` rows ordered by count
/// descending, then value ascending within equal counts.
///
/// Percentages round independently to two decimals; no renormalization forces
/// the column to total exactly 100. An empty series tabulates to an empty
/// breakdown.
pub fn distribution<T>(values: impl IntoIterator<Item = T>) -> Vec<(T, usize, String)>
where
    T: Ord,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        total += 1;
    }

    // Stable sort keeps the map's ascending value order within equal counts
    let mut rows: Vec<(T, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    rows.into_iter()
        .map(|(value, count)| {
            let percent = percent_of(count, total);
            (value, count, percent)
        })
        .collect()
}

/// Computes earliest/most recent/most common year over the non-null entries of
/// `years`, counting the nulls as missing.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if there are no non-null entries. A source file
/// without the column at all is handled upstream as a schema condition, not by
/// calling this.
pub fn year_stats(years: impl IntoIterator<Item = Option<i32>>) -> Result<YearStats, StatsError> {
    let mut missing = 0usize;
    let mut known = Vec::new();
    for year in years {
        match year {
            Some(y) => known.push(y),
            None => missing += 1,
        }
    }

    let earliest = known.iter().copied().min().ok_or(StatsError::EmptySeries)?;
    let most_recent = known.iter().copied().max().ok_or(StatsError::EmptySeries)?;
    let most_common = mode_stat(known)?.value;

    Ok(YearStats {
        earliest,
        most_recent,
        most_common,
        missing,
    })
}
