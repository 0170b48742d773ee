//! Half-open UTC working intervals and the UTC-day helpers shared by every component.
//!
//! All ranges in this crate are `[start, end)`: an instant equal to `end` is outside
//! the interval, so back-to-back shifts never double count their shared boundary.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZyncError};

/// One employee's working time on one UTC calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkingInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WorkingInterval {
    /// # Errors
    /// Returns `ZyncError::InvalidInput` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(ZyncError::InvalidInput(format!(
                "interval start {} is not before end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    /// `start <= at < end`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }

    /// Restrict to `[lo, hi)`, or `None` when nothing is left.
    pub fn clip(&self, lo: DateTime<Utc>, hi: DateTime<Utc>) -> Option<Self> {
        let start = self.start.max(lo);
        let end = self.end.min(hi);
        (start < end).then_some(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }
}

/// `[00:00, 24:00)` UTC of `date`.
///
/// # Errors
/// Returns `ZyncError::InvalidInput` when the following day is out of chrono's range.
pub fn utc_day(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| ZyncError::InvalidInput(format!("date {} is out of range", date)))?;
    Ok((midnight(date), midnight(next)))
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// `count` consecutive dates starting at `start`.
///
/// # Errors
/// Returns `ZyncError::InvalidInput` when the range runs past chrono's last date.
pub fn date_range(start: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let last = start
        .checked_add_days(Days::new(u64::from(count) - 1))
        .ok_or_else(|| ZyncError::InvalidInput(format!("date range from {} overflows", start)))?;
    // The last day's end must also be representable.
    utc_day(last)?;
    Ok(start.iter_days().take(count as usize).collect())
}

/// Clip intervals to `[lo, hi)`, sort them, and merge overlapping or adjacent ones.
///
/// Returns a sorted, non-overlapping, gap-separated list. The sweep relies on this
/// so one employee is never counted twice at the same instant.
pub fn normalize(
    intervals: &[WorkingInterval],
    lo: DateTime<Utc>,
    hi: DateTime<Utc>,
) -> Vec<WorkingInterval> {
    let mut clipped: Vec<WorkingInterval> =
        intervals.iter().filter_map(|i| i.clip(lo, hi)).collect();

    if clipped.is_empty() {
        return clipped;
    }

    clipped.sort();

    let mut merged: Vec<WorkingInterval> = Vec::with_capacity(clipped.len());
    for interval in clipped {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}
