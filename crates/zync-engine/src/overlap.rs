//! Per-day coverage of a roster, computed with a sweep line.
//!
//! Every member's intervals become tagged `Open` / `Close` boundary events. The
//! events are sorted by instant and walked left to right while tracking how many
//! members are currently working; each maximal run with a constant count becomes
//! one [`OverlapSlot`]. Events sharing an instant are applied as a single step, so
//! simultaneous boundaries never produce zero-length or duplicate slots.
//!
//! The slots of a day partition `[00:00, 24:00)` UTC exactly once, including the
//! runs where nobody works (coverage 0).

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZyncError};
use crate::interval::{midnight, normalize, WorkingInterval};
use crate::provider::ProviderWarning;

/// A maximal run of constant coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Number of roster members working throughout the slot.
    pub coverage: usize,
}

impl OverlapSlot {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

/// Overlap of one roster on one UTC date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOverlap {
    pub date: NaiveDate,
    pub roster_size: usize,
    /// Sorted, contiguous partition of the day.
    pub slots: Vec<OverlapSlot>,
    /// Members whose fetch failed and who were counted as unavailable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProviderWarning>,
}

impl DayOverlap {
    /// Slots in which every roster member is working.
    pub fn full_coverage(&self) -> impl Iterator<Item = &OverlapSlot> + '_ {
        self.slots
            .iter()
            .filter(move |slot| slot.coverage == self.roster_size)
    }

    pub fn max_coverage(&self) -> usize {
        self.slots.iter().map(|s| s.coverage).max().unwrap_or(0)
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BoundaryKind {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Boundary {
    at: DateTime<Utc>,
    kind: BoundaryKind,
}

/// Sweep the members' intervals across `[day_start, day_end)`.
///
/// `members` holds one interval list per roster member; lists may be unsorted,
/// overlapping, or extend past the day, and are normalized per member first so a
/// member counts at most once at any instant.
pub fn sweep(
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    members: &[Vec<WorkingInterval>],
) -> Vec<OverlapSlot> {
    let mut boundaries: Vec<Boundary> = members
        .iter()
        .flat_map(|intervals| normalize(intervals, day_start, day_end))
        .flat_map(|interval| {
            [
                Boundary {
                    at: interval.start,
                    kind: BoundaryKind::Open,
                },
                Boundary {
                    at: interval.end,
                    kind: BoundaryKind::Close,
                },
            ]
        })
        .collect();
    boundaries.sort_unstable();

    let mut slots: Vec<OverlapSlot> = Vec::new();
    let mut cursor = day_start;
    let mut open: usize = 0;
    let mut i = 0;

    while i < boundaries.len() {
        let at = boundaries[i].at;
        let mut opened = 0;
        let mut closed = 0;
        while i < boundaries.len() && boundaries[i].at == at {
            match boundaries[i].kind {
                BoundaryKind::Open => opened += 1,
                BoundaryKind::Close => closed += 1,
            }
            i += 1;
        }

        push_run(&mut slots, cursor, at, open);
        // Normalized intervals never close more than are open.
        open = open + opened - closed;
        cursor = at;
    }

    push_run(&mut slots, cursor, day_end, open);
    slots
}

/// Append `[start, end)` at `coverage`, extending the previous slot when the
/// coverage did not change.
fn push_run(slots: &mut Vec<OverlapSlot>, start: DateTime<Utc>, end: DateTime<Utc>, coverage: usize) {
    if start >= end {
        return;
    }
    if let Some(last) = slots.last_mut() {
        if last.coverage == coverage && last.end == start {
            last.end = end;
            return;
        }
    }
    slots.push(OverlapSlot {
        start,
        end,
        coverage,
    });
}

/// Start instants, aligned to `step` from midnight UTC, at which the whole roster
/// is available.
///
/// # Errors
/// Returns `ZyncError::InvalidInput` when `step` is not positive.
pub fn candidate_starts(overlap: &DayOverlap, step: Duration) -> Result<Vec<DateTime<Utc>>> {
    if step <= Duration::zero() {
        return Err(ZyncError::InvalidInput(format!(
            "candidate step must be positive, got {} minutes",
            step.num_minutes()
        )));
    }

    let anchor = midnight(overlap.date);
    let step_secs = step.num_seconds().max(1);
    let mut starts = Vec::new();

    for slot in overlap.full_coverage() {
        // First aligned instant at or after the slot start.
        let offset = (slot.start - anchor).num_seconds();
        let steps = (offset + step_secs - 1).div_euclid(step_secs);
        let mut at = anchor + Duration::seconds(steps * step_secs);
        while at < slot.end {
            starts.push(at);
            at += step;
        }
    }

    Ok(starts)
}
