//! Fold a day's overlap slots into a 24-bucket UTC grid for charting.
//!
//! The grid feeds a two-series stacked bar chart: `overlap` marks hours in which the
//! full roster is available at some point, `working_hours` marks hours in which only
//! part of the roster is. A bucket is never set in both series.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::interval::midnight;
use crate::overlap::OverlapSlot;
use crate::roster::Roster;

pub const HOURS_PER_DAY: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourlyBuckets {
    /// Highest partial coverage seen in the hour, or 0 when the hour is full-overlap.
    pub working_hours: [usize; HOURS_PER_DAY],
    /// Roster size when the whole roster overlaps at some point in the hour, else 0.
    pub overlap: [usize; HOURS_PER_DAY],
}

/// Reduce `slots` into per-hour buckets.
///
/// Hours are anchored to the UTC date of the first slot; slot parts that fall
/// outside that date are ignored. An empty `slots` yields two all-zero arrays.
pub fn build_hourly_buckets(roster: &Roster, slots: &[OverlapSlot]) -> HourlyBuckets {
    let mut buckets = HourlyBuckets::default();
    let Some(first) = slots.first() else {
        return buckets;
    };

    let full = roster.len();
    let anchor = midnight(first.start.date_naive());

    for (hour, (working, overlap)) in buckets
        .working_hours
        .iter_mut()
        .zip(buckets.overlap.iter_mut())
        .enumerate()
    {
        let hour_start = anchor + Duration::hours(hour as i64);
        let hour_end = hour_start + Duration::hours(1);

        let touching = slots
            .iter()
            .filter(|s| s.start < hour_end && hour_start < s.end);

        let mut partial = 0;
        for slot in touching {
            if slot.coverage >= full {
                *overlap = full;
            } else {
                partial = partial.max(slot.coverage);
            }
        }

        if *overlap == 0 {
            *working = partial;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slots_give_zero_buckets() {
        let roster = Roster::try_from(vec![1, 2]).unwrap();
        assert_eq!(build_hourly_buckets(&roster, &[]), HourlyBuckets::default());
    }
}
