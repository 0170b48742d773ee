//! Tests for per-day overlap computation through the coordinator.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use zync_engine::{Coordinator, EmployeeId, InMemoryProvider, OverlapSlot, Roster, WorkingInterval};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
}

fn end_of_day() -> DateTime<Utc> {
    at(0, 0) + Duration::hours(24)
}

fn shift(sh: u32, eh: u32) -> WorkingInterval {
    WorkingInterval::new(at(sh, 0), at(eh, 0)).unwrap()
}

fn slot(start: DateTime<Utc>, end: DateTime<Utc>, coverage: usize) -> OverlapSlot {
    OverlapSlot {
        start,
        end,
        coverage,
    }
}

fn roster(ids: &[i64]) -> Roster {
    Roster::try_from(ids.to_vec()).unwrap()
}

/// A works 09-17, B works 14-22.
fn two_person_provider() -> InMemoryProvider {
    InMemoryProvider::new()
        .with_intervals(EmployeeId(1), date(), vec![shift(9, 17)])
        .with_intervals(EmployeeId(2), date(), vec![shift(14, 22)])
}

// ── Partition ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_shifted_workers_partition_the_day() {
    let engine = Coordinator::new(two_person_provider());

    let overlap = engine.compute_overlap(&roster(&[1, 2]), date()).await.unwrap();

    assert_eq!(
        overlap.slots,
        vec![
            slot(at(0, 0), at(9, 0), 0),
            slot(at(9, 0), at(14, 0), 1),
            slot(at(14, 0), at(17, 0), 2),
            slot(at(17, 0), at(22, 0), 1),
            slot(at(22, 0), end_of_day(), 0),
        ]
    );
    assert_eq!(overlap.roster_size, 2);
    assert_eq!(overlap.max_coverage(), 2);
    assert!(!overlap.is_degraded());
}

#[tokio::test]
async fn roster_order_does_not_change_result() {
    let engine = Coordinator::new(two_person_provider());

    let forward = engine.compute_overlap(&roster(&[1, 2]), date()).await.unwrap();
    let reverse = engine.compute_overlap(&roster(&[2, 1]), date()).await.unwrap();

    assert_eq!(forward, reverse);
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let engine = Coordinator::new(two_person_provider());
    let team = roster(&[1, 2]);

    let first = engine.compute_overlap(&team, date()).await.unwrap();
    let second = engine.compute_overlap(&team, date()).await.unwrap();

    assert_eq!(first, second);
}

// ── Single member ───────────────────────────────────────────────────────────

#[tokio::test]
async fn single_member_full_coverage_equals_their_shift() {
    let provider = InMemoryProvider::new().with_intervals(EmployeeId(7), date(), vec![shift(8, 16)]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[7]), date()).await.unwrap();
    let full: Vec<_> = overlap.full_coverage().copied().collect();

    assert_eq!(full, vec![slot(at(8, 0), at(16, 0), 1)]);
}

#[tokio::test]
async fn split_shift_yields_two_full_coverage_slots() {
    let provider =
        InMemoryProvider::new().with_intervals(EmployeeId(7), date(), vec![shift(14, 18), shift(6, 10)]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[7]), date()).await.unwrap();
    let full: Vec<_> = overlap.full_coverage().copied().collect();

    assert_eq!(
        full,
        vec![slot(at(6, 0), at(10, 0), 1), slot(at(14, 0), at(18, 0), 1)]
    );
    assert_eq!(overlap.slots.len(), 5);
}

// ── Edge cases ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn identical_boundaries_merge_into_one_step() {
    let provider = InMemoryProvider::new()
        .with_intervals(EmployeeId(1), date(), vec![shift(9, 17)])
        .with_intervals(EmployeeId(2), date(), vec![shift(9, 17)])
        .with_intervals(EmployeeId(3), date(), vec![shift(9, 17)]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[1, 2, 3]), date()).await.unwrap();

    assert_eq!(
        overlap.slots,
        vec![
            slot(at(0, 0), at(9, 0), 0),
            slot(at(9, 0), at(17, 0), 3),
            slot(at(17, 0), end_of_day(), 0),
        ]
    );
}

#[tokio::test]
async fn member_without_intervals_caps_coverage() {
    // Employee 3 has no data for the date.
    let mut provider = two_person_provider();
    provider.insert(EmployeeId(3), date() + Duration::days(1), vec![]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[1, 2, 3]), date()).await.unwrap();

    assert_eq!(overlap.max_coverage(), 2);
    assert_eq!(overlap.full_coverage().count(), 0);
    assert!(!overlap.is_degraded());
}

#[tokio::test]
async fn intervals_outside_the_day_are_clipped() {
    let late = WorkingInterval::new(at(20, 0), end_of_day() + Duration::hours(3)).unwrap();
    let early = WorkingInterval::new(at(0, 0) - Duration::hours(2), at(2, 0)).unwrap();
    let provider = InMemoryProvider::new().with_intervals(EmployeeId(1), date(), vec![late, early]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[1]), date()).await.unwrap();

    assert_eq!(overlap.slots.first().unwrap().start, at(0, 0));
    assert_eq!(overlap.slots.last().unwrap().end, end_of_day());
    assert_eq!(
        overlap.slots,
        vec![
            slot(at(0, 0), at(2, 0), 1),
            slot(at(2, 0), at(20, 0), 0),
            slot(at(20, 0), end_of_day(), 1),
        ]
    );
}

#[tokio::test]
async fn overlapping_intervals_of_one_member_count_once() {
    let provider =
        InMemoryProvider::new().with_intervals(EmployeeId(1), date(), vec![shift(9, 13), shift(11, 15)]);
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[1]), date()).await.unwrap();

    assert_eq!(overlap.max_coverage(), 1);
    assert_eq!(overlap.slots[1], slot(at(9, 0), at(15, 0), 1));
}

// ── Provider failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_fetch_degrades_coverage_with_warning() {
    let provider = two_person_provider().failing_for(EmployeeId(2));
    let engine = Coordinator::new(provider);

    let overlap = engine.compute_overlap(&roster(&[1, 2]), date()).await.unwrap();

    assert_eq!(overlap.max_coverage(), 1);
    assert!(overlap.is_degraded());
    assert_eq!(overlap.warnings.len(), 1);
    assert_eq!(overlap.warnings[0].employee.0, 2);
    assert_eq!(overlap.warnings[0].date, date());
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_times_out_and_is_treated_as_unavailable() {
    let provider = two_person_provider().with_latency(date(), std::time::Duration::from_secs(5));
    let config = zync_engine::EngineConfig {
        fetch_timeout_ms: Some(100),
        ..Default::default()
    };
    let engine = Coordinator::with_config(provider, config).unwrap();

    let overlap = engine.compute_overlap(&roster(&[1, 2]), date()).await.unwrap();

    assert_eq!(overlap.max_coverage(), 0);
    assert_eq!(overlap.warnings.len(), 2);
    assert!(overlap.warnings[0].message.contains("timed out"));
}

// ── Candidate starts ────────────────────────────────────────────────────────

#[tokio::test]
async fn candidate_starts_are_hourly_inside_full_overlap() {
    let engine = Coordinator::new(two_person_provider());

    let (_, starts) = engine.candidate_starts(&roster(&[1, 2]), date()).await.unwrap();

    assert_eq!(starts, vec![at(14, 0), at(15, 0), at(16, 0)]);
}

#[tokio::test]
async fn candidate_starts_align_to_step_from_midnight() {
    let provider = InMemoryProvider::new().with_intervals(EmployeeId(1),
        date(),
        vec![WorkingInterval::new(at(9, 20), at(11, 0)).unwrap()],
    );
    let engine = Coordinator::new(provider);

    let (overlap, _) = engine.candidate_starts(&roster(&[1]), date()).await.unwrap();
    let starts = zync_engine::candidate_starts(&overlap, Duration::minutes(30)).unwrap();

    assert_eq!(starts, vec![at(9, 30), at(10, 0), at(10, 30)]);
}
