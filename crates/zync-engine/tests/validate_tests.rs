//! Tests for meeting time validation.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use zync_engine::{Coordinator, EmployeeId, InMemoryProvider, Roster, WorkingInterval};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
}

fn shift(sh: u32, eh: u32) -> Vec<WorkingInterval> {
    vec![WorkingInterval::new(at(sh, 0), at(eh, 0)).unwrap()]
}

fn team() -> Roster {
    Roster::try_from(vec![1, 2]).unwrap()
}

/// A works 09-17, B works 14-22.
fn engine() -> Coordinator<InMemoryProvider> {
    Coordinator::new(
        InMemoryProvider::new()
            .with_intervals(EmployeeId(1), date(), shift(9, 17))
            .with_intervals(EmployeeId(2), date(), shift(14, 22)),
    )
}

#[tokio::test]
async fn time_inside_everyone_s_hours_is_valid() {
    let result = engine().validate(&team(), at(16, 0)).await.unwrap();

    assert!(result.valid);
    assert!(result.violators.is_empty());
    assert_eq!(result.proposed, at(16, 0));
}

#[tokio::test]
async fn time_before_anyone_starts_lists_every_violator() {
    let result = engine().validate(&team(), at(8, 0)).await.unwrap();

    assert!(!result.valid);
    assert_eq!(
        result.violators.into_iter().collect::<Vec<_>>(),
        vec![EmployeeId(1), EmployeeId(2)]
    );
}

#[tokio::test]
async fn only_members_outside_their_hours_are_violators() {
    let result = engine().validate(&team(), at(10, 30)).await.unwrap();

    assert!(!result.valid);
    assert_eq!(result.violators.len(), 1);
    assert!(result.violators.contains(&EmployeeId(2)));
}

#[tokio::test]
async fn shift_start_is_inside_and_shift_end_is_outside() {
    let engine = engine();

    let at_start = engine.validate(&team(), at(14, 0)).await.unwrap();
    let at_end = engine.validate(&team(), at(17, 0)).await.unwrap();

    assert!(at_start.valid);
    assert!(!at_end.valid);
    assert!(at_end.violators.contains(&EmployeeId(1)));
}

#[tokio::test]
async fn split_shift_validates_in_either_piece() {
    let provider = InMemoryProvider::new().with_intervals(
        EmployeeId(5),
        date(),
        vec![
            WorkingInterval::new(at(6, 0), at(10, 0)).unwrap(),
            WorkingInterval::new(at(15, 0), at(19, 0)).unwrap(),
        ],
    );
    let engine = Coordinator::new(provider);
    let solo = Roster::try_from(vec![5]).unwrap();

    assert!(engine.validate(&solo, at(7, 0)).await.unwrap().valid);
    assert!(!engine.validate(&solo, at(12, 0)).await.unwrap().valid);
    assert!(engine.validate(&solo, at(18, 59)).await.unwrap().valid);
}

#[tokio::test]
async fn unreachable_member_is_a_violator_with_warning() {
    let provider = InMemoryProvider::new()
        .with_intervals(EmployeeId(1), date(), shift(9, 17))
        .failing_for(EmployeeId(2));
    let engine = Coordinator::new(provider);

    let result = engine.validate(&team(), at(12, 0)).await.unwrap();

    assert!(!result.valid);
    assert!(result.violators.contains(&EmployeeId(2)));
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].employee, EmployeeId(2));
}

#[tokio::test]
async fn every_instant_in_full_coverage_slot_validates() {
    let engine = engine();
    let overlap = engine.compute_overlap(&team(), date()).await.unwrap();

    for slot in overlap.full_coverage() {
        let mut t = slot.start;
        while t < slot.end {
            let result = engine.validate(&team(), t).await.unwrap();
            assert!(result.valid, "{} should be valid", t);
            t += chrono::Duration::minutes(15);
        }
    }
}
