//! Employee availability providers.
//!
//! The engine never derives working hours itself: it asks an
//! [`AvailabilityProvider`] for each member's UTC working intervals on a date.
//! Two implementations ship with the crate:
//!
//! - [`ScheduleProvider`] — materializes intervals from each [`Employee`]'s
//!   timezone and local working-hour rule via `chrono-tz`.
//! - [`InMemoryProvider`] — serves precomputed intervals; it can also simulate
//!   latency and per-employee outages.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::interval::{normalize, utc_day, WorkingInterval};
use crate::roster::{Employee, EmployeeId};

/// Source of per-employee working intervals.
///
/// Implementations should return intervals for `date` expressed in UTC; the engine
/// clips anything outside `[00:00, 24:00)` of that date. An empty vector means the
/// employee does not work that day.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn fetch_working_intervals(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<WorkingInterval>, ProviderError>;
}

#[async_trait]
impl<P> AvailabilityProvider for Arc<P>
where
    P: AvailabilityProvider + ?Sized,
{
    async fn fetch_working_intervals(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<WorkingInterval>, ProviderError> {
        (**self).fetch_working_intervals(employee, date).await
    }
}

/// A fetch that failed and was downgraded to "unavailable all day".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderWarning {
    pub employee: EmployeeId,
    pub date: NaiveDate,
    pub message: String,
}

impl ProviderWarning {
    pub fn new(employee: EmployeeId, date: NaiveDate, error: &ProviderError) -> Self {
        Self {
            employee,
            date,
            message: error.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Timezone-rule provider
// ---------------------------------------------------------------------------

/// Derives working intervals from each employee's timezone and local hours.
#[derive(Debug, Clone, Default)]
pub struct ScheduleProvider {
    employees: HashMap<EmployeeId, Employee>,
}

impl ScheduleProvider {
    /// # Errors
    /// Returns `ZyncError::InvalidInput` when an employee's timezone is unknown or
    /// their working day has zero length.
    pub fn new<I>(employees: I) -> crate::error::Result<Self>
    where
        I: IntoIterator<Item = Employee>,
    {
        let employees = employees
            .into_iter()
            .map(|e| e.validate().map(|_| (e.id, e)))
            .collect::<crate::error::Result<_>>()?;
        Ok(Self { employees })
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }
}

#[async_trait]
impl AvailabilityProvider for ScheduleProvider {
    async fn fetch_working_intervals(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<WorkingInterval>, ProviderError> {
        let record = self
            .employees
            .get(&employee)
            .ok_or(ProviderError::UnknownEmployee(employee))?;
        shifts_on(record, date)
    }
}

/// The parts of `employee`'s local shifts that fall on UTC `date`.
///
/// A UTC day can intersect shifts that started on the previous, same, or next
/// local day depending on the zone's offset, so all three are materialized before
/// clipping.
///
/// # Errors
/// Returns `ProviderError::InvalidRule` when the employee's rule does not pass
/// [`Employee::validate`].
pub fn shifts_on(
    employee: &Employee,
    date: NaiveDate,
) -> Result<Vec<WorkingInterval>, ProviderError> {
    let tz: Tz = employee
        .validate()
        .map_err(|e| ProviderError::InvalidRule(e.to_string()))?;
    let (day_start, day_end) =
        utc_day(date).map_err(|e| ProviderError::Unavailable(e.to_string()))?;

    let local_days = [date.pred_opt(), Some(date), date.succ_opt()];
    let mut shifts = Vec::with_capacity(local_days.len());

    for local_day in local_days.into_iter().flatten() {
        if !employee.works_on(local_day.weekday()) {
            continue;
        }
        let start_local = local_day.and_time(employee.work_start);
        let end_local = if employee.work_end > employee.work_start {
            local_day.and_time(employee.work_end)
        } else {
            match local_day.succ_opt() {
                Some(next) => next.and_time(employee.work_end),
                None => continue,
            }
        };

        let start = resolve_local(tz, start_local);
        let end = resolve_local(tz, end_local);
        if start < end {
            shifts.push(WorkingInterval { start, end });
        }
    }

    Ok(normalize(&shifts, day_start, day_end))
}

/// Map a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// spring-forward gap keep the offset in effect before the gap, which lands them
/// past the gap by its length.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before = tz
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix()
                .local_minus_utc();
            Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(before))))
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory provider
// ---------------------------------------------------------------------------

/// Serves fixed intervals keyed by (employee, date).
///
/// Employees with no entry for a date are unavailable that day.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    intervals: HashMap<(EmployeeId, NaiveDate), Vec<WorkingInterval>>,
    failing: HashSet<EmployeeId>,
    latency: HashMap<NaiveDate, std::time::Duration>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intervals(
        mut self,
        employee: EmployeeId,
        date: NaiveDate,
        intervals: Vec<WorkingInterval>,
    ) -> Self {
        self.insert(employee, date, intervals);
        self
    }

    pub fn insert(&mut self, employee: EmployeeId, date: NaiveDate, intervals: Vec<WorkingInterval>) {
        self.intervals
            .entry((employee, date))
            .or_default()
            .extend(intervals);
    }

    /// Every fetch for `employee` fails with `ProviderError::Unavailable`.
    pub fn failing_for(mut self, employee: EmployeeId) -> Self {
        self.failing.insert(employee);
        self
    }

    /// Delay every fetch for `date` by `latency`.
    pub fn with_latency(mut self, date: NaiveDate, latency: std::time::Duration) -> Self {
        self.latency.insert(date, latency);
        self
    }
}

#[async_trait]
impl AvailabilityProvider for InMemoryProvider {
    async fn fetch_working_intervals(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> Result<Vec<WorkingInterval>, ProviderError> {
        if let Some(latency) = self.latency.get(&date) {
            tokio::time::sleep(*latency).await;
        }
        if self.failing.contains(&employee) {
            return Err(ProviderError::Unavailable(format!(
                "no data source for employee {}",
                employee
            )));
        }
        Ok(self
            .intervals
            .get(&(employee, date))
            .cloned()
            .unwrap_or_default())
    }
}
