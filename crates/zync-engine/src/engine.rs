//! The coordinator: provider fan-out plus the four public operations.
//!
//! Every call fetches what it needs, computes, and returns; nothing is kept between
//! calls. Per-member fetches for a day run as concurrent futures joined before the
//! sweep, and the recommender runs its days concurrently the same way. No task is
//! spawned, so dropping a returned future abandons every fetch still in flight.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{ProviderError, Result, ZyncError};
use crate::hourly::{build_hourly_buckets, HourlyBuckets};
use crate::interval::{date_range, utc_day, WorkingInterval};
use crate::overlap::{self, sweep, DayOverlap};
use crate::provider::{AvailabilityProvider, ProviderWarning};
use crate::recommend::{pick_best, Suggestion};
use crate::roster::{EmployeeId, Roster};
use crate::validate::{self, ValidationResult};

/// Fetched intervals for every roster member, in roster order.
type MemberIntervals = Vec<(EmployeeId, Vec<WorkingInterval>)>;

#[derive(Debug, Clone)]
pub struct Coordinator<P> {
    provider: P,
    config: EngineConfig,
}

impl<P: AvailabilityProvider> Coordinator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: EngineConfig::default(),
        }
    }

    /// # Errors
    /// Returns `ZyncError::InvalidInput` when `config` fails validation.
    pub fn with_config(provider: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sweep the roster's working intervals on `date`.
    ///
    /// Members whose fetch fails count as unavailable all day; the failures are
    /// listed in [`DayOverlap::warnings`].
    #[tracing::instrument(skip_all, fields(date = %date, roster_size = roster.len()))]
    pub async fn compute_overlap(&self, roster: &Roster, date: NaiveDate) -> Result<DayOverlap> {
        let (day_start, day_end) = utc_day(date)?;
        let (members, warnings) = self.fetch_roster(roster, date).await;

        let intervals: Vec<Vec<WorkingInterval>> =
            members.into_iter().map(|(_, intervals)| intervals).collect();
        let slots = sweep(day_start, day_end, &intervals);

        debug!(
            slots = slots.len(),
            degraded = !warnings.is_empty(),
            "computed overlap"
        );

        Ok(DayOverlap {
            date,
            roster_size: roster.len(),
            slots,
            warnings,
        })
    }

    /// Best meeting start over `days_to_check` consecutive dates from `start_date`.
    ///
    /// # Errors
    /// Returns `ZyncError::InvalidInput` when `days_to_check` is 0, above
    /// [`EngineConfig::max_days_to_check`], or the window overflows the calendar.
    #[tracing::instrument(skip_all, fields(start_date = %start_date, days_to_check = days_to_check, roster_size = roster.len()))]
    pub async fn suggest_best_time(
        &self,
        roster: &Roster,
        start_date: NaiveDate,
        days_to_check: u32,
    ) -> Result<Suggestion> {
        let dates = self.search_window(start_date, days_to_check)?;

        let days = join_all(dates.iter().map(|date| self.compute_overlap(roster, *date)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(summarize(days_to_check, days, true))
    }

    /// Like [`suggest_best_time`](Self::suggest_best_time), but stops waiting once
    /// `budget` has elapsed.
    ///
    /// Days finished before the deadline are ranked as usual and the result is
    /// marked incomplete; unfinished fetches are dropped.
    pub async fn suggest_best_time_within(
        &self,
        roster: &Roster,
        start_date: NaiveDate,
        days_to_check: u32,
        budget: std::time::Duration,
    ) -> Result<Suggestion> {
        let dates = self.search_window(start_date, days_to_check)?;
        let deadline = tokio::time::Instant::now() + budget;

        let mut pending: FuturesUnordered<_> = dates
            .iter()
            .map(|date| self.compute_overlap(roster, *date))
            .collect();

        let mut finished = Vec::with_capacity(dates.len());
        let mut complete = true;
        loop {
            match tokio::time::timeout_at(deadline, pending.next()).await {
                Ok(Some(day)) => finished.push(day?),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        evaluated = finished.len(),
                        requested = days_to_check,
                        "time budget exhausted; ranking the days finished so far"
                    );
                    complete = false;
                    break;
                }
            }
        }

        Ok(summarize(days_to_check, finished, complete))
    }

    /// Check whether `proposed` lies inside every member's working hours on its UTC
    /// date.
    pub async fn validate(
        &self,
        roster: &Roster,
        proposed: DateTime<Utc>,
    ) -> Result<ValidationResult> {
        let date = proposed.date_naive();
        utc_day(date)?;
        let (members, warnings) = self.fetch_roster(roster, date).await;
        let result = validate::evaluate(proposed, &members, warnings);
        debug!(
            proposed = %proposed.to_rfc3339(),
            valid = result.valid,
            violators = result.violators.len(),
            "validated meeting time"
        );
        Ok(result)
    }

    /// Overlap of `date` together with its hourly chart buckets.
    pub async fn hourly(&self, roster: &Roster, date: NaiveDate) -> Result<(DayOverlap, HourlyBuckets)> {
        let overlap = self.compute_overlap(roster, date).await?;
        let buckets = build_hourly_buckets(roster, &overlap.slots);
        Ok((overlap, buckets))
    }

    /// Full-roster meeting starts on `date`, spaced by
    /// [`EngineConfig::candidate_step_minutes`].
    pub async fn candidate_starts(
        &self,
        roster: &Roster,
        date: NaiveDate,
    ) -> Result<(DayOverlap, Vec<DateTime<Utc>>)> {
        let overlap = self.compute_overlap(roster, date).await?;
        let starts = overlap::candidate_starts(&overlap, self.config.candidate_step())?;
        Ok((overlap, starts))
    }

    fn search_window(&self, start_date: NaiveDate, days_to_check: u32) -> Result<Vec<NaiveDate>> {
        if days_to_check == 0 {
            return Err(ZyncError::InvalidInput(
                "days_to_check must be at least 1".to_string(),
            ));
        }
        if days_to_check > self.config.max_days_to_check {
            return Err(ZyncError::InvalidInput(format!(
                "days_to_check {} exceeds the maximum of {}",
                days_to_check, self.config.max_days_to_check
            )));
        }
        date_range(start_date, days_to_check)
    }

    async fn fetch_member(
        &self,
        employee: EmployeeId,
        date: NaiveDate,
    ) -> std::result::Result<Vec<WorkingInterval>, ProviderError> {
        let fetch = self.provider.fetch_working_intervals(employee, date);
        match self.config.fetch_timeout() {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| ProviderError::TimedOut(limit.as_millis() as u64))?,
            None => fetch.await,
        }
    }

    /// Fetch every member concurrently; failures become empty interval lists plus a
    /// warning.
    async fn fetch_roster(
        &self,
        roster: &Roster,
        date: NaiveDate,
    ) -> (MemberIntervals, Vec<ProviderWarning>) {
        let fetches = roster.iter().map(|employee| async move {
            (employee, self.fetch_member(employee, date).await)
        });

        let mut members = Vec::with_capacity(roster.len());
        let mut warnings = Vec::new();
        for (employee, fetched) in join_all(fetches).await {
            match fetched {
                Ok(intervals) => members.push((employee, intervals)),
                Err(e) => {
                    warn!(
                        %employee,
                        %date,
                        error = %e,
                        "availability fetch failed; treating employee as unavailable"
                    );
                    warnings.push(ProviderWarning::new(employee, date, &e));
                    members.push((employee, Vec::new()));
                }
            }
        }

        (members, warnings)
    }
}

fn summarize(days_requested: u32, mut days: Vec<DayOverlap>, complete: bool) -> Suggestion {
    days.sort_by_key(|day| day.date);
    let recommendation = pick_best(&days);
    let warnings = days.iter().flat_map(|day| day.warnings.iter().cloned()).collect();

    Suggestion {
        recommendation,
        days_requested,
        days_evaluated: days.len() as u32,
        complete,
        warnings,
    }
}
