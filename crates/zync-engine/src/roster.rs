//! Employees and the roster a computation runs over.
//!
//! A [`Roster`] is always non-empty, duplicate-free, and stored sorted, so every
//! operation that walks it produces the same output regardless of the order the
//! caller listed the members in.

use std::fmt;

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZyncError};

/// Unique employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team member and the rule their working hours are derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// IANA timezone name (e.g., "Asia/Kolkata").
    pub timezone: String,
    /// Local start of the working day.
    #[serde(with = "hhmm")]
    pub work_start: NaiveTime,
    /// Local end of the working day. A value at or before `work_start` means the
    /// shift runs past local midnight.
    #[serde(with = "hhmm")]
    pub work_end: NaiveTime,
    /// Local weekdays on which a shift starts.
    #[serde(default = "every_day")]
    pub working_days: Vec<Weekday>,
}

impl Employee {
    /// Parse and check the timezone and working-hour rule.
    ///
    /// # Errors
    /// Returns `ZyncError::InvalidInput` for an unknown IANA zone or a zero-length
    /// working day.
    pub fn validate(&self) -> Result<Tz> {
        let tz: Tz = self.timezone.parse().map_err(|_| {
            ZyncError::InvalidInput(format!(
                "employee {}: unknown timezone '{}'",
                self.id, self.timezone
            ))
        })?;
        if self.work_start == self.work_end {
            return Err(ZyncError::InvalidInput(format!(
                "employee {}: work_start and work_end are both {}",
                self.id,
                self.work_start.format("%H:%M")
            )));
        }
        Ok(tz)
    }

    pub fn works_on(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }
}

/// Default working days when none are given.
pub fn every_day() -> Vec<Weekday> {
    vec![
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
}

/// Parse a `HH:MM` (or `HH:MM:SS`) time of day.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| ZyncError::InvalidInput(format!("invalid time of day '{}': {}", s, e)))
}

/// `HH:MM` serde representation for [`NaiveTime`].
mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(de::Error::custom)
    }
}

/// The fixed set of employees one request coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<EmployeeId>,
}

impl Roster {
    /// Build a roster from any ordering of ids.
    ///
    /// # Errors
    /// Returns `ZyncError::InvalidInput` when `ids` is empty or contains a duplicate.
    pub fn new<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = EmployeeId>,
    {
        let mut members: Vec<EmployeeId> = ids.into_iter().collect();
        if members.is_empty() {
            return Err(ZyncError::InvalidInput("roster is empty".to_string()));
        }
        members.sort_unstable();
        if let Some(pair) = members.windows(2).find(|w| w[0] == w[1]) {
            return Err(ZyncError::InvalidInput(format!(
                "duplicate employee {} in roster",
                pair[0]
            )));
        }
        Ok(Self { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; a roster cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.members.binary_search(&id).is_ok()
    }

    /// Members in ascending id order.
    pub fn members(&self) -> &[EmployeeId] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = EmployeeId> + '_ {
        self.members.iter().copied()
    }
}

impl TryFrom<Vec<i64>> for Roster {
    type Error = ZyncError;

    fn try_from(ids: Vec<i64>) -> Result<Self> {
        Roster::new(ids.into_iter().map(EmployeeId))
    }
}
