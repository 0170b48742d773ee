//! Check a proposed meeting instant against every roster member's working hours.
//!
//! Validation looks at the raw intervals of each member rather than at overlap
//! slots, so any externally chosen time can be checked, including ones no
//! recommendation ever produced.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::WorkingInterval;
use crate::provider::ProviderWarning;
use crate::roster::EmployeeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub proposed: DateTime<Utc>,
    pub valid: bool,
    /// Members not working at `proposed`, in ascending id order.
    pub violators: BTreeSet<EmployeeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProviderWarning>,
}

/// `true` when `at` lies inside one of `intervals` (start inclusive, end exclusive).
pub fn is_working_at(intervals: &[WorkingInterval], at: DateTime<Utc>) -> bool {
    intervals.iter().any(|interval| interval.contains(at))
}

/// Build the result from already fetched intervals, one entry per roster member.
pub fn evaluate(
    proposed: DateTime<Utc>,
    members: &[(EmployeeId, Vec<WorkingInterval>)],
    warnings: Vec<ProviderWarning>,
) -> ValidationResult {
    let violators: BTreeSet<EmployeeId> = members
        .iter()
        .filter(|(_, intervals)| !is_working_at(intervals, proposed))
        .map(|(id, _)| *id)
        .collect();

    ValidationResult {
        proposed,
        valid: violators.is_empty(),
        violators,
        warnings,
    }
}
