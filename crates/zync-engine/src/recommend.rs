//! Pick one meeting time out of several days of overlap.
//!
//! Ranking is by coverage first, then earliest date, then earliest start within the
//! date. Full-roster coverage therefore always beats partial coverage, whatever day
//! it falls on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::overlap::DayOverlap;
use crate::provider::ProviderWarning;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Suggested meeting start.
    pub at: DateTime<Utc>,
    /// End of the slot the suggestion was taken from.
    pub until: DateTime<Utc>,
    pub date: NaiveDate,
    pub coverage: usize,
    pub roster_size: usize,
}

impl Recommendation {
    pub fn is_full_coverage(&self) -> bool {
        self.coverage == self.roster_size
    }
}

/// Outcome of a multi-day search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// `None` when no day in the window has a usable overlap.
    pub recommendation: Option<Recommendation>,
    pub days_requested: u32,
    pub days_evaluated: u32,
    /// `false` when a time budget cut the search short.
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ProviderWarning>,
}

/// Best slot across `days`, or `None` when nobody works at any point of the window.
///
/// Partial coverage still yields a recommendation, so a member lost to a provider
/// failure lowers the result instead of erasing it.
///
/// `days` may arrive in any order; they are ranked by date before selection so the
/// result only depends on their content.
pub fn pick_best(days: &[DayOverlap]) -> Option<Recommendation> {
    let mut ordered: Vec<&DayOverlap> = days.iter().collect();
    ordered.sort_by_key(|day| day.date);

    let mut best: Option<Recommendation> = None;
    for day in ordered {
        for slot in &day.slots {
            // Strictly greater keeps the earliest of equally covered slots.
            if best.as_ref().is_some_and(|b| slot.coverage <= b.coverage) {
                continue;
            }
            best = Some(Recommendation {
                at: slot.start,
                until: slot.end,
                date: day.date,
                coverage: slot.coverage,
                roster_size: day.roster_size,
            });
        }
    }

    best.filter(|b| b.coverage > 0)
}
