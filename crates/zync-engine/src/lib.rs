//! # zync-engine
//!
//! Deterministic team availability coordination across timezones.
//!
//! Given a roster and a date, the engine sweeps every member's UTC working
//! intervals to find when the whole team (or as much of it as possible) is
//! available, recommends a meeting time over a multi-day window, validates
//! arbitrary proposed times, and folds a day into a 24-hour chart grid.
//!
//! ## Modules
//!
//! - [`overlap`] — Sweep-line coverage slots for one day
//! - [`recommend`] — Multi-day ranking with deterministic tie-breaks
//! - [`validate`] — Check a proposed instant against every member
//! - [`hourly`] — 24-bucket UTC aggregation for charting
//! - [`engine`] — `Coordinator`: provider fan-out and the public operations
//! - [`provider`] — Availability provider trait and implementations
//! - [`interval`] — Half-open UTC intervals and day helpers
//! - [`roster`] — Employees, ids, and rosters
//! - [`team`] — Persisted team roster cache
//! - [`config`] — Engine configuration
//! - [`error`] — Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod hourly;
pub mod interval;
pub mod overlap;
pub mod provider;
pub mod recommend;
pub mod roster;
pub mod team;
pub mod validate;

pub use config::EngineConfig;
pub use engine::Coordinator;
pub use error::{ProviderError, ZyncError};
pub use hourly::{build_hourly_buckets, HourlyBuckets};
pub use interval::WorkingInterval;
pub use overlap::{candidate_starts, sweep, DayOverlap, OverlapSlot};
pub use provider::{AvailabilityProvider, InMemoryProvider, ProviderWarning, ScheduleProvider};
pub use recommend::{Recommendation, Suggestion};
pub use roster::{Employee, EmployeeId, Roster};
pub use team::RosterCache;
pub use validate::ValidationResult;
