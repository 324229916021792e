//! Read-only analytical views over a [`Dataset`](crate::Dataset).
//!
//! Every query is a pure function of the dataset and its parameters. Sorted
//! results use stable sorts, so ties keep traversal order (station, portion,
//! stage, milestone; all in declaration order).

pub mod critical_path;
pub mod delays;
pub mod milestones;
pub mod status;

pub use critical_path::{CriticalPathItem, critical_path};
pub use delays::{DelayRecord, check_delays, check_delays_str};
pub use milestones::{MilestoneHit, milestones_in_range, milestones_in_range_str};
pub use status::{PortionSummary, StageSnapshot, StationSummary, station_status};

pub(crate) fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}
