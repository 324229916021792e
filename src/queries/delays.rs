use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{days_between, parse_date};
use crate::error::RoadmapResult;
use crate::model::{Dataset, StageStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayRecord {
    pub station: String,
    pub portion: String,
    pub stage: String,
    pub planned_end: NaiveDate,
    pub current_status: StageStatus,
    pub days_overdue: i64,
}

/// Stages whose planned end is strictly before `reference` and that are not
/// completed, most overdue first.
///
/// The status tag alone does not matter: a `planned` or `in_progress` stage
/// past its end is reported just like a `delayed` one.
pub fn check_delays(dataset: &Dataset, reference: NaiveDate) -> Vec<DelayRecord> {
    let mut delays: Vec<DelayRecord> = dataset
        .stages()
        .filter(|entry| entry.stage.end < reference && !entry.stage.is_completed())
        .map(|entry| DelayRecord {
            station: entry.station.to_string(),
            portion: entry.portion.to_string(),
            stage: entry.stage.name.clone(),
            planned_end: entry.stage.end,
            current_status: entry.stage.status,
            days_overdue: days_between(entry.stage.end, reference),
        })
        .collect();

    delays.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
    delays
}

pub fn check_delays_str(dataset: &Dataset, reference: &str) -> RoadmapResult<Vec<DelayRecord>> {
    Ok(check_delays(dataset, parse_date(reference)?))
}
