use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Dataset, StageStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPathItem {
    pub station: String,
    pub portion: String,
    pub stage: String,
    pub duration_days: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: StageStatus,
}

/// Every stage ranked by duration, longest first.
///
/// The dataset carries no dependency edges, so this is a duration ranking
/// rather than a precedence-network critical path. Equal durations keep
/// traversal order.
pub fn critical_path(dataset: &Dataset) -> Vec<CriticalPathItem> {
    let mut items: Vec<CriticalPathItem> = dataset
        .stages()
        .map(|entry| CriticalPathItem {
            station: entry.station.to_string(),
            portion: entry.portion.to_string(),
            stage: entry.stage.name.clone(),
            duration_days: entry.stage.duration_days(),
            start: entry.stage.start,
            end: entry.stage.end,
            status: entry.stage.status,
        })
        .collect();

    items.sort_by(|a, b| b.duration_days.cmp(&a.duration_days));
    items
}
