use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::error::RoadmapResult;
use crate::model::{Dataset, MilestoneStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneHit {
    pub station: String,
    pub portion: String,
    pub stage: String,
    pub milestone: String,
    pub date: NaiveDate,
    pub status: MilestoneStatus,
}

/// Milestones dated within `[start, end]`, both ends inclusive, ascending by
/// date. An inverted range matches nothing.
pub fn milestones_in_range(
    dataset: &Dataset,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<MilestoneHit> {
    let mut hits: Vec<MilestoneHit> = dataset
        .stages()
        .flat_map(|entry| {
            entry
                .stage
                .milestones
                .iter()
                .filter(move |milestone| start <= milestone.date && milestone.date <= end)
                .map(move |milestone| MilestoneHit {
                    station: entry.station.to_string(),
                    portion: entry.portion.to_string(),
                    stage: entry.stage.name.clone(),
                    milestone: milestone.name.clone(),
                    date: milestone.date,
                    status: milestone.status,
                })
        })
        .collect();

    hits.sort_by_key(|hit| hit.date);
    hits
}

pub fn milestones_in_range_str(
    dataset: &Dataset,
    start: &str,
    end: &str,
) -> RoadmapResult<Vec<MilestoneHit>> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Ok(milestones_in_range(dataset, start, end))
}
