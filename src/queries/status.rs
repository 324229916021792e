use chrono::NaiveDate;
use serde::Serialize;

use super::percentage;
use crate::error::{RoadmapError, RoadmapResult};
use crate::model::{Dataset, Portion, Stage, StageStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub name: String,
    pub status: StageStatus,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<&Stage> for StageSnapshot {
    fn from(stage: &Stage) -> Self {
        Self {
            name: stage.name.clone(),
            status: stage.status,
            start: stage.start,
            end: stage.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortionSummary {
    pub portion: String,
    pub stages: Vec<StageSnapshot>,
    /// Completed stages over all stages of the portion, as a percentage.
    pub progress: f64,
}

impl From<&Portion> for PortionSummary {
    fn from(portion: &Portion) -> Self {
        Self {
            portion: portion.id.clone(),
            stages: portion.stages.iter().map(StageSnapshot::from).collect(),
            progress: percentage(portion.completed_stages(), portion.stages.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub station: String,
    pub portions: Vec<PortionSummary>,
    pub total_stages: usize,
    pub completed_stages: usize,
    /// Stage-weighted: every stage of the station counts once, regardless
    /// of which portion owns it.
    pub overall_progress: f64,
}

impl StationSummary {
    pub fn portion(&self, id: &str) -> Option<&PortionSummary> {
        self.portions.iter().find(|summary| summary.portion == id)
    }
}

pub fn station_status(dataset: &Dataset, station: &str) -> RoadmapResult<StationSummary> {
    let found = dataset
        .station(station)
        .ok_or_else(|| RoadmapError::not_found(station))?;

    let portions: Vec<PortionSummary> = found.portions.iter().map(PortionSummary::from).collect();
    let total_stages = found.portions.iter().map(|p| p.stages.len()).sum();
    let completed_stages = found.portions.iter().map(Portion::completed_stages).sum();

    Ok(StationSummary {
        station: found.name.clone(),
        portions,
        total_stages,
        completed_stages,
        overall_progress: percentage(completed_stages, total_stages),
    })
}
