use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::dates;

mod loader;

pub use loader::LoadOptions;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    InProgress,
    Planned,
    Delayed,
}

impl StageStatus {
    pub const ALL: [StageStatus; 4] = [
        StageStatus::Completed,
        StageStatus::InProgress,
        StageStatus::Planned,
        StageStatus::Delayed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Completed => "completed",
            StageStatus::InProgress => "in_progress",
            StageStatus::Planned => "planned",
            StageStatus::Delayed => "delayed",
        }
    }
}

impl FromStr for StageStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Completed,
    InProgress,
    Planned,
}

impl MilestoneStatus {
    pub const ALL: [MilestoneStatus; 3] = [
        MilestoneStatus::Completed,
        MilestoneStatus::InProgress,
        MilestoneStatus::Planned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Completed => "completed",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Planned => "planned",
        }
    }
}

impl FromStr for MilestoneStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub name: String,
    pub date: NaiveDate,
    pub status: MilestoneStatus,
}

impl Milestone {
    pub fn new(name: impl Into<String>, date: NaiveDate, status: MilestoneStatus) -> Self {
        Self {
            name: name.into(),
            date,
            status,
        }
    }
}

/// A dated phase of work. `end >= start` holds for every stage inside a
/// [`Dataset`]; the loader rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: StageStatus,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Stage {
    pub fn new(
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        status: StageStatus,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            status,
            milestones: Vec::new(),
        }
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    pub fn duration_days(&self) -> i64 {
        dates::days_between(self.start, self.end)
    }

    pub fn is_completed(&self) -> bool {
        self.status == StageStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portion {
    pub id: String,
    pub stages: Vec<Stage>,
}

impl Portion {
    pub fn new(id: impl Into<String>, stages: Vec<Stage>) -> Self {
        Self {
            id: id.into(),
            stages,
        }
    }

    pub fn completed_stages(&self) -> usize {
        self.stages.iter().filter(|stage| stage.is_completed()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub portions: Vec<Portion>,
}

impl Station {
    pub fn new(name: impl Into<String>, portions: Vec<Portion>) -> Self {
        Self {
            name: name.into(),
            portions,
        }
    }

    pub fn portion(&self, id: &str) -> Option<&Portion> {
        self.portions.iter().find(|portion| portion.id == id)
    }
}

/// A stage together with the station and portion that own it.
#[derive(Debug, Clone, Copy)]
pub struct StageRef<'a> {
    pub station: &'a str,
    pub portion: &'a str,
    pub stage: &'a Stage,
}

/// Validated, read-only snapshot of the roadmap.
///
/// Stations and portions keep declaration order; that order is the
/// traversal order of every query and of the layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    stations: Vec<Station>,
}

impl Dataset {
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|station| station.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Flattened `(station, portion)` pairs in declaration order.
    pub fn all_portions(&self) -> Vec<(&str, &str)> {
        self.stations
            .iter()
            .flat_map(|station| {
                station
                    .portions
                    .iter()
                    .map(move |portion| (station.name.as_str(), portion.id.as_str()))
            })
            .collect()
    }

    /// Every stage in traversal order: station, portion, then stage.
    pub fn stages(&self) -> impl Iterator<Item = StageRef<'_>> {
        self.stations.iter().flat_map(|station| {
            station.portions.iter().flat_map(move |portion| {
                portion.stages.iter().map(move |stage| StageRef {
                    station: &station.name,
                    portion: &portion.id,
                    stage,
                })
            })
        })
    }

    pub fn stage_count(&self) -> usize {
        self.stages().count()
    }

    pub fn milestone_count(&self) -> usize {
        self.stages().map(|entry| entry.stage.milestones.len()).sum()
    }
}
