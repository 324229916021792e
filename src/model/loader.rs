use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{Dataset, Milestone, MilestoneStatus, Portion, Stage, StageStatus, Station};
use crate::dates::parse_date;
use crate::error::{RoadmapError, RoadmapResult};

/// Controls which top-level entries of the raw input count as stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Top-level keys starting with this marker (e.g. `$schema`) are never stations.
    pub reserved_prefix: String,
    /// Reject top-level values that are not objects instead of skipping them.
    pub strict_top_level: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            reserved_prefix: "$".to_string(),
            strict_top_level: false,
        }
    }
}

impl LoadOptions {
    fn is_reserved(&self, key: &str) -> bool {
        !self.reserved_prefix.is_empty() && key.starts_with(&self.reserved_prefix)
    }
}

#[derive(Deserialize)]
struct RawStage {
    name: String,
    start: String,
    end: String,
    status: String,
    #[serde(default)]
    milestones: Vec<RawMilestone>,
}

#[derive(Deserialize)]
struct RawMilestone {
    name: String,
    date: String,
    status: String,
}

impl Dataset {
    /// Build a dataset from parsed JSON using the default [`LoadOptions`].
    pub fn from_value(raw: &Value) -> RoadmapResult<Self> {
        Self::from_value_with(raw, &LoadOptions::default())
    }

    pub fn from_value_with(raw: &Value, options: &LoadOptions) -> RoadmapResult<Self> {
        let root = raw
            .as_object()
            .ok_or_else(|| RoadmapError::malformed("$", "expected an object of stations"))?;

        let mut stations = Vec::with_capacity(root.len());
        for (key, value) in root {
            if options.is_reserved(key) {
                debug!("skipping reserved top-level key '{key}'");
                continue;
            }
            let Some(portions) = value.as_object() else {
                if options.strict_top_level {
                    return Err(RoadmapError::malformed(
                        key.as_str(),
                        "station value must be an object of portions",
                    ));
                }
                warn!("skipping top-level key '{key}': value is not a station object");
                continue;
            };
            stations.push(load_station(key, portions)?);
        }

        debug!(
            "loaded {} stations ({} portions)",
            stations.len(),
            stations.iter().map(|s| s.portions.len()).sum::<usize>()
        );
        Ok(Self { stations })
    }

    /// Build a dataset from already-typed stations, applying the same
    /// validation as the JSON loader.
    pub fn from_stations(stations: Vec<Station>) -> RoadmapResult<Self> {
        let mut names = HashSet::with_capacity(stations.len());
        for station in &stations {
            if !names.insert(station.name.as_str()) {
                return Err(RoadmapError::malformed(
                    station.name.as_str(),
                    "duplicate station name",
                ));
            }
            let mut portion_ids = HashSet::with_capacity(station.portions.len());
            for portion in &station.portions {
                if !portion_ids.insert(portion.id.as_str()) {
                    return Err(RoadmapError::malformed(
                        format!("{}/{}", station.name, portion.id),
                        "duplicate portion id",
                    ));
                }
                for (idx, stage) in portion.stages.iter().enumerate() {
                    validate_stage(
                        stage,
                        &format!("{}/{}/stages[{idx}]", station.name, portion.id),
                    )?;
                }
            }
        }
        Ok(Self { stations })
    }
}

fn load_station(name: &str, portions: &Map<String, Value>) -> RoadmapResult<Station> {
    let mut loaded = Vec::with_capacity(portions.len());
    for (portion_id, value) in portions {
        let location = format!("{name}/{portion_id}");
        let stages = value
            .as_object()
            .ok_or_else(|| RoadmapError::malformed(location.as_str(), "portion must be an object"))?
            .get("stages")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RoadmapError::malformed(location.as_str(), "portion requires a 'stages' array")
            })?;

        let mut parsed = Vec::with_capacity(stages.len());
        for (idx, raw) in stages.iter().enumerate() {
            parsed.push(load_stage(raw, &format!("{location}/stages[{idx}]"))?);
        }
        loaded.push(Portion::new(portion_id.as_str(), parsed));
    }
    Ok(Station::new(name, loaded))
}

fn load_stage(raw: &Value, location: &str) -> RoadmapResult<Stage> {
    let raw = RawStage::deserialize(raw)
        .map_err(|err| RoadmapError::malformed(location, err.to_string()))?;

    let status = raw.status.parse::<StageStatus>().map_err(|err| {
        RoadmapError::malformed(location, format!("{err} for stage"))
    })?;
    let mut stage = Stage::new(
        raw.name,
        field_date(&raw.start, location, "start")?,
        field_date(&raw.end, location, "end")?,
        status,
    );

    for (idx, milestone) in raw.milestones.into_iter().enumerate() {
        let location = format!("{location}/milestones[{idx}]");
        let status = milestone
            .status
            .parse::<MilestoneStatus>()
            .map_err(|err| {
                RoadmapError::malformed(location.as_str(), format!("{err} for milestone"))
            })?;
        let date = field_date(&milestone.date, &location, "date")?;
        stage.milestones.push(Milestone::new(milestone.name, date, status));
    }

    validate_stage(&stage, location)?;
    Ok(stage)
}

fn field_date(value: &str, location: &str, field: &str) -> RoadmapResult<chrono::NaiveDate> {
    parse_date(value).map_err(|_| {
        RoadmapError::malformed(location, format!("invalid {field} date '{value}'"))
    })
}

fn validate_stage(stage: &Stage, location: &str) -> RoadmapResult<()> {
    if stage.end < stage.start {
        return Err(RoadmapError::malformed(
            location,
            format!(
                "stage '{}' ends ({}) before it starts ({})",
                stage.name, stage.end, stage.start
            ),
        ));
    }
    for milestone in &stage.milestones {
        if milestone.date < stage.start || milestone.date > stage.end {
            debug!(
                "{location}: milestone '{}' ({}) lies outside stage '{}'",
                milestone.name, milestone.date, stage.name
            );
        }
    }
    Ok(())
}
