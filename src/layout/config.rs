use serde::{Deserialize, Serialize};

use crate::model::StageStatus;

/// Closed status → display color table.
///
/// Any status string outside the four known values resolves to the
/// `planned` color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub completed: String,
    pub in_progress: String,
    pub planned: String,
    pub delayed: String,
    pub milestone: String,
    pub now_line: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            completed: "#2ecc71".to_string(),
            in_progress: "#3498db".to_string(),
            planned: "#95a5a6".to_string(),
            delayed: "#e74c3c".to_string(),
            milestone: "red".to_string(),
            now_line: "red".to_string(),
        }
    }
}

impl Palette {
    pub fn color(&self, status: StageStatus) -> &str {
        match status {
            StageStatus::Completed => &self.completed,
            StageStatus::InProgress => &self.in_progress,
            StageStatus::Planned => &self.planned,
            StageStatus::Delayed => &self.delayed,
        }
    }

    /// Color for a raw status string, falling back to the neutral color.
    pub fn resolve(&self, status: &str) -> &str {
        status
            .parse::<StageStatus>()
            .map(|known| self.color(known))
            .unwrap_or(self.planned.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub width: u32,
    pub min_height: u32,
    pub row_height: u32,
    pub padding: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            min_height: 600,
            row_height: 50,
            padding: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Extra vertical space added after the last portion of each station.
    pub station_gap: f64,
    /// Bar thickness in row units; several stages share one row.
    pub bar_height: f64,
    pub palette: Palette,
    pub now_label: String,
    pub milestone_label: String,
    pub geometry: GeometryConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            station_gap: 0.5,
            bar_height: 0.3,
            palette: Palette::default(),
            now_label: "TODAY".to_string(),
            milestone_label: "Milestones".to_string(),
            geometry: GeometryConfig::default(),
        }
    }
}
