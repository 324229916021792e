//! Render-agnostic Gantt layout.
//!
//! [`TimelineLayoutBuilder`] turns a [`Dataset`](crate::Dataset) into rows,
//! bars, markers, a time span and a legend. Nothing here draws; any backend
//! (SVG, canvas, plotting library) consumes a [`TimelineLayout`].

mod builder;
mod config;

pub use builder::{TimelineLayoutBuilder, build_layout};
pub use config::{GeometryConfig, LayoutConfig, Palette};

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{add_days, days_between};
use crate::model::{MilestoneStatus, StageStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    StationHeader,
    Portion,
}

/// One labelled vertical slot. `index` counts labels top to bottom;
/// `position` is the vertical coordinate including station gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutRow {
    pub index: usize,
    pub position: f64,
    pub kind: RowKind,
    pub station: String,
    pub portion: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBar {
    pub row: usize,
    pub position: f64,
    pub station: String,
    pub portion: String,
    pub stage: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: StageStatus,
    pub color: String,
    pub hover_text: String,
    /// Stage labels on this bar read better in a light color.
    pub light_text: bool,
}

impl LayoutBar {
    /// Anchor for the stage label, rounded down to whole days.
    pub fn midpoint(&self) -> NaiveDate {
        add_days(self.start, days_between(self.start, self.end) / 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMarker {
    pub row: usize,
    pub position: f64,
    pub station: String,
    pub portion: String,
    pub stage: String,
    pub label: String,
    pub date: NaiveDate,
    pub status: MilestoneStatus,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NowMarker {
    pub date: NaiveDate,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    fn include(self, date: NaiveDate) -> Self {
        Self {
            start: self.start.min(date),
            end: self.end.max(date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum LegendKind {
    Status(StageStatus),
    Milestones,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    #[serde(flatten)]
    pub kind: LegendKind,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartGeometry {
    pub width: u32,
    pub height: u32,
}

/// Everything a render adapter needs to draw the roadmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub rows: Vec<LayoutRow>,
    pub bars: Vec<LayoutBar>,
    pub markers: Vec<LayoutMarker>,
    /// `None` when the dataset holds no stages.
    pub span: Option<TimeSpan>,
    pub legend: Vec<LegendEntry>,
    pub now_marker: Option<NowMarker>,
    /// Vertical coordinate after the last station, gaps included.
    pub extent: f64,
    pub bar_height: f64,
    pub geometry: ChartGeometry,
}

impl TimelineLayout {
    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }

    pub fn bars_on_row(&self, row: usize) -> impl Iterator<Item = &LayoutBar> {
        self.bars.iter().filter(move |bar| bar.row == row)
    }

    pub fn markers_on_row(&self, row: usize) -> impl Iterator<Item = &LayoutMarker> {
        self.markers.iter().filter(move |marker| marker.row == row)
    }
}
