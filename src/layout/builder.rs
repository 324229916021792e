use chrono::NaiveDate;
use log::debug;

use super::{
    ChartGeometry, LayoutBar, LayoutConfig, LayoutMarker, LayoutRow, LegendEntry, LegendKind,
    NowMarker, RowKind, TimeSpan, TimelineLayout,
};
use crate::dates::format_date;
use crate::model::{Dataset, Milestone, Stage, StageStatus};

pub struct TimelineLayoutBuilder<'a> {
    dataset: &'a Dataset,
    config: &'a LayoutConfig,
}

impl<'a> TimelineLayoutBuilder<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a LayoutConfig) -> Self {
        Self { dataset, config }
    }

    /// Lay the dataset out. `now` only decides whether a now marker is
    /// emitted; it never comes from the system clock here.
    pub fn execute(&self, now: NaiveDate) -> TimelineLayout {
        let mut rows = Vec::new();
        let mut bars = Vec::new();
        let mut markers = Vec::new();
        let mut position = 0.0_f64;

        for station in self.dataset.stations() {
            rows.push(LayoutRow {
                index: rows.len(),
                position,
                kind: RowKind::StationHeader,
                station: station.name.clone(),
                portion: None,
                label: format!("[{}]", station.name),
            });
            position += 1.0;

            for portion in &station.portions {
                let row = rows.len();
                rows.push(LayoutRow {
                    index: row,
                    position,
                    kind: RowKind::Portion,
                    station: station.name.clone(),
                    portion: Some(portion.id.clone()),
                    label: format!("  {}", portion.id),
                });

                for stage in &portion.stages {
                    bars.push(LayoutBar {
                        row,
                        position,
                        station: station.name.clone(),
                        portion: portion.id.clone(),
                        stage: stage.name.clone(),
                        start: stage.start,
                        end: stage.end,
                        status: stage.status,
                        color: self.config.palette.color(stage.status).to_string(),
                        hover_text: bar_hover_text(&station.name, &portion.id, stage),
                        light_text: matches!(
                            stage.status,
                            StageStatus::Completed | StageStatus::InProgress
                        ),
                    });

                    for milestone in &stage.milestones {
                        markers.push(LayoutMarker {
                            row,
                            position,
                            station: station.name.clone(),
                            portion: portion.id.clone(),
                            stage: stage.name.clone(),
                            label: milestone.name.clone(),
                            date: milestone.date,
                            status: milestone.status,
                            hover_text: marker_hover_text(&portion.id, stage, milestone),
                        });
                    }
                }
                position += 1.0;
            }

            position += self.config.station_gap;
        }

        let span = time_span(&bars);
        let now_marker = span.filter(|span| span.contains(now)).map(|_| NowMarker {
            date: now,
            label: self.config.now_label.clone(),
            color: self.config.palette.now_line.clone(),
        });
        let legend = self.legend(&bars);
        let geometry = self.geometry(rows.len());

        debug!(
            "layout: {} rows, {} bars, {} markers, extent {}",
            rows.len(),
            bars.len(),
            markers.len(),
            position
        );

        TimelineLayout {
            rows,
            bars,
            markers,
            span,
            legend,
            now_marker,
            extent: position,
            bar_height: self.config.bar_height,
            geometry,
        }
    }

    fn legend(&self, bars: &[LayoutBar]) -> Vec<LegendEntry> {
        let mut seen: Vec<StageStatus> = Vec::new();
        for bar in bars {
            if !seen.contains(&bar.status) {
                seen.push(bar.status);
            }
        }

        let mut legend: Vec<LegendEntry> = seen
            .into_iter()
            .map(|status| LegendEntry {
                kind: LegendKind::Status(status),
                label: status.as_str().to_string(),
                color: self.config.palette.color(status).to_string(),
            })
            .collect();
        legend.push(LegendEntry {
            kind: LegendKind::Milestones,
            label: self.config.milestone_label.clone(),
            color: self.config.palette.milestone.clone(),
        });
        legend
    }

    fn geometry(&self, row_count: usize) -> ChartGeometry {
        let geometry = &self.config.geometry;
        let rows = u32::try_from(row_count).unwrap_or(u32::MAX);
        let height = rows
            .saturating_mul(geometry.row_height)
            .saturating_add(geometry.padding)
            .max(geometry.min_height);
        ChartGeometry {
            width: geometry.width,
            height,
        }
    }
}

pub fn build_layout(dataset: &Dataset, config: &LayoutConfig, now: NaiveDate) -> TimelineLayout {
    TimelineLayoutBuilder::new(dataset, config).execute(now)
}

fn time_span(bars: &[LayoutBar]) -> Option<TimeSpan> {
    bars.iter().fold(None, |span: Option<TimeSpan>, bar| {
        let span = match span {
            Some(span) => span.include(bar.start),
            None => TimeSpan {
                start: bar.start,
                end: bar.start,
            },
        };
        Some(span.include(bar.end))
    })
}

fn bar_hover_text(station: &str, portion: &str, stage: &Stage) -> String {
    format!(
        "{}\nPortion: {}\nStation: {}\nStatus: {}\nStart: {}\nEnd: {}\nDuration: {} days",
        stage.name,
        portion,
        station,
        stage.status,
        format_date(stage.start),
        format_date(stage.end),
        stage.duration_days()
    )
}

fn marker_hover_text(portion: &str, stage: &Stage, milestone: &Milestone) -> String {
    format!(
        "{}\nDate: {}\nStatus: {}\nStage: {}\nPortion: {}",
        milestone.name,
        format_date(milestone.date),
        milestone.status,
        stage.name,
        portion
    )
}
