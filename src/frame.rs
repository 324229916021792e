//! Tabular views of query results.
//!
//! Each record list converts into a polars `DataFrame` with dates stored as
//! `Date` columns, and any frame renders as a boxed plain-text table.

use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

use crate::queries::{CriticalPathItem, DelayRecord, MilestoneHit, StationSummary};

// 1970-01-01 counted from 0001-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub fn milestone_hits_frame(hits: &[MilestoneHit]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        date_column("date", hits.iter().map(|h| h.date))?,
        str_column("milestone", hits.iter().map(|h| h.milestone.as_str())),
        str_column("station", hits.iter().map(|h| h.station.as_str())),
        str_column("portion", hits.iter().map(|h| h.portion.as_str())),
        str_column("stage", hits.iter().map(|h| h.stage.as_str())),
        str_column("status", hits.iter().map(|h| h.status.as_str())),
    ])
}

pub fn delays_frame(delays: &[DelayRecord]) -> PolarsResult<DataFrame> {
    let overdue: Vec<i64> = delays.iter().map(|d| d.days_overdue).collect();
    DataFrame::new(vec![
        str_column("station", delays.iter().map(|d| d.station.as_str())),
        str_column("portion", delays.iter().map(|d| d.portion.as_str())),
        str_column("stage", delays.iter().map(|d| d.stage.as_str())),
        date_column("planned_end", delays.iter().map(|d| d.planned_end))?,
        str_column(
            "current_status",
            delays.iter().map(|d| d.current_status.as_str()),
        ),
        Series::new(PlSmallStr::from_static("days_overdue"), overdue).into_column(),
    ])
}

pub fn critical_path_frame(items: &[CriticalPathItem]) -> PolarsResult<DataFrame> {
    let durations: Vec<i64> = items.iter().map(|i| i.duration_days).collect();
    DataFrame::new(vec![
        str_column("stage", items.iter().map(|i| i.stage.as_str())),
        str_column("station", items.iter().map(|i| i.station.as_str())),
        str_column("portion", items.iter().map(|i| i.portion.as_str())),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
        date_column("start", items.iter().map(|i| i.start))?,
        date_column("end", items.iter().map(|i| i.end))?,
        str_column("status", items.iter().map(|i| i.status.as_str())),
    ])
}

/// One row per stage of the station, with its portion's progress alongside.
pub fn station_summary_frame(summary: &StationSummary) -> PolarsResult<DataFrame> {
    let rows: Vec<_> = summary
        .portions
        .iter()
        .flat_map(|portion| portion.stages.iter().map(move |stage| (portion, stage)))
        .collect();
    let progress: Vec<f64> = rows.iter().map(|(portion, _)| portion.progress).collect();

    DataFrame::new(vec![
        str_column("portion", rows.iter().map(|(p, _)| p.portion.as_str())),
        Series::new(PlSmallStr::from_static("portion_progress"), progress).into_column(),
        str_column("stage", rows.iter().map(|(_, s)| s.name.as_str())),
        str_column("status", rows.iter().map(|(_, s)| s.status.as_str())),
        date_column("start", rows.iter().map(|(_, s)| s.start))?,
        date_column("end", rows.iter().map(|(_, s)| s.end))?,
    ])
}

fn str_column<'a>(name: &str, values: impl Iterator<Item = &'a str>) -> Column {
    let values: Vec<&str> = values.collect();
    Series::new(name.into(), values).into_column()
}

fn date_column(name: &str, dates: impl Iterator<Item = NaiveDate>) -> PolarsResult<Column> {
    let days: Vec<i32> = dates.map(date_to_i32).collect();
    Ok(Series::new(name.into(), days)
        .cast(&DataType::Date)?
        .into_column())
}

fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        AnyValue::String(s) => s.to_string(),
        _ => value.to_string(),
    }
}

/// Render a frame as a boxed text table, one line per row.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| {
                    col.get(row_idx)
                        .map(|av| cell_text(&av))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_line(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}
