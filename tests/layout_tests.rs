use chrono::NaiveDate;
use serde_json::json;
use station_roadmap::layout::{LayoutConfig, LegendKind, Palette, RowKind, TimelineLayoutBuilder};
use station_roadmap::{Dataset, StageStatus, build_layout};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Two stations, three portions; P1 holds two overlapping stages.
fn two_station_fixture() -> Dataset {
    let raw = json!({
        "$schema": "./schema.json",
        "A": {
            "P1": { "stages": [
                { "name": "Design", "start": "2024-01-01", "end": "2024-02-01", "status": "in_progress",
                  "milestones": [{ "name": "Review", "date": "2024-01-15", "status": "planned" }] },
                { "name": "Procure", "start": "2024-01-20", "end": "2024-03-01", "status": "planned",
                  "milestones": [] }
            ] },
            "P2": { "stages": [
                { "name": "Build", "start": "2023-12-01", "end": "2024-01-10", "status": "completed",
                  "milestones": [{ "name": "Done", "date": "2024-01-10", "status": "completed" }] }
            ] }
        },
        "B": {
            "P3": { "stages": [
                { "name": "Test", "start": "2024-02-15", "end": "2024-04-30", "status": "in_progress",
                  "milestones": [] }
            ] }
        }
    });
    Dataset::from_value(&raw).unwrap()
}

#[test]
fn rows_follow_station_headers_portions_and_gaps() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));

    let rows: Vec<(usize, f64, RowKind, &str)> = layout
        .rows
        .iter()
        .map(|row| (row.index, row.position, row.kind, row.label.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            (0, 0.0, RowKind::StationHeader, "[A]"),
            (1, 1.0, RowKind::Portion, "  P1"),
            (2, 2.0, RowKind::Portion, "  P2"),
            (3, 3.5, RowKind::StationHeader, "[B]"),
            (4, 4.5, RowKind::Portion, "  P3"),
        ]
    );
    // stations + portions labelled rows, plus one half-row gap per station
    assert_eq!(layout.rows.len(), 2 + 3);
    assert_eq!(layout.extent, 6.0);
    assert_eq!(layout.row_labels(), vec!["[A]", "  P1", "  P2", "[B]", "  P3"]);
}

#[test]
fn stages_of_a_portion_share_its_row() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));

    let p1: Vec<&str> = layout.bars_on_row(1).map(|b| b.stage.as_str()).collect();
    assert_eq!(p1, vec!["Design", "Procure"]);
    assert!(layout.bars_on_row(0).next().is_none());
    assert!(layout.bars_on_row(3).next().is_none());

    let test_bar = layout.bars_on_row(4).next().unwrap();
    assert_eq!(test_bar.position, 4.5);
    assert_eq!(test_bar.station, "B");
    assert_eq!(test_bar.portion, "P3");
}

#[test]
fn markers_are_anchored_to_their_stage_row() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));

    let markers: Vec<(usize, &str, NaiveDate)> = layout
        .markers
        .iter()
        .map(|m| (m.row, m.label.as_str(), m.date))
        .collect();
    assert_eq!(
        markers,
        vec![(1, "Review", d(2024, 1, 15)), (2, "Done", d(2024, 1, 10))]
    );
    assert!(layout.markers[0].hover_text.starts_with("Review\nDate: 2024-01-15"));
    assert!(layout.markers[0].hover_text.contains("Stage: Design"));
}

#[test]
fn span_covers_all_stage_dates() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));
    let span = layout.span.unwrap();
    assert_eq!(span.start, d(2023, 12, 1));
    assert_eq!(span.end, d(2024, 4, 30));
    assert_eq!(span.days(), 151);
}

#[test]
fn now_marker_only_inside_span() {
    let dataset = two_station_fixture();
    let config = LayoutConfig::default();

    let inside = build_layout(&dataset, &config, d(2024, 3, 1));
    let marker = inside.now_marker.unwrap();
    assert_eq!(marker.date, d(2024, 3, 1));
    assert_eq!(marker.label, "TODAY");

    let on_edge = build_layout(&dataset, &config, d(2024, 4, 30));
    assert!(on_edge.now_marker.is_some());

    let before = build_layout(&dataset, &config, d(2023, 11, 30));
    assert!(before.now_marker.is_none());
    let after = build_layout(&dataset, &config, d(2024, 5, 1));
    assert!(after.now_marker.is_none());
}

#[test]
fn colors_and_legend_follow_palette_in_first_seen_order() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));

    let colors: Vec<&str> = layout.bars.iter().map(|b| b.color.as_str()).collect();
    assert_eq!(colors, vec!["#3498db", "#95a5a6", "#2ecc71", "#3498db"]);

    let legend: Vec<LegendKind> = layout.legend.iter().map(|e| e.kind).collect();
    assert_eq!(
        legend,
        vec![
            LegendKind::Status(StageStatus::InProgress),
            LegendKind::Status(StageStatus::Planned),
            LegendKind::Status(StageStatus::Completed),
            LegendKind::Milestones,
        ]
    );
    assert_eq!(layout.legend[0].label, "in_progress");
    assert_eq!(layout.legend[3].label, "Milestones");
}

#[test]
fn palette_falls_back_to_neutral_for_unknown_status() {
    let palette = Palette::default();
    assert_eq!(palette.resolve("delayed"), "#e74c3c");
    assert_eq!(palette.resolve("on_hold"), palette.planned);
    assert_eq!(palette.resolve(""), "#95a5a6");
}

#[test]
fn bars_carry_hover_text_and_label_hints() {
    let dataset = two_station_fixture();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 2, 1));

    let design = &layout.bars[0];
    assert_eq!(
        design.hover_text,
        "Design\nPortion: P1\nStation: A\nStatus: in_progress\nStart: 2024-01-01\nEnd: 2024-02-01\nDuration: 31 days"
    );
    assert!(design.light_text);
    assert!(!layout.bars[1].light_text);
    assert_eq!(design.midpoint(), d(2024, 1, 16));
}

#[test]
fn custom_config_changes_gap_and_geometry() {
    let dataset = two_station_fixture();
    let config = LayoutConfig {
        station_gap: 1.0,
        now_label: "NOW".to_string(),
        ..LayoutConfig::default()
    };
    let layout = TimelineLayoutBuilder::new(&dataset, &config).execute(d(2024, 2, 1));

    assert_eq!(layout.rows[3].position, 4.0);
    assert_eq!(layout.extent, 7.0);
    assert_eq!(layout.now_marker.unwrap().label, "NOW");
    // 5 rows * 50 + 200 stays below the 600 minimum
    assert_eq!(layout.geometry.height, 600);
    assert_eq!(layout.geometry.width, 1200);
}

#[test]
fn empty_dataset_lays_out_without_span() {
    let dataset = Dataset::from_value(&json!({ "$schema": "x" })).unwrap();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 1, 1));
    assert!(layout.rows.is_empty());
    assert!(layout.span.is_none());
    assert!(layout.now_marker.is_none());
    assert_eq!(layout.legend.len(), 1);
    assert_eq!(layout.legend[0].kind, LegendKind::Milestones);
    assert_eq!(layout.extent, 0.0);
}
