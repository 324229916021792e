use chrono::NaiveDate;
use station_roadmap::layout::LayoutConfig;
use station_roadmap::persistence::{
    load_dataset_from_reader, load_layout_config, save_bars_to_csv, save_critical_path_to_csv,
    save_delays_to_csv, save_layout_config,
};
use station_roadmap::{
    LoadOptions, PersistenceError, RoadmapError, build_layout, check_delays, critical_path,
    load_dataset_from_json, save_layout_to_json,
};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const ROADMAP_JSON: &str = r#"{
  "$schema": "./roadmap.schema.json",
  "Station B": {
    "B1 - Platform extension": {
      "stages": [
        { "name": "Design", "start": "2024-01-01", "end": "2024-02-15", "status": "completed",
          "milestones": [ { "name": "Design approved", "date": "2024-02-15", "status": "completed" } ] },
        { "name": "Construction", "start": "2024-02-16", "end": "2024-06-30", "status": "in_progress",
          "milestones": [] }
      ]
    }
  },
  "Station A": {
    "A1 - Lifts": {
      "stages": [
        { "name": "Install", "start": "2024-03-01", "end": "2024-03-20", "status": "planned",
          "milestones": [] }
      ]
    }
  }
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_from_json_file_keeps_file_order() {
    let file = write_temp(ROADMAP_JSON);
    let dataset = load_dataset_from_json(file.path()).unwrap();

    assert_eq!(
        dataset.all_portions(),
        vec![
            ("Station B", "B1 - Platform extension"),
            ("Station A", "A1 - Lifts")
        ]
    );
    assert_eq!(dataset.stage_count(), 3);
    assert_eq!(dataset.milestone_count(), 1);
}

#[test]
fn load_surfaces_json_and_dataset_errors() {
    let broken = write_temp("{ not json");
    assert!(matches!(
        load_dataset_from_json(broken.path()),
        Err(PersistenceError::Serialization(_))
    ));

    let invalid = write_temp(r#"{ "S": { "P": { "stages": [ { "name": "x" } ] } } }"#);
    assert!(matches!(
        load_dataset_from_json(invalid.path()),
        Err(PersistenceError::Dataset(RoadmapError::MalformedDataset { .. }))
    ));

    assert!(matches!(
        load_dataset_from_json("/definitely/not/here.json"),
        Err(PersistenceError::Io(_))
    ));
}

#[test]
fn reader_loading_respects_strict_option() {
    let raw = r#"{ "notes": "free text", "S": { "P": { "stages": [] } } }"#;
    assert!(load_dataset_from_reader(raw.as_bytes(), &LoadOptions::default()).is_ok());

    let strict = LoadOptions {
        strict_top_level: true,
        ..LoadOptions::default()
    };
    assert!(load_dataset_from_reader(raw.as_bytes(), &strict).is_err());
}

#[test]
fn layout_json_export_contains_rows_and_bars() {
    let file = write_temp(ROADMAP_JSON);
    let dataset = load_dataset_from_json(file.path()).unwrap();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 3, 10));

    let out = NamedTempFile::new().unwrap();
    save_layout_to_json(&layout, out.path()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.path()).unwrap()).unwrap();
    assert_eq!(value["rows"][0]["label"], "[Station B]");
    assert_eq!(value["rows"][0]["kind"], "station_header");
    assert_eq!(value["bars"][1]["status"], "in_progress");
    assert_eq!(value["bars"][1]["start"], "2024-02-16");
    assert_eq!(value["span"]["end"], "2024-06-30");
    assert_eq!(value["now_marker"]["date"], "2024-03-10");
    assert_eq!(value["legend"][0]["kind"], "status");
    assert_eq!(value["legend"][0]["status"], "completed");
}

#[test]
fn csv_exports_write_one_row_per_record() {
    let file = write_temp(ROADMAP_JSON);
    let dataset = load_dataset_from_json(file.path()).unwrap();

    let ranked = critical_path(&dataset);
    let out = NamedTempFile::new().unwrap();
    save_critical_path_to_csv(&ranked, out.path()).unwrap();
    let text = fs::read_to_string(out.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "station,portion,stage,duration_days,start,end,status"
    );
    assert_eq!(
        lines.next().unwrap(),
        "Station B,B1 - Platform extension,Construction,135,2024-02-16,2024-06-30,in_progress"
    );
    assert_eq!(text.lines().count(), 4);

    let delays = check_delays(&dataset, d(2024, 7, 1));
    let out = NamedTempFile::new().unwrap();
    save_delays_to_csv(&delays, out.path()).unwrap();
    let mut reader = csv::Reader::from_path(out.path()).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "Install");
    assert_eq!(&rows[0][5], "103");

    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 7, 1));
    let out = NamedTempFile::new().unwrap();
    save_bars_to_csv(&layout, out.path()).unwrap();
    let mut reader = csv::Reader::from_path(out.path()).unwrap();
    assert_eq!(reader.records().count(), 3);
}

#[test]
fn layout_config_round_trips_and_fills_defaults() {
    let mut config = LayoutConfig::default();
    config.station_gap = 0.75;
    config.palette.delayed = "#ff0000".to_string();

    let out = NamedTempFile::new().unwrap();
    save_layout_config(&config, out.path()).unwrap();
    assert_eq!(load_layout_config(out.path()).unwrap(), config);

    let partial = write_temp(r#"{ "bar_height": 0.5, "palette": { "completed": "green" } }"#);
    let loaded = load_layout_config(partial.path()).unwrap();
    assert_eq!(loaded.bar_height, 0.5);
    assert_eq!(loaded.palette.completed, "green");
    assert_eq!(loaded.palette.planned, "#95a5a6");
    assert_eq!(loaded.station_gap, 0.5);
}

#[cfg(target_os = "linux")]
#[test]
fn json_exports_report_write_failures() {
    let file = write_temp(ROADMAP_JSON);
    let dataset = load_dataset_from_json(file.path()).unwrap();
    let layout = build_layout(&dataset, &LayoutConfig::default(), d(2024, 3, 10));

    assert!(matches!(
        save_layout_to_json(&layout, "/dev/full"),
        Err(PersistenceError::Io(_))
    ));
    assert!(matches!(
        save_layout_config(&LayoutConfig::default(), "/dev/full"),
        Err(PersistenceError::Io(_))
    ));
}
