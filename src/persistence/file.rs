use log::info;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::PersistenceResult;
use crate::layout::{LayoutConfig, TimelineLayout};
use crate::model::{Dataset, LoadOptions};
use crate::queries::{CriticalPathItem, DelayRecord, MilestoneHit};

pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> PersistenceResult<Dataset> {
    let raw: Value = serde_json::from_reader(reader)?;
    Ok(Dataset::from_value_with(&raw, options)?)
}

pub fn load_dataset_from_json_with<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> PersistenceResult<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let dataset = load_dataset_from_reader(BufReader::new(file), options)?;
    info!(
        "loaded {} stations, {} stages from {}",
        dataset.stations().len(),
        dataset.stage_count(),
        path.display()
    );
    Ok(dataset)
}

pub fn load_dataset_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Dataset> {
    load_dataset_from_json_with(path, &LoadOptions::default())
}

pub fn save_layout_to_json<P: AsRef<Path>>(
    layout: &TimelineLayout,
    path: P,
) -> PersistenceResult<()> {
    write_json(layout, path.as_ref())
}

pub fn load_layout_config<P: AsRef<Path>>(path: P) -> PersistenceResult<LayoutConfig> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn save_layout_config<P: AsRef<Path>>(
    config: &LayoutConfig,
    path: P,
) -> PersistenceResult<()> {
    write_json(config, path.as_ref())
}

pub fn save_bars_to_csv<P: AsRef<Path>>(
    layout: &TimelineLayout,
    path: P,
) -> PersistenceResult<()> {
    write_csv(&layout.bars, path.as_ref())
}

pub fn save_milestones_to_csv<P: AsRef<Path>>(
    hits: &[MilestoneHit],
    path: P,
) -> PersistenceResult<()> {
    write_csv(hits, path.as_ref())
}

pub fn save_delays_to_csv<P: AsRef<Path>>(
    delays: &[DelayRecord],
    path: P,
) -> PersistenceResult<()> {
    write_csv(delays, path.as_ref())
}

pub fn save_critical_path_to_csv<P: AsRef<Path>>(
    items: &[CriticalPathItem],
    path: P,
) -> PersistenceResult<()> {
    write_csv(items, path.as_ref())
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}

fn write_csv<T: Serialize>(records: &[T], path: &Path) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
