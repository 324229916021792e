use std::io;
use thiserror::Error;

use crate::error::RoadmapError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Dataset(#[from] RoadmapError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

pub mod file;

pub use file::{
    load_dataset_from_json, load_dataset_from_json_with, load_dataset_from_reader,
    load_layout_config, save_bars_to_csv, save_critical_path_to_csv, save_delays_to_csv,
    save_layout_config, save_layout_to_json, save_milestones_to_csv,
};
