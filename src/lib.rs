pub mod dates;
pub mod error;
pub mod frame;
pub mod layout;
pub mod model;
pub mod persistence;
pub mod queries;

pub use dates::{Clock, FixedClock, SystemClock, add_days, days_between, format_date, parse_date};
pub use error::{RoadmapError, RoadmapResult};
pub use layout::{LayoutConfig, TimelineLayout, TimelineLayoutBuilder, build_layout};
pub use model::{
    Dataset, LoadOptions, Milestone, MilestoneStatus, Portion, Stage, StageStatus, Station,
    UnknownStatus,
};
pub use persistence::{
    PersistenceError, PersistenceResult, load_dataset_from_json, save_layout_to_json,
};
pub use queries::{
    CriticalPathItem, DelayRecord, MilestoneHit, PortionSummary, StationSummary, check_delays,
    critical_path, milestones_in_range, station_status,
};
