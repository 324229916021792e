use thiserror::Error;

/// Failures raised by the dataset loader and the query engine.
///
/// Every variant is detected at the boundary of the function that received
/// the bad input. Empty result sets are never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoadmapError {
    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDateFormat { input: String },
    #[error("malformed dataset at {location}: {reason}")]
    MalformedDataset { location: String, reason: String },
    #[error("station '{station}' not found")]
    NotFound { station: String },
}

impl RoadmapError {
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDateFormat {
            input: input.into(),
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDataset {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(station: impl Into<String>) -> Self {
        Self::NotFound {
            station: station.into(),
        }
    }
}

pub type RoadmapResult<T> = Result<T, RoadmapError>;
