use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocError>;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error at row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: &'static str,
        message: String,
    },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Chart error: {0}")]
    Chart(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Other: {0}")]
    Other(String),
}

impl LocError {
    /// True when the log itself could not be fetched or read as CSV, as
    /// opposed to a single malformed value inside an otherwise valid file.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, LocError::Load { .. } | LocError::Csv(_) | LocError::Io(_))
    }
}
