use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("file \"{}\" not found", .path.display())]
    DatasetNotFound { path: PathBuf },
    #[error("empty dataset '{name}': no samples to summarize")]
    EmptyDataset { name: String },
    #[error("render error: {0}")]
    Render(String),
}

impl PlotError {
    /// Errors caused by how the tool was invoked rather than by the system.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::EmptyDataset { .. })
    }
}

pub type PlotResult<T> = Result<T, PlotError>;
