use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The input path could not be read at all.
    #[error("File {} not found or not readable: {source}", .path.display())]
    FileNotAccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes were read but are not a workbook we can parse.
    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Sheet '{sheet}' has no {column} column")]
    MissingExpectedColumn { sheet: String, column: String },

    #[error("Failed to render chart {chart}: {message}")]
    Render { chart: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
