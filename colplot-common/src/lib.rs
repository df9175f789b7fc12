pub mod config;
pub use config::{Config, DisplayConfig, Margins, PlotConfig, SourceConfig, StyleConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColplotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("invalid column selection: index {index} (table has {columns} columns)")]
    InvalidColumn { index: usize, columns: usize },
    #[error("schema mismatch: {path} does not share the header of the first file")]
    SchemaMismatch { path: String },
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ColplotError>;
