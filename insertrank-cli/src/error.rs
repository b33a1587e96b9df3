use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the file, config and terminal adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to open spreadsheet {}: {source}", .path.display())]
    Spreadsheet { path: PathBuf, source: calamine::Error },
    #[error("column '{column}' not found in sheet '{sheet}' of {} (header: {header:?})", .path.display())]
    MissingColumn {
        path: PathBuf,
        sheet: String,
        column: String,
        header: Vec<String>,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },
    #[error("failed to replace {}: {source}", .path.display())]
    Replace { path: PathBuf, source: io::Error },
    #[error("items file looks like JSON but failed to parse: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse config at {}: {source}", .path.display())]
    Config { path: PathBuf, source: toml::de::Error },
    #[error("HOME environment variable not set")]
    NoHome,
    #[error("config file already exists at {}", .path.display())]
    ConfigExists { path: PathBuf },
    #[error("failed to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to read answer: {0}")]
    Prompt(#[source] io::Error),
    #[error("ranking stopped before completion")]
    Aborted,
}
