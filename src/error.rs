//! Error types for extraction, selection, configuration and document output.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading a `.dez` document.
///
/// Everything short of an unreadable or unparsable document, or a requested
/// version the document does not carry, is resolved to a default inside the
/// extractor and never surfaces here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Version '{requested}' not found. Available versions: {}", available.join(", "))]
    UnknownVersion {
        requested: String,
        available: Vec<String>,
    },
}

/// Errors raised by a [`crate::sink::DocumentSink`].
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors raised while loading `dezmap.yaml` or resolving overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported output format: '{0}'. Supported formats: xlsx, json")]
    UnsupportedFormat(String),
}

/// Caller-level selection failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No entity matched the requested names: {}", requested.join(", "))]
    NothingMatched { requested: Vec<String> },
}
