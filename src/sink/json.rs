//! JSON output: one pretty-printed document per entity, or NDJSON to a stream.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::model::Entity;
use crate::sink::{ensure_dir, output_path, DocumentSink};

/// Writes `<output_dir>/<entity name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDocumentSink {
    output_dir: PathBuf,
}

impl JsonDocumentSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl DocumentSink for JsonDocumentSink {
    fn write_entity(&mut self, entity: &Entity) -> Result<PathBuf, SinkError> {
        ensure_dir(&self.output_dir)?;

        let path = output_path(&self.output_dir, &entity.name, "json");
        let json = entity.to_json_pretty()?;
        std::fs::write(&path, json).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(entity = %entity.name, path = %path.display(), "Wrote JSON document");
        Ok(path)
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes entities as NDJSON, one JSON object per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonWriter<W> {
    /// Create a new NDJSON writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a single entity as an NDJSON line
    pub fn write(&mut self, entity: &Entity) -> Result<(), SinkError> {
        let line = entity.to_ndjson_line()?;
        self.writer.write_all(line.as_bytes()).map_err(stream_error)
    }

    /// Write multiple entities
    pub fn write_all(&mut self, entities: &[Entity]) -> Result<(), SinkError> {
        for entity in entities {
            self.write(entity)?;
        }
        Ok(())
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(stream_error)
    }
}

fn stream_error(source: std::io::Error) -> SinkError {
    SinkError::Io {
        path: PathBuf::from("<stream>"),
        source,
    }
}
