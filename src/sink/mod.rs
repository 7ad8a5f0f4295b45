//! Document sinks: render one extracted entity into one output document.

pub mod json;
pub mod xlsx;

use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::model::Entity;

pub use json::{JsonDocumentSink, NdjsonWriter};
pub use xlsx::{XlsxDocumentSink, XlsxLayout};

/// Produces one output artifact per entity.
///
/// The artifact's identity is derived from [`Entity::name`] alone, so writing
/// the same entity twice overwrites the same file.
pub trait DocumentSink {
    /// Write `entity` and return the path of the produced document.
    fn write_entity(&mut self, entity: &Entity) -> Result<PathBuf, SinkError>;

    /// Write every entity, stopping at the first failure.
    fn write_all(&mut self, entities: &[Entity]) -> Result<Vec<PathBuf>, SinkError> {
        entities.iter().map(|e| self.write_entity(e)).collect()
    }
}

/// `<dir>/<name>.<ext>`, with path separators in `name` replaced by `_`.
pub fn output_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("{}.{}", stem, extension))
}

/// Create `dir` (and parents) if missing.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), SinkError> {
    std::fs::create_dir_all(dir).map_err(|source| SinkError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
