//! # dezmap: ERD exports to mapping specifications
//!
//! dezmap reads a `.dez` design file (the XML export of an entity-relationship
//! modelling tool) and produces one mapping-specification document per modeled
//! table.
//!
//! ## Pipeline
//!
//! - **Extraction** ([`extractor`]): resolves entities, fields, key roles,
//!   foreign-key references, lineage, partitioning/clustering and default
//!   values into plain [`Entity`] values
//! - **Selection** ([`selection`]): by name, or through an interactive prompt
//! - **Sinks** ([`sink`]): one XLSX workbook or JSON document per entity
//!
//! ## Example
//!
//! ```no_run
//! use dezmap::sink::{DocumentSink, XlsxDocumentSink, XlsxLayout};
//!
//! let entities = dezmap::extract_file("model.dez")?;
//! let mut sink = XlsxDocumentSink::new("outputs", XlsxLayout::default());
//! for entity in &entities {
//!     sink.write_entity(entity)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod model;
pub mod extraction;
pub mod extractor;

// Output and front-end
pub mod sink;
pub mod selection;
pub mod config;

// Re-export key types
pub use error::{ConfigError, ExtractError, SelectionError, SinkError};
pub use model::{DefaultValues, Entity, Field, KeyRole, SourceLineage};
pub use extraction::{Extractor, FieldPath};
pub use extractor::{
    extract, extract_diagrams, extract_file, extract_model, extract_str, extract_version,
    extract_with_diagrams, list_versions, DesignVersion, DiagramIndex,
};
pub use sink::{DocumentSink, JsonDocumentSink, NdjsonWriter, XlsxDocumentSink, XlsxLayout};
pub use config::{MappingConfig, OutputFormat};
