//! Model extraction from `.dez` documents.
//!
//! [`extract`] turns a parsed document into one [`Entity`] per `ENTITIES/ENT`
//! declaration of the current `VERSION` block, in document order. Gaps in the
//! document (missing descriptions, dangling relationships, unknown datatypes,
//! unconventional property names) resolve to defaults; only an unparsable
//! document or an unknown requested version is an error.
//!
//! ```
//! let xml = r#"<DEZIGN><DATADICT><ENTITIES>
//!     <ENT><ID>1</ID><NAME>Party</NAME>
//!         <ATTRIBUTES><ATTR><ID>11</ID><NAME>party_id</NAME></ATTR></ATTRIBUTES>
//!     </ENT>
//! </ENTITIES></DATADICT></DEZIGN>"#;
//!
//! let entities = dezmap::extract_str(xml).unwrap();
//! assert_eq!(entities[0].name, "Party");
//! assert_eq!(entities[0].fields[0].datatype, "STRING");
//! ```

pub mod context;
pub mod datatypes;
pub mod defaults;
pub mod diagrams;
pub mod properties;
pub mod relationships;
pub mod table_options;
pub mod versions;

use roxmltree::{Document, Node};
use std::collections::HashSet;
use std::path::Path;

use crate::error::ExtractError;
use crate::extraction::{non_empty_text, select, select_descendants, Extractor, FieldPath};
use crate::model::{Entity, Field, KeyRole};

pub use context::ParseContext;
pub use diagrams::{extract_diagrams, DiagramIndex};
pub use table_options::TableLayout;
pub use versions::{list_versions, select_version, DesignVersion};

use datatypes::normalize_datatype;
use defaults::resolve_defaults;
use properties::{entity_sources, field_lineage, property_value, read_properties};

/// Name of the entity property holding the partition/cluster DDL snippet.
const TABLE_OPTIONS_PROPERTY: &str = "table_options";
const PARTITIONING_PROPERTY: &str = "partitioning";
const CLUSTERING_PROPERTY: &str = "clustering";

/// Extract every entity of the current version of a parsed document.
pub fn extract(document: &Document) -> Vec<Entity> {
    let scope = versions::current_version(document.root_element());
    let ctx = ParseContext::build(scope);
    entities_in(scope, &ctx)
}

/// Extract every entity of the version labelled `version` (see
/// [`select_version`]); `None` means the current version.
pub fn extract_version(document: &Document, version: Option<&str>) -> Result<Vec<Entity>, ExtractError> {
    let scope = select_version(document.root_element(), version)?;
    let ctx = ParseContext::build(scope);
    Ok(entities_in(scope, &ctx))
}

/// Parse `xml` and extract every entity.
pub fn extract_str(xml: &str) -> Result<Vec<Entity>, ExtractError> {
    let document = Document::parse(xml)?;
    Ok(extract(&document))
}

/// Read a `.dez` file from disk and extract every entity.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<Entity>, ExtractError> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = xml.len(), "Read design file");
    extract_str(&xml)
}

/// Entities and diagram grouping of the current version from one parse of `xml`.
pub fn extract_with_diagrams(xml: &str) -> Result<(Vec<Entity>, DiagramIndex), ExtractError> {
    extract_model(xml, None)
}

/// Entities and diagram grouping of the version labelled `version`.
pub fn extract_model(xml: &str, version: Option<&str>) -> Result<(Vec<Entity>, DiagramIndex), ExtractError> {
    let document = Document::parse(xml)?;
    let scope = select_version(document.root_element(), version)?;
    let ctx = ParseContext::build(scope);

    let entities = entities_in(scope, &ctx);
    let diagrams = diagrams::diagrams_from(scope, &ctx);

    Ok((entities, diagrams))
}

fn entities_in(scope: Node, ctx: &ParseContext) -> Vec<Entity> {
    let entities: Vec<Entity> = select_descendants(scope, &FieldPath::from_slashed("ENTITIES/ENT"))
        .into_iter()
        .map(|ent| resolve_entity(ent, ctx))
        .collect();

    tracing::info!(
        entities = entities.len(),
        relationships = ctx.relationship_count(),
        "Extracted model"
    );

    entities
}

fn resolve_entity(ent: Node, ctx: &ParseContext) -> Entity {
    let id = ent.extract_or("ID", "").trim().to_string();
    let properties = read_properties(ent, ctx.property_definitions());

    let primary_keys: HashSet<String> =
        select(ent, &FieldPath::from_slashed("PKCON/ATTRIBUTEIDS/ATTRIBUTEID"))
            .into_iter()
            .filter_map(|a| a.text().map(str::trim))
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();

    let table_options = property_value(&properties, TABLE_OPTIONS_PROPERTY)
        .unwrap_or("")
        .to_string();
    let layout = TableLayout::parse(&table_options);

    let fields = select(ent, &FieldPath::from_slashed("ATTRIBUTES/ATTR"))
        .into_iter()
        .map(|attr| resolve_field(attr, &id, &primary_keys, &layout, ctx))
        .collect();

    Entity {
        name: non_empty_text(&ent, "NAME").unwrap_or_default(),
        description: ent.extract_or("DESC", ""),
        sources: entity_sources(&properties),
        table_options,
        partition_columns: layout.partition_columns,
        cluster_columns: layout.cluster_columns,
        fields,
        id,
    }
}

fn resolve_field(
    attr: Node,
    entity_id: &str,
    primary_keys: &HashSet<String>,
    layout: &TableLayout,
    ctx: &ParseContext,
) -> Field {
    let id = attr.extract_or("ID", "").trim().to_string();
    let name = non_empty_text(&attr, "NAME").unwrap_or_default();
    let properties = read_properties(attr, ctx.property_definitions());

    let referenced_entity = ctx.referenced_entity(entity_id, &id);
    let key_role = KeyRole::from_membership(primary_keys.contains(&id), referenced_entity.is_some());

    let datatype = normalize_datatype(attr.extract(&FieldPath::from_slashed("DT/DTLISTNAME")).as_deref());
    let not_null = attr
        .extract(&FieldPath::from_slashed("NNCON/VALUE"))
        .is_some_and(|v| v.trim() == "1");

    let lineage = field_lineage(&properties);
    let defaults = resolve_defaults(&name, &datatype);

    let mut partition_flag = layout.partition_flag(&name);
    if partition_flag.is_empty() {
        partition_flag = property_value(&properties, PARTITIONING_PROPERTY)
            .unwrap_or("")
            .to_string();
    }
    let mut cluster_flag = layout.cluster_flag(&name);
    if cluster_flag.is_empty() {
        cluster_flag = property_value(&properties, CLUSTERING_PROPERTY)
            .unwrap_or("")
            .to_string();
    }

    Field {
        description: attr.extract_or("DESC", ""),
        datatype,
        key_role,
        referenced_entity: referenced_entity.unwrap_or("").to_string(),
        sourced: !key_role.is_foreign(),
        not_null,
        source_table: lineage.table,
        source_column: lineage.column,
        partition_flag,
        cluster_flag,
        default_value: defaults.default_value,
        default_record_1: defaults.default_record_1,
        default_record_2: defaults.default_record_2,
        name,
    }
}
