//! Per-parse lookup tables shared by every extraction step.
//!
//! Built once from a single `VERSION` block and then only read, so separate
//! parses never share state and older versions never leak into the index.

use indexmap::IndexMap;
use roxmltree::Node;
use std::collections::HashMap;

use crate::extraction::{non_empty_text, select_descendants, FieldPath};
use crate::extractor::properties::{read_property_definitions, PropertyDefinitions};
use crate::extractor::relationships::{index_foreign_keys, read_relationships, ForeignKeyMap};

/// Immutable cross-entity context for one document.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    /// Entity id -> entity name, in document order
    entity_names: IndexMap<String, String>,

    /// Child entity id -> foreign-key attribute id -> parent entity name
    foreign_keys: HashMap<String, ForeignKeyMap>,

    /// User-defined property definition id -> name
    property_definitions: PropertyDefinitions,

    relationship_count: usize,
}

impl ParseContext {
    /// Build the context from one version block (or an unversioned root).
    pub fn build(scope: Node) -> Self {
        let entity_names: IndexMap<String, String> =
            select_descendants(scope, &FieldPath::from_slashed("ENTITIES/ENT"))
                .into_iter()
                .filter_map(|ent| Some((non_empty_text(&ent, "ID")?, non_empty_text(&ent, "NAME")?)))
                .collect();

        let relationships = read_relationships(scope);
        let foreign_keys =
            index_foreign_keys(&relationships, |id| entity_names.get(id).cloned());

        Self {
            entity_names,
            foreign_keys,
            property_definitions: read_property_definitions(scope),
            relationship_count: relationships.len(),
        }
    }

    /// Resolve an entity id to its name.
    pub fn entity_name(&self, id: &str) -> Option<&str> {
        self.entity_names.get(id).map(|s| s.as_str())
    }

    /// Foreign-key attributes of the entity with the given id.
    pub fn foreign_keys_for(&self, entity_id: &str) -> Option<&ForeignKeyMap> {
        self.foreign_keys.get(entity_id)
    }

    /// Parent entity name referenced by `attribute_id` of `entity_id`.
    pub fn referenced_entity(&self, entity_id: &str, attribute_id: &str) -> Option<&str> {
        self.foreign_keys_for(entity_id)?
            .get(attribute_id)
            .map(|s| s.as_str())
    }

    pub fn property_definitions(&self) -> &PropertyDefinitions {
        &self.property_definitions
    }

    /// Number of relationship declarations seen, including skipped ones.
    pub fn relationship_count(&self) -> usize {
        self.relationship_count
    }
}
