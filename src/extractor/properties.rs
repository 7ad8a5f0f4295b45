//! User-defined properties and the lineage naming convention.
//!
//! Lineage facts are attached to entities and fields as flat properties named
//! `<order>_source_<kind>_<group>`, e.g. `01_source_table_2`. Properties with
//! the same `<group>` combine into one [`SourceLineage`]; anything not matching
//! the convention is ignored.
//!
//! Exports either spell the property name in the tag (`UDP_01_source_table_2`)
//! or key it by the id of a `USERDEFINEDPROPERTIES/USERDEFPROP` definition
//! (`UDP_7`), in which case the definition's `NAME` is the property name.

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;
use std::collections::{BTreeMap, HashMap};

use crate::extraction::{non_empty_text, select, select_descendants, FieldPath};
use crate::model::SourceLineage;

/// Tag prefix the design tool puts in front of property names.
const PROPERTY_TAG_PREFIX: &str = "UDP_";

static LINEAGE_PROPERTY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\d+_?)?source_(database|table|column)_(\d+)$")
        .expect("valid lineage property regex")
});

/// One name/value annotation attached to an entity or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProperty {
    pub name: String,
    pub value: String,
}

impl UserProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Which slot of a lineage triple a property fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageKind {
    Database,
    Table,
    Column,
}

/// Parsed form of a convention-named property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineageKey {
    pub kind: LineageKind,
    pub group: u64,
}

/// Property definition id -> property name.
pub type PropertyDefinitions = HashMap<String, String>;

/// Every `USERDEFINEDPROPERTIES/USERDEFPROP` with both an id and a name.
pub fn read_property_definitions(scope: Node) -> PropertyDefinitions {
    select_descendants(scope, &FieldPath::from_slashed("USERDEFINEDPROPERTIES/USERDEFPROP"))
        .into_iter()
        .filter_map(|def| Some((non_empty_text(&def, "ID")?, non_empty_text(&def, "NAME")?)))
        .collect()
}

/// Properties under `USERDEFPROPS` of `node`, in document order.
///
/// A tag suffix that is a known definition id takes the definition's name;
/// otherwise the suffix itself is the name.
pub fn read_properties(node: Node, definitions: &PropertyDefinitions) -> Vec<UserProperty> {
    select(node, &FieldPath::from_slashed("USERDEFPROPS/*"))
        .into_iter()
        .map(|prop| {
            let tag = prop.tag_name().name();
            let suffix = tag.strip_prefix(PROPERTY_TAG_PREFIX).unwrap_or(tag);
            let name = definitions.get(suffix).map(String::as_str).unwrap_or(suffix);
            UserProperty::new(name, prop.text().unwrap_or(""))
        })
        .collect()
}

/// First property whose name equals `name`, ignoring ASCII case.
pub fn property_value<'p>(properties: &'p [UserProperty], name: &str) -> Option<&'p str> {
    properties
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.value.as_str())
}

/// Parse a property name against the lineage convention.
///
/// Returns `None` for names outside the convention, including group indices
/// that do not fit in a `u64`.
pub fn parse_lineage_key(name: &str) -> Option<LineageKey> {
    let caps = LINEAGE_PROPERTY.captures(name)?;

    let kind = match caps[1].to_ascii_lowercase().as_str() {
        "database" => LineageKind::Database,
        "table" => LineageKind::Table,
        _ => LineageKind::Column,
    };
    let group = caps[2].parse().ok()?;

    Some(LineageKey { kind, group })
}

/// Bucket convention-named properties by group index.
///
/// Within a group a later property of the same kind overwrites an earlier one.
pub fn group_lineage(properties: &[UserProperty]) -> BTreeMap<u64, SourceLineage> {
    let mut groups: BTreeMap<u64, SourceLineage> = BTreeMap::new();

    for property in properties {
        let Some(key) = parse_lineage_key(&property.name) else {
            continue;
        };

        let lineage = groups.entry(key.group).or_default();
        let slot = match key.kind {
            LineageKind::Database => &mut lineage.database,
            LineageKind::Table => &mut lineage.table,
            LineageKind::Column => &mut lineage.column,
        };
        *slot = property.value.clone();
    }

    groups
}

/// Entity-level sources, ascending by group index.
pub fn entity_sources(properties: &[UserProperty]) -> Vec<SourceLineage> {
    group_lineage(properties).into_values().collect()
}

/// Field-level lineage: the highest-index group wins.
///
/// Empty when the field carries no convention-named properties.
pub fn field_lineage(properties: &[UserProperty]) -> SourceLineage {
    group_lineage(properties)
        .into_values()
        .next_back()
        .unwrap_or_default()
}
