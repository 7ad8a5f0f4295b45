//! Diagram membership of entities, used to group the interactive entity list.

use roxmltree::{Document, Node};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::extraction::{non_empty_text, select_descendants, FieldPath};
use crate::extractor::context::ParseContext;
use crate::extractor::versions::current_version;

/// Diagram name -> alphabetically sorted entity names.
pub type DiagramIndex = BTreeMap<String, Vec<String>>;

/// Group entity names by the diagrams of the current version that display them.
///
/// Entity controls pointing at an unknown diagram or entity are ignored. A
/// diagram with no resolvable entity is listed with an empty list.
pub fn extract_diagrams(document: &Document) -> DiagramIndex {
    let scope = current_version(document.root_element());
    let ctx = ParseContext::build(scope);
    diagrams_from(scope, &ctx)
}

pub(crate) fn diagrams_from(root: Node, ctx: &ParseContext) -> DiagramIndex {
    let diagram_names: HashMap<String, String> =
        select_descendants(root, &FieldPath::from_slashed("DIAGRAMS/DIAGRAM"))
            .into_iter()
            .filter_map(|d| Some((non_empty_text(&d, "ID")?, non_empty_text(&d, "NAME")?)))
            .collect();

    let mut members: HashMap<&str, BTreeSet<String>> = diagram_names
        .keys()
        .map(|id| (id.as_str(), BTreeSet::new()))
        .collect();

    let controls = select_descendants(
        root,
        &FieldPath::from_slashed("DIAGRAMS/CONTROLS/ENTITYCONTROLS/ENTC"),
    );
    for control in controls {
        let (Some(diagram_id), Some(entity_id)) = (
            non_empty_text(&control, "DIAGRAMID"),
            non_empty_text(&control, "ID"),
        ) else {
            continue;
        };

        if let (Some(set), Some(name)) = (
            members.get_mut(diagram_id.as_str()),
            ctx.entity_name(&entity_id),
        ) {
            set.insert(name.to_string());
        }
    }

    members
        .into_iter()
        .map(|(id, names)| (diagram_names[id].clone(), names.into_iter().collect()))
        .collect()
}
