//! Relationship declarations and the foreign-key index built from them.

use roxmltree::Node;
use std::collections::HashMap;

use crate::extraction::{non_empty_text, select, select_descendants, FieldPath};

/// Foreign-key attribute id -> parent entity name, for one child entity.
pub type ForeignKeyMap = HashMap<String, String>;

/// One (primary-key attribute, foreign-key attribute) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub key_id: Option<String>,
    pub foreign_key_id: Option<String>,
}

/// A `REL` declaration as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub child_id: Option<String>,
    pub pairs: Vec<KeyPair>,
}

/// Every `RELATIONSHIPS/REL` below `root`, in document order.
pub fn read_relationships(root: Node) -> Vec<Relationship> {
    let pair_path = FieldPath::from_slashed("PAIRS/PAIR");

    select_descendants(root, &FieldPath::from_slashed("RELATIONSHIPS/REL"))
        .into_iter()
        .map(|rel| Relationship {
            id: non_empty_text(&rel, "ID"),
            parent_id: non_empty_text(&rel, "PARENTOBJECTID"),
            child_id: non_empty_text(&rel, "CHILDOBJECTID"),
            pairs: select(rel, &pair_path)
                .into_iter()
                .map(|pair| KeyPair {
                    key_id: non_empty_text(&pair, "KEYID"),
                    foreign_key_id: non_empty_text(&pair, "FOREIGNKEYID"),
                })
                .collect(),
        })
        .collect()
}

/// Pre-index relationships as `child entity id -> { fk attribute id: parent name }`.
///
/// A relationship whose parent id does not resolve, or that names no child,
/// contributes nothing. When two relationships claim the same foreign-key
/// attribute the later one in document order wins.
pub fn index_foreign_keys<F>(
    relationships: &[Relationship],
    resolve_entity: F,
) -> HashMap<String, ForeignKeyMap>
where
    F: Fn(&str) -> Option<String>,
{
    let mut index: HashMap<String, ForeignKeyMap> = HashMap::new();

    for rel in relationships {
        let parent = rel.parent_id.as_deref().and_then(&resolve_entity);

        let (Some(child_id), Some(parent)) = (rel.child_id.as_ref(), parent) else {
            tracing::debug!(
                relationship = rel.id.as_deref().unwrap_or("?"),
                parent = rel.parent_id.as_deref().unwrap_or(""),
                "Skipping relationship with unresolved parent or missing child"
            );
            continue;
        };

        let foreign_keys = index.entry(child_id.clone()).or_default();
        for fk in rel.pairs.iter().filter_map(|p| p.foreign_key_id.as_ref()) {
            foreign_keys.insert(fk.clone(), parent.clone());
        }
    }

    index
}
