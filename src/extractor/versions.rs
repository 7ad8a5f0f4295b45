//! Saved `VERSION` blocks of a design file.
//!
//! A file with version history carries one `VERSION` element per saved
//! version plus the working copy, which has no `VERSIONINFO/VERSIONNUMBER`.
//! Extraction always works inside exactly one of them.

use roxmltree::{Document, Node};

use crate::error::ExtractError;
use crate::extraction::{non_empty_text, FieldPath, Extractor};

/// Name accepted for the working copy, alongside `"0"`.
pub const CURRENT_VERSION: &str = "current";

/// Summary of one `VERSION` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignVersion {
    /// `None` for the working copy
    pub number: Option<String>,
    pub date: String,
    pub description: String,
}

impl DesignVersion {
    pub fn is_current(&self) -> bool {
        self.number.is_none()
    }

    /// Value to pass back to [`select_version`] to pick this block.
    pub fn label(&self) -> &str {
        self.number.as_deref().unwrap_or(CURRENT_VERSION)
    }
}

fn version_blocks<'a, 'input>(root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    root.children()
        .filter(|c| c.is_element() && c.has_tag_name("VERSION"))
        .collect()
}

fn version_number(block: &Node) -> Option<String> {
    non_empty_text(block, "VERSIONINFO/VERSIONNUMBER")
}

/// Every `VERSION` block under the document root, in document order.
pub fn list_versions(document: &Document) -> Vec<DesignVersion> {
    version_blocks(document.root_element())
        .into_iter()
        .map(|block| DesignVersion {
            number: version_number(&block),
            date: block
                .extract(&FieldPath::from_slashed("VERSIONINFO/VERSIONDATE"))
                .unwrap_or_default(),
            description: block
                .extract(&FieldPath::from_slashed("VERSIONINFO/VERSIONTYPEDESC"))
                .unwrap_or_default(),
        })
        .collect()
}

/// The working copy: the first block without a version number, else the last
/// block. A file without `VERSION` blocks is its own scope.
pub fn current_version<'a, 'input>(root: Node<'a, 'input>) -> Node<'a, 'input> {
    let blocks = version_blocks(root);

    blocks
        .iter()
        .find(|b| version_number(b).is_none())
        .or_else(|| blocks.last())
        .copied()
        .unwrap_or(root)
}

/// Resolve `requested` to a `VERSION` block.
///
/// `None`, `"current"` and `"0"` pick [`current_version`]; anything else must
/// equal a `VERSIONNUMBER`.
pub fn select_version<'a, 'input>(
    root: Node<'a, 'input>,
    requested: Option<&str>,
) -> Result<Node<'a, 'input>, ExtractError> {
    let requested = match requested.map(str::trim) {
        None | Some("") | Some("0") => return Ok(current_version(root)),
        Some(v) if v.eq_ignore_ascii_case(CURRENT_VERSION) => return Ok(current_version(root)),
        Some(v) => v,
    };

    let blocks = version_blocks(root);
    blocks
        .iter()
        .find(|b| version_number(b).as_deref() == Some(requested))
        .copied()
        .ok_or_else(|| ExtractError::UnknownVersion {
            requested: requested.to_string(),
            available: blocks
                .iter()
                .map(|b| version_number(b).unwrap_or_else(|| CURRENT_VERSION.to_string()))
                .collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<DEZIGN>
        <VERSION>
            <VERSIONINFO><VERSIONNUMBER>1</VERSIONNUMBER><VERSIONDATE>2024-02-01</VERSIONDATE>
                <VERSIONTYPEDESC>Baseline</VERSIONTYPEDESC></VERSIONINFO>
            <DATADICT><ENTITIES><ENT><ID>1</ID><NAME>Party</NAME></ENT></ENTITIES></DATADICT>
        </VERSION>
        <VERSION>
            <DATADICT><ENTITIES><ENT><ID>1</ID><NAME>Customer</NAME></ENT></ENTITIES></DATADICT>
        </VERSION>
    </DEZIGN>"#;

    fn entity_name(block: Node) -> String {
        block.descendants().find(|n| n.has_tag_name("NAME")).and_then(|n| n.text()).unwrap_or("").to_string()
    }

    #[test]
    fn test_list_versions() {
        let doc = Document::parse(XML).unwrap();
        let versions = list_versions(&doc);

        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].label(), "1");
        assert_eq!(versions[0].description, "Baseline");
        assert!(versions[1].is_current());
        assert_eq!(versions[1].label(), "current");
    }

    #[test]
    fn test_select_version() {
        let doc = Document::parse(XML).unwrap();
        let root = doc.root_element();

        assert_eq!(entity_name(select_version(root, None).unwrap()), "Customer");
        assert_eq!(entity_name(select_version(root, Some("0")).unwrap()), "Customer");
        assert_eq!(entity_name(select_version(root, Some("CURRENT")).unwrap()), "Customer");
        assert_eq!(entity_name(select_version(root, Some("1")).unwrap()), "Party");
    }

    #[test]
    fn test_unknown_version() {
        let doc = Document::parse(XML).unwrap();

        let err = select_version(doc.root_element(), Some("7")).unwrap_err();
        match err {
            ExtractError::UnknownVersion { requested, available } => {
                assert_eq!(requested, "7");
                assert_eq!(available, vec!["1", "current"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_without_current_block_last_wins() {
        let xml = r#"<DEZIGN>
            <VERSION><VERSIONINFO><VERSIONNUMBER>1</VERSIONNUMBER></VERSIONINFO><NAME>first</NAME></VERSION>
            <VERSION><VERSIONINFO><VERSIONNUMBER>2</VERSIONNUMBER></VERSIONINFO><NAME>second</NAME></VERSION>
        </DEZIGN>"#;
        let doc = Document::parse(xml).unwrap();

        assert_eq!(entity_name(current_version(doc.root_element())), "second");
    }

    #[test]
    fn test_unversioned_document_is_its_own_scope() {
        let doc = Document::parse("<DEZIGN><DATADICT/></DEZIGN>").unwrap();
        let root = doc.root_element();

        assert_eq!(current_version(root), root);
        assert!(list_versions(&doc).is_empty());
    }
}
