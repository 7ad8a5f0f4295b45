//! Path-based navigation over a parsed `.dez` XML tree.
//!
//! The extractor addresses elements with slash-separated relative paths such
//! as `PKCON/ATTRIBUTEIDS/ATTRIBUTEID` or `USERDEFPROPS/*`, resolved against a
//! `roxmltree` node.

use roxmltree::Node;
use std::fmt;

/// Represents a path to an element relative to some node
///
/// # Examples
///
/// - `NAME` - direct child element
/// - `DT/DTLISTNAME` - grandchild through `DT`
/// - `USERDEFPROPS/*` - every element child of `USERDEFPROPS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// The raw path string
    pub raw: String,
    /// Parsed path segments
    pub segments: Vec<PathSegment>,
}

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An element tag name (e.g., "ENT", "NAME")
    Tag(String),
    /// Any element (`*`)
    Wildcard,
}

impl PathSegment {
    fn matches(&self, node: &Node) -> bool {
        if !node.is_element() {
            return false;
        }
        match self {
            PathSegment::Tag(tag) => node.has_tag_name(tag.as_str()),
            PathSegment::Wildcard => true,
        }
    }
}

impl FieldPath {
    /// Parse a field path with a given delimiter
    ///
    /// # Example
    ///
    /// ```
    /// use dezmap::extraction::FieldPath;
    ///
    /// let path = FieldPath::parse("PKCON/ATTRIBUTEIDS/ATTRIBUTEID", "/");
    /// assert_eq!(path.segments.len(), 3);
    /// ```
    pub fn parse(path: &str, delimiter: &str) -> Self {
        let segments = path
            .split(delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != ".")
            .map(|s| {
                if s == "*" {
                    PathSegment::Wildcard
                } else {
                    PathSegment::Tag(s.to_string())
                }
            })
            .collect();

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    /// Create a field path from a slash-separated string
    pub fn from_slashed(path: &str) -> Self {
        Self::parse(path, "/")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Elements reached by following `path` from `node` through child elements.
///
/// Results are in document order. An empty path selects `node` itself.
pub fn select<'a, 'input>(node: Node<'a, 'input>, path: &FieldPath) -> Vec<Node<'a, 'input>> {
    select_segments(node, &path.segments)
}

fn select_segments<'a, 'input>(
    node: Node<'a, 'input>,
    segments: &[PathSegment],
) -> Vec<Node<'a, 'input>> {
    let mut frontier = vec![node];

    for segment in segments {
        frontier = frontier
            .into_iter()
            .flat_map(|n| n.children().filter(|c| segment.matches(c)))
            .collect();

        if frontier.is_empty() {
            break;
        }
    }

    frontier
}

/// Elements matching `path` anywhere below `node` (the `.//A/B` form).
///
/// The first segment may match at any depth; the remaining segments are
/// followed through child elements.
pub fn select_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    path: &FieldPath,
) -> Vec<Node<'a, 'input>> {
    let Some((first, rest)) = path.segments.split_first() else {
        return vec![node];
    };

    node.descendants()
        .filter(|d| *d != node && first.matches(d))
        .flat_map(|anchor| select_segments(anchor, rest))
        .collect()
}

/// Trait for types that can extract text by field path
pub trait Extractor {
    /// Text of the first element at `path`.
    ///
    /// Returns `Some("")` when the element exists without text and `None`
    /// when it does not exist.
    fn extract(&self, path: &FieldPath) -> Option<String>;

    /// Text at `path`, or `default` when the element is missing.
    fn extract_or(&self, path: &str, default: &str) -> String {
        self.extract(&FieldPath::from_slashed(path))
            .unwrap_or_else(|| default.to_string())
    }
}

impl Extractor for Node<'_, '_> {
    fn extract(&self, path: &FieldPath) -> Option<String> {
        select(*self, path)
            .into_iter()
            .next()
            .map(|n| n.text().unwrap_or("").to_string())
    }
}

/// Trimmed, non-empty text at `path`.
pub fn non_empty_text(node: &Node, path: &str) -> Option<String> {
    node.extract(&FieldPath::from_slashed(path))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
