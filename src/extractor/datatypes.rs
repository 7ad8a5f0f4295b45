//! Datatype normalization to the warehouse type vocabulary.

/// Type used when an attribute carries no datatype.
pub const FALLBACK_DATATYPE: &str = "STRING";

/// Legacy relational names found in older exports and their warehouse type.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("INTEGER", "INT64"),
    ("INT", "INT64"),
    ("SMALLINT", "INT64"),
    ("BIGINT", "INT64"),
    ("VARCHAR", "STRING"),
    ("CHAR", "STRING"),
    ("TEXT", "STRING"),
    ("NVARCHAR", "STRING"),
    ("DECIMAL", "NUMERIC"),
    ("NUMERIC", "NUMERIC"),
    ("FLOAT", "FLOAT64"),
    ("DOUBLE", "FLOAT64"),
    ("REAL", "FLOAT64"),
    ("DATE", "DATE"),
    ("DATETIME", "DATETIME"),
    ("TIMESTAMP", "TIMESTAMP"),
    ("BOOLEAN", "BOOL"),
    ("BOOL", "BOOL"),
];

/// Normalize a raw `DTLISTNAME` value.
///
/// Known aliases map case-insensitively; unknown names are kept as written
/// (trimmed); a missing or blank value becomes [`FALLBACK_DATATYPE`].
pub fn normalize_datatype(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return FALLBACK_DATATYPE.to_string();
    };

    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(raw))
        .map(|(_, normalized)| normalized.to_string())
        .unwrap_or_else(|| raw.to_string())
}
