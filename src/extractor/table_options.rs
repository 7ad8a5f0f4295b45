//! Partition and cluster columns pattern-matched out of a DDL snippet.

use once_cell::sync::Lazy;
use regex::Regex;

/// `PARTITION BY <expr>(<column>` - the first column inside the first
/// parenthesis after the keyword, on the same line.
static PARTITION_BY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PARTITION\s+BY\s+[^(\r\n]*\(\s*([^)\s,]+)").expect("valid partition regex")
});

/// `CLUSTER BY <c1>, <c2>, ...` up to end of line.
static CLUSTER_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CLUSTER\s+BY\s+([^\r\n]+)").expect("valid cluster regex"));

/// Column lists recovered from an entity's `table_options`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub partition_columns: Vec<String>,
    pub cluster_columns: Vec<String>,
}

impl TableLayout {
    /// Parse partition and cluster directives. Missing clauses leave the
    /// corresponding list empty.
    pub fn parse(table_options: &str) -> Self {
        let partition_columns = PARTITION_BY
            .captures(table_options)
            .map(|caps| vec![caps[1].trim().to_string()])
            .unwrap_or_default();

        let cluster_columns = CLUSTER_BY
            .captures(table_options)
            .map(|caps| {
                caps[1]
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            partition_columns,
            cluster_columns,
        }
    }

    /// `"Y"` when `column` is the partition column, otherwise empty.
    pub fn partition_flag(&self, column: &str) -> String {
        flag(self.partition_columns.iter().any(|c| c == column))
    }

    /// `"Y"` when `column` is one of the cluster columns, otherwise empty.
    pub fn cluster_flag(&self, column: &str) -> String {
        flag(self.cluster_columns.iter().any(|c| c == column))
    }
}

fn flag(set: bool) -> String {
    if set {
        "Y".to_string()
    } else {
        String::new()
    }
}
