//! Entity and field records produced by the extractor.
//!
//! These are the only types handed to a document sink. Every field is fully
//! populated at construction time; nothing is computed lazily.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A modeled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Raw DDL-like snippet carrying partition/cluster directives
    pub table_options: String,
    /// Upstream sources, ordered by the group index of their properties
    pub sources: Vec<SourceLineage>,
    /// Column captured from the `PARTITION BY` clause of `table_options`
    pub partition_columns: Vec<String>,
    /// Columns captured from the `CLUSTER BY` clause of `table_options`
    pub cluster_columns: Vec<String>,
    /// Columns in document order
    pub fields: Vec<Field>,
}

impl Entity {
    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Convert entity to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert entity to pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert entity to NDJSON line (newline-delimited JSON)
    pub fn to_ndjson_line(&self) -> Result<String, serde_json::Error> {
        let json = self.to_json()?;
        Ok(format!("{}\n", json))
    }
}

/// A modeled column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub description: String,
    pub datatype: String,
    pub key_role: KeyRole,
    /// Parent entity name when `key_role` includes FOREIGN
    pub referenced_entity: String,
    pub sourced: bool,
    pub not_null: bool,
    pub source_table: String,
    pub source_column: String,
    pub partition_flag: String,
    pub cluster_flag: String,
    pub default_value: String,
    pub default_record_1: String,
    pub default_record_2: String,
}

impl Field {
    /// Caption used in the `Sourced/Derived` column of a mapping document.
    pub fn sourcing_label(&self) -> &'static str {
        if self.sourced {
            "Sourced"
        } else {
            "Derived"
        }
    }

    /// The resolved default triple as one value.
    pub fn defaults(&self) -> DefaultValues {
        DefaultValues::new(
            self.default_value.clone(),
            self.default_record_1.clone(),
            self.default_record_2.clone(),
        )
    }

    /// `Y`/`N` caption for the `Not Null` column.
    pub fn not_null_label(&self) -> &'static str {
        if self.not_null {
            "Y"
        } else {
            "N"
        }
    }
}

/// Participation of a field in its entity's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Foreign,
    PrimaryAndForeign,
}

impl KeyRole {
    /// Four-way rule over primary-key and foreign-key membership.
    pub fn from_membership(is_primary: bool, is_foreign: bool) -> Self {
        match (is_primary, is_foreign) {
            (true, true) => KeyRole::PrimaryAndForeign,
            (true, false) => KeyRole::Primary,
            (false, true) => KeyRole::Foreign,
            (false, false) => KeyRole::None,
        }
    }

    pub fn is_primary(self) -> bool {
        matches!(self, KeyRole::Primary | KeyRole::PrimaryAndForeign)
    }

    pub fn is_foreign(self) -> bool {
        matches!(self, KeyRole::Foreign | KeyRole::PrimaryAndForeign)
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::None => Ok(()),
            KeyRole::Primary => write!(f, "PRIMARY"),
            KeyRole::Foreign => write!(f, "FOREIGN"),
            KeyRole::PrimaryAndForeign => write!(f, "PRIMARY, FOREIGN"),
        }
    }
}

/// One (database, table, column) lineage triple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLineage {
    pub database: String,
    pub table: String,
    pub column: String,
}

/// Default-value triple written to each mapping document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultValues {
    pub default_value: String,
    pub default_record_1: String,
    pub default_record_2: String,
}

impl DefaultValues {
    pub fn new(
        default_value: impl Into<String>,
        default_record_1: impl Into<String>,
        default_record_2: impl Into<String>,
    ) -> Self {
        Self {
            default_value: default_value.into(),
            default_record_1: default_record_1.into(),
            default_record_2: default_record_2.into(),
        }
    }

    /// Three empty strings, used for unrecognized datatypes.
    pub fn empty() -> Self {
        Self::default()
    }
}
