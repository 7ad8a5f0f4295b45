//! Default-value policy for mapping documents.
//!
//! Effective-dating columns are recognized by name before the datatype table
//! is consulted, so `effective_start_*` and `effective_end_*` get their fixed
//! timestamps whatever their declared type.

use crate::model::DefaultValues;

const START_OF_TIME: &str = "1900-01-01 00:00:00.0000";
const END_OF_TIME: &str = "9999-12-31 23:59:59.9999";
const FIRST_DATE: &str = "1900-01-01";
const LAST_DATE: &str = "9999-12-31";

/// Triple used for `effective_start` columns.
pub fn effective_start_defaults() -> DefaultValues {
    DefaultValues::new(START_OF_TIME, START_OF_TIME, START_OF_TIME)
}

/// Triple used for `effective_end` columns.
pub fn effective_end_defaults() -> DefaultValues {
    DefaultValues::new(END_OF_TIME, END_OF_TIME, END_OF_TIME)
}

/// Defaults for a normalized datatype, `None` when the type is not covered.
pub fn datatype_defaults(datatype: &str) -> Option<DefaultValues> {
    let defaults = match datatype.trim().to_ascii_uppercase().as_str() {
        "TIMESTAMP" | "DATETIME" => DefaultValues::new(START_OF_TIME, START_OF_TIME, END_OF_TIME),
        "DATE" => DefaultValues::new(FIRST_DATE, FIRST_DATE, LAST_DATE),
        "INT64" => DefaultValues::new("-1", "-1", "-2"),
        "STRING" => DefaultValues::new("", "", ""),
        "BOOL" => DefaultValues::new("NULL", "NULL", "NULL"),
        "NUMERIC" => DefaultValues::new("0", "0", "0"),
        "FLOAT64" => DefaultValues::new("0.0", "0.0", "0.0"),
        _ => return None,
    };
    Some(defaults)
}

/// Resolve the default triple for a column.
pub fn resolve_defaults(column_name: &str, datatype: &str) -> DefaultValues {
    let lower = column_name.to_ascii_lowercase();

    if lower.contains("effective_start") {
        effective_start_defaults()
    } else if lower.contains("effective_end") {
        effective_end_defaults()
    } else {
        datatype_defaults(datatype).unwrap_or_else(DefaultValues::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_start_overrides_datatype() {
        let expected = DefaultValues::new(START_OF_TIME, START_OF_TIME, START_OF_TIME);

        assert_eq!(resolve_defaults("effective_start_utc_timestamp", "TIMESTAMP"), expected);
        assert_eq!(resolve_defaults("EFFECTIVE_START_DATE", "DATE"), expected);
        assert_eq!(resolve_defaults("effective_start_utc_timestamp", "GEOGRAPHY"), expected);
    }

    #[test]
    fn test_effective_end() {
        let defaults = resolve_defaults("effective_end_utc_timestamp", "TIMESTAMP");
        assert_eq!(defaults.default_value, END_OF_TIME);
        assert_eq!(defaults.default_record_2, END_OF_TIME);
    }

    #[test]
    fn test_by_datatype() {
        assert_eq!(resolve_defaults("balance", "INT64"), DefaultValues::new("-1", "-1", "-2"));
        assert_eq!(
            resolve_defaults("created_at", "TIMESTAMP"),
            DefaultValues::new(START_OF_TIME, START_OF_TIME, END_OF_TIME)
        );
        assert_eq!(resolve_defaults("load_date", "date"), DefaultValues::new(FIRST_DATE, FIRST_DATE, LAST_DATE));
        assert_eq!(resolve_defaults("is_active", "BOOL").default_value, "NULL");
    }

    #[test]
    fn test_unrecognized_datatype_is_empty() {
        assert_eq!(resolve_defaults("area", "GEOGRAPHY"), DefaultValues::new("", "", ""));
        assert!(datatype_defaults("GEOGRAPHY").is_none());
    }
}
