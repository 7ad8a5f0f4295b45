//! Mapping-specification workbooks.
//!
//! Each workbook has a transformation/sourcing sheet laid out as
//!
//! ```text
//! A3  Table Name   | B3 <entity name>
//! A4  Description  | B4 <entity description>
//! A8  Dependency   | Source Database | Table Name/Dataset Name | Source Column
//!     1..n         | <entity sources>
//!     Table options: <snippet>            (only when present)
//!     #            | Attribute Name | ... | Keys
//!     1..m         | <entity fields>
//! ```
//!
//! plus a `Version Control` sheet with one automated initial-version row.
//! Rows grow with the number of sources and fields.

use chrono::{Local, NaiveDate};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::model::{Entity, Field};
use crate::sink::{ensure_dir, output_path, DocumentSink};

pub const DEFAULT_SHEET_NAME: &str = "Transformation - Sourcing (1)";
pub const VERSION_SHEET_NAME: &str = "Version Control";
pub const DEFAULT_AUTHOR: &str = "Automated";

const NAME_ROW: u32 = 2;
const DESCRIPTION_ROW: u32 = 3;
const SOURCING_HEADER_ROW: u32 = 7;

const SOURCING_HEADERS: [&str; 4] = [
    "Dependency",
    "Source Database",
    "Table Name/Dataset Name",
    "Source Column",
];

/// Transformation table captions, in column order after `#`.
pub const TRANSFORMATION_HEADERS: [&str; 14] = [
    "Attribute Name",
    "Attribute Description",
    "Datatype",
    "Sourced/Derived",
    "Source Table",
    "Source Attribute",
    "Referenced Dimension",
    "Not Null",
    "Default Values",
    "Default Records",
    "Default Records (2)",
    "Clustering",
    "Partitioning",
    "Keys",
];

const VERSION_HEADERS: [&str; 5] = ["Version", "Date", "Change Reference", "Description", "Who By"];

/// Sheet naming and version-control details for generated workbooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XlsxLayout {
    pub sheet_name: String,
    pub author: String,
}

impl Default for XlsxLayout {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Writes `<output_dir>/<entity name>.xlsx`.
#[derive(Debug, Clone)]
pub struct XlsxDocumentSink {
    output_dir: PathBuf,
    layout: XlsxLayout,
    run_date: NaiveDate,
}

impl XlsxDocumentSink {
    pub fn new(output_dir: impl Into<PathBuf>, layout: XlsxLayout) -> Self {
        Self {
            output_dir: output_dir.into(),
            layout,
            run_date: Local::now().date_naive(),
        }
    }

    /// Pin the date written to the version-control sheet.
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn build_workbook(&self, entity: &Entity) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold().set_border(FormatBorder::Thin);

        let sheet = workbook.add_worksheet().set_name(&self.layout.sheet_name)?;
        write_mapping_sheet(sheet, entity, &header)?;

        let versions = workbook.add_worksheet().set_name(VERSION_SHEET_NAME)?;
        write_header_row(versions, 0, 0, &VERSION_HEADERS, &header)?;
        let date = self.run_date.format("%d/%m/%Y").to_string();
        let row = [
            "v0.1",
            date.as_str(),
            "-",
            "Initial Version - Automated",
            self.layout.author.as_str(),
        ];
        for (col, value) in row.iter().enumerate() {
            versions.write_string(1, column(col)?, *value)?;
        }

        Ok(workbook)
    }
}

impl DocumentSink for XlsxDocumentSink {
    fn write_entity(&mut self, entity: &Entity) -> Result<PathBuf, SinkError> {
        ensure_dir(&self.output_dir)?;

        let path = output_path(&self.output_dir, &entity.name, "xlsx");
        let mut workbook = self.build_workbook(entity)?;
        workbook.save(&path)?;

        tracing::info!(
            entity = %entity.name,
            fields = entity.fields.len(),
            path = %path.display(),
            "Wrote mapping workbook"
        );
        Ok(path)
    }
}

fn write_mapping_sheet(sheet: &mut Worksheet, entity: &Entity, header: &Format) -> Result<(), XlsxError> {
    sheet.write_string_with_format(NAME_ROW, 0, "Table Name", header)?;
    sheet.write_string(NAME_ROW, 1, &entity.name)?;
    sheet.write_string_with_format(DESCRIPTION_ROW, 0, "Description", header)?;
    sheet.write_string(DESCRIPTION_ROW, 1, &entity.description)?;

    // Sourcing
    write_header_row(sheet, SOURCING_HEADER_ROW, 0, &SOURCING_HEADERS, header)?;
    for (i, source) in entity.sources.iter().enumerate() {
        let r = SOURCING_HEADER_ROW + 1 + row(i)?;
        sheet.write_number(r, 0, (i + 1) as f64)?;
        sheet.write_string(r, 1, &source.database)?;
        sheet.write_string(r, 2, &source.table)?;
        sheet.write_string(r, 3, &source.column)?;
    }

    // One spare row under the sourcing table, then the options line directly
    // above the transformation header.
    let options_row = SOURCING_HEADER_ROW + row(entity.sources.len().max(1))? + 2;
    if !entity.table_options.is_empty() {
        sheet.write_string(options_row, 0, format!("Table options: {}", entity.table_options))?;
    }

    let transform_header = options_row + 1;
    sheet.write_string_with_format(transform_header, 0, "#", header)?;
    write_header_row(sheet, transform_header, 1, &TRANSFORMATION_HEADERS, header)?;

    for (i, field) in entity.fields.iter().enumerate() {
        let r = transform_header + 1 + row(i)?;
        sheet.write_number(r, 0, (i + 1) as f64)?;
        for (offset, value) in field_cells(field).iter().enumerate() {
            sheet.write_string(r, column(offset + 1)?, value)?;
        }
    }

    sheet.set_column_width(0, 14)?;
    for col in 1..=TRANSFORMATION_HEADERS.len() {
        sheet.set_column_width(column(col)?, 22)?;
    }

    Ok(())
}

/// Cell values for one field, aligned with [`TRANSFORMATION_HEADERS`].
pub fn field_cells(field: &Field) -> [String; 14] {
    [
        field.name.clone(),
        field.description.clone(),
        field.datatype.clone(),
        field.sourcing_label().to_string(),
        field.source_table.clone(),
        field.source_column.clone(),
        field.referenced_entity.clone(),
        field.not_null_label().to_string(),
        field.default_value.clone(),
        field.default_record_1.clone(),
        field.default_record_2.clone(),
        field.cluster_flag.clone(),
        field.partition_flag.clone(),
        field.key_role.to_string(),
    ]
}

fn write_header_row(
    sheet: &mut Worksheet,
    r: u32,
    first_col: usize,
    captions: &[&str],
    header: &Format,
) -> Result<(), XlsxError> {
    for (i, caption) in captions.iter().enumerate() {
        sheet.write_string_with_format(r, column(first_col + i)?, *caption, header)?;
    }
    Ok(())
}

fn row(index: usize) -> Result<u32, XlsxError> {
    u32::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column(index: usize) -> Result<u16, XlsxError> {
    u16::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyRole, SourceLineage};

    fn field() -> Field {
        Field {
            name: "party_id".to_string(),
            description: "Owning party".to_string(),
            datatype: "INT64".to_string(),
            key_role: KeyRole::PrimaryAndForeign,
            referenced_entity: "Party".to_string(),
            sourced: false,
            not_null: true,
            source_table: "crm.parties".to_string(),
            source_column: "id".to_string(),
            partition_flag: String::new(),
            cluster_flag: "Y".to_string(),
            default_value: "-1".to_string(),
            default_record_1: "-1".to_string(),
            default_record_2: "-2".to_string(),
        }
    }

    #[test]
    fn test_field_cells_follow_header_order() {
        let cells = field_cells(&field());

        let by_caption = |caption: &str| {
            let idx = TRANSFORMATION_HEADERS.iter().position(|h| *h == caption).unwrap();
            cells[idx].clone()
        };
        assert_eq!(by_caption("Attribute Name"), "party_id");
        assert_eq!(by_caption("Sourced/Derived"), "Derived");
        assert_eq!(by_caption("Referenced Dimension"), "Party");
        assert_eq!(by_caption("Not Null"), "Y");
        assert_eq!(by_caption("Default Records (2)"), "-2");
        assert_eq!(by_caption("Clustering"), "Y");
        assert_eq!(by_caption("Keys"), "PRIMARY, FOREIGN");
    }

    #[test]
    fn test_write_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let entity = Entity {
            id: "E2".to_string(),
            name: "Account".to_string(),
            description: "Customer accounts".to_string(),
            table_options: "CLUSTER BY party_id".to_string(),
            sources: vec![SourceLineage {
                database: "crm".to_string(),
                table: "accounts".to_string(),
                column: String::new(),
            }],
            partition_columns: vec![],
            cluster_columns: vec!["party_id".to_string()],
            fields: (0..600).map(|_| field()).collect(),
        };

        let mut sink = XlsxDocumentSink::new(dir.path(), XlsxLayout::default())
            .with_run_date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        let path = sink.write_entity(&entity).unwrap();

        assert_eq!(path, dir.path().join("Account.xlsx"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
