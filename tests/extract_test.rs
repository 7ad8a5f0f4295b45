//! Integration tests for model extraction against a complete design file

use dezmap::extractor::{extract_model, extract_version, list_versions};
use dezmap::{extract_diagrams, extract_file, extract_str, extract_with_diagrams, Entity, KeyRole, SourceLineage};
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/orders.dez")
}

fn fixture() -> String {
    std::fs::read_to_string(fixture_path()).unwrap()
}

fn entity<'a>(entities: &'a [Entity], name: &str) -> &'a Entity {
    entities.iter().find(|e| e.name == name).unwrap()
}

fn lineage(database: &str, table: &str, column: &str) -> SourceLineage {
    SourceLineage {
        database: database.to_string(),
        table: table.to_string(),
        column: column.to_string(),
    }
}

#[test]
fn test_extract_is_deterministic() {
    let xml = fixture();
    assert_eq!(extract_str(&xml).unwrap(), extract_str(&xml).unwrap());
}

#[test]
fn test_entities_in_document_order() {
    let entities = extract_file(fixture_path()).unwrap();

    let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Customer", "SalesOrder", "AuditLog"]);

    let audit = entity(&entities, "AuditLog");
    assert!(audit.fields.is_empty());
    assert_eq!(audit.description, "");
    assert!(audit.sources.is_empty());
}

#[test]
fn test_key_roles_are_exclusive() {
    let entities = extract_str(&fixture()).unwrap();
    let order = entity(&entities, "SalesOrder");

    let roles: Vec<(&str, KeyRole)> = order
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.key_role))
        .take(3)
        .collect();
    assert_eq!(
        roles,
        vec![
            ("order_id", KeyRole::Primary),
            ("customer_id", KeyRole::PrimaryAndForeign),
            ("warehouse_id", KeyRole::None),
        ]
    );

    for field in entities.iter().flat_map(|e| &e.fields) {
        assert_eq!(field.key_role.is_foreign(), !field.referenced_entity.is_empty());
        assert_eq!(field.sourced, !field.key_role.is_foreign());
    }
}

#[test]
fn test_foreign_key_resolves_parent_name() {
    let entities = extract_str(&fixture()).unwrap();
    let customer_id = entity(&entities, "SalesOrder").field("customer_id").unwrap();

    assert_eq!(customer_id.referenced_entity, "Customer");
    assert_eq!(customer_id.sourcing_label(), "Derived");
    assert_eq!(customer_id.key_role.to_string(), "PRIMARY, FOREIGN");
}

#[test]
fn test_dangling_relationship_contributes_nothing() {
    let entities = extract_str(&fixture()).unwrap();
    let warehouse_id = entity(&entities, "SalesOrder").field("warehouse_id").unwrap();

    assert_eq!(warehouse_id.referenced_entity, "");
    assert!(warehouse_id.sourced);
}

#[test]
fn test_entity_lineage_groups_in_index_order() {
    let entities = extract_str(&fixture()).unwrap();

    assert_eq!(
        entity(&entities, "SalesOrder").sources,
        vec![lineage("db1", "A", "col1"), lineage("", "B", "")]
    );
    assert_eq!(
        entity(&entities, "Customer").sources,
        vec![lineage("crm", "customers", "")]
    );
}

#[test]
fn test_field_lineage() {
    let entities = extract_str(&fixture()).unwrap();
    let customer = entity(&entities, "Customer");

    let email = customer.field("email").unwrap();
    assert_eq!(email.source_table, "customers");
    assert_eq!(email.source_column, "email_addr");
    assert_eq!(email.datatype, "STRING");

    let channel = customer.field("signup_channel").unwrap();
    assert_eq!(channel.source_table, "web_signups");
    assert_eq!(channel.source_column, "channel_code");

    let customer_id = customer.field("customer_id").unwrap();
    assert_eq!(customer_id.source_table, "");
    assert_eq!(customer_id.source_column, "");
}

#[test]
fn test_partition_and_cluster_flags() {
    let entities = extract_str(&fixture()).unwrap();
    let order = entity(&entities, "SalesOrder");

    assert_eq!(
        order.table_options,
        "PARTITION BY TIMESTAMP_TRUNC(event_ts, DAY) CLUSTER BY user_id, event_type"
    );
    assert_eq!(order.partition_columns, vec!["event_ts"]);
    assert_eq!(order.cluster_columns, vec!["user_id", "event_type"]);

    assert_eq!(order.field("event_ts").unwrap().partition_flag, "Y");
    assert_eq!(order.field("user_id").unwrap().cluster_flag, "Y");

    let session_id = order.field("session_id").unwrap();
    assert_eq!(session_id.partition_flag, "");
    assert_eq!(session_id.cluster_flag, "");
}

#[test]
fn test_default_values() {
    let entities = extract_str(&fixture()).unwrap();
    let customer = entity(&entities, "Customer");
    let order = entity(&entities, "SalesOrder");

    let start = customer.field("effective_start_utc_timestamp").unwrap();
    assert_eq!(start.default_value, "1900-01-01 00:00:00.0000");
    assert_eq!(start.default_record_1, "1900-01-01 00:00:00.0000");
    assert_eq!(start.default_record_2, "1900-01-01 00:00:00.0000");
    assert!(start.not_null);

    let balance = order.field("balance").unwrap();
    assert_eq!(
        (balance.default_value.as_str(), balance.default_record_1.as_str(), balance.default_record_2.as_str()),
        ("-1", "-1", "-2")
    );

    let location = customer.field("home_location").unwrap();
    assert_eq!(location.datatype, "GEOGRAPHY");
    assert_eq!(location.default_value, "");
    assert_eq!(location.default_record_2, "");

    let notes = order.field("notes").unwrap();
    assert_eq!(notes.datatype, "STRING");
    assert!(!notes.not_null);
}

#[test]
fn test_diagrams() {
    let xml = fixture();
    let document = roxmltree::Document::parse(&xml).unwrap();

    let diagrams = extract_diagrams(&document);
    assert_eq!(diagrams.keys().collect::<Vec<_>>(), vec!["Customers", "Sales"]);
    assert_eq!(diagrams["Sales"], vec!["Customer", "SalesOrder"]);
    assert_eq!(diagrams["Customers"], vec!["Customer"]);

    let (entities, same) = extract_with_diagrams(&xml).unwrap();
    assert_eq!(entities.len(), 3);
    assert_eq!(same, diagrams);
}

#[test]
fn test_saved_versions_are_not_merged() {
    let entities = extract_str(&fixture()).unwrap();

    assert_eq!(entities.len(), 3);
    assert_eq!(entity(&entities, "Customer").fields.len(), 5);

    // foreign key only exists in version 1
    let warehouse_id = entity(&entities, "SalesOrder").field("warehouse_id").unwrap();
    assert_eq!(warehouse_id.key_role, KeyRole::None);
}

#[test]
fn test_extract_saved_version() {
    let xml = fixture();
    let document = roxmltree::Document::parse(&xml).unwrap();

    let labels: Vec<String> = list_versions(&document).iter().map(|v| v.label().to_string()).collect();
    assert_eq!(labels, vec!["1", "current"]);

    let entities = extract_version(&document, Some("1")).unwrap();
    let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Customer", "SalesOrder"]);

    let warehouse_id = entity(&entities, "SalesOrder").field("warehouse_id").unwrap();
    assert_eq!(warehouse_id.datatype, "INT64");
    assert_eq!(warehouse_id.referenced_entity, "Customer");

    let (_, diagrams) = extract_model(&xml, Some("1")).unwrap();
    assert!(diagrams.is_empty());
}
