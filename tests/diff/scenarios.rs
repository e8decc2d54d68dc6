use crate::helpers::fixtures::{add_table, column, database};
use pgmend::diff::diff;
use pgmend::loader::LoadedStructure;
use serde_json::json;

const BILLING_EMPTY_INVOICES: &str = r#"
name: billing
tables:
  invoices: {}
"#;

const BILLING_NULLABLE_AMOUNT: &str = r#"
name: billing
tables:
  invoices:
    columns:
      amount: { data_type: integer }
"#;

#[test]
fn test_configured_only_schema() {
    let database = database(&[BILLING_EMPTY_INVOICES], &LoadedStructure::default());
    let report = diff(&database);

    let configured = &report.configuration["billing"];
    assert!(configured.exists);
    assert!(configured.child("tables", "invoices").unwrap().exists);

    let loaded = &report.database["billing"];
    assert!(!loaded.exists);
    assert!(loaded.attributes.is_empty());
    assert!(loaded.children.is_empty());
}

#[test]
fn test_single_attribute_mismatch() {
    let mut structure = LoadedStructure::default();
    add_table(&mut structure, "billing", "invoices", &[("amount", column("integer", false))]);
    let database = database(&[BILLING_NULLABLE_AMOUNT], &structure);
    let report = diff(&database);

    for (side, value) in [(&report.configuration, true), (&report.database, false)] {
        let amount = side["billing"]
            .child("tables", "invoices")
            .and_then(|t| t.child("columns", "amount"))
            .unwrap();
        assert!(amount.exists);
        assert_eq!(amount.attribute("null").unwrap().value, json!(value));
        assert_eq!(amount.matches("null"), Some(false));
        assert_eq!(amount.mismatched_attributes().collect::<Vec<_>>(), ["null"]);
    }
}

#[test]
fn test_report_serializes_with_two_sides() {
    let database = database(&[BILLING_EMPTY_INVOICES], &LoadedStructure::default());
    let value = serde_json::to_value(diff(&database)).unwrap();

    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["configuration", "database"]);
    assert_eq!(value["database"]["billing"], json!({ "exists": false }));
    assert_eq!(value["configuration"]["billing"]["description"], json!({ "value": null, "matches": false }));
    assert_eq!(
        value["configuration"]["billing"]["tables"]["invoices"]["exists"],
        json!(true)
    );
}
