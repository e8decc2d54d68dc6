use crate::helpers::fixtures::{add_primary_key, add_schema, add_table, column, configured, database, loaded};
use pgmend::catalog::Database;
use pgmend::diff::{Node, diff};
use pgmend::loader::LoadedStructure;
use rstest::rstest;

const CRM: &str = r#"
name: crm
description: Customer records
tables:
  accounts:
    columns:
      id: { data_type: integer, null: false }
      name: { data_type: text }
    primary_key: { columns: [id] }
  contacts:
    columns:
      id: { data_type: integer, null: false }
"#;

fn loaded_accounts() -> LoadedStructure {
    let mut structure = LoadedStructure::default();
    add_table(
        &mut structure,
        "crm",
        "accounts",
        &[("id", column("integer", false)), ("name", column("text", true))],
    );
    add_primary_key(&mut structure, "crm", "accounts", "accounts_pkey", &["id"]);
    structure
}

fn accounts_column<'r>(side: &'r std::collections::BTreeMap<String, Node>, name: &str) -> &'r Node {
    side["crm"]
        .child("tables", "accounts")
        .and_then(|t| t.child("columns", name))
        .unwrap()
}

#[test]
fn test_diff_is_idempotent() {
    let database = database(&[CRM], &loaded_accounts());
    let first = diff(&database);
    let second = diff(&database);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_existence_complement() {
    let database = database(&[CRM], &loaded_accounts());
    let report = diff(&database);

    // contacts is configured only
    let configured = report.configuration["crm"].child("tables", "contacts").unwrap();
    let loaded = report.database["crm"].child("tables", "contacts").unwrap();
    assert!(configured.exists);
    assert!(!loaded.exists);

    // accounts exists on both sides, independently
    assert!(report.configuration["crm"].child("tables", "accounts").unwrap().exists);
    assert!(report.database["crm"].child("tables", "accounts").unwrap().exists);
}

#[test]
fn test_loaded_only_entities_exist_only_on_database_side() {
    let mut structure = loaded_accounts();
    add_schema(&mut structure, "legacy");
    let database = database(&[CRM], &structure);
    let report = diff(&database);

    assert!(report.database["legacy"].exists);
    assert!(!report.configuration["legacy"].exists);
}

#[test]
fn test_matching_trees_are_in_sync() {
    let mut structure = loaded_accounts();
    add_table(&mut structure, "crm", "contacts", &[("id", column("integer", false))]);
    structure.schemas.get_mut("crm").unwrap().description = Some("Customer records".to_string());
    let database = database(&[CRM], &structure);
    let report = diff(&database);

    assert!(!report.has_differences(), "{:?}", report.differences());
    assert!(report.configuration["crm"].in_sync());
    assert!(report.database["crm"].in_sync());
}

#[rstest]
#[case::null("{ data_type: text, null: false }", "null")]
#[case::default("{ data_type: text, default: \"'anonymous'::text\" }", "default")]
#[case::description("{ data_type: text, description: Display name }", "description")]
#[case::octet_length("{ data_type: text, character_octet_length: 64 }", "character_octet_length")]
fn test_attribute_isolation(#[case] name_column: &str, #[case] attribute: &str) {
    let document = CRM.replace("name: { data_type: text }", &format!("name: {name_column}"));
    let database = Database::new(configured(&[&document]), loaded(&loaded_accounts())).unwrap();
    let report = diff(&database);

    for side in [&report.configuration, &report.database] {
        let node = accounts_column(side, "name");
        assert_eq!(node.mismatched_attributes().collect::<Vec<_>>(), [attribute]);
        assert!(accounts_column(side, "id").attributes_match());
    }
}

#[test]
fn test_primary_key_compared_as_record() {
    let document = CRM.replace("primary_key: { columns: [id] }", "primary_key: { name: accounts_pk, columns: [id] }");
    let database = Database::new(configured(&[&document]), loaded(&loaded_accounts())).unwrap();
    let report = diff(&database);

    let primary_key = report.configuration["crm"]
        .child("tables", "accounts")
        .and_then(|t| t.record("primary_key"))
        .unwrap();
    assert_eq!(primary_key.mismatched_attributes().collect::<Vec<_>>(), ["name"]);
}
