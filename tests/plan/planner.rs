use crate::helpers::fixtures::{add_foreign_key, add_table, column, database};
use pgmend::catalog::Database;
use pgmend::diff::diff;
use pgmend::loader::LoadedStructure;
use pgmend::loader::structure::{LoadedEnum, LoadedIndex};
use pgmend::plan::{ChangeKind, Fragment, PlanOptions, plan};

const INVOICES: &str = r#"
name: billing
enums:
  invoice_status:
    values: [draft, sent, paid]
tables:
  invoices:
    columns:
      id: { data_type: integer, null: false }
      amount: { data_type: integer }
    indexes:
      invoices_amount_idx:
        columns: [amount]
"#;

fn loaded_invoices() -> LoadedStructure {
    let mut structure = LoadedStructure::default();
    add_table(
        &mut structure,
        "billing",
        "invoices",
        &[("id", column("integer", false)), ("amount", column("integer", true))],
    );
    structure.enums.entry("billing".to_string()).or_default().insert(
        "invoice_status".to_string(),
        LoadedEnum {
            values: vec!["draft".to_string(), "sent".to_string(), "paid".to_string()],
            description: None,
        },
    );
    set_index(&mut structure, LoadedIndex {
        column_names: vec!["amount".to_string()],
        ..Default::default()
    });
    structure
}

fn set_index(structure: &mut LoadedStructure, index: LoadedIndex) {
    structure
        .indexes
        .entry("billing".to_string())
        .or_default()
        .entry("invoices".to_string())
        .or_default()
        .insert("invoices_amount_idx".to_string(), index);
}

fn planned(database: &Database, remove_unused: bool) -> Vec<Fragment> {
    plan(database, &diff(database), &PlanOptions { remove_unused }).unwrap()
}

fn kinds(fragments: &[Fragment]) -> Vec<(ChangeKind, &str)> {
    fragments
        .iter()
        .map(|f| (f.change_kind, f.object_name.as_str()))
        .collect()
}

#[test]
fn test_in_sync_plans_nothing() {
    let database = database(&[INVOICES], &loaded_invoices());
    assert!(planned(&database, true).is_empty());
}

#[test]
fn test_nullability_change() {
    let mut structure = loaded_invoices();
    structure.schemas.get_mut("billing").unwrap().tables.get_mut("invoices").unwrap().columns
        .insert("amount".to_string(), column("integer", false));
    let database = database(&[INVOICES], &structure);

    let fragments = planned(&database, false);
    assert_eq!(kinds(&fragments), [(ChangeKind::ChangeColumn, "amount")]);
    assert_eq!(
        fragments[0].payload,
        "ALTER TABLE \"billing\".\"invoices\" ALTER COLUMN \"amount\" DROP NOT NULL;"
    );
    assert_eq!(fragments[0].annotation.as_deref(), Some("changed: null"));
}

#[test]
fn test_changed_index_is_recreated() {
    let mut structure = loaded_invoices();
    set_index(&mut structure, LoadedIndex {
        column_names: vec!["amount".to_string()],
        unique: true,
        ..Default::default()
    });
    let database = database(&[INVOICES], &structure);

    assert_eq!(
        kinds(&planned(&database, false)),
        [
            (ChangeKind::RemoveIndex, "invoices_amount_idx"),
            (ChangeKind::AddIndex, "invoices_amount_idx"),
        ]
    );
}

#[test]
fn test_description_only_change_is_a_comment() {
    let document = INVOICES.replace(
        "        columns: [amount]\n",
        "        columns: [amount]\n        description: Amount lookups\n",
    );
    let database = database(&[&document], &loaded_invoices());

    let fragments = planned(&database, false);
    assert_eq!(kinds(&fragments), [(ChangeKind::CommentOnIndex, "invoices_amount_idx")]);
    assert_eq!(
        fragments[0].payload,
        "COMMENT ON INDEX \"billing\".\"invoices_amount_idx\" IS 'Amount lookups';"
    );
}

#[test]
fn test_enum_label_added_in_place() {
    let mut structure = loaded_invoices();
    structure.enums.get_mut("billing").unwrap().get_mut("invoice_status").unwrap().values =
        vec!["draft".to_string(), "paid".to_string()];
    let database = database(&[INVOICES], &structure);

    let fragments = planned(&database, false);
    assert_eq!(kinds(&fragments), [(ChangeKind::AddEnumValue, "invoice_status")]);
    assert_eq!(
        fragments[0].payload,
        "ALTER TYPE \"billing\".\"invoice_status\" ADD VALUE 'sent' AFTER 'draft';"
    );
}

#[test]
fn test_reordered_enum_is_left_alone() {
    let mut structure = loaded_invoices();
    structure.enums.get_mut("billing").unwrap().get_mut("invoice_status").unwrap().values =
        vec!["paid".to_string(), "sent".to_string(), "draft".to_string()];
    let database = database(&[INVOICES], &structure);

    assert!(planned(&database, true).is_empty());
}

#[test]
fn test_unconfigured_objects_need_remove_unused() {
    let mut structure = loaded_invoices();
    add_table(
        &mut structure,
        "billing",
        "legacy",
        &[("id", column("integer", false)), ("invoice_id", column("integer", true))],
    );
    add_foreign_key(
        &mut structure,
        ("billing", "legacy", "legacy_invoice_fk"),
        &["invoice_id"],
        ("billing", "invoices"),
        &["id"],
    );
    structure.schemas.get_mut("billing").unwrap().tables.get_mut("invoices").unwrap().columns
        .insert("notes".to_string(), column("text", true));
    let database = database(&[INVOICES], &structure);

    assert!(planned(&database, false).is_empty());
    assert_eq!(
        kinds(&planned(&database, true)),
        [
            (ChangeKind::RemoveColumn, "notes"),
            (ChangeKind::RemoveForeignKey, "legacy_invoice_fk"),
            (ChangeKind::DropTable, "legacy"),
        ]
    );
}

#[test]
fn test_new_table_carries_its_objects() {
    let document = format!(
        "{INVOICES}  payments:
    columns:
      id: {{ data_type: integer, null: false }}
      invoice_id: {{ data_type: integer, null: false }}
    primary_key: {{ columns: [id] }}
    foreign_keys:
      payments_invoice_fk:
        columns: [invoice_id]
        foreign_table: invoices
        foreign_columns: [id]
        on_delete: cascade
    validations:
      payments_id_positive:
        check_clause: id > 0
"
    );
    let database = database(&[&document], &loaded_invoices());

    let fragments = planned(&database, false);
    assert_eq!(
        kinds(&fragments),
        [
            (ChangeKind::CreateTable, "payments"),
            (ChangeKind::AddValidation, "payments_id_positive"),
            (ChangeKind::AddForeignKey, "payments_invoice_fk"),
        ]
    );
    assert!(fragments[0].payload.contains("CONSTRAINT \"payments_pkey\" PRIMARY KEY (\"id\")"));
    assert!(fragments[2].payload.contains("ON DELETE CASCADE"));
    let dependency = fragments[2].dependency.as_ref().unwrap();
    assert_eq!((dependency.schema.as_str(), dependency.table.as_str()), ("billing", "invoices"));
}
