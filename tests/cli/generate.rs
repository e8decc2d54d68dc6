use crate::helpers::cli::CliTestHelper;
use crate::helpers::fixtures::{add_table, column};
use anyhow::Result;
use pgmend::loader::LoadedStructure;
use predicates::prelude::*;

const BILLING: &str = r#"
name: billing
tables:
  invoices:
    columns:
      id: { data_type: integer, null: false }
      amount: { data_type: integer }
    primary_key:
      columns: [id]
"#;

#[test]
fn test_generate_writes_ordered_files() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let snapshot = helper.write_snapshot(&LoadedStructure::default())?;

    helper
        .command()
        .args(["generate", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let files = helper.migration_files()?;
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("01_create_billing_schema.sql"), "{files:?}");
    assert!(files[1].ends_with("02_create_billing_invoices_table.sql"), "{files:?}");
    assert_eq!(files[0][..14], files[1][..14]);

    let schema_sql = helper.read_migration(&files[0])?;
    assert!(schema_sql.starts_with("-- Migration: create billing schema\n"));
    assert!(schema_sql.contains("CREATE SCHEMA \"billing\";"));

    let table_sql = helper.read_migration(&files[1])?;
    assert!(table_sql.contains("CREATE TABLE \"billing\".\"invoices\" ("));
    assert!(table_sql.contains("CONSTRAINT \"invoices_pkey\" PRIMARY KEY (\"id\")"));

    Ok(())
}

#[test]
fn test_generate_dry_run_prints_without_writing() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let snapshot = helper.write_snapshot(&LoadedStructure::default())?;

    helper
        .command()
        .args(["generate", "--dry-run", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("-- Migration: create billing schema"))
        .stdout(predicate::str::contains("-- Migration: create billing.invoices table"));

    assert!(!helper.migrations_dir().exists());
    Ok(())
}

#[test]
fn test_generate_up_to_date() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file(
        "billing.yaml",
        "name: billing\ntables:\n  invoices:\n    columns:\n      amount: { data_type: integer }\n",
    )?;
    let mut structure = LoadedStructure::default();
    add_table(&mut structure, "billing", "invoices", &[("amount", column("integer", true))]);
    let snapshot = helper.write_snapshot(&structure)?;

    helper
        .command()
        .args(["generate", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));

    assert!(helper.migration_files()?.is_empty());
    Ok(())
}

#[test]
fn test_generate_remove_unused() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file(
        "billing.yaml",
        "name: billing\ntables:\n  invoices:\n    columns:\n      amount: { data_type: integer }\n",
    )?;
    let mut structure = LoadedStructure::default();
    add_table(&mut structure, "billing", "invoices", &[("amount", column("integer", true))]);
    add_table(&mut structure, "billing", "legacy", &[("note", column("text", true))]);
    let snapshot = helper.write_snapshot(&structure)?;

    // Without the flag the unused table is left alone
    helper
        .command()
        .args(["generate", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));
    assert!(helper.migration_files()?.is_empty());

    helper
        .command()
        .args(["generate", "--remove-unused", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success();

    let files = helper.migration_files()?;
    assert_eq!(files.len(), 1);
    let sql = helper.read_migration(&files[0])?;
    assert!(sql.contains("DROP TABLE \"billing\".\"legacy\";"));
    assert!(sql.contains("-- WARNING: destructive change"));
    Ok(())
}

#[test]
fn test_generate_uses_configured_directories() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_config("directories:\n  schema_dir: definitions\n  migrations_dir: db/changes\n")?;
    std::fs::create_dir_all(helper.project_root.join("definitions"))?;
    std::fs::write(helper.project_root.join("definitions/billing.yaml"), BILLING)?;
    let snapshot = helper.write_snapshot(&LoadedStructure::default())?;

    helper
        .command()
        .args(["generate", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success();

    let written = std::fs::read_dir(helper.project_root.join("db/changes"))?.count();
    assert_eq!(written, 2);
    assert!(!helper.migrations_dir().exists());
    Ok(())
}
