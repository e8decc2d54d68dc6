use crate::helpers::cli::CliTestHelper;
use crate::helpers::fixtures::{add_schema, add_table, column};
use anyhow::Result;
use pgmend::loader::LoadedStructure;
use predicates::prelude::*;

const BILLING: &str = r#"
name: billing
tables:
  invoices:
    columns:
      amount: { data_type: integer, null: false }
"#;

fn billing_structure() -> LoadedStructure {
    let mut structure = LoadedStructure::default();
    add_table(&mut structure, "billing", "invoices", &[("amount", column("integer", false))]);
    structure
}

#[test]
fn test_diff_reports_missing_schema() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let snapshot = helper.write_snapshot(&LoadedStructure::default())?;

    helper
        .command()
        .arg("diff")
        .arg("--snapshot")
        .arg(&snapshot)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("+ billing"))
        .stdout(predicate::str::contains("1 difference"));

    Ok(())
}

#[test]
fn test_diff_in_sync_exits_zero() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let snapshot = helper.write_snapshot(&billing_structure())?;

    helper
        .command()
        .args(["diff", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("Database matches the schema files"));

    Ok(())
}

#[test]
fn test_diff_reports_changed_attribute() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let mut structure = LoadedStructure::default();
    add_table(&mut structure, "billing", "invoices", &[("amount", column("integer", true))]);
    let snapshot = helper.write_snapshot(&structure)?;

    helper
        .command()
        .args(["diff", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "~ billing.tables.invoices.columns.amount.null: true -> false",
        ));

    Ok(())
}

#[test]
fn test_diff_json_format() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let mut structure = LoadedStructure::default();
    add_schema(&mut structure, "legacy");
    let snapshot = helper.write_snapshot(&structure)?;

    let output = helper
        .command()
        .args(["diff", "--format", "json", "--snapshot"])
        .arg(&snapshot)
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["configuration"]["billing"]["exists"], true);
    assert_eq!(report["database"]["billing"]["exists"], false);
    assert_eq!(report["configuration"]["legacy"]["exists"], false);
    assert_eq!(report["database"]["legacy"]["exists"], true);

    Ok(())
}

#[test]
fn test_diff_respects_schema_filter() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;
    let mut structure = billing_structure();
    add_schema(&mut structure, "legacy");
    let snapshot = helper.write_snapshot(&structure)?;

    helper
        .command()
        .args(["diff", "--exclude-schemas", "legacy", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .success();

    Ok(())
}

#[test]
fn test_diff_without_database_url_fails() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("billing.yaml", BILLING)?;

    helper
        .command()
        .arg("diff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database URL configured"));

    Ok(())
}

#[test]
fn test_diff_reports_invalid_schema_file() -> Result<()> {
    let helper = CliTestHelper::new();
    helper.write_schema_file("broken.yaml", "name: billing\ntabels: {}\n")?;
    let snapshot = helper.write_snapshot(&LoadedStructure::default())?;

    helper
        .command()
        .args(["diff", "--snapshot"])
        .arg(&snapshot)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.yaml"));

    Ok(())
}
