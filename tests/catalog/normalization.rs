use crate::helpers::fixtures::{add_table, column, database};
use pgmend::catalog::collection::Named;
use pgmend::catalog::normalize::{ColumnShape, LexicalNormalizer, NormalizedClause, Normalizer};
use pgmend::diff::diff;
use pgmend::error::{BoxError, Error, ObjectKind};
use pgmend::loader::LoadedStructure;
use pgmend::loader::structure::LoadedValidation;
use pgmend::plan::normalize_for_comparison;
use std::cell::Cell;

const BILLING: &str = r#"
name: billing
tables:
  invoices:
    columns:
      amount: { data_type: integer }
      discount: { data_type: integer }
    validations:
      invoices_amount_positive:
        check_clause: "amount   >  0"
      invoices_discount_bounded:
        check_clause: "(discount <= amount)"
"#;

fn structure(amount_clause: &str) -> LoadedStructure {
    let mut structure = LoadedStructure::default();
    add_table(
        &mut structure,
        "billing",
        "invoices",
        &[("amount", column("integer", true)), ("discount", column("integer", true))],
    );
    let validations = structure
        .validations
        .entry("billing".to_string())
        .or_default()
        .entry("invoices".to_string())
        .or_default();
    for (name, clause) in [
        ("invoices_amount_positive", amount_clause),
        ("invoices_discount_bounded", "(discount <= amount)"),
    ] {
        validations.insert(
            name.to_string(),
            LoadedValidation {
                check_clause: clause.to_string(),
                ..Default::default()
            },
        );
    }
    structure
}

/// Counts calls and fails on clauses containing `reject`.
#[derive(Default)]
struct ScriptedNormalizer {
    calls: Cell<usize>,
}

impl Normalizer for ScriptedNormalizer {
    fn normalize_check_clause(
        &self,
        columns: &[ColumnShape],
        clause: &str,
    ) -> Result<NormalizedClause, BoxError> {
        self.calls.set(self.calls.get() + 1);
        if clause.contains("reject") {
            return Err("syntax error".into());
        }
        LexicalNormalizer.normalize_check_clause(columns, clause)
    }

    fn normalize_trigger_condition(
        &self,
        columns: &[ColumnShape],
        condition: &str,
    ) -> Result<NormalizedClause, BoxError> {
        LexicalNormalizer.normalize_trigger_condition(columns, condition)
    }
}

#[test]
fn test_equivalent_clauses_match_after_normalization() {
    let database = database(&[BILLING], &structure("((amount > 0))"));

    let before = diff(&database);
    let invoices = before.configuration["billing"].child("tables", "invoices").unwrap();
    let amount = invoices.child("validations", "invoices_amount_positive").unwrap();
    assert_eq!(amount.matches("check_clause"), Some(false));

    assert!(normalize_for_comparison(&database, &LexicalNormalizer).is_empty());

    let after = diff(&database);
    assert!(!after.has_differences(), "{:?}", after.differences());
}

#[test]
fn test_identical_clauses_skip_the_oracle() {
    let database = database(&[BILLING], &structure("amount   >  0"));
    let normalizer = ScriptedNormalizer::default();

    assert!(normalize_for_comparison(&database, &normalizer).is_empty());

    assert_eq!(normalizer.calls.get(), 0);
    let invoices = database.configured().schema("billing").unwrap().table("invoices").unwrap();
    assert!(invoices.validations().iter().all(|v| !v.is_normalized()));
}

#[test]
fn test_rejected_clause_names_the_validation() {
    let database = database(&[BILLING], &structure("amount > 0 reject"));
    let normalizer = ScriptedNormalizer::default();

    let failures = normalize_for_comparison(&database, &normalizer);
    assert_eq!(failures.len(), 1);
    let err = &failures[0];
    match err {
        Error::Normalization { object, name, .. } => {
            assert_eq!(*object, ObjectKind::Validation);
            assert_eq!(name, "invoices_amount_positive");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(std::error::Error::source(err).is_some());
}

#[test]
fn test_rejected_clause_leaves_other_pairs_normalized() {
    let mut loaded = structure("amount > 0 reject");
    let discount = loaded
        .validations
        .get_mut("billing")
        .and_then(|tables| tables.get_mut("invoices"))
        .and_then(|validations| validations.get_mut("invoices_discount_bounded"))
        .unwrap();
    discount.check_clause = "discount  <=  amount".to_string();
    let database = database(&[BILLING], &loaded);
    let normalizer = ScriptedNormalizer::default();

    let failures = normalize_for_comparison(&database, &normalizer);
    assert_eq!(failures.len(), 1);

    let invoices = database.loaded().schema("billing").unwrap().table("invoices").unwrap();
    assert!(!invoices.validation("invoices_amount_positive").unwrap().is_normalized());
    assert!(invoices.validation("invoices_discount_bounded").unwrap().is_normalized());

    let report = diff(&database);
    let invoices = report.configuration["billing"].child("tables", "invoices").unwrap();
    let amount = invoices.child("validations", "invoices_amount_positive").unwrap();
    let discount = invoices.child("validations", "invoices_discount_bounded").unwrap();
    assert_eq!(amount.matches("check_clause"), Some(false));
    assert_eq!(discount.matches("check_clause"), Some(true));
}

#[test]
fn test_validation_columns_resolve_lazily() {
    let database = database(&[BILLING], &LoadedStructure::default());
    let invoices = database.configured().schema("billing").unwrap().table("invoices").unwrap();

    let discount = invoices.validation("invoices_discount_bounded").unwrap();
    assert!(discount.explicit_column_names().is_none());
    assert_eq!(
        discount.column_names(invoices, &LexicalNormalizer).unwrap(),
        ["amount", "discount"]
    );
    assert_eq!(discount.comparable_check_clause(), "discount <= amount");
    assert_eq!(discount.name(), "invoices_discount_bounded");
}
