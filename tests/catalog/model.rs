use pgmend::catalog::collection::Named;
use pgmend::catalog::constraint::{ForeignKeyConstraint, PrimaryKey};
use pgmend::catalog::function::Function;
use pgmend::catalog::id::DbObjectId;
use pgmend::catalog::schema::Schema;
use pgmend::catalog::table::{Column, Table};
use pgmend::catalog::triggers::{Trigger, TriggerEvent, TriggerTiming};
use pgmend::catalog::{Catalog, Database, Provenance};
use pgmend::error::{ConsistencyError, Error, ObjectKind};

const CONFIGURED: Provenance = Provenance::Configured;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn table(schema: &str, name: &str, columns: &[&str]) -> Table {
    let mut table = Table::new(CONFIGURED, schema, name).unwrap();
    for column in columns {
        table.add_column(Column::new(CONFIGURED, *column, "integer").unwrap()).unwrap();
    }
    table
}

/// `crm.accounts(id)` and `sales.orders(id, account_id)`.
fn two_schema_catalog() -> Catalog {
    let mut catalog = Catalog::new(CONFIGURED);
    let crm = catalog.add_schema(Schema::new(CONFIGURED, "crm").unwrap()).unwrap();
    crm.add_table(table("crm", "accounts", &["id"])).unwrap();
    let sales = catalog.add_schema(Schema::new(CONFIGURED, "sales").unwrap()).unwrap();
    sales.add_table(table("sales", "orders", &["id", "account_id"])).unwrap();
    catalog
}

mod construction {
    use super::*;

    #[test]
    fn test_identifiers_are_validated() {
        for name in ["", "1st", "has space", "x".repeat(64).as_str()] {
            let result = Table::new(CONFIGURED, "crm", name);
            assert!(
                matches!(result, Err(Error::Validation { object: ObjectKind::Table, .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(Table::new(CONFIGURED, "crm", &"x".repeat(63)).is_ok());
        assert!(Table::new(CONFIGURED, "crm", "_audit$log").is_ok());
    }

    #[test]
    fn test_table_schema_name_is_validated() {
        for schema in ["", "9crm", "crm-2"] {
            let result = Table::new(CONFIGURED, schema, "accounts");
            assert!(
                matches!(result, Err(Error::Validation { object: ObjectKind::Schema, .. })),
                "{schema:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected_with_owner() {
        let mut catalog = two_schema_catalog();
        let err = catalog
            .schema_mut("crm")
            .unwrap()
            .table_mut("accounts")
            .unwrap()
            .add_column(Column::new(CONFIGURED, "id", "bigint").unwrap())
            .unwrap_err();

        match err {
            Error::AlreadyExists { object, name, parent } => {
                assert_eq!(object, ObjectKind::Column);
                assert_eq!(name, "id");
                assert_eq!(parent, Some(DbObjectId::table("crm", "accounts")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lookup_of_missing_entity() {
        let catalog = two_schema_catalog();
        assert!(catalog.has_schema("crm"));
        assert!(!catalog.has_schema("billing"));
        let err = catalog.schema("crm").unwrap().table("contacts").unwrap_err();
        assert!(matches!(err, Error::NotFound { object: ObjectKind::Table, .. }));
        assert!(err.to_string().contains("contacts"));
    }

    #[test]
    fn test_primary_key_columns_must_exist() {
        let mut accounts = table("crm", "accounts", &["id"]);
        let missing = PrimaryKey::new(CONFIGURED, "accounts_pkey", strings(&["uuid"])).unwrap();
        assert!(matches!(
            accounts.set_primary_key(missing),
            Err(Error::Validation { object: ObjectKind::PrimaryKey, .. })
        ));

        accounts.column_mut("id").unwrap().null = false;
        assert!(accounts.has_column("id"));
        let pk = PrimaryKey::new(CONFIGURED, "accounts_pkey", strings(&["id"])).unwrap();
        accounts.set_primary_key(pk).unwrap();
        let second = PrimaryKey::new(CONFIGURED, "accounts_pk2", strings(&["id"])).unwrap();
        assert!(matches!(
            accounts.set_primary_key(second),
            Err(Error::AlreadyExists { object: ObjectKind::PrimaryKey, .. })
        ));
    }

    #[test]
    fn test_mixed_provenance_is_rejected() {
        let mut catalog = Catalog::new(CONFIGURED);
        let loaded = Schema::new(Provenance::Loaded, "crm").unwrap();
        assert!(matches!(
            catalog.add_schema(loaded),
            Err(Error::Consistency(ConsistencyError::MixedProvenance { .. }))
        ));

        let err = Database::new(Catalog::new(CONFIGURED), Catalog::new(CONFIGURED)).unwrap_err();
        assert!(matches!(err, Error::Consistency(ConsistencyError::MixedProvenance { .. })));
    }
}

mod foreign_keys {
    use super::*;

    fn account_fk(columns: &[&str], foreign_columns: &[&str]) -> ForeignKeyConstraint {
        ForeignKeyConstraint::new(
            CONFIGURED,
            "orders_account_id_fkey",
            strings(columns),
            "crm",
            "accounts",
            strings(foreign_columns),
        )
        .unwrap()
    }

    #[test]
    fn test_cross_schema_reference() {
        let mut catalog = two_schema_catalog();
        catalog
            .add_foreign_key_constraint("sales", "orders", account_fk(&["account_id"], &["id"]))
            .unwrap();
        let orders = catalog.schema("sales").unwrap().table("orders").unwrap();
        assert!(orders.has_foreign_key_constraint("orders_account_id_fkey"));
        assert!(!orders.has_unique_constraint("orders_account_id_fkey"));

        let target = DbObjectId::table("crm", "accounts");
        let referencing: Vec<_> = catalog
            .foreign_keys_referencing(&target)
            .map(|(table, fk)| (table.name().to_string(), fk.name().to_string()))
            .collect();
        assert_eq!(
            referencing,
            [("orders".to_string(), "orders_account_id_fkey".to_string())]
        );
    }

    #[test]
    fn test_columns_are_checked_on_both_sides() {
        let mut catalog = two_schema_catalog();
        let local = catalog
            .add_foreign_key_constraint("sales", "orders", account_fk(&["customer_id"], &["id"]))
            .unwrap_err();
        assert!(matches!(local, Error::Validation { object: ObjectKind::ForeignKey, .. }));
        assert!(local.to_string().contains("`customer_id` does not exist on sales.orders"));
        let foreign = catalog
            .add_foreign_key_constraint("sales", "orders", account_fk(&["account_id"], &["uuid"]))
            .unwrap_err();
        assert!(foreign.to_string().contains("`uuid` does not exist on crm.accounts"));
        assert!(
            catalog
                .schema("sales")
                .unwrap()
                .table("orders")
                .unwrap()
                .foreign_key_constraints()
                .is_empty()
        );
    }

    #[test]
    fn test_column_counts_must_agree() {
        let result = ForeignKeyConstraint::new(
            CONFIGURED,
            "orders_account_fkey",
            strings(&["account_id", "id"]),
            "crm",
            "accounts",
            strings(&["id"]),
        );
        assert!(matches!(result, Err(Error::Validation { object: ObjectKind::ForeignKey, .. })));
    }

    #[test]
    fn test_self_reference_needs_distinct_columns() {
        let mut catalog = two_schema_catalog();
        let parent = ForeignKeyConstraint::new(
            CONFIGURED,
            "orders_parent_fkey",
            strings(&["account_id"]),
            "sales",
            "orders",
            strings(&["id"]),
        )
        .unwrap();
        catalog.add_foreign_key_constraint("sales", "orders", parent).unwrap();

        let identity = ForeignKeyConstraint::new(
            CONFIGURED,
            "orders_self_fkey",
            strings(&["id"]),
            "sales",
            "orders",
            strings(&["id"]),
        )
        .unwrap();
        assert!(matches!(
            catalog.add_foreign_key_constraint("sales", "orders", identity),
            Err(Error::Validation { object: ObjectKind::ForeignKey, .. })
        ));
    }
}

mod triggers {
    use super::*;

    fn audit_trigger(function_schema: &str) -> Trigger {
        Trigger::new(
            CONFIGURED,
            "accounts_audit",
            TriggerEvent::Update,
            TriggerTiming::After,
            function_schema,
            "audit",
        )
        .unwrap()
    }

    #[test]
    fn test_function_must_live_in_trigger_schema() {
        let mut catalog = two_schema_catalog();
        catalog
            .schema_mut("sales")
            .unwrap()
            .add_function(Function::new(CONFIGURED, "audit", "BEGIN RETURN NEW; END;").unwrap())
            .unwrap();

        let err = catalog
            .schema_mut("crm")
            .unwrap()
            .add_trigger("accounts", audit_trigger("sales"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Consistency(ConsistencyError::TriggerFunctionSchema { .. })
        ));
    }

    #[test]
    fn test_function_must_be_defined_first() {
        let mut catalog = two_schema_catalog();
        let crm = catalog.schema_mut("crm").unwrap();
        assert!(matches!(
            crm.add_trigger("accounts", audit_trigger("crm")),
            Err(Error::NotFound { object: ObjectKind::Function, .. })
        ));

        crm.add_function(Function::new(CONFIGURED, "audit", "\n  BEGIN RETURN NEW; END;\n").unwrap())
            .unwrap();
        crm.add_trigger("accounts", audit_trigger("crm")).unwrap();

        assert!(crm.has_table("accounts"));
        let accounts = crm.table("accounts").unwrap();
        assert!(accounts.has_trigger("accounts_audit"));
        assert_eq!(accounts.triggers().names().collect::<Vec<_>>(), ["accounts_audit"]);
        assert_eq!(crm.function("audit").unwrap().definition(), "BEGIN RETURN NEW; END;");
    }
}
