use crate::helpers::harness::with_test_db;
use pgmend::catalog::Database;
use pgmend::catalog::constraint::ReferentialAction;
use pgmend::catalog::triggers::{TriggerEvent, TriggerTiming};
use pgmend::config::{ObjectFilter, Objects};
use pgmend::db::{PgNormalizer, introspect};
use pgmend::diff::diff;
use pgmend::loader::build_loaded_catalog;
use pgmend::plan::normalize_for_comparison;
use pgmend::schema_loader::{SchemaDocument, build_configured_catalog};

const SHOP_DDL: &str = r#"
CREATE SCHEMA shop;
CREATE TYPE shop.order_state AS ENUM ('draft', 'sent', 'paid');
CREATE TABLE shop.customers (
    id integer NOT NULL,
    email character varying(255) NOT NULL,
    CONSTRAINT customers_pkey PRIMARY KEY (id),
    CONSTRAINT customers_email_key UNIQUE (email)
);
CREATE TABLE shop.orders (
    id integer NOT NULL,
    customer_id integer NOT NULL,
    amount integer,
    state shop.order_state,
    CONSTRAINT orders_pkey PRIMARY KEY (id),
    CONSTRAINT orders_customer_id_fkey FOREIGN KEY (customer_id)
        REFERENCES shop.customers (id) ON DELETE CASCADE,
    CONSTRAINT orders_amount_positive CHECK (amount > 0)
);
CREATE INDEX orders_customer_idx ON shop.orders (customer_id);
CREATE FUNCTION shop.audit() RETURNS trigger LANGUAGE plpgsql AS $$BEGIN RETURN NEW; END;$$;
CREATE TRIGGER orders_audit AFTER UPDATE ON shop.orders
    FOR EACH ROW WHEN (NEW.amount > 0) EXECUTE FUNCTION shop.audit();
"#;

const SHOP_SCHEMA: &str = r#"
name: shop
enums:
  order_state:
    values: [draft, sent, paid]
functions:
  audit:
    definition: "BEGIN RETURN NEW; END;"
tables:
  customers:
    columns:
      id: { data_type: integer, null: false }
      email: { data_type: "varchar(255)", null: false }
    primary_key:
      columns: [id]
    unique_constraints:
      customers_email_key:
        columns: [email]
  orders:
    columns:
      id: { data_type: integer, null: false }
      customer_id: { data_type: integer, null: false }
      amount: { data_type: integer }
      state: { data_type: shop.order_state }
    primary_key:
      columns: [id]
    foreign_keys:
      orders_customer_id_fkey:
        columns: [customer_id]
        foreign_table: customers
        foreign_columns: [id]
        on_delete: cascade
    validations:
      orders_amount_positive:
        check_clause: "amount > 0"
    indexes:
      orders_customer_idx:
        columns: [customer_id]
    triggers:
      orders_audit:
        event: update
        timing: after
        function: audit
        condition: "NEW.amount > 0"
"#;

fn without_public() -> ObjectFilter {
    let mut objects = Objects::default();
    objects.exclude.schemas.push("public".to_string());
    ObjectFilter::new(&objects)
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_introspects_structure() {
    with_test_db(async |db| {
        db.execute(SHOP_DDL).await;

        let structure = introspect(db.pool()).await.unwrap();

        assert!(!structure.schemas.contains_key("pg_catalog"));
        assert!(!structure.extensions.contains(&"plpgsql".to_string()));

        let orders = &structure.schemas["shop"].tables["orders"];
        let columns: Vec<&str> = orders.columns.keys().map(String::as_str).collect();
        assert_eq!(columns, ["amount", "customer_id", "id", "state"]);
        assert!(!orders.columns["id"].null);
        assert_eq!(orders.columns["state"].data_type, "shop.order_state");
        assert!(orders.columns["state"].is_enum);

        let email = &structure.schemas["shop"].tables["customers"].columns["email"];
        assert_eq!(email.data_type, "character varying(255)");
        assert_eq!(email.character_maximum_length, Some(255));

        assert_eq!(structure.enums["shop"]["order_state"].values, ["draft", "sent", "paid"]);
        assert_eq!(structure.functions["shop"]["audit"].definition, "BEGIN RETURN NEW; END;");

        let keys = &structure.keys["shop"]["orders"];
        assert_eq!(keys.primary_key["orders_pkey"].column_names, ["id"]);
        assert_eq!(keys.primary_key["orders_pkey"].index_type.as_deref(), Some("btree"));
        let fk = &keys.foreign_key["orders_customer_id_fkey"];
        assert_eq!(fk.foreign_schema.as_deref(), Some("shop"));
        assert_eq!(fk.foreign_table.as_deref(), Some("customers"));
        assert_eq!(fk.foreign_column_names, ["id"]);
        assert_eq!(fk.on_delete, ReferentialAction::Cascade);
        assert_eq!(fk.on_update, ReferentialAction::NoAction);
        assert!(structure.keys["shop"]["customers"].unique.contains_key("customers_email_key"));

        let check = &structure.validations["shop"]["orders"]["orders_amount_positive"];
        assert_eq!(check.column_names, ["amount"]);
        assert!(check.check_clause.contains("amount > 0"));

        // Constraint-backed indexes are reported with their constraint only
        let indexes = &structure.indexes["shop"]["orders"];
        assert_eq!(indexes.keys().collect::<Vec<_>>(), ["orders_customer_idx"]);
        assert_eq!(indexes["orders_customer_idx"].column_names, ["customer_id"]);

        let trigger = &structure.triggers["shop"]["orders"]["orders_audit"];
        assert_eq!(trigger.event_manipulation, TriggerEvent::Update);
        assert_eq!(trigger.action_timing, TriggerTiming::After);
        assert_eq!(trigger.function.name, "audit");
        assert!(trigger.action_condition.is_some());
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_matching_schema_files_are_in_sync() {
    with_test_db(async |db| {
        db.execute(SHOP_DDL).await;

        let filter = without_public();
        let structure = filter.filter_structure(introspect(db.pool()).await.unwrap());
        let document: SchemaDocument = serde_yaml::from_str(SHOP_SCHEMA).unwrap();
        let configured = build_configured_catalog(&[document], &[], &filter).unwrap();
        let database = Database::new(configured, build_loaded_catalog(&structure).unwrap()).unwrap();

        let normalizer = PgNormalizer::connect(db.url()).await.unwrap();
        assert!(normalize_for_comparison(&database, &normalizer).is_empty());
        normalizer.close().await;

        let report = diff(&database);
        assert!(!report.has_differences(), "{:#?}", report.differences());
    })
    .await;
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_drift_is_reported() {
    with_test_db(async |db| {
        db.execute(SHOP_DDL).await;
        db.execute("ALTER TABLE shop.orders ALTER COLUMN amount SET NOT NULL").await;
        db.execute("CREATE TABLE shop.legacy (note text)").await;

        let filter = without_public();
        let structure = filter.filter_structure(introspect(db.pool()).await.unwrap());
        let document: SchemaDocument = serde_yaml::from_str(SHOP_SCHEMA).unwrap();
        let configured = build_configured_catalog(&[document], &[], &filter).unwrap();
        let database = Database::new(configured, build_loaded_catalog(&structure).unwrap()).unwrap();

        let normalizer = PgNormalizer::connect(db.url()).await.unwrap();
        assert!(normalize_for_comparison(&database, &normalizer).is_empty());
        normalizer.close().await;

        let lines: Vec<String> = diff(&database)
            .differences()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            [
                "- shop.tables.legacy",
                "~ shop.tables.orders.columns.amount.null: false -> true",
            ]
        );
    })
    .await;
}
