use crate::helpers::fixtures::database;
use pgmend::catalog::id::TableRef;
use pgmend::diff::diff;
use pgmend::error::{ConsistencyError, Error};
use pgmend::loader::LoadedStructure;
use pgmend::plan::{ChangeKind, Fragment, MigrationUnit, PlanOptions, order_fragments, plan};
use pgmend::render::migration::render_unit;

const SHOP: &str = r#"
name: shop
tables:
  customers:
    columns:
      id: { data_type: integer, null: false }
    primary_key: { columns: [id] }
  addresses:
    columns:
      id: { data_type: integer, null: false }
      customer_id: { data_type: integer, null: false }
    foreign_keys:
      addresses_customer_fk:
        columns: [customer_id]
        foreign_table: customers
        foreign_columns: [id]
  orders:
    columns:
      id: { data_type: integer, null: false }
      customer_id: { data_type: integer, null: false }
    primary_key: { columns: [id] }
    foreign_keys:
      fk1:
        columns: [customer_id]
        foreign_table: customers
        foreign_columns: [id]
"#;

fn units_for(documents: &[&str]) -> Vec<MigrationUnit> {
    let database = database(documents, &LoadedStructure::default());
    let fragments = plan(&database, &diff(&database), &PlanOptions::default()).unwrap();
    order_fragments(fragments).unwrap()
}

fn names(units: &[MigrationUnit]) -> Vec<&str> {
    units.iter().map(|u| u.name.as_str()).collect()
}

fn position(units: &[MigrationUnit], name: &str) -> usize {
    units.iter().position(|u| u.name == name).unwrap()
}

#[test]
fn test_foreign_key_target_created_first() {
    let units = units_for(&[SHOP]);

    assert_eq!(
        names(&units),
        [
            "create shop schema",
            "create shop.customers table",
            "create shop.addresses table",
            "create shop.orders table",
        ]
    );

    let orders = &units[position(&units, "create shop.orders table")];
    let fk1 = orders
        .fragments()
        .iter()
        .find(|f| f.object_name == "fk1")
        .unwrap();
    assert_eq!(fk1.dependency, Some(TableRef::new("shop", "customers")));
}

#[test]
fn test_every_dependency_created_earlier() {
    let units = units_for(&[SHOP]);

    for (i, unit) in units.iter().enumerate() {
        for dependency in unit.table_dependencies().unwrap() {
            let creator = units
                .iter()
                .position(|u| u.created_tables().any(|t| t == dependency))
                .unwrap();
            assert!(creator < i, "{} runs before {}", unit.name, units[creator].name);
        }
    }
}

#[test]
fn test_cross_schema_cycle_is_deferred() {
    let sales = r#"
name: sales
tables:
  reps:
    columns:
      id: { data_type: integer, null: false }
      region_id: { data_type: integer }
    primary_key: { columns: [id] }
    foreign_keys:
      reps_region_fk:
        columns: [region_id]
        foreign_schema: geo
        foreign_table: regions
        foreign_columns: [id]
"#;
    let geo = r#"
name: geo
tables:
  regions:
    columns:
      id: { data_type: integer, null: false }
      manager_id: { data_type: integer }
    primary_key: { columns: [id] }
    foreign_keys:
      regions_manager_fk:
        columns: [manager_id]
        foreign_schema: sales
        foreign_table: reps
        foreign_columns: [id]
"#;
    let units = units_for(&[sales, geo]);

    assert_eq!(
        names(&units),
        [
            "create geo schema",
            "create sales schema",
            "create geo.regions table",
            "create sales.reps table",
            "add foreign keys to geo.regions",
            "add foreign keys to sales.reps",
        ]
    );
    assert!(units[2].table_dependencies().unwrap().is_empty());
    assert_eq!(units[4].fragments()[0].object_name, "regions_manager_fk");
}

#[test]
fn test_deferred_foreign_key_keeps_its_comment() {
    let cycle = r#"
name: s
tables:
  a:
    columns:
      id: { data_type: integer, null: false }
      b_id: { data_type: integer }
    primary_key: { columns: [id] }
    foreign_keys:
      a_b_fk:
        columns: [b_id]
        foreign_table: b
        foreign_columns: [id]
        description: Owning b
  b:
    columns:
      id: { data_type: integer, null: false }
      a_id: { data_type: integer }
    primary_key: { columns: [id] }
    foreign_keys:
      b_a_fk:
        columns: [a_id]
        foreign_table: a
        foreign_columns: [id]
"#;
    let units = units_for(&[cycle]);
    let sequence: Vec<(usize, ChangeKind, &str)> = units
        .iter()
        .enumerate()
        .flat_map(|(i, unit)| {
            unit.fragments()
                .iter()
                .map(move |f| (i, f.change_kind, f.object_name.as_str()))
        })
        .filter(|(_, _, object)| *object == "a_b_fk")
        .collect();

    let deferred = position(&units, "add foreign keys to s.a");
    assert_eq!(
        sequence,
        [
            (deferred, ChangeKind::AddForeignKey, "a_b_fk"),
            (deferred, ChangeKind::CommentOnConstraint, "a_b_fk"),
        ]
    );
    let table_a = &units[position(&units, "create s.a table")];
    assert!(
        table_a
            .fragments()
            .iter()
            .all(|f| f.change_kind != ChangeKind::CommentOnConstraint)
    );
}

#[test]
fn test_extract_fragments_with_dependency() {
    let mut unit = MigrationUnit::for_table("s", "orders");
    let f0 = Fragment::table("s", "orders", ChangeKind::AddColumn, "f0", "");
    let f1 = Fragment::table("s", "orders", ChangeKind::AddForeignKey, "f1", "")
        .with_dependency(TableRef::new("s", "t1"));
    let f2 = Fragment::table("s", "orders", ChangeKind::AddForeignKey, "f2", "")
        .with_dependency(TableRef::new("s", "t2"));
    for fragment in [f0.clone(), f1.clone(), f2.clone()] {
        unit.add_fragment(fragment).unwrap();
    }

    assert_eq!(unit.dependency_count("s", "t1"), 1);
    assert_eq!(unit.extract_fragments_with_dependency("s", "t1"), vec![f1]);
    assert_eq!(unit.fragments(), [f0, f2]);
    assert!(unit.extract_fragments_with_dependency("s", "t1").is_empty());
    assert_eq!(unit.fragments().len(), 2);
}

#[test]
fn test_empty_unit_has_no_dependencies() {
    let unit = MigrationUnit::for_schema("s");
    let err = unit.table_dependencies().unwrap_err();
    assert!(matches!(err, Error::Consistency(ConsistencyError::NoFragments { .. })));
}

#[test]
fn test_rendered_unit_lists_fragments() {
    let units = units_for(&[SHOP]);
    let body = render_unit(&units[position(&units, "create shop.orders table")]);

    assert!(body.starts_with("-- Migration: create shop.orders table\n"));
    assert!(body.contains("-- create_table: orders\nCREATE TABLE \"shop\".\"orders\" ("));
    assert!(body.contains("-- add_foreign_key: fk1\nALTER TABLE \"shop\".\"orders\" ADD CONSTRAINT \"fk1\""));
}
