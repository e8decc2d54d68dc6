//! Attributes the differencing engine reports for each entity.

use crate::catalog::collection::Named;
use crate::catalog::constraint::{ForeignKeyConstraint, PrimaryKey, UniqueConstraint, Validation};
use crate::catalog::enum_type::EnumType;
use crate::catalog::function::Function;
use crate::catalog::index::Index;
use crate::catalog::schema::Schema;
use crate::catalog::table::{Column, Table};
use crate::catalog::triggers::Trigger;
use crate::diff::node::Tracked;
use serde_json::{Value, json};

impl Tracked for Schema {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![("description", json!(self.description))]
    }
}

impl Tracked for Table {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![("description", json!(self.description))]
    }
}

impl Tracked for Column {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("data_type", json!(self.data_type)),
            ("null", json!(self.null)),
            ("default", json!(self.default)),
            ("description", json!(self.description)),
            (
                "character_maximum_length",
                json!(self.character_maximum_length),
            ),
            ("character_octet_length", json!(self.character_octet_length)),
            ("numeric_precision", json!(self.numeric_precision)),
            ("numeric_precision_radix", json!(self.numeric_precision_radix)),
            ("numeric_scale", json!(self.numeric_scale)),
            ("datetime_precision", json!(self.datetime_precision)),
            ("interval_type", json!(self.interval_type)),
        ]
    }
}

impl Tracked for PrimaryKey {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", json!(self.name())),
            ("column_names", json!(self.column_names())),
            ("index_type", json!(self.index_type)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for ForeignKeyConstraint {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("column_names", json!(self.column_names())),
            ("foreign_schema_name", json!(self.foreign_schema)),
            ("foreign_table_name", json!(self.foreign_table)),
            ("foreign_column_names", json!(self.foreign_column_names())),
            ("deferrable", json!(self.deferrable)),
            ("initially_deferred", json!(self.initially_deferred)),
            ("on_update", json!(self.on_update)),
            ("on_delete", json!(self.on_delete)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for UniqueConstraint {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("column_names", json!(self.column_names())),
            ("index_type", json!(self.index_type)),
            ("deferrable", json!(self.deferrable)),
            ("initially_deferred", json!(self.initially_deferred)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for Validation {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("check_clause", json!(self.comparable_check_clause())),
            ("deferrable", json!(self.deferrable)),
            ("initially_deferred", json!(self.initially_deferred)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for Index {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("column_names", json!(self.column_names())),
            ("unique", json!(self.unique)),
            ("index_type", json!(self.index_type)),
            ("order", json!(self.order)),
            ("nulls_position", json!(self.nulls_position)),
            ("where", json!(self.where_clause)),
            ("include_column_names", json!(self.include_column_names)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for Trigger {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("event_manipulation", json!(self.event_manipulation)),
            ("action_timing", json!(self.action_timing)),
            ("action_orientation", json!(self.action_orientation)),
            ("action_order", json!(self.action_order)),
            ("action_condition", json!(self.comparable_action_condition())),
            ("parameters", json!(self.parameters)),
            (
                "action_reference_old_table",
                json!(self.action_reference_old_table),
            ),
            (
                "action_reference_new_table",
                json!(self.action_reference_new_table),
            ),
            ("function_name", json!(self.function_name)),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for Function {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("definition", json!(self.definition())),
            ("description", json!(self.description)),
        ]
    }
}

impl Tracked for EnumType {
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("values", json!(self.values())),
            ("description", json!(self.description)),
        ]
    }
}
