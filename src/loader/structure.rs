//! Plain nested data describing a database, as produced by introspection and
//! stored in snapshots.

use crate::catalog::constraint::ReferentialAction;
use crate::catalog::index::{IndexType, NullsPosition, SortOrder};
use crate::catalog::triggers::{TriggerEvent, TriggerOrientation, TriggerTiming};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type BySchema<T> = BTreeMap<String, T>;
pub type ByTable<T> = BTreeMap<String, BTreeMap<String, T>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedStructure {
    pub schemas: BySchema<LoadedSchema>,
    /// schema -> enum name -> enum
    pub enums: BySchema<BTreeMap<String, LoadedEnum>>,
    /// schema -> function name -> trigger function, including ones no
    /// trigger calls yet
    pub functions: BySchema<BTreeMap<String, LoadedFunctionBody>>,
    pub extensions: Vec<String>,
    /// schema -> table -> keys by kind
    pub keys: BySchema<BTreeMap<String, LoadedKeys>>,
    /// schema -> table -> trigger name -> trigger
    pub triggers: BySchema<ByTable<LoadedTrigger>>,
    /// schema -> table -> validation name -> validation
    pub validations: BySchema<ByTable<LoadedValidation>>,
    /// schema -> table -> index name -> index
    pub indexes: BySchema<ByTable<LoadedIndex>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedSchema {
    pub description: Option<String>,
    pub tables: BTreeMap<String, LoadedTable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedTable {
    pub description: Option<String>,
    pub columns: BTreeMap<String, LoadedColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedColumn {
    pub data_type: String,
    pub null: bool,
    pub default: Option<String>,
    pub description: Option<String>,
    pub character_maximum_length: Option<i32>,
    pub character_octet_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_precision_radix: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub datetime_precision: Option<i32>,
    pub interval_type: Option<String>,
    pub is_enum: bool,
    pub is_array: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedEnum {
    pub values: Vec<String>,
    pub description: Option<String>,
}

/// Keys of one table, grouped by constraint kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedKeys {
    pub primary_key: BTreeMap<String, LoadedKey>,
    pub foreign_key: BTreeMap<String, LoadedKey>,
    pub unique: BTreeMap<String, LoadedKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedKey {
    pub column_names: Vec<String>,
    pub foreign_schema: Option<String>,
    pub foreign_table: Option<String>,
    pub foreign_column_names: Vec<String>,
    pub deferrable: bool,
    pub initially_deferred: bool,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
    pub description: Option<String>,
    pub index_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedTrigger {
    pub action_timing: TriggerTiming,
    pub event_manipulation: TriggerEvent,
    pub action_order: i32,
    #[serde(default)]
    pub action_condition: Option<String>,
    #[serde(default)]
    pub parameters: Vec<String>,
    pub function: LoadedFunction,
    #[serde(default)]
    pub action_orientation: TriggerOrientation,
    #[serde(default)]
    pub action_reference_old_table: Option<String>,
    #[serde(default)]
    pub action_reference_new_table: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedFunction {
    pub schema: String,
    pub name: String,
    pub definition: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedFunctionBody {
    pub definition: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedValidation {
    pub column_names: Vec<String>,
    pub check_clause: String,
    pub description: Option<String>,
    pub deferrable: bool,
    pub initially_deferred: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadedIndex {
    pub column_names: Vec<String>,
    pub include_column_names: Vec<String>,
    pub unique: bool,
    pub index_type: IndexType,
    pub order: SortOrder,
    pub nulls_position: Option<NullsPosition>,
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    pub description: Option<String>,
}
