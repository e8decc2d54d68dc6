use crate::catalog::id::TableRef;
use serde::Serialize;
use std::fmt;

/// Which kind of migration unit a fragment belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitScope {
    Database,
    Schema,
    Table,
}

/// Execution phase, lowest first. Units of an earlier phase are emitted
/// before units of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Extensions,
    Schemas,
    SchemaObjects,
    Tables,
    TableDrops,
    SchemaObjectDrops,
    SchemaDrops,
    ExtensionDrops,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    CreateExtension,
    DropExtension,

    CreateSchema,
    DropSchema,
    CommentOnSchema,

    CreateEnum,
    AddEnumValue,
    DropEnum,
    CommentOnEnum,
    CreateFunction,
    UpdateFunction,
    DropFunction,
    CommentOnFunction,

    CreateTable,
    DropTable,
    CommentOnTable,
    AddColumn,
    ChangeColumn,
    RemoveColumn,
    CommentOnColumn,
    AddPrimaryKey,
    RemovePrimaryKey,
    AddForeignKey,
    RemoveForeignKey,
    AddUniqueConstraint,
    RemoveUniqueConstraint,
    AddValidation,
    RemoveValidation,
    CommentOnConstraint,
    AddIndex,
    RemoveIndex,
    CommentOnIndex,
    AddTrigger,
    RemoveTrigger,
    CommentOnTrigger,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::CreateExtension => "create_extension",
            ChangeKind::DropExtension => "drop_extension",
            ChangeKind::CreateSchema => "create_schema",
            ChangeKind::DropSchema => "drop_schema",
            ChangeKind::CommentOnSchema => "comment_on_schema",
            ChangeKind::CreateEnum => "create_enum",
            ChangeKind::AddEnumValue => "add_enum_value",
            ChangeKind::DropEnum => "drop_enum",
            ChangeKind::CommentOnEnum => "comment_on_enum",
            ChangeKind::CreateFunction => "create_function",
            ChangeKind::UpdateFunction => "update_function",
            ChangeKind::DropFunction => "drop_function",
            ChangeKind::CommentOnFunction => "comment_on_function",
            ChangeKind::CreateTable => "create_table",
            ChangeKind::DropTable => "drop_table",
            ChangeKind::CommentOnTable => "comment_on_table",
            ChangeKind::AddColumn => "add_column",
            ChangeKind::ChangeColumn => "change_column",
            ChangeKind::RemoveColumn => "remove_column",
            ChangeKind::CommentOnColumn => "comment_on_column",
            ChangeKind::AddPrimaryKey => "add_primary_key",
            ChangeKind::RemovePrimaryKey => "remove_primary_key",
            ChangeKind::AddForeignKey => "add_foreign_key",
            ChangeKind::RemoveForeignKey => "remove_foreign_key",
            ChangeKind::AddUniqueConstraint => "add_unique_constraint",
            ChangeKind::RemoveUniqueConstraint => "remove_unique_constraint",
            ChangeKind::AddValidation => "add_validation",
            ChangeKind::RemoveValidation => "remove_validation",
            ChangeKind::CommentOnConstraint => "comment_on_constraint",
            ChangeKind::AddIndex => "add_index",
            ChangeKind::RemoveIndex => "remove_index",
            ChangeKind::CommentOnIndex => "comment_on_index",
            ChangeKind::AddTrigger => "add_trigger",
            ChangeKind::RemoveTrigger => "remove_trigger",
            ChangeKind::CommentOnTrigger => "comment_on_trigger",
        }
    }

    pub fn scope(self) -> UnitScope {
        match self {
            ChangeKind::CreateExtension | ChangeKind::DropExtension => UnitScope::Database,
            ChangeKind::CreateSchema
            | ChangeKind::DropSchema
            | ChangeKind::CommentOnSchema
            | ChangeKind::CreateEnum
            | ChangeKind::AddEnumValue
            | ChangeKind::DropEnum
            | ChangeKind::CommentOnEnum
            | ChangeKind::CreateFunction
            | ChangeKind::UpdateFunction
            | ChangeKind::DropFunction
            | ChangeKind::CommentOnFunction => UnitScope::Schema,
            _ => UnitScope::Table,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            ChangeKind::CreateExtension => Phase::Extensions,
            ChangeKind::CreateSchema | ChangeKind::CommentOnSchema => Phase::Schemas,
            ChangeKind::CreateEnum
            | ChangeKind::AddEnumValue
            | ChangeKind::CommentOnEnum
            | ChangeKind::CreateFunction
            | ChangeKind::UpdateFunction
            | ChangeKind::CommentOnFunction => Phase::SchemaObjects,
            ChangeKind::DropTable => Phase::TableDrops,
            ChangeKind::DropEnum | ChangeKind::DropFunction => Phase::SchemaObjectDrops,
            ChangeKind::DropSchema => Phase::SchemaDrops,
            ChangeKind::DropExtension => Phase::ExtensionDrops,
            _ => Phase::Tables,
        }
    }

    /// Verb used when this kind names a migration unit.
    pub fn unit_verb(self) -> &'static str {
        match self {
            ChangeKind::CreateExtension
            | ChangeKind::CreateSchema
            | ChangeKind::CreateEnum
            | ChangeKind::CreateFunction
            | ChangeKind::CreateTable => "create",
            ChangeKind::DropExtension
            | ChangeKind::DropSchema
            | ChangeKind::DropEnum
            | ChangeKind::DropFunction
            | ChangeKind::DropTable => "drop",
            _ => "update",
        }
    }

    /// Enums and functions, as opposed to the schema itself.
    pub fn is_schema_object(self) -> bool {
        matches!(
            self.phase(),
            Phase::SchemaObjects | Phase::SchemaObjectDrops
        )
    }

    /// Whether applying this change can lose data.
    pub fn is_destructive(self) -> bool {
        matches!(
            self,
            ChangeKind::DropExtension
                | ChangeKind::DropSchema
                | ChangeKind::DropEnum
                | ChangeKind::DropFunction
                | ChangeKind::DropTable
                | ChangeKind::RemoveColumn
        )
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic change. The orderer reads the location, kind and dependency;
/// `annotation` and `payload` are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// `None` only for database-level changes (extensions).
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub change_kind: ChangeKind,
    pub object_name: String,
    pub annotation: Option<String>,
    pub payload: String,
    /// Table that must exist before this fragment is applied.
    pub dependency: Option<TableRef>,
}

impl Fragment {
    pub fn database(
        change_kind: ChangeKind,
        object_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: None,
            table_name: None,
            change_kind,
            object_name: object_name.into(),
            annotation: None,
            payload: payload.into(),
            dependency: None,
        }
    }

    pub fn schema(
        schema_name: impl Into<String>,
        change_kind: ChangeKind,
        object_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: Some(schema_name.into()),
            ..Self::database(change_kind, object_name, payload)
        }
    }

    pub fn table(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        change_kind: ChangeKind,
        object_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: Some(schema_name.into()),
            table_name: Some(table_name.into()),
            ..Self::database(change_kind, object_name, payload)
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_dependency(mut self, dependency: TableRef) -> Self {
        self.dependency = Some(dependency);
        self
    }

    /// The table this fragment creates, if it is a table creation.
    pub fn created_table(&self) -> Option<TableRef> {
        match (self.change_kind, &self.schema_name, &self.table_name) {
            (ChangeKind::CreateTable, Some(schema), Some(table)) => {
                Some(TableRef::new(schema, table))
            }
            _ => None,
        }
    }

    pub fn depends_on(&self, schema_name: &str, table_name: &str) -> bool {
        self.dependency
            .as_ref()
            .is_some_and(|d| d.schema == schema_name && d.table == table_name)
    }
}
