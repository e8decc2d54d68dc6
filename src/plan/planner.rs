//! Derives fragments from a diff report.
//!
//! The report decides *whether* something changes (existence and `matches`
//! flags); the trees supply the objects the DDL is rendered from. Changed
//! constraints, indexes and triggers are removed and added again, since
//! PostgreSQL cannot alter them in place. Comments always travel in their
//! own fragments.

use crate::catalog::collection::Named;
use crate::catalog::constraint::{ForeignKeyConstraint, PrimaryKey, UniqueConstraint, Validation};
use crate::catalog::enum_type::EnumType;
use crate::catalog::function::Function;
use crate::catalog::id::TableRef;
use crate::catalog::index::Index;
use crate::catalog::schema::Schema;
use crate::catalog::table::{Column, Table};
use crate::catalog::triggers::Trigger;
use crate::catalog::{Catalog, Database};
use crate::diff::{DiffReport, Node};
use crate::error::Result;
use crate::plan::PlanOptions;
use crate::plan::fragment::{ChangeKind, Fragment};
use crate::render::sql::constraint::constraint_target;
use crate::render::sql::objects::{
    function_target, render_add_enum_value, render_create_enum, render_create_extension,
    render_create_function, render_create_schema, render_create_trigger, render_drop_enum,
    render_drop_extension, render_drop_function, render_drop_schema, render_drop_trigger,
    trigger_target,
};
use crate::render::sql::table::{render_add_column, render_drop_column, render_drop_table};
use crate::render::sql::{
    render_add_check, render_add_foreign_key, render_add_primary_key, render_add_unique,
    render_alter_column, render_create_index, render_create_table, render_drop_constraint,
    render_drop_index,
};
use crate::render::{qualified_name, quote_ident, render_comment_sql};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Plans the fragments that bring the loaded tree in line with the
/// configured one.
///
/// Objects only present in the database are dropped only when
/// `options.remove_unused` is set.
pub fn plan(database: &Database, report: &DiffReport, options: &PlanOptions) -> Result<Vec<Fragment>> {
    let configured = database.configured();
    let loaded = database.loaded();
    let mut planner = Planner {
        options,
        fragments: Vec::new(),
    };

    planner.plan_extensions(configured, loaded);

    let names: BTreeSet<&String> = report
        .configuration
        .keys()
        .chain(report.database.keys())
        .collect();
    for name in names {
        match presence(report.configuration.get(name), report.database.get(name)) {
            Some(Presence::Configured) => planner.create_schema(configured.schema(name)?),
            Some(Presence::Loaded) if options.remove_unused => {
                planner.drop_schema(loaded.schema(name)?)
            }
            Some(Presence::Loaded) => debug!("Keeping unconfigured schema {name}"),
            Some(Presence::Both {
                configured: c_node,
                loaded: l_node,
            }) => planner.update_schema(
                configured.schema(name)?,
                loaded.schema(name)?,
                c_node,
                l_node,
            )?,
            None => {}
        }
    }

    info!("Planned {} fragments", planner.fragments.len());
    Ok(planner.fragments)
}

/// How an entity appears across the two sides of the report.
enum Presence<'n> {
    Configured,
    Loaded,
    Both { configured: &'n Node, loaded: &'n Node },
}

fn presence<'n>(configured: Option<&'n Node>, loaded: Option<&'n Node>) -> Option<Presence<'n>> {
    match (
        configured.filter(|n| n.exists),
        loaded.filter(|n| n.exists),
    ) {
        (Some(configured), Some(loaded)) => Some(Presence::Both { configured, loaded }),
        (Some(_), None) => Some(Presence::Configured),
        (None, Some(_)) => Some(Presence::Loaded),
        (None, None) => None,
    }
}

/// Entries of child collection `name` under two report nodes, in name order.
fn entries<'n>(configured: &'n Node, loaded: &'n Node, name: &str) -> Vec<(&'n str, Presence<'n>)> {
    let c = configured.collection(name);
    let l = loaded.collection(name);
    let keys: BTreeSet<&'n String> = c
        .into_iter()
        .flat_map(|m| m.keys())
        .chain(l.into_iter().flat_map(|m| m.keys()))
        .collect();
    keys.into_iter()
        .filter_map(|key| {
            presence(c.and_then(|m| m.get(key)), l.and_then(|m| m.get(key)))
                .map(|p| (key.as_str(), p))
        })
        .collect()
}

/// Attributes that never force a drop and re-create. A trigger's
/// `action_order` follows from its siblings' names, so it shifts whenever a
/// sibling comes or goes.
const NON_STRUCTURAL: [&str; 2] = ["description", "action_order"];

fn structure_changed(node: &Node) -> bool {
    node.mismatched_attributes()
        .any(|a| !NON_STRUCTURAL.contains(&a))
}

fn description_changed(node: &Node) -> bool {
    node.matches("description") == Some(false)
}

struct Planner<'o> {
    options: &'o PlanOptions,
    fragments: Vec<Fragment>,
}

impl Planner<'_> {
    fn push(&mut self, fragment: Fragment) {
        debug!(
            kind = %fragment.change_kind,
            object = %fragment.object_name,
            "Planned fragment"
        );
        self.fragments.push(fragment);
    }

    /// The object goes away: loaded-only and removal allowed, or changed and
    /// about to be re-added.
    fn removes(&self, presence: &Presence<'_>) -> bool {
        match presence {
            Presence::Loaded => self.options.remove_unused,
            Presence::Both { configured, .. } => structure_changed(configured),
            Presence::Configured => false,
        }
    }

    fn adds(&self, presence: &Presence<'_>) -> bool {
        match presence {
            Presence::Configured => true,
            Presence::Both { configured, .. } => structure_changed(configured),
            Presence::Loaded => false,
        }
    }

    /// Present on both sides with only the description out of date.
    fn recomments(&self, presence: &Presence<'_>) -> bool {
        matches!(presence, Presence::Both { configured, .. }
            if !structure_changed(configured) && description_changed(configured))
    }

    fn plan_extensions(&mut self, configured: &Catalog, loaded: &Catalog) {
        for name in configured.extensions().names() {
            if !loaded.has_extension(name) {
                self.push(Fragment::database(
                    ChangeKind::CreateExtension,
                    name,
                    render_create_extension(name),
                ));
            }
        }
        if self.options.remove_unused {
            for name in loaded.extensions().names() {
                if !configured.has_extension(name) {
                    self.push(Fragment::database(
                        ChangeKind::DropExtension,
                        name,
                        render_drop_extension(name),
                    ));
                }
            }
        }
    }

    // Schemas

    fn create_schema(&mut self, schema: &Schema) {
        let name = schema.name();
        self.push(Fragment::schema(
            name,
            ChangeKind::CreateSchema,
            name,
            render_create_schema(name),
        ));
        if schema.description.is_some() {
            self.comment_on_schema(schema);
        }
        for enum_type in schema.enums().iter() {
            self.create_enum(name, enum_type);
        }
        for function in schema.functions().iter() {
            self.create_function(name, function);
        }
        for table in schema.tables().iter() {
            self.create_table(table);
        }
    }

    fn drop_schema(&mut self, schema: &Schema) {
        let name = schema.name();
        for table in schema.tables().iter() {
            self.drop_table(table);
        }
        for function in schema.functions().iter() {
            self.drop_function(name, function.name());
        }
        for enum_type in schema.enums().iter() {
            self.drop_enum(name, enum_type.name());
        }
        self.push(
            Fragment::schema(name, ChangeKind::DropSchema, name, render_drop_schema(name))
                .with_annotation("schema is not configured"),
        );
    }

    fn update_schema(
        &mut self,
        configured: &Schema,
        loaded: &Schema,
        c_node: &Node,
        l_node: &Node,
    ) -> Result<()> {
        let name = configured.name();
        if description_changed(c_node) {
            self.comment_on_schema(configured);
        }

        for (key, presence) in entries(c_node, l_node, "enums") {
            match presence {
                Presence::Configured => self.create_enum(name, configured.enum_type(key)?),
                Presence::Loaded if self.options.remove_unused => self.drop_enum(name, key),
                Presence::Loaded => {}
                Presence::Both { configured: node, .. } => {
                    self.update_enum(name, configured.enum_type(key)?, loaded.enum_type(key)?, node)
                }
            }
        }

        for (key, presence) in entries(c_node, l_node, "functions") {
            match presence {
                Presence::Configured => self.create_function(name, configured.function(key)?),
                Presence::Loaded if self.options.remove_unused => self.drop_function(name, key),
                Presence::Loaded => {}
                Presence::Both { configured: node, .. } => {
                    self.update_function(name, configured.function(key)?, node)
                }
            }
        }

        for (key, presence) in entries(c_node, l_node, "tables") {
            match presence {
                Presence::Configured => self.create_table(configured.table(key)?),
                Presence::Loaded if self.options.remove_unused => {
                    self.drop_table(loaded.table(key)?)
                }
                Presence::Loaded => debug!("Keeping unconfigured table {name}.{key}"),
                Presence::Both {
                    configured: table_c,
                    loaded: table_l,
                } => self.update_table(configured.table(key)?, loaded.table(key)?, table_c, table_l)?,
            }
        }
        Ok(())
    }

    fn comment_on_schema(&mut self, schema: &Schema) {
        let name = schema.name();
        self.push(Fragment::schema(
            name,
            ChangeKind::CommentOnSchema,
            name,
            render_comment_sql("SCHEMA", &quote_ident(name), schema.description.as_deref()),
        ));
    }

    // Enums and functions

    fn create_enum(&mut self, schema: &str, enum_type: &EnumType) {
        self.push(Fragment::schema(
            schema,
            ChangeKind::CreateEnum,
            enum_type.name(),
            render_create_enum(schema, enum_type),
        ));
        if enum_type.description.is_some() {
            self.comment_on_enum(schema, enum_type);
        }
    }

    fn update_enum(&mut self, schema: &str, configured: &EnumType, loaded: &EnumType, node: &Node) {
        if node.matches("values") == Some(false) {
            match loaded.additions_to_reach(configured.values()) {
                Some(additions) => {
                    for value in additions {
                        self.push(
                            Fragment::schema(
                                schema,
                                ChangeKind::AddEnumValue,
                                configured.name(),
                                render_add_enum_value(
                                    schema,
                                    configured.name(),
                                    configured.values(),
                                    loaded.values(),
                                    value,
                                ),
                            )
                            .with_annotation(format!("adds label '{value}'")),
                        );
                    }
                }
                None => warn!(
                    "Enum {schema}.{} removes or reorders labels ({:?} -> {:?}); \
                     only added labels can be migrated, leaving it unchanged",
                    configured.name(),
                    loaded.values(),
                    configured.values()
                ),
            }
        }
        if description_changed(node) {
            self.comment_on_enum(schema, configured);
        }
    }

    fn drop_enum(&mut self, schema: &str, name: &str) {
        self.push(
            Fragment::schema(schema, ChangeKind::DropEnum, name, render_drop_enum(schema, name))
                .with_annotation("enum is not configured"),
        );
    }

    fn comment_on_enum(&mut self, schema: &str, enum_type: &EnumType) {
        self.push(Fragment::schema(
            schema,
            ChangeKind::CommentOnEnum,
            enum_type.name(),
            render_comment_sql(
                "TYPE",
                &qualified_name(schema, enum_type.name()),
                enum_type.description.as_deref(),
            ),
        ));
    }

    fn create_function(&mut self, schema: &str, function: &Function) {
        self.push(Fragment::schema(
            schema,
            ChangeKind::CreateFunction,
            function.name(),
            render_create_function(schema, function),
        ));
        if function.description.is_some() {
            self.comment_on_function(schema, function);
        }
    }

    fn update_function(&mut self, schema: &str, function: &Function, node: &Node) {
        if node.matches("definition") == Some(false) {
            self.push(Fragment::schema(
                schema,
                ChangeKind::UpdateFunction,
                function.name(),
                render_create_function(schema, function),
            ));
        }
        if description_changed(node) {
            self.comment_on_function(schema, function);
        }
    }

    fn drop_function(&mut self, schema: &str, name: &str) {
        self.push(
            Fragment::schema(
                schema,
                ChangeKind::DropFunction,
                name,
                render_drop_function(schema, name),
            )
            .with_annotation("function is not configured"),
        );
    }

    fn comment_on_function(&mut self, schema: &str, function: &Function) {
        self.push(Fragment::schema(
            schema,
            ChangeKind::CommentOnFunction,
            function.name(),
            render_comment_sql(
                "FUNCTION",
                &function_target(schema, function.name()),
                function.description.as_deref(),
            ),
        ));
    }

    // Tables

    fn create_table(&mut self, table: &Table) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::CreateTable,
            name,
            render_create_table(table),
        ));
        if table.description.is_some() {
            self.comment_on_table(table);
        }
        for column in table.columns().iter() {
            if column.description.is_some() {
                self.comment_on_column(table, column);
            }
        }
        if let Some(primary_key) = table.primary_key_entry()
            && primary_key.description.is_some()
        {
            self.comment_on_constraint(table, primary_key.name(), primary_key.description.as_deref());
        }
        for unique in table.unique_constraints().iter() {
            self.add_unique(table, unique);
        }
        for validation in table.validations().iter() {
            self.add_validation(table, validation);
        }
        for index in table.indexes().iter() {
            self.add_index(table, index);
        }
        for foreign_key in table.foreign_key_constraints().iter() {
            self.add_foreign_key(table, foreign_key);
        }
        for trigger in table.triggers().iter() {
            self.add_trigger(table, trigger);
        }
    }

    /// Foreign keys go first so that tables dropped in the same run don't
    /// block each other.
    fn drop_table(&mut self, table: &Table) {
        let (schema, name) = (table.schema_name(), table.name());
        for foreign_key in table.foreign_key_constraints().iter() {
            self.remove_constraint(table, ChangeKind::RemoveForeignKey, foreign_key.name());
        }
        self.push(
            Fragment::table(
                schema,
                name,
                ChangeKind::DropTable,
                name,
                render_drop_table(schema, name),
            )
            .with_annotation("table is not configured"),
        );
    }

    /// Removals run first, dependents before what they depend on; then
    /// columns; then additions; then description-only comment updates.
    fn update_table(
        &mut self,
        configured: &Table,
        loaded: &Table,
        c_node: &Node,
        l_node: &Node,
    ) -> Result<()> {
        if description_changed(c_node) {
            self.comment_on_table(configured);
        }

        let triggers = entries(c_node, l_node, "triggers");
        let indexes = entries(c_node, l_node, "indexes");
        let validations = entries(c_node, l_node, "validations");
        let uniques = entries(c_node, l_node, "unique_constraints");
        let foreign_keys = entries(c_node, l_node, "foreign_key_constraints");
        let columns = entries(c_node, l_node, "columns");
        let primary_key = presence(c_node.record("primary_key"), l_node.record("primary_key"));

        for (key, presence) in &triggers {
            if self.removes(presence) {
                self.remove_trigger(loaded, key);
            }
        }
        for (key, presence) in &indexes {
            if self.removes(presence) {
                self.remove_index(loaded, key);
            }
        }
        for (key, presence) in &validations {
            if self.removes(presence) {
                self.remove_constraint(loaded, ChangeKind::RemoveValidation, key);
            }
        }
        for (key, presence) in &uniques {
            if self.removes(presence) {
                self.remove_constraint(loaded, ChangeKind::RemoveUniqueConstraint, key);
            }
        }
        for (key, presence) in &foreign_keys {
            if self.removes(presence) {
                self.remove_constraint(loaded, ChangeKind::RemoveForeignKey, key);
            }
        }
        if let Some(presence) = &primary_key
            && self.removes(presence)
            && let Some(existing) = loaded.primary_key_entry()
        {
            self.remove_constraint(loaded, ChangeKind::RemovePrimaryKey, existing.name());
        }

        for (key, presence) in &columns {
            match presence {
                Presence::Configured => self.add_column(configured, configured.column(key)?),
                Presence::Loaded if self.options.remove_unused => self.remove_column(loaded, key),
                Presence::Loaded => debug!("Keeping unconfigured column {}.{key}", loaded.id()),
                Presence::Both { configured: node, .. } => {
                    self.change_column(configured, configured.column(key)?, loaded.column(key)?, node)
                }
            }
        }

        if let Some(presence) = &primary_key {
            if self.adds(presence)
                && let Some(wanted) = configured.primary_key_entry()
            {
                self.add_primary_key(configured, wanted);
            } else if self.recomments(presence)
                && let Some(wanted) = configured.primary_key_entry()
            {
                self.comment_on_constraint(configured, wanted.name(), wanted.description.as_deref());
            }
        }
        for (key, presence) in &uniques {
            let unique = || configured.unique_constraint(key);
            if self.adds(presence) {
                self.add_unique(configured, unique()?);
            } else if self.recomments(presence) {
                self.comment_on_constraint(configured, key, unique()?.description.as_deref());
            }
        }
        for (key, presence) in &validations {
            let validation = || configured.validation(key);
            if self.adds(presence) {
                self.add_validation(configured, validation()?);
            } else if self.recomments(presence) {
                self.comment_on_constraint(configured, key, validation()?.description.as_deref());
            }
        }
        for (key, presence) in &indexes {
            if self.adds(presence) {
                self.add_index(configured, configured.index(key)?);
            } else if self.recomments(presence) {
                self.comment_on_index(configured, configured.index(key)?);
            }
        }
        for (key, presence) in &foreign_keys {
            let foreign_key = || configured.foreign_key_constraint(key);
            if self.adds(presence) {
                self.add_foreign_key(configured, foreign_key()?);
            } else if self.recomments(presence) {
                self.comment_on_constraint(configured, key, foreign_key()?.description.as_deref());
            }
        }
        for (key, presence) in &triggers {
            if self.adds(presence) {
                self.add_trigger(configured, configured.trigger(key)?);
            } else if self.recomments(presence) {
                self.comment_on_trigger(configured, configured.trigger(key)?);
            }
        }
        Ok(())
    }

    fn comment_on_table(&mut self, table: &Table) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::CommentOnTable,
            name,
            render_comment_sql(
                "TABLE",
                &qualified_name(schema, name),
                table.description.as_deref(),
            ),
        ));
    }

    // Columns

    fn add_column(&mut self, table: &Table, column: &Column) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddColumn,
            column.name(),
            render_add_column(schema, name, column),
        ));
        if column.description.is_some() {
            self.comment_on_column(table, column);
        }
    }

    fn change_column(&mut self, table: &Table, configured: &Column, loaded: &Column, node: &Node) {
        let (schema, name) = (table.schema_name(), table.name());
        let statements = render_alter_column(schema, name, configured, loaded);
        if !statements.is_empty() {
            let changed: Vec<&str> = node
                .mismatched_attributes()
                .filter(|a| !NON_STRUCTURAL.contains(a))
                .collect();
            self.push(
                Fragment::table(
                    schema,
                    name,
                    ChangeKind::ChangeColumn,
                    configured.name(),
                    statements.join("\n"),
                )
                .with_annotation(format!("changed: {}", changed.join(", "))),
            );
        }
        if description_changed(node) {
            self.comment_on_column(table, configured);
        }
    }

    fn remove_column(&mut self, table: &Table, column: &str) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(
            Fragment::table(
                schema,
                name,
                ChangeKind::RemoveColumn,
                column,
                render_drop_column(schema, name, column),
            )
            .with_annotation("column is not configured"),
        );
    }

    fn comment_on_column(&mut self, table: &Table, column: &Column) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::CommentOnColumn,
            column.name(),
            render_comment_sql(
                "COLUMN",
                &format!("{}.{}", qualified_name(schema, name), quote_ident(column.name())),
                column.description.as_deref(),
            ),
        ));
    }

    // Constraints

    fn add_primary_key(&mut self, table: &Table, primary_key: &PrimaryKey) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddPrimaryKey,
            primary_key.name(),
            render_add_primary_key(schema, name, primary_key),
        ));
        if primary_key.description.is_some() {
            self.comment_on_constraint(table, primary_key.name(), primary_key.description.as_deref());
        }
    }

    fn add_unique(&mut self, table: &Table, unique: &UniqueConstraint) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddUniqueConstraint,
            unique.name(),
            render_add_unique(schema, name, unique),
        ));
        if unique.description.is_some() {
            self.comment_on_constraint(table, unique.name(), unique.description.as_deref());
        }
    }

    fn add_validation(&mut self, table: &Table, validation: &Validation) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddValidation,
            validation.name(),
            render_add_check(schema, name, validation),
        ));
        if validation.description.is_some() {
            self.comment_on_constraint(table, validation.name(), validation.description.as_deref());
        }
    }

    /// Declares a dependency on the referenced table unless the key points
    /// back at its own table. The key's comment carries the same dependency
    /// so both move together when a cycle is broken.
    fn add_foreign_key(&mut self, table: &Table, foreign_key: &ForeignKeyConstraint) {
        let (schema, name) = (table.schema_name(), table.name());
        let dependency = (foreign_key.foreign_schema != schema
            || foreign_key.foreign_table != name)
            .then(|| TableRef::new(&foreign_key.foreign_schema, &foreign_key.foreign_table));
        let with_dependency = |fragment: Fragment| match &dependency {
            Some(dependency) => fragment.with_dependency(dependency.clone()),
            None => fragment,
        };
        self.push(with_dependency(Fragment::table(
            schema,
            name,
            ChangeKind::AddForeignKey,
            foreign_key.name(),
            render_add_foreign_key(schema, name, foreign_key),
        )));
        if foreign_key.description.is_some() {
            self.push(with_dependency(constraint_comment(
                table,
                foreign_key.name(),
                foreign_key.description.as_deref(),
            )));
        }
    }

    fn remove_constraint(&mut self, table: &Table, kind: ChangeKind, constraint: &str) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            kind,
            constraint,
            render_drop_constraint(schema, name, constraint),
        ));
    }

    fn comment_on_constraint(&mut self, table: &Table, constraint: &str, description: Option<&str>) {
        self.push(constraint_comment(table, constraint, description));
    }

    // Indexes

    fn add_index(&mut self, table: &Table, index: &Index) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddIndex,
            index.name(),
            render_create_index(schema, name, index),
        ));
        if index.description.is_some() {
            self.comment_on_index(table, index);
        }
    }

    fn remove_index(&mut self, table: &Table, index: &str) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::RemoveIndex,
            index,
            render_drop_index(schema, index),
        ));
    }

    fn comment_on_index(&mut self, table: &Table, index: &Index) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::CommentOnIndex,
            index.name(),
            render_comment_sql(
                "INDEX",
                &qualified_name(schema, index.name()),
                index.description.as_deref(),
            ),
        ));
    }

    // Triggers

    fn add_trigger(&mut self, table: &Table, trigger: &Trigger) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::AddTrigger,
            trigger.name(),
            render_create_trigger(schema, name, trigger),
        ));
        if trigger.description.is_some() {
            self.comment_on_trigger(table, trigger);
        }
    }

    fn remove_trigger(&mut self, table: &Table, trigger: &str) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::RemoveTrigger,
            trigger,
            render_drop_trigger(schema, name, trigger),
        ));
    }

    fn comment_on_trigger(&mut self, table: &Table, trigger: &Trigger) {
        let (schema, name) = (table.schema_name(), table.name());
        self.push(Fragment::table(
            schema,
            name,
            ChangeKind::CommentOnTrigger,
            trigger.name(),
            render_comment_sql(
                "TRIGGER",
                &trigger_target(schema, name, trigger.name()),
                trigger.description.as_deref(),
            ),
        ));
    }
}

fn constraint_comment(table: &Table, constraint: &str, description: Option<&str>) -> Fragment {
    let (schema, name) = (table.schema_name(), table.name());
    Fragment::table(
        schema,
        name,
        ChangeKind::CommentOnConstraint,
        constraint,
        render_comment_sql(
            "CONSTRAINT",
            &constraint_target(schema, name, constraint),
            description,
        ),
    )
}
