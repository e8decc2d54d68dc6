use super::collection::Named;
use super::comments::Commentable;
use super::normalize::{NormalizedClause, Normalizer};
use super::table::Table;
use super::utils::validate_identifier;
use super::{Provenance, Provenanced};
use crate::error::{Error, ObjectKind, Result};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    Truncate,
}

impl TriggerEvent {
    pub fn as_sql(self) -> &'static str {
        match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
            TriggerEvent::Truncate => "TRUNCATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    pub fn as_sql(self) -> &'static str {
        match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerOrientation {
    #[default]
    Row,
    Statement,
}

impl TriggerOrientation {
    pub fn as_sql(self) -> &'static str {
        match self {
            TriggerOrientation::Row => "ROW",
            TriggerOrientation::Statement => "STATEMENT",
        }
    }
}

/// A trigger on a table, executing a function from the table's schema.
#[derive(Debug, Clone)]
pub struct Trigger {
    provenance: Provenance,
    name: String,
    pub event_manipulation: TriggerEvent,
    pub action_timing: TriggerTiming,
    pub action_orientation: TriggerOrientation,
    pub action_condition: Option<String>,
    pub parameters: Vec<String>,
    pub action_reference_old_table: Option<String>,
    pub action_reference_new_table: Option<String>,
    pub function_schema: String,
    pub function_name: String,
    /// Position among the table's triggers for the same event, starting at 1.
    pub action_order: i32,
    pub description: Option<String>,
    normalized_condition: OnceCell<NormalizedClause>,
}

impl Named for Trigger {
    const KIND: ObjectKind = ObjectKind::Trigger;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Trigger {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Trigger {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Trigger {
    pub fn new(
        provenance: Provenance,
        name: impl Into<String>,
        event_manipulation: TriggerEvent,
        action_timing: TriggerTiming,
        function_schema: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_identifier(ObjectKind::Trigger, &name)?;
        Ok(Self {
            provenance,
            name,
            event_manipulation,
            action_timing,
            action_orientation: TriggerOrientation::Row,
            action_condition: None,
            parameters: Vec::new(),
            action_reference_old_table: None,
            action_reference_new_table: None,
            function_schema: function_schema.into(),
            function_name: function_name.into(),
            action_order: 1,
            description: None,
            normalized_condition: OnceCell::new(),
        })
    }

    /// Canonical form of the WHEN condition, computed on first call and
    /// cached. `None` when the trigger has no condition.
    pub fn normalized_condition(
        &self,
        table: &Table,
        normalizer: &dyn Normalizer,
    ) -> Result<Option<&NormalizedClause>> {
        let Some(condition) = &self.action_condition else {
            return Ok(None);
        };
        self.normalized_condition
            .get_or_try_init(|| {
                normalizer
                    .normalize_trigger_condition(&table.column_shapes(), condition)
                    .map_err(|source| Error::Normalization {
                        object: ObjectKind::Trigger,
                        name: self.name.clone(),
                        parent: Some(table.id()),
                        source,
                    })
            })
            .map(Some)
    }

    pub fn is_condition_normalized(&self) -> bool {
        self.normalized_condition.get().is_some()
    }

    /// The condition as compared across trees, normalized when available.
    pub fn comparable_action_condition(&self) -> Option<&str> {
        match self.normalized_condition.get() {
            Some(normalized) => Some(&normalized.text),
            None => self.action_condition.as_deref(),
        }
    }
}
