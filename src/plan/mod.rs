//! From a diff report to ordered migration units.
//!
//! [`planner::plan`] turns the report into fragments, one per atomic change;
//! [`order::order_fragments`] groups and sequences them.

pub mod fragment;
pub mod order;
pub mod planner;
pub mod unit;

pub use fragment::{ChangeKind, Fragment, Phase, UnitScope};
pub use order::order_fragments;
pub use planner::plan;
pub use unit::MigrationUnit;

use crate::catalog::Database;
use crate::catalog::collection::Named;
use crate::catalog::normalize::Normalizer;
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Policy knobs for [`planner::plan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Drop loaded objects that have no configured counterpart.
    pub remove_unused: bool,
}

/// Normalizes validations and trigger conditions present on both sides
/// whose raw text differs, so the diff compares canonical forms.
///
/// Pairs whose text is already identical are left alone and cost no oracle
/// round trip. An object the oracle rejects keeps its raw text and its
/// error is returned; every other pair is still normalized.
pub fn normalize_for_comparison(database: &Database, normalizer: &dyn Normalizer) -> Vec<Error> {
    let mut normalized = 0usize;
    let mut failures = Vec::new();
    let mut record = |outcome: Result<()>| match outcome {
        Ok(()) => normalized += 1,
        Err(err) => {
            warn!("{err}: {}", error_source(&err));
            failures.push(err);
        }
    };

    for configured_schema in database.configured().schemas().iter() {
        let Some(loaded_schema) = database.loaded().schemas().find(configured_schema.name()) else {
            continue;
        };
        for configured_table in configured_schema.tables().iter() {
            let Some(loaded_table) = loaded_schema.tables().find(configured_table.name()) else {
                continue;
            };

            for validation in configured_table.validations().iter() {
                if let Some(other) = loaded_table.validations().find(validation.name())
                    && validation.check_clause != other.check_clause
                {
                    record(
                        validation
                            .normalized(configured_table, normalizer)
                            .and_then(|_| other.normalized(loaded_table, normalizer))
                            .map(drop),
                    );
                }
            }

            for trigger in configured_table.triggers().iter() {
                if let Some(other) = loaded_table.triggers().find(trigger.name())
                    && trigger.action_condition.is_some()
                    && other.action_condition.is_some()
                    && trigger.action_condition != other.action_condition
                {
                    record(
                        trigger
                            .normalized_condition(configured_table, normalizer)
                            .and_then(|_| other.normalized_condition(loaded_table, normalizer))
                            .map(drop),
                    );
                }
            }
        }
    }

    debug!(
        "Normalized {normalized} expression pairs before comparison, {} failed",
        failures.len()
    );
    failures
}

fn error_source(err: &Error) -> String {
    std::error::Error::source(err)
        .map(ToString::to_string)
        .unwrap_or_default()
}
