//! Groups fragments into migration units and sequences them.
//!
//! Units are keyed by (phase, schema, table) and start out in key order. A
//! graph edge runs from the unit creating a table to every unit with a
//! fragment depending on that table. Foreign keys inside a dependency cycle
//! move to deferred units, which run after every table of the cycle exists.

use crate::catalog::id::TableRef;
use crate::error::{ConsistencyError, Result};
use crate::plan::fragment::{Fragment, Phase, UnitScope};
use crate::plan::unit::MigrationUnit;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

type UnitKey = (Phase, Option<String>, Option<String>);

/// Orders `fragments` into named migration units.
///
/// For every fragment depending on table T, the unit creating T comes
/// first. Fragments keep their relative order within a unit.
pub fn order_fragments(fragments: Vec<Fragment>) -> Result<Vec<MigrationUnit>> {
    let units = group_fragments(fragments)?;
    let units = break_cycles(units)?;
    let mut ordered = sequence(units)?;
    assign_names(&mut ordered)?;
    info!("Ordered {} migration units", ordered.len());
    Ok(ordered)
}

fn group_fragments(fragments: Vec<Fragment>) -> Result<Vec<MigrationUnit>> {
    let mut groups: BTreeMap<UnitKey, MigrationUnit> = BTreeMap::new();
    for fragment in fragments {
        let kind = fragment.change_kind;
        let table_name = match kind.scope() {
            UnitScope::Table => fragment.table_name.clone(),
            _ => None,
        };
        let key = (kind.phase(), fragment.schema_name.clone(), table_name.clone());
        groups
            .entry(key)
            .or_insert_with(|| {
                MigrationUnit::new(kind.scope(), fragment.schema_name.clone(), table_name)
            })
            .add_fragment(fragment)?;
    }
    Ok(groups.into_values().collect())
}

/// Maps each created table to the index of the unit creating it.
fn creators(units: &[MigrationUnit]) -> HashMap<TableRef, usize> {
    units
        .iter()
        .enumerate()
        .flat_map(|(i, unit)| unit.created_tables().map(move |table| (table, i)))
        .collect()
}

fn dependency_graph(units: &[MigrationUnit]) -> Result<DiGraph<usize, ()>> {
    let creators = creators(units);
    let mut graph = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..units.len()).map(|i| graph.add_node(i)).collect();

    for (i, unit) in units.iter().enumerate() {
        // A deferred unit runs after the unit creating its own table.
        if let (Some(schema), Some(table)) = (unit.schema_name(), unit.table_name())
            && let Some(&owner) = creators.get(&TableRef::new(schema, table))
            && owner != i
        {
            graph.update_edge(nodes[owner], nodes[i], ());
        }
        for dependency in unit.table_dependencies()? {
            match creators.get(&dependency) {
                Some(&creator) if creator != i => {
                    graph.update_edge(nodes[creator], nodes[i], ());
                }
                Some(_) => {}
                None => debug!("{dependency} is not created in this run"),
            }
        }
    }
    Ok(graph)
}

/// Pulls intra-cycle dependent fragments into deferred units, one per owning
/// table, placed right after their phase.
fn break_cycles(mut units: Vec<MigrationUnit>) -> Result<Vec<MigrationUnit>> {
    let graph = dependency_graph(&units)?;
    let creators = creators(&units);
    let mut deferred = Vec::new();

    for component in tarjan_scc(&graph) {
        if component.len() < 2 {
            continue;
        }
        let members: BTreeSet<usize> = component.iter().map(|n| graph[*n]).collect();
        for &i in &members {
            let unit = &mut units[i];
            let mut extracted_unit = MigrationUnit::deferred(
                unit.schema_name().unwrap_or_default(),
                unit.table_name().unwrap_or_default(),
            );
            for dependency in unit.table_dependencies()? {
                let in_cycle = creators
                    .get(&dependency)
                    .is_some_and(|c| *c != i && members.contains(c));
                if !in_cycle {
                    continue;
                }
                for fragment in
                    unit.extract_fragments_with_dependency(&dependency.schema, &dependency.table)
                {
                    extracted_unit.add_fragment(fragment)?;
                }
            }
            if !extracted_unit.is_empty() {
                debug!(
                    "Deferring {} fragments of {} to break a dependency cycle",
                    extracted_unit.fragments().len(),
                    unit.subject()
                );
                deferred.push(extracted_unit);
            }
        }
    }

    units.extend(deferred);
    // Stable: natural units keep their key order, deferred ones follow the
    // natural units of their phase.
    units.sort_by_key(|unit| (unit.phase(), unit.is_deferred()));
    Ok(units)
}

/// Kahn traversal, always taking the lowest-index ready unit.
fn sequence(units: Vec<MigrationUnit>) -> Result<Vec<MigrationUnit>> {
    let graph = dependency_graph(&units)?;
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BTreeSet<usize> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order = Vec::with_capacity(units.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for next in graph.neighbors_directed(NodeIndex::new(i), Direction::Outgoing) {
            let j = graph[next];
            in_degree[j] -= 1;
            if in_degree[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() < units.len() {
        let emitted: BTreeSet<usize> = order.iter().copied().collect();
        let unresolved = units
            .iter()
            .enumerate()
            .filter(|(i, _)| !emitted.contains(i))
            .map(|(_, unit)| unit.subject())
            .collect();
        return Err(ConsistencyError::UnresolvedOrdering { units: unresolved }.into());
    }

    let mut slots: Vec<Option<MigrationUnit>> = units.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}

/// Names every unit, suffixing ` 2`, ` 3`, ... to repeated names in
/// emission order.
fn assign_names(units: &mut [MigrationUnit]) -> Result<()> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for unit in units.iter_mut() {
        let base = unit.base_name()?;
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        unit.name = if *count == 1 {
            base
        } else {
            format!("{base} {count}")
        };
    }
    Ok(())
}
