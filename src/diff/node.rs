use crate::catalog::collection::{Named, NamedMap};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Entities that expose attributes to the differencing engine.
pub trait Tracked {
    /// Attribute name and value, in a fixed order.
    fn tracked_attributes(&self) -> Vec<(&'static str, Value)>;
}

/// Value of one tracked attribute on the base side, and whether the other
/// side holds an equal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeMatch {
    pub value: Value,
    pub matches: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Child {
    Record(Box<Node>),
    Collection(BTreeMap<String, Node>),
}

/// One entity of one side of the report.
///
/// Serializes as `{"exists": .., "<attribute>": {"value": .., "matches": ..},
/// "<child>": ..}`; absent entities carry only `exists`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub exists: bool,
    #[serde(flatten)]
    pub attributes: BTreeMap<&'static str, AttributeMatch>,
    #[serde(flatten)]
    pub children: BTreeMap<&'static str, Child>,
}

impl Node {
    pub fn absent() -> Self {
        Self {
            exists: false,
            attributes: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeMatch> {
        self.attributes.get(name)
    }

    /// `matches` of a tracked attribute; `None` when the node has no such
    /// attribute (including absent nodes).
    pub fn matches(&self, attribute: &str) -> Option<bool> {
        self.attribute(attribute).map(|a| a.matches)
    }

    pub fn record(&self, name: &str) -> Option<&Node> {
        match self.children.get(name) {
            Some(Child::Record(node)) => Some(node),
            _ => None,
        }
    }

    pub fn collection(&self, name: &str) -> Option<&BTreeMap<String, Node>> {
        match self.children.get(name) {
            Some(Child::Collection(nodes)) => Some(nodes),
            _ => None,
        }
    }

    /// Entry `key` of child collection `name`.
    pub fn child(&self, name: &str, key: &str) -> Option<&Node> {
        self.collection(name).and_then(|nodes| nodes.get(key))
    }

    pub fn add_record(&mut self, name: &'static str, node: Node) {
        self.children.insert(name, Child::Record(Box::new(node)));
    }

    pub fn add_collection(&mut self, name: &'static str, nodes: BTreeMap<String, Node>) {
        self.children.insert(name, Child::Collection(nodes));
    }

    /// True when this node exists and every attribute matches.
    pub fn attributes_match(&self) -> bool {
        self.exists && self.attributes.values().all(|a| a.matches)
    }

    /// Attribute names whose `matches` is false, in name order.
    pub fn mismatched_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, a)| !a.matches)
            .map(|(name, _)| *name)
    }

    /// True when this node, and everything below it, exists and matches.
    pub fn in_sync(&self) -> bool {
        self.attributes_match()
            && self.children.values().all(|child| match child {
                Child::Record(node) => !node.exists || node.in_sync(),
                Child::Collection(nodes) => nodes.values().all(Node::in_sync),
            })
    }
}

/// Compares `base` against `comparison`.
///
/// An absent base yields `exists: false` and nothing else. Otherwise every
/// tracked attribute of the base is reported with its value, matching when
/// the comparison is present and holds an equal value.
pub fn compare_record<T: Tracked>(base: Option<&T>, comparison: Option<&T>) -> Node {
    let Some(base) = base else {
        return Node::absent();
    };

    let other: BTreeMap<&'static str, Value> = comparison
        .map(|c| c.tracked_attributes().into_iter().collect())
        .unwrap_or_default();

    let attributes = base
        .tracked_attributes()
        .into_iter()
        .map(|(name, value)| {
            let matches = other.get(name).is_some_and(|o| *o == value);
            (name, AttributeMatch { value, matches })
        })
        .collect();

    Node {
        exists: true,
        attributes,
        children: BTreeMap::new(),
    }
}

/// Applies `child` to every name found in either map, with the base entry
/// and the same-named comparison entry.
pub fn compare_collection<T, F>(
    base: &NamedMap<T>,
    comparison: Option<&NamedMap<T>>,
    child: F,
) -> BTreeMap<String, Node>
where
    T: Named,
    F: Fn(Option<&T>, Option<&T>) -> Node,
{
    let names: BTreeSet<&str> = base
        .names()
        .chain(comparison.into_iter().flat_map(|c| c.names()))
        .collect();

    names
        .into_iter()
        .map(|name| {
            let node = child(base.find(name), comparison.and_then(|c| c.find(name)));
            (name.to_string(), node)
        })
        .collect()
}
