use crate::catalog::id::DbObjectId;
use crate::error::{Error, ObjectKind, Result};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// An entity addressed by name within its parent.
pub trait Named {
    const KIND: ObjectKind;

    fn name(&self) -> &str;
}

/// Name-keyed collection with deterministic (sorted) iteration.
///
/// Inserting a taken name fails with [`Error::AlreadyExists`]; [`NamedMap::get`]
/// is the "must" lookup and fails with [`Error::NotFound`], while
/// [`NamedMap::contains`] is the existence check.
#[derive(Debug, Clone)]
pub struct NamedMap<T> {
    owner: Option<DbObjectId>,
    items: BTreeMap<String, T>,
}

impl<T: Named> NamedMap<T> {
    pub fn new(owner: Option<DbObjectId>) -> Self {
        Self {
            owner,
            items: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> Result<&mut T> {
        match self.items.entry(item.name().to_string()) {
            btree_map::Entry::Occupied(entry) => Err(Error::AlreadyExists {
                object: T::KIND,
                name: entry.key().clone(),
                parent: self.owner.clone(),
            }),
            btree_map::Entry::Vacant(entry) => Ok(entry.insert(item)),
        }
    }

    pub fn get(&self, name: &str) -> Result<&T> {
        self.items
            .get(name)
            .ok_or_else(|| Error::not_found(T::KIND, name, self.owner.clone()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut T> {
        let owner = &self.owner;
        self.items
            .get_mut(name)
            .ok_or_else(|| Error::not_found(T::KIND, name, owner.clone()))
    }

    /// Lookup used when walking the opposite tree, where absence is expected.
    pub fn find(&self, name: &str) -> Option<&T> {
        self.items.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, T> {
        &self.items
    }
}
