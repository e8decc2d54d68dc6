use super::collection::Named;
use super::comments::Commentable;
use super::utils::{validate_column_list, validate_identifier};
use super::{Provenance, Provenanced};
use crate::error::{Error, ObjectKind, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    #[default]
    Btree,
    Hash,
    Gist,
    Gin,
    Spgist,
    Brin,
}

impl IndexType {
    pub fn as_str(self) -> &'static str {
        match self {
            IndexType::Btree => "btree",
            IndexType::Hash => "hash",
            IndexType::Gist => "gist",
            IndexType::Gin => "gin",
            IndexType::Spgist => "spgist",
            IndexType::Brin => "brin",
        }
    }
}

impl FromStr for IndexType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "btree" => Ok(IndexType::Btree),
            "hash" => Ok(IndexType::Hash),
            "gist" => Ok(IndexType::Gist),
            "gin" => Ok(IndexType::Gin),
            "spgist" => Ok(IndexType::Spgist),
            "brin" => Ok(IndexType::Brin),
            other => Err(Error::validation(
                ObjectKind::Index,
                other,
                "unsupported index access method",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullsPosition {
    First,
    Last,
}

impl NullsPosition {
    /// PostgreSQL's default: NULLS LAST for ascending, NULLS FIRST for descending.
    pub fn default_for(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => NullsPosition::Last,
            SortOrder::Desc => NullsPosition::First,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    provenance: Provenance,
    name: String,
    columns: Vec<String>,
    pub unique: bool,
    pub index_type: IndexType,
    pub order: SortOrder,
    pub nulls_position: NullsPosition,
    /// Partial index predicate.
    pub where_clause: Option<String>,
    pub include_column_names: Vec<String>,
    pub description: Option<String>,
}

impl Named for Index {
    const KIND: ObjectKind = ObjectKind::Index;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Index {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Index {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Index {
    pub fn new(provenance: Provenance, name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(ObjectKind::Index, &name)?;
        validate_column_list(ObjectKind::Index, &name, &columns)?;
        Ok(Self {
            provenance,
            name,
            columns,
            unique: false,
            index_type: IndexType::Btree,
            order: SortOrder::Asc,
            nulls_position: NullsPosition::default_for(SortOrder::Asc),
            where_clause: None,
            include_column_names: Vec::new(),
            description: None,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}
