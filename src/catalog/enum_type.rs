use super::collection::Named;
use super::comments::Commentable;
use super::utils::validate_identifier;
use super::{Provenance, Provenanced};
use crate::error::{Error, ObjectKind, Result};

/// An enum type. Label order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    provenance: Provenance,
    schema_name: String,
    name: String,
    values: Vec<String>,
    pub description: Option<String>,
}

impl Named for EnumType {
    const KIND: ObjectKind = ObjectKind::Enum;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for EnumType {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for EnumType {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl EnumType {
    pub fn new(
        provenance: Provenance,
        schema_name: impl Into<String>,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        validate_identifier(ObjectKind::Enum, &name)?;
        if values.is_empty() {
            return Err(Error::validation(
                ObjectKind::Enum,
                name,
                "an enum needs at least one value",
            ));
        }
        for (i, value) in values.iter().enumerate() {
            if values[..i].contains(value) {
                return Err(Error::validation(
                    ObjectKind::Enum,
                    name,
                    format!("value `{value}` is listed more than once"),
                ));
            }
        }
        Ok(Self {
            provenance,
            schema_name: schema_name.into(),
            name,
            values,
            description: None,
        })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn enum_ref(&self) -> EnumRef {
        EnumRef::new(&self.schema_name, &self.name)
    }

    /// Labels in `wanted` that this enum lacks, provided `wanted` keeps the
    /// existing labels in their current order. `None` when getting there
    /// would need labels removed or reordered.
    pub fn additions_to_reach<'a>(&self, wanted: &'a [String]) -> Option<Vec<&'a String>> {
        let mut existing = self.values.iter().peekable();
        let mut additions = Vec::new();
        for value in wanted {
            if existing.peek() == Some(&value) {
                existing.next();
            } else if self.values.contains(value) {
                return None;
            } else {
                additions.push(value);
            }
        }
        existing.peek().is_none().then_some(additions)
    }
}

/// Back-reference from a column to the enum it is typed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumRef {
    pub schema: String,
    pub name: String,
}

impl EnumRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}
