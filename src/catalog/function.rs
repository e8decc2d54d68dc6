use super::collection::Named;
use super::comments::Commentable;
use super::utils::validate_identifier;
use super::{Provenance, Provenanced};
use crate::error::{Error, ObjectKind, Result};

/// A trigger function. Only the body is tracked; the signature is always
/// `() RETURNS trigger LANGUAGE plpgsql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    provenance: Provenance,
    name: String,
    definition: String,
    pub description: Option<String>,
}

impl Named for Function {
    const KIND: ObjectKind = ObjectKind::Function;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Function {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Commentable for Function {
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Function {
    /// The body is stored trimmed so that surrounding blank lines, which
    /// `prosrc` keeps verbatim, don't register as changes.
    pub fn new(
        provenance: Provenance,
        name: impl Into<String>,
        definition: impl AsRef<str>,
    ) -> Result<Self> {
        let name = name.into();
        validate_identifier(ObjectKind::Function, &name)?;
        let definition = definition.as_ref().trim().to_string();
        if definition.is_empty() {
            return Err(Error::validation(
                ObjectKind::Function,
                name,
                "definition must not be empty",
            ));
        }
        Ok(Self {
            provenance,
            name,
            definition,
            description: None,
        })
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }
}
