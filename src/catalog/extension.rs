use super::collection::Named;
use super::{Provenance, Provenanced};
use crate::constants::MAX_IDENTIFIER_LENGTH;
use crate::error::{Error, ObjectKind, Result};

/// A database-level extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    provenance: Provenance,
    name: String,
}

impl Named for Extension {
    const KIND: ObjectKind = ObjectKind::Extension;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Provenanced for Extension {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}

impl Extension {
    /// Extension names are looser than identifiers (`uuid-ossp`), so only
    /// emptiness and length are checked.
    pub fn new(provenance: Provenance, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH {
            return Err(Error::validation(
                ObjectKind::Extension,
                name,
                format!("name must be 1 to {MAX_IDENTIFIER_LENGTH} bytes"),
            ));
        }
        Ok(Self { provenance, name })
    }
}
