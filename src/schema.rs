//! Declared text attributes.

use crate::document::AttributeName;
use crate::error::{Error, Result};

/// Set of attribute names that are legal on text runs.
///
/// Declaration order is kept so listings are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    allowed: Vec<AttributeName>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an attribute. Declaring the same name again is a no-op.
    pub fn declare(&mut self, name: impl Into<AttributeName>) {
        let name = name.into();
        if !self.is_allowed(name.as_str()) {
            tracing::debug!(attribute = %name, "declared text attribute");
            self.allowed.push(name);
        }
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed.as_str() == name)
    }

    /// Fail with [`Error::SchemaViolation`] unless `name` is declared.
    pub fn require(&self, name: &AttributeName) -> Result<()> {
        if self.is_allowed(name.as_str()) {
            Ok(())
        } else {
            Err(Error::SchemaViolation(name.clone()))
        }
    }

    pub fn names(&self) -> &[AttributeName] {
        &self.allowed
    }
}
