//! Error types for schema, registry and conversion failures.

use thiserror::Error;

use crate::document::AttributeName;

/// Errors raised by the conversion engine.
///
/// Unrecognized markup under the default flatten policy and empty attribute
/// values are not errors and never surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The attribute was used without being declared in the schema.
    #[error("attribute `{0}` is not declared in the schema")]
    SchemaViolation(AttributeName),

    /// A second conversion rule was registered for the same attribute.
    #[error("a conversion rule for attribute `{0}` is already registered")]
    DuplicateAttribute(AttributeName),

    /// A rule would recognize the same markup as a rule for another
    /// attribute, so upcast could not tell them apart.
    #[error("rule for `{attribute}` recognizes the same markup as the rule for `{existing}`")]
    AmbiguousRule {
        attribute: AttributeName,
        existing: AttributeName,
    },

    /// An element no rule recognizes, raised only under the reject policy.
    #[error("unrecognized view element <{0}>")]
    UnrecognizedElement(String),

    /// A command addressed characters past the end of the document.
    #[error("range {start}..{end} is out of range for a document of {len} characters")]
    OutOfRange { start: usize, end: usize, len: usize },

    /// A rule description could not be parsed.
    #[error("invalid rule `{0}`, expected NAME=ELEMENT:PARAM")]
    InvalidRule(String),

    /// The markup serializer failed.
    #[error("markup serialization failed: {0}")]
    Markup(String),
}

pub type Result<T> = std::result::Result<T, Error>;
