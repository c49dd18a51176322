//! Core document types.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of an attribute that may be carried by a text run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AttributeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for AttributeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Attribute values are opaque strings. An empty string is a present value.
pub type AttributeValue = String;

/// Attribute set of a run, keyed by name.
pub type Attributes = BTreeMap<AttributeName, AttributeValue>;

/// A contiguous span of text sharing one attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: Attributes,
}

impl TextRun {
    /// Create a run without attributes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Attributes::new(),
        }
    }

    pub const fn from_parts(text: String, attributes: Attributes) -> Self {
        Self { text, attributes }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<AttributeName>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Value of one attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub(crate) fn set_attribute(&mut self, name: AttributeName, value: AttributeValue) {
        self.attributes.insert(name, value);
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// Split into `[..at)` and `[at..)` by character offset.
    pub(crate) fn split_at_char(&self, at: usize) -> (Self, Self) {
        let byte = self
            .text
            .char_indices()
            .nth(at)
            .map_or(self.text.len(), |(idx, _)| idx);
        let (head, tail) = self.text.split_at(byte);
        (
            Self::from_parts(head.to_string(), self.attributes.clone()),
            Self::from_parts(tail.to_string(), self.attributes.clone()),
        )
    }
}

/// An ordered sequence of text runs.
///
/// Runs are addressed by character offsets over the concatenated text.
/// After any mutation the sequence is normalized: adjacent runs with equal
/// attributes are merged and empty runs without attributes are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    runs: Vec<TextRun>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self { runs: Vec::new() }
    }

    /// Create a normalized document from runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self {
            runs: normalize_runs(runs),
        }
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub(crate) const fn runs_mut(&mut self) -> &mut Vec<TextRun> {
        &mut self.runs
    }

    /// Plain text of the whole document.
    pub fn text(&self) -> String {
        self.runs.iter().map(TextRun::text).collect()
    }

    /// Total length in characters.
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub const fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn normalize(&mut self) {
        self.runs = normalize_runs(std::mem::take(&mut self.runs));
    }
}

/// Merge adjacent runs with identical attributes and drop empty plain runs.
///
/// Empty runs that carry attributes are kept unless they merge into a
/// neighbour; they are how an empty attributed span survives conversion.
pub fn normalize_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.text.is_empty() && run.attributes.is_empty() {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if last.attributes == run.attributes {
                last.text.push_str(&run.text);
                continue;
            }
        }
        out.push(run);
    }
    out
}
