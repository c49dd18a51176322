//! The in-memory document model.
//!
//! This module handles:
//! - Text runs and their attribute sets
//! - Normalization (merging runs with identical attributes)
//! - Range commands that set, clear and insert attributed text

mod commands;
mod types;

pub use types::{
    AttributeName, AttributeValue, Attributes, Document, TextRun, normalize_runs,
};
