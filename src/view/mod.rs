//! The rendered view: nested named elements with string parameters.
//!
//! This module handles:
//! - View tree types (`ViewNode`, `ViewElement`)
//! - Parsing HTML fragments into view trees
//! - Serializing view trees back to HTML

mod markup;
mod types;

pub use markup::{parse_fragment, serialize};
pub use types::{ViewElement, ViewNode};
