// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. document::Document)
    clippy::module_name_repetitions
)]

//! # abbrev
//!
//! Inline attribute conversion between a rich-text model and HTML markup.
//!
//! Text in the model is a sequence of runs, each carrying a set of named
//! attributes. In the view the same attributes become wrapping elements:
//! the `abbreviation` attribute is rendered as `<abbr title="...">`.
//!
//! ## Architecture
//!
//! - **Schema**: which attributes are legal on text
//! - **Rules**: one attribute ↔ one element shape, held by a registry
//! - **Downcast**: model → view
//! - **Upcast**: view → model
//!
//! Downcast followed by upcast is the identity on runs whose attributes all
//! have rules.
//!
//! ## Modules
//!
//! - [`document`]: Text runs, documents and range commands
//! - [`schema`]: Declared attributes
//! - [`convert`]: Rules, registry and both conversion directions
//! - [`view`]: View tree and HTML parsing/serialization
//! - [`engine`]: Entry point tying the above together
//! - [`config`]: Flag files and CLI defaults

pub mod config;
pub mod convert;
pub mod document;
pub mod engine;
pub mod error;
pub mod perf;
pub mod schema;
pub mod view;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::convert::{ConversionRule, UnknownElementPolicy};
    pub use crate::document::{AttributeName, Document, TextRun};
    pub use crate::engine::Engine;
    pub use crate::error::Error;
    pub use crate::view::{ViewElement, ViewNode};
}
