//! Conversion between text runs and view trees.
//!
//! - [`ConversionRule`]: one attribute ↔ one element shape
//! - [`ConversionRegistry`]: attribute → rule, one to one
//! - [`ModelToViewConverter`]: downcast
//! - [`ViewToModelConverter`]: upcast

mod downcast;
mod registry;
mod rule;
mod upcast;

pub use downcast::ModelToViewConverter;
pub use registry::ConversionRegistry;
pub use rule::ConversionRule;
pub use upcast::{UnknownElementPolicy, ViewToModelConverter};
