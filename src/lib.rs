//! propbind - Bind data sources to typed component props and slots
//!
//! Components declare props with a JSON-schema-like definition. Sources
//! (tokens, view rows, enum selections) produce loosely-typed values, and
//! prop types normalize them until they satisfy the definition: enum values
//! are type-juggled into the allowed set, lists are padded or truncated to
//! their size bounds and render fragments collapse to scalars.

pub mod cli;
pub mod domain;
pub mod normalize;
pub mod plugin;
pub mod render;
pub mod storage;

pub use domain::{ComponentDefinition, PropDefinition, PropValue, RenderFragment};
pub use normalize::Normalizer;
