//! Domain models for propbind
//!
//! Values, prop definitions and component definitions, without any I/O.

mod component;
mod definition;
mod value;

pub use component::{
    ComponentDefinition, ComponentError, ComponentFile, PropsSchema, SlotDefinition,
    VariantDefinition, DEFAULT_GROUP,
};
pub use definition::{PropAnnotations, PropDefinition};
pub use value::{Entries, PropValue, RenderFragment};
