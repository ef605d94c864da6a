//! # Plugin System
//!
//! Prop types and sources, the two plugin families a component binding is
//! built from.
//!
//! ## Overview
//!
//! A **prop type** owns the normalization of one family of props (string,
//! enum, slot, ...). A **source** produces the raw value of a prop from its
//! settings and from runtime contexts. Both are registered by id.
//!
//! ```text
//! settings + contexts ──► Source::prop_value ──► PropType::convert_from
//!                                                      │
//!                        PropType::preprocess ◄── PropType::normalize
//! ```
//!
//! ## Built-in Sources
//!
//! | Id | Prop types | Contexts |
//! |----|------------|----------|
//! | `token` | slot, string, url | `entity` (optional) |
//! | `select` | enum | |
//! | `checkboxes` | enum_list, enum_set | |
//! | `view_rows` | slot | `views:rows`, `views:view`; requires `views:style` |
//!
//! A source may also feed a prop type that lists one of the source's types in
//! [`PropType::convertible_from`].
//!
//! ## Key Types
//!
//! - [`PropTypeRegistry`] / [`SourceRegistry`] - Plugin lookup by id
//! - [`Binder`] - Resolves all props and slots of a component
//! - [`SourceContext`] - What a source sees while producing a value

mod binding;
mod enum_sources;
mod prop_type;
mod prop_types;
mod registry;
mod source;
mod token_source;
mod view_rows;

pub use binding::{BindError, Binder, BoundComponent, ComponentBindings, SourceBinding};
pub use enum_sources::{CheckboxesSource, SelectSource};
pub use prop_type::{resolve_prop_type, PropType};
pub use prop_types::{
    builtin_prop_types, BooleanPropType, EnumListPropType, EnumPropType, EnumSetPropType,
    NumberPropType, SlotPropType, StringPropType, UrlPropType,
};
pub use registry::{PropTypeRegistry, RegistryError, SourceRegistry};
pub use source::{
    merge_defaults, ContextDefinition, ContextError, ContextValue, Contexts, Dependencies,
    Services, SettingField, SettingKind, Settings, Source, SourceContext, SourceDefinition,
    SourceError, SourceFactory,
};
pub use token_source::{token_type, TokenSource, ENTITY_CONTEXT};
pub use view_rows::{
    ViewExecutable, ViewRow, ViewRowsSource, ROWS_CONTEXT, STYLE_REQUIREMENT, VIEW_CONTEXT,
};
