//! # Normalization
//!
//! Coerces loosely-typed values coming out of sources so they satisfy a
//! prop definition.
//!
//! ## Components
//!
//! | Component | Module | Depends on |
//! |-----------|--------|------------|
//! | Scalar coercer | `scalar` | the injected [`Renderer`] |
//! | Enum normalizer | `enums` | scalar coercer |
//! | List-size normalizer | `list` | enum default values |
//!
//! Operations that may need to render a fragment hang off [`Normalizer`],
//! which holds the renderer. Everything else is a free function over the
//! definition.
//!
//! ## Failure model
//!
//! Nothing here raises for bad input: an unmatched enum value normalizes to
//! [`PropValue::Null`], non-scalars pass through enum coercion untouched and
//! missing constraints make a step the identity. Renderer failures are the
//! only errors, and they are returned to the caller as they are.
//!
//! [`PropValue::Null`]: crate::domain::PropValue::Null

mod enums;
mod list;
mod scalar;

use crate::render::Renderer;

pub use enums::{
    allowed_values, build_options, coerce_to_enum_type, default_value, is_required, EnumOption,
};
pub use list::{dedup_in_order, normalize_list_size};
pub use scalar::encode_json_bounded;

/// Normalization entry point carrying the render service
#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
    renderer: &'a dyn Renderer,
}

impl<'a> Normalizer<'a> {
    pub fn new(renderer: &'a dyn Renderer) -> Self {
        Self { renderer }
    }

    /// The render service used to collapse fragments
    pub fn renderer(&self) -> &'a dyn Renderer {
        self.renderer
    }
}

impl std::fmt::Debug for Normalizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}
