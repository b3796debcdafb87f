use crate::Entity;
use crate::Fields;
use crate::Result;

/// Options passed to [`EntitySanitizer::sanitize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Declared fields that are still unset after defaults are applied are
    /// written as `null` instead of being left out. Used by full replacement.
    pub fill_missing_with_null: bool,
}

impl SanitizeOptions {
    /// Options for a full replacement (PUT).
    #[must_use]
    pub const fn fill_missing_with_null() -> Self {
        Self {
            fill_missing_with_null: true,
        }
    }
}

/// Canonicalizes raw field mappings into entities.
///
/// The reducer only ever builds entities through this trait. [`EntitySchema`]
/// is the stock implementation; implement it yourself when validation needs
/// more than per-field coercion (cross-field rules, derived fields).
///
/// Implementations must be pure: the same input always yields the same
/// result, with no side effects.
///
/// [`EntitySchema`]: crate::EntitySchema
pub trait EntitySanitizer: Send + Sync {
    /// Validate and canonicalize `raw`.
    /// Return `Err` with every field-level diagnostic to reject the input.
    fn sanitize(&self, raw: Fields, options: SanitizeOptions) -> Result<Entity>;
}

impl<T: EntitySanitizer + ?Sized> EntitySanitizer for &T {
    fn sanitize(&self, raw: Fields, options: SanitizeOptions) -> Result<Entity> {
        (**self).sanitize(raw, options)
    }
}

impl<T: EntitySanitizer + ?Sized> EntitySanitizer for std::sync::Arc<T> {
    fn sanitize(&self, raw: Fields, options: SanitizeOptions) -> Result<Entity> {
        (**self).sanitize(raw, options)
    }
}
