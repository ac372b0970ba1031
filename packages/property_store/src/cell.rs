use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

/// A single value of any type, tagged with the identity of that type.
///
/// The tag is captured once, when the cell is created, and never changes. Reads must name the
/// same type the cell was created with; any other type is rejected with
/// [`Error::TypeMismatch`]. To store a value of a different type, replace the whole cell.
///
/// Cloning a cell is cheap: clones share the same immutable value and always carry the same tag.
///
/// # Example
///
/// ```rust
/// use property_store::{Error, TypedCell};
///
/// let cell = TypedCell::new(42_u32);
///
/// assert!(cell.is::<u32>());
/// assert_eq!(cell.get::<u32>(), Ok(42));
/// assert!(matches!(cell.get::<i64>(), Err(Error::TypeMismatch { .. })));
/// ```
#[derive(Clone)]
pub struct TypedCell {
    type_id: TypeId,
    type_name: &'static str,

    value: Arc<dyn Any + Send + Sync>,
}

impl TypedCell {
    /// Creates a cell holding `value`, tagged with the type `V`.
    #[must_use]
    pub fn new<V>(value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        Self {
            type_id: TypeId::of::<V>(),
            type_name: any::type_name::<V>(),
            value: Arc::new(value),
        }
    }

    /// The identity of the type this cell was created with.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The name of the type this cell was created with, for diagnostics.
    ///
    /// The exact text is not stable across compiler versions and must not be compared.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this cell was created with a value of type `V`.
    #[must_use]
    pub fn is<V: Any>(&self) -> bool {
        self.type_id == TypeId::of::<V>()
    }

    /// Returns a reference to the value if it is of type `V`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the cell holds a different type.
    pub fn get_ref<V: Any>(&self) -> Result<&V> {
        self.downcast_for_key("")
    }

    /// Returns a copy of the value if it is of type `V`. The cell is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the cell holds a different type.
    pub fn get<V: Any + Clone>(&self) -> Result<V> {
        self.get_ref::<V>().cloned()
    }

    /// Same as [`get_ref()`][Self::get_ref], naming `key` in any error.
    pub(crate) fn downcast_for_key<V: Any>(&self, key: &str) -> Result<&V> {
        if !self.is::<V>() {
            return Err(self.mismatch::<V>(key));
        }

        // The tag check above makes this infallible; the fallback only guards the invariant.
        self.value
            .downcast_ref::<V>()
            .ok_or_else(|| self.mismatch::<V>(key))
    }

    fn mismatch<V: Any>(&self, key: &str) -> Error {
        Error::TypeMismatch {
            key: key.to_owned(),
            stored: self.type_name,
            requested: any::type_name::<V>(),
        }
    }
}

impl fmt::Debug for TypedCell {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCell")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(TypedCell: Send, Sync, Clone);

    #[derive(Clone, Debug, PartialEq)]
    struct Meters(f64);

    #[derive(Clone, Debug, PartialEq)]
    struct Feet(f64);

    #[test]
    fn matching_type_returns_copy() {
        let cell = TypedCell::new(Meters(3.5));

        assert_eq!(cell.get::<Meters>(), Ok(Meters(3.5)));

        // Reading does not consume the value.
        assert_eq!(cell.get::<Meters>(), Ok(Meters(3.5)));
    }

    #[test]
    fn structurally_identical_type_is_rejected() {
        let cell = TypedCell::new(Meters(3.5));

        let error = cell.get::<Feet>().unwrap_err();

        assert!(matches!(
            error,
            Error::TypeMismatch { ref key, stored, requested }
                if key.is_empty()
                    && stored == any::type_name::<Meters>()
                    && requested == any::type_name::<Feet>()
        ));
    }

    #[test]
    fn tag_follows_concrete_type_not_conversions() {
        let cell = TypedCell::new(7_u8);

        assert!(cell.is::<u8>());
        assert!(!cell.is::<u32>());
        assert!(cell.get::<u32>().is_err());
        assert_eq!(cell.type_id(), TypeId::of::<u8>());
    }

    #[test]
    fn clone_preserves_tag_and_value() {
        let cell = TypedCell::new("label".to_string());
        let copy = cell.clone();

        drop(cell);

        assert_eq!(copy.type_name(), any::type_name::<String>());
        assert_eq!(copy.get_ref::<String>().map(String::as_str), Ok("label"));
    }
}
