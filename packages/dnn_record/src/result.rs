use std::any::Any;

use property_store::{Error, PropertyStore};
use recycle_pool::Reset;

/// The key under which a [`DnnResult`] stores its primary payload.
pub const DNN_RESULT_KEY: &str = "dnn_result";

/// The output record of one inference.
///
/// The primary payload (e.g. a [`ClassificationResult`][crate::ClassificationResult]) lives
/// under [`DNN_RESULT_KEY`]. Any other component may attach auxiliary values under keys of its
/// own choosing. All values are type-checked on read.
///
/// Records are meant to be recycled through a [`ResultPool`][crate::ResultPool]: resetting a
/// record removes every stored value, so no data leaks from one inference to the next.
///
/// # Example
///
/// ```rust
/// use dnn_record::{ClassificationResult, DnnResult};
///
/// let mut record = DnnResult::new();
///
/// record
///     .set_result(ClassificationResult {
///         max_conf: 0.91,
///         class_id: 3,
///         class_name: "pedestrian".to_string(),
///     })
///     .unwrap();
/// record.set_result_as("track_id", 17_u64).unwrap();
///
/// let primary: ClassificationResult = record.result().unwrap();
/// assert_eq!(primary.class_id, 3);
/// assert_eq!(record.result_as::<u64>("track_id"), Ok(17));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DnnResult {
    results: PropertyStore,
}

impl DnnResult {
    /// Creates a record with no stored values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the primary payload under [`DNN_RESULT_KEY`], replacing any previous one.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`PropertyStore::set()`].
    pub fn set_result<V>(&mut self, value: V) -> Result<(), Error>
    where
        V: Any + Send + Sync,
    {
        self.results.set(DNN_RESULT_KEY, value)
    }

    /// Returns a copy of the primary payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if no payload was stored and [`Error::TypeMismatch`] if it
    /// is not a `V`.
    pub fn result<V>(&self) -> Result<V, Error>
    where
        V: Any + Clone,
    {
        self.results.get(DNN_RESULT_KEY)
    }

    /// Returns a reference to the primary payload.
    ///
    /// # Errors
    ///
    /// Same as [`result()`][Self::result].
    pub fn result_ref<V: Any>(&self) -> Result<&V, Error> {
        self.results.get_ref(DNN_RESULT_KEY)
    }

    /// Stores an auxiliary value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty.
    pub fn set_result_as<V>(&mut self, key: &str, value: V) -> Result<(), Error>
    where
        V: Any + Send + Sync,
    {
        self.results.set(key, value)
    }

    /// Returns a copy of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::get()`].
    pub fn result_as<V>(&self, key: &str) -> Result<V, Error>
    where
        V: Any + Clone,
    {
        self.results.get(key)
    }

    /// Read access to every value attached to the record.
    #[must_use]
    pub fn properties(&self) -> &PropertyStore {
        &self.results
    }

    /// Write access to every value attached to the record.
    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.results
    }
}

impl Reset for DnnResult {
    fn reset(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::{ClassificationResult, DetectionResult};

    assert_impl_all!(DnnResult: Send, Sync, Clone, Reset);

    fn cat() -> ClassificationResult {
        ClassificationResult {
            max_conf: 0.8,
            class_id: 281,
            class_name: "tabby".to_string(),
        }
    }

    #[test]
    fn primary_payload_is_type_checked() {
        let mut record = DnnResult::new();
        record.set_result(cat()).unwrap();

        assert!(matches!(
            record.result::<DetectionResult>(),
            Err(Error::TypeMismatch { .. })
        ));
        assert_eq!(record.result::<ClassificationResult>(), Ok(cat()));
    }

    #[test]
    fn primary_payload_uses_well_known_key() {
        let mut record = DnnResult::new();
        record.set_result(5_u8).unwrap();

        assert_eq!(record.result_as::<u8>(DNN_RESULT_KEY), Ok(5));
        assert!(record.properties().contains_key("dnn_result"));
    }

    #[test]
    fn missing_payload_is_reported() {
        let record = DnnResult::new();

        assert!(matches!(
            record.result_ref::<ClassificationResult>(),
            Err(Error::MissingKey { .. })
        ));
    }

    #[test]
    fn reset_drops_everything() {
        let mut record = DnnResult::new();
        record.set_result(cat()).unwrap();
        record.set_result_as("aux", 1_i32).unwrap();

        record.reset();

        assert!(record.properties().is_empty());
        assert!(record.result::<ClassificationResult>().is_err());
    }

    #[test]
    fn empty_auxiliary_key_is_rejected() {
        let mut record = DnnResult::new();

        assert_eq!(record.set_result_as("", 1_i32), Err(Error::EmptyKey));
    }

    #[test]
    fn properties_mut_reaches_store() {
        let mut record = DnnResult::new();
        record.properties_mut().set("k", 1_u32).unwrap();

        assert_eq!(record.result_as::<u32>("k"), Ok(1));
    }
}
