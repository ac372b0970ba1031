use std::any::Any;

use foldhash::{HashMap, HashMapExt};
use tracing::debug;

use crate::{Error, Result, TypedCell};

/// A mapping from string keys to values of arbitrary, per-key types.
///
/// Records such as inference results or tasks embed a [`PropertyStore`] so unrelated components
/// can attach their own data to the record without a shared schema. Every value remembers its
/// type, and reads that ask for a different type fail with [`Error::TypeMismatch`] instead of
/// reinterpreting the value.
///
/// Keys are unique and must not be empty. Writing to an existing key replaces the previous value
/// entirely, including its type.
///
/// # Thread safety
///
/// The store has no internal synchronization. It is [`Send`] and [`Sync`], so it can be moved
/// between threads or read concurrently, but concurrent writers must serialize externally.
///
/// # Example
///
/// ```rust
/// use property_store::{Error, PropertyStore};
///
/// let mut store = PropertyStore::new();
///
/// store.set("frame_id", 1042_u64).unwrap();
/// store.set("camera", "front-left".to_string()).unwrap();
///
/// assert_eq!(store.get::<u64>("frame_id"), Ok(1042));
/// assert!(matches!(store.get::<u32>("frame_id"), Err(Error::TypeMismatch { .. })));
/// assert!(matches!(store.get::<u64>("missing"), Err(Error::MissingKey { .. })));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    entries: HashMap<String, TypedCell>,
}

impl PropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty.
    pub fn set<V>(&mut self, key: &str, value: V) -> Result<()>
    where
        V: Any + Send + Sync,
    {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        let cell = TypedCell::new(value);

        if let Some(previous) = self.entries.get_mut(key) {
            if TypedCell::type_id(previous) != cell.type_id() {
                debug!(
                    key,
                    from = previous.type_name(),
                    to = cell.type_name(),
                    "property changed type"
                );
            }

            *previous = cell;
        } else {
            self.entries.insert(key.to_owned(), cell);
        }

        Ok(())
    }

    /// Returns a copy of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty, [`Error::MissingKey`] if nothing is stored
    /// under `key` and [`Error::TypeMismatch`] if the stored value is not a `V`.
    pub fn get<V>(&self, key: &str) -> Result<V>
    where
        V: Any + Clone,
    {
        self.get_ref::<V>(key).cloned()
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`get()`][Self::get].
    pub fn get_ref<V: Any>(&self, key: &str) -> Result<&V> {
        self.cell(key)?.downcast_for_key(key)
    }

    /// Returns the cell stored under `key`, without checking its type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty and [`Error::MissingKey`] if nothing is
    /// stored under `key`.
    pub fn cell(&self, key: &str) -> Result<&TypedCell> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        self.entries.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_owned(),
        })
    }

    /// Replaces the value stored under `key`, but only if one is already there.
    ///
    /// The replacement may be of a different type than the value it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyKey`] if `key` is empty and [`Error::MissingKey`] if nothing is
    /// stored under `key`. The store is unchanged in both cases.
    ///
    /// # Example
    ///
    /// ```rust
    /// use property_store::{Error, PropertyStore};
    ///
    /// let mut store = PropertyStore::new();
    ///
    /// assert!(matches!(
    ///     store.update_if_present("retries", 1_u32),
    ///     Err(Error::MissingKey { .. })
    /// ));
    /// assert!(store.is_empty());
    ///
    /// store.set("retries", 0_u32).unwrap();
    /// store.update_if_present("retries", 1_u32).unwrap();
    /// assert_eq!(store.get::<u32>("retries"), Ok(1));
    /// ```
    pub fn update_if_present<V>(&mut self, key: &str, value: V) -> Result<()>
    where
        V: Any + Send + Sync,
    {
        self.cell(key)?;
        self.set(key, value)
    }

    /// Removes the value stored under `key` and returns its cell, if there was one.
    pub fn remove(&mut self, key: &str) -> Option<TypedCell> {
        self.entries.remove(key)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether a value of any type is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The name of the type stored under `key`, if any. Intended for diagnostics.
    #[must_use]
    pub fn type_name_of(&self, key: &str) -> Option<&'static str> {
        self.entries.get(key).map(TypedCell::type_name)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
