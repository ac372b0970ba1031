use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::{Lease, Reset};

/// A shared, reference-counted handle to an instance checked out of a
/// [`ResourcePool`][crate::ResourcePool].
///
/// Created from a [`Lease<T>`] via [`Lease::into_shared()`]. Clones refer to the same instance.
/// When the last clone is dropped, the instance is reset and returned to the pool.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use recycle_pool::ResourcePool;
///
/// let pool = ResourcePool::<String>::builder().pre_allocate(1).build();
///
/// let mut lease = pool.try_acquire().unwrap();
/// lease.push_str("frame 42");
/// let frame = lease.into_shared();
///
/// let reader = thread::spawn({
///     let frame = frame.clone();
///     move || frame.len()
/// });
///
/// assert_eq!(reader.join().unwrap(), 8);
/// assert_eq!(*frame, "frame 42");
/// ```
pub struct Recycled<T: Reset> {
    lease: Arc<Lease<T>>,
}

impl<T: Reset> Recycled<T> {
    pub(crate) fn new(lease: Arc<Lease<T>>) -> Self {
        Self { lease }
    }

    /// Converts back into an exclusive [`Lease<T>`] if this is the only handle.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if other clones of this handle exist.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<Vec<u8>>::builder().pre_allocate(1).build();
    /// let shared = pool.try_acquire().unwrap().into_shared();
    ///
    /// let other = shared.clone();
    /// let shared = shared.try_into_lease().unwrap_err();
    ///
    /// drop(other);
    /// let mut lease = shared.try_into_lease().unwrap();
    /// lease.push(1);
    /// ```
    pub fn try_into_lease(self) -> Result<Lease<T>, Self> {
        Arc::try_unwrap(self.lease).map_err(Self::new)
    }

    /// Takes the instance out of the pool for good if this is the only handle.
    ///
    /// See [`Lease::detach()`].
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if other clones of this handle exist.
    pub fn try_detach(self) -> Result<T, Self> {
        self.try_into_lease().map(Lease::detach)
    }

    /// Returns the number of handles referring to this instance.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.lease)
    }
}

impl<T: Reset> Clone for Recycled<T> {
    fn clone(&self) -> Self {
        Self {
            lease: Arc::clone(&self.lease),
        }
    }
}

impl<T: Reset> Deref for Recycled<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.lease
    }
}

impl<T: Reset + fmt::Debug> fmt::Debug for Recycled<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycled")
            .field("item", &**self)
            .field("handle_count", &self.handle_count())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::ResourcePool;

    assert_impl_all!(Recycled<String>: Send, Sync, Clone);
    assert_not_impl_any!(Recycled<CellItem>: Send, Sync);

    #[allow(dead_code, reason = "only used in trait assertions")]
    struct CellItem(Cell<u8>);

    impl Reset for CellItem {
        fn reset(&mut self) {}
    }

    #[test]
    fn last_clone_returns_instance() {
        let pool = ResourcePool::<String>::builder().pre_allocate(1).build();

        let shared = pool.try_acquire().unwrap().into_shared();
        let clones: Vec<_> = (0..3).map(|_| shared.clone()).collect();

        assert_eq!(shared.handle_count(), 4);

        drop(shared);
        assert_eq!(pool.available(), 0);

        drop(clones);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn try_detach_requires_unique_handle() {
        let pool = ResourcePool::<String>::builder().pre_allocate(1).build();

        let mut lease = pool.try_acquire().unwrap();
        lease.push_str("keep");
        let shared = lease.into_shared();
        let other = shared.clone();

        let shared = shared.try_detach().unwrap_err();
        assert_eq!(pool.len(), 1);

        drop(other);
        let value = shared.try_detach().unwrap();

        assert_eq!(value, "keep");
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn round_trip_through_lease_keeps_contents() {
        let pool = ResourcePool::<Vec<u8>>::builder().pre_allocate(1).build();

        let mut lease = pool.try_acquire().unwrap();
        lease.push(5);

        let mut lease = lease.into_shared().try_into_lease().unwrap();
        lease.push(6);

        assert_eq!(*lease, vec![5, 6]);
        assert_eq!(pool.checked_out(), 1);
    }
}
