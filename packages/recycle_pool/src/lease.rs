use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::sync::Arc;

use crate::{Recycled, Reset, ResourcePool};

/// Exclusive access to an instance checked out of a [`ResourcePool`].
///
/// When the [`Lease`] is dropped, the instance is [reset][Reset] and returned to the pool it
/// came from. The lease keeps that pool alive, so the instance always has a home to return to.
///
/// A lease can be converted into a cloneable [`Recycled<T>`] via
/// [`into_shared()`][Self::into_shared] when several owners need read access, or permanently
/// taken out of the pool via [`detach()`][Self::detach].
///
/// # Thread safety
///
/// [`Lease<T>`] is [`Send`] if `T` is [`Send`] and [`Sync`] if `T` is [`Send`] and [`Sync`].
///
/// # Example
///
/// ```rust
/// use recycle_pool::ResourcePool;
///
/// let pool = ResourcePool::<String>::builder().pre_allocate(1).build();
///
/// {
///     let mut lease = pool.try_acquire().unwrap();
///     lease.push_str("scratch space");
///     assert_eq!(pool.available(), 0);
/// }
///
/// // Returned and reset.
/// assert_eq!(pool.available(), 1);
/// assert_eq!(*pool.try_acquire().unwrap(), "");
/// ```
pub struct Lease<T: Reset> {
    item: ManuallyDrop<T>,

    /// The pool that owns the instance. Keeps the pool alive while the instance is out.
    pool: ResourcePool<T>,
}

impl<T: Reset> Lease<T> {
    pub(crate) fn new(item: T, pool: ResourcePool<T>) -> Self {
        Self {
            item: ManuallyDrop::new(item),
            pool,
        }
    }

    /// Converts this lease into a shared handle.
    ///
    /// The instance is returned to the pool when the last clone of the returned
    /// [`Recycled<T>`] is dropped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<Vec<u32>>::builder().pre_allocate(1).build();
    ///
    /// let mut lease = pool.try_acquire().unwrap();
    /// lease.push(7);
    ///
    /// let shared = lease.into_shared();
    /// let other = shared.clone();
    ///
    /// drop(shared);
    /// assert_eq!(pool.available(), 0);
    /// assert_eq!(*other, vec![7]);
    ///
    /// drop(other);
    /// assert_eq!(pool.available(), 1);
    /// ```
    #[must_use]
    pub fn into_shared(self) -> Recycled<T> {
        Recycled::new(Arc::new(self))
    }

    /// Takes the instance out of the pool for good.
    ///
    /// The instance is not reset and will never be returned. It no longer counts toward the
    /// pool's ceiling, so the pool may construct a replacement.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::builder().pre_allocate(1).build();
    ///
    /// let mut lease = pool.try_acquire().unwrap();
    /// lease.push_str("kept forever");
    ///
    /// let value: String = lease.detach();
    ///
    /// assert_eq!(value, "kept forever");
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn detach(self) -> T {
        let (item, pool) = self.into_parts();
        pool.forget();
        item
    }

    /// Whether this lease was handed out by `pool`.
    #[must_use]
    pub fn is_from(&self, pool: &ResourcePool<T>) -> bool {
        self.pool.same_pool(pool)
    }

    /// Moves the fields out without running our `Drop` implementation.
    fn into_parts(self) -> (T, ResourcePool<T>) {
        let this = ManuallyDrop::new(self);

        // SAFETY: `this` is never dropped, so the item is moved out exactly once.
        let item = unsafe { ptr::read(ptr::addr_of!(this.item)) };

        // SAFETY: Same reasoning as above - the pool handle is moved out exactly once.
        let pool = unsafe { ptr::read(ptr::addr_of!(this.pool)) };

        (ManuallyDrop::into_inner(item), pool)
    }
}

impl<T: Reset> Deref for Lease<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl<T: Reset> DerefMut for Lease<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.item
    }
}

impl<T: Reset> Drop for Lease<T> {
    fn drop(&mut self) {
        // SAFETY: This is the only place the item is taken and `self` is not used afterwards.
        let item = unsafe { ManuallyDrop::take(&mut self.item) };

        self.pool.give_back(item);
    }
}

impl<T: Reset + fmt::Debug> fmt::Debug for Lease<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("item", &*self.item)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(Lease<String>: Send, Sync);
    assert_not_impl_any!(Lease<RefCellItem>: Sync);
    assert_not_impl_any!(Lease<RcItem>: Send, Sync);
    assert_not_impl_any!(Lease<String>: Clone);

    #[allow(dead_code, reason = "only used in trait assertions")]
    struct RefCellItem(RefCell<u8>);

    impl Reset for RefCellItem {
        fn reset(&mut self) {}
    }

    #[allow(dead_code, reason = "only used in trait assertions")]
    struct RcItem(Rc<u8>);

    impl Reset for RcItem {
        fn reset(&mut self) {}
    }

    #[test]
    fn deref_mut_reaches_instance() {
        let pool = ResourcePool::<Vec<u8>>::builder().pre_allocate(1).build();

        let mut lease = pool.try_acquire().unwrap();
        lease.push(1);
        lease.push(2);

        assert_eq!(lease.as_slice(), &[1, 2]);
    }

    #[test]
    fn drop_returns_to_pool() {
        let pool = ResourcePool::<Vec<u8>>::builder().pre_allocate(1).build();

        let lease = pool.try_acquire().unwrap();
        assert_eq!(pool.available(), 0);

        drop(lease);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn detach_skips_reset() {
        let pool = ResourcePool::<Vec<u8>>::builder().pre_allocate(1).build();

        let mut lease = pool.try_acquire().unwrap();
        lease.push(9);

        assert_eq!(lease.detach(), vec![9]);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn is_from_identifies_home_pool() {
        let home = ResourcePool::<String>::builder().pre_allocate(1).build();
        let other = ResourcePool::<String>::new();

        let lease = home.try_acquire().unwrap();

        assert!(lease.is_from(&home));
        assert!(lease.is_from(&home.clone()));
        assert!(!lease.is_from(&other));
    }
}
