use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::{Reset, ResourcePool};

/// Builder for creating an instance of [`ResourcePool`].
///
/// The builder decides how many instances exist up front and how many may ever exist at
/// the same time. Instances are constructed by a factory closure supplied to one of the
/// `build` methods; the same factory is not retained, so later growth via
/// [`acquire_or_create_with()`][ResourcePool::acquire_or_create_with] supplies its own.
///
/// # Examples
///
/// ```
/// use recycle_pool::ResourcePool;
///
/// // Two buffers up front, never more than four alive at once.
/// let pool = ResourcePool::<Vec<u8>>::builder()
///     .pre_allocate(2)
///     .max_count(4)
///     .build_with(|| Vec::with_capacity(1024));
///
/// assert_eq!(pool.len(), 2);
/// assert_eq!(pool.max_count().map(|n| n.get()), Some(4));
/// ```
#[must_use]
pub struct ResourcePoolBuilder<T> {
    pre_allocate: usize,
    max_count: usize,

    _item: PhantomData<fn() -> T>,
}

impl<T: Reset> ResourcePoolBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            pre_allocate: 0,
            max_count: 0,
            _item: PhantomData,
        }
    }

    /// Sets how many instances to construct while building the pool.
    ///
    /// The count is clamped to the [maximum count][Self::max_count], so pre-allocation can never
    /// exceed the ceiling. Defaults to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::builder()
    ///     .pre_allocate(10)
    ///     .max_count(3)
    ///     .build();
    ///
    /// assert_eq!(pool.len(), 3);
    /// ```
    pub fn pre_allocate(mut self, count: usize) -> Self {
        self.pre_allocate = count;
        self
    }

    /// Sets the ceiling on the number of instances the pool may own at the same time.
    ///
    /// Zero means the pool is unbounded. Defaults to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::ResourcePool;
    ///
    /// let unbounded = ResourcePool::<String>::builder().max_count(0).build();
    /// assert!(unbounded.max_count().is_none());
    /// ```
    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    /// Builds the pool, constructing pre-allocated instances with [`Default`].
    #[must_use]
    pub fn build(self) -> ResourcePool<T>
    where
        T: Default,
    {
        self.build_with(T::default)
    }

    /// Builds the pool, constructing pre-allocated instances with `factory`.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::builder()
    ///     .pre_allocate(2)
    ///     .build_with(|| String::with_capacity(256));
    ///
    /// let lease = pool.try_acquire().unwrap();
    /// assert!(lease.capacity() >= 256);
    /// ```
    #[must_use]
    pub fn build_with<F>(self, mut factory: F) -> ResourcePool<T>
    where
        F: FnMut() -> T,
    {
        match self.try_build_with(|| Ok::<T, Infallible>(factory())) {
            Ok(pool) => pool,
            Err(never) => match never {},
        }
    }

    /// Builds the pool, constructing pre-allocated instances with a fallible `factory`.
    ///
    /// Construction stops at the first failure and the error is returned. Any instances
    /// that were already constructed are dropped along with the partially built pool.
    ///
    /// # Examples
    ///
    /// ```
    /// use recycle_pool::ResourcePool;
    ///
    /// let mut remaining = 1;
    /// let result = ResourcePool::<Vec<u8>>::builder()
    ///     .pre_allocate(2)
    ///     .try_build_with(|| {
    ///         if remaining == 0 {
    ///             return Err("out of device memory");
    ///         }
    ///         remaining -= 1;
    ///         Ok(Vec::new())
    ///     });
    ///
    /// assert_eq!(result.unwrap_err(), "out of device memory");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `factory`.
    pub fn try_build_with<F, E>(self, mut factory: F) -> Result<ResourcePool<T>, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let ceiling = NonZero::new(self.max_count);

        let count = ceiling.map_or(self.pre_allocate, |ceiling| {
            self.pre_allocate.min(ceiling.get())
        });

        // The count may be unbounded, so nothing is reserved up front.
        let instances = (0..count)
            .map(|_| factory())
            .collect::<Result<Vec<_>, E>>()?;

        Ok(ResourcePool::from_parts(instances, ceiling))
    }
}

impl<T> fmt::Debug for ResourcePoolBuilder<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePoolBuilder")
            .field("pre_allocate", &self.pre_allocate)
            .field("max_count", &self.max_count)
            .finish()
    }
}
