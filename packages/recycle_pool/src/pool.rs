use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::num::NonZero;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::constants::ERR_POISONED_LOCK;
use crate::{Error, Lease, Reset, ResourcePoolBuilder};

/// A bounded, thread-safe pool of reusable objects.
///
/// The pool owns every instance it has ever constructed (the "owned set") and hands them out
/// as [`Lease<T>`] handles. Instances not currently leased form the "free set", which is served
/// in first-in-first-out order. When a lease is dropped, the instance is [reset][Reset] and put
/// back in the free set, waking any threads that are waiting for an instance.
///
/// This type acts as a cloneable handle to a shared pool. The pool lives as long as any clone
/// of the handle or any outstanding lease exists, so dependents receive a clone of the pool
/// rather than reaching for a global.
///
/// # Growth and ceiling
///
/// Instances are constructed lazily. Some may be pre-allocated by the
/// [builder][Self::builder]; more are constructed on demand by the `acquire_or_create` family
/// of methods, up to an optional ceiling on the size of the owned set. The plain
/// [`try_acquire()`][Self::try_acquire] and [`acquire()`][Self::acquire] never construct
/// anything.
///
/// The ceiling can be changed at runtime via [`resize()`][Self::resize]. Lowering it destroys
/// surplus free instances immediately and leased instances as they are returned. Leased
/// instances are never reclaimed forcibly.
///
/// # Thread safety
///
/// This type is thread-safe if `T` is [`Send`]. Waiting acquisitions release the internal lock
/// while blocked, so concurrent releases always make progress. No fairness is guaranteed between
/// multiple blocked waiters.
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use std::time::Duration;
///
/// use recycle_pool::ResourcePool;
///
/// let pool = ResourcePool::<Vec<u8>>::builder()
///     .pre_allocate(1)
///     .max_count(1)
///     .build();
///
/// let mut lease = pool.try_acquire().unwrap();
/// lease.extend_from_slice(b"payload");
///
/// // The only instance is leased, so the next caller waits for it.
/// let waiter = thread::spawn({
///     let pool = pool.clone();
///     move || pool.acquire(Some(Duration::from_secs(10))).map(|lease| lease.len())
/// });
///
/// drop(lease);
///
/// // The returned instance was reset before being handed out again.
/// assert_eq!(waiter.join().unwrap(), Some(0));
/// ```
pub struct ResourcePool<T: Reset> {
    core: Arc<PoolCore<T>>,
}

/// The shared state behind every clone of a [`ResourcePool`].
struct PoolCore<T> {
    state: Mutex<PoolState<T>>,

    /// Signaled whenever an instance is returned or destroyed.
    released: Condvar,
}

struct PoolState<T> {
    /// Instances available for checkout. Every entry is also counted in `owned`.
    free: VecDeque<T>,

    /// Size of the owned set: free instances plus leased instances.
    owned: usize,

    /// Maximum size of the owned set. `None` means unbounded.
    ceiling: Option<NonZero<usize>>,
}

impl<T> PoolState<T> {
    fn has_room(&self) -> bool {
        self.ceiling.is_none_or(|ceiling| self.owned < ceiling.get())
    }

    fn is_over_ceiling(&self) -> bool {
        self.ceiling.is_some_and(|ceiling| self.owned > ceiling.get())
    }

    fn add_new(&mut self, item: T) {
        self.owned = self
            .owned
            .checked_add(1)
            .expect("owned instance count cannot overflow usize");
        self.free.push_back(item);
    }

    fn forget_one(&mut self) {
        self.owned = self
            .owned
            .checked_sub(1)
            .expect("forgetting an instance that the pool never owned");
    }
}

impl<T: Reset> ResourcePool<T> {
    /// Creates an empty, unbounded pool.
    ///
    /// For pre-allocation or a ceiling, use [`builder()`][Self::builder].
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::new();
    ///
    /// assert!(pool.is_empty());
    /// assert!(pool.try_acquire().is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    /// Returns a builder for creating a [`ResourcePool`] with custom configuration.
    pub fn builder() -> ResourcePoolBuilder<T> {
        ResourcePoolBuilder::new()
    }

    pub(crate) fn from_parts(instances: Vec<T>, ceiling: Option<NonZero<usize>>) -> Self {
        let owned = instances.len();

        debug!(
            owned,
            max_count = ceiling.map_or(0, NonZero::get),
            "created resource pool"
        );

        Self {
            core: Arc::new(PoolCore {
                state: Mutex::new(PoolState {
                    free: instances.into(),
                    owned,
                    ceiling,
                }),
                released: Condvar::new(),
            }),
        }
    }

    /// Takes a free instance without waiting, or returns `None` if none is free.
    ///
    /// This never constructs a new instance, even if the pool is below its ceiling.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::builder().pre_allocate(1).build();
    ///
    /// let first = pool.try_acquire();
    /// assert!(first.is_some());
    ///
    /// // The only instance is already leased.
    /// assert!(pool.try_acquire().is_none());
    /// ```
    #[must_use]
    pub fn try_acquire(&self) -> Option<Lease<T>> {
        let item = self.core.lock().free.pop_front()?;

        trace!("acquired instance without waiting");

        Some(Lease::new(item, self.clone()))
    }

    /// Takes a free instance, waiting for one to be released if necessary.
    ///
    /// With `timeout` of `None`, waits indefinitely. Otherwise returns `None` if no instance
    /// became free within `timeout`. A timed-out call leaves no state behind.
    ///
    /// This never constructs a new instance, even if the pool is below its ceiling.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::new();
    ///
    /// // Nothing will ever be released into this empty pool.
    /// assert!(pool.acquire(Some(Duration::from_millis(10))).is_none());
    /// ```
    #[must_use]
    pub fn acquire(&self, timeout: Option<Duration>) -> Option<Lease<T>> {
        let state = self.core.lock();

        self.core
            .wait_for_free(state, timeout)
            .map(|item| Lease::new(item, self.clone()))
    }

    /// Takes a free instance, first constructing one with `make` if none is free and the pool
    /// is below its ceiling.
    ///
    /// `make` is only called when growth is needed. It runs while the pool lock is held, which
    /// is what guarantees the ceiling is never exceeded by concurrent callers. After the growth
    /// attempt, waits exactly like [`acquire()`][Self::acquire]: at the ceiling this degrades to
    /// waiting for a release.
    ///
    /// # Panics
    ///
    /// If `make` panics, the pool lock is poisoned and every later operation on the pool panics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<Vec<u8>>::builder().max_count(2).build();
    /// assert_eq!(pool.len(), 0);
    ///
    /// let lease = pool
    ///     .acquire_or_create_with(None, || Vec::with_capacity(4096))
    ///     .unwrap();
    ///
    /// assert!(lease.capacity() >= 4096);
    /// assert_eq!(pool.len(), 1);
    /// ```
    #[must_use]
    pub fn acquire_or_create_with<F>(&self, timeout: Option<Duration>, make: F) -> Option<Lease<T>>
    where
        F: FnOnce() -> T,
    {
        match self.try_acquire_or_create_with(timeout, || Ok::<T, Infallible>(make())) {
            Ok(lease) => lease,
            Err(never) => match never {},
        }
    }

    /// Same as [`acquire_or_create_with()`][Self::acquire_or_create_with], constructing new
    /// instances with [`Default`].
    #[must_use]
    pub fn acquire_or_create(&self, timeout: Option<Duration>) -> Option<Lease<T>>
    where
        T: Default,
    {
        self.acquire_or_create_with(timeout, T::default)
    }

    /// Same as [`acquire_or_create_with()`][Self::acquire_or_create_with], with a fallible `make`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `make`. The pool is left unchanged in that case and no
    /// waiting takes place.
    ///
    /// # Panics
    ///
    /// If `make` panics, the pool lock is poisoned and every later operation on the pool panics.
    pub fn try_acquire_or_create_with<F, E>(
        &self,
        timeout: Option<Duration>,
        make: F,
    ) -> Result<Option<Lease<T>>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut state = self.core.lock();

        if state.free.is_empty() && state.has_room() {
            let item = make()?;
            state.add_new(item);

            debug!(owned = state.owned, "grew resource pool by one instance");
        }

        Ok(self
            .core
            .wait_for_free(state, timeout)
            .map(|item| Lease::new(item, self.clone())))
    }

    /// Returns a lease to this pool explicitly.
    ///
    /// Dropping a lease has the same effect; this method exists for callers that want to
    /// verify which pool the lease belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ForeignInstance`] if the lease was handed out by a different pool.
    /// The lease is still returned to the pool that owns it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{Error, ResourcePool};
    ///
    /// let pool_a = ResourcePool::<String>::builder().pre_allocate(1).build();
    /// let pool_b = ResourcePool::<String>::builder().pre_allocate(1).build();
    ///
    /// let lease = pool_a.try_acquire().unwrap();
    ///
    /// assert!(matches!(pool_b.release(lease), Err(Error::ForeignInstance)));
    ///
    /// // The instance went home to `pool_a` regardless.
    /// assert_eq!(pool_a.available(), 1);
    /// ```
    pub fn release(&self, lease: Lease<T>) -> Result<(), Error> {
        let owned_by_us = lease.is_from(self);

        drop(lease);

        if owned_by_us {
            Ok(())
        } else {
            Err(Error::ForeignInstance)
        }
    }

    /// Sets a new ceiling on the size of the owned set. Zero means unbounded.
    ///
    /// While the owned set exceeds the new ceiling, free instances are destroyed one at a time.
    /// Leased instances are never reclaimed; if the owned set is still over the ceiling once the
    /// free set runs dry, the surplus is destroyed as leases are returned.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::ResourcePool;
    ///
    /// let pool = ResourcePool::<String>::builder()
    ///     .pre_allocate(4)
    ///     .max_count(4)
    ///     .build();
    ///
    /// let lease = pool.try_acquire().unwrap();
    /// pool.resize(2);
    ///
    /// // Two free instances were destroyed; the leased one still counts.
    /// assert_eq!(pool.len(), 2);
    ///
    /// drop(lease);
    /// assert_eq!(pool.len(), 2);
    /// ```
    pub fn resize(&self, max_count: usize) {
        let surplus = {
            let mut state = self.core.lock();
            state.ceiling = NonZero::new(max_count);

            let mut surplus = Vec::new();

            while state.is_over_ceiling() {
                let Some(item) = state.free.pop_front() else {
                    break;
                };

                state.forget_one();
                surplus.push(item);
            }

            debug!(
                max_count,
                owned = state.owned,
                destroyed = surplus.len(),
                "resized resource pool"
            );

            surplus
        };

        // Surplus instances are destroyed outside the lock.
        drop(surplus);
    }

    /// Returns the number of instances the pool owns, both free and leased.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core.lock().owned
    }

    /// Returns whether the pool owns no instances at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of instances that can be acquired without waiting or growing.
    #[must_use]
    pub fn available(&self) -> usize {
        self.core.lock().free.len()
    }

    /// Returns the number of instances currently leased out.
    #[must_use]
    pub fn checked_out(&self) -> usize {
        let state = self.core.lock();
        state.owned.saturating_sub(state.free.len())
    }

    /// Returns the current ceiling on the owned set, or `None` if the pool is unbounded.
    #[must_use]
    pub fn max_count(&self) -> Option<NonZero<usize>> {
        self.core.lock().ceiling
    }

    /// Resets `item` and puts it back in the free set, or destroys it if the pool is over its
    /// ceiling. Wakes every waiter either way.
    ///
    /// If `reset()` panics, the instance is destroyed and leaves the owned set before the panic
    /// continues, so its unit of ceiling is not lost.
    pub(crate) fn give_back(&self, mut item: T) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| item.reset())) {
            drop(item);
            self.forget();

            warn!("destroyed instance whose reset panicked");

            // A second panic while already unwinding would abort the process.
            if !thread::panicking() {
                panic::resume_unwind(payload);
            }

            return;
        }

        let surplus = {
            let mut state = self.core.lock();

            if state.is_over_ceiling() {
                state.forget_one();

                debug!(owned = state.owned, "destroyed surplus instance on release");

                Some(item)
            } else {
                state.free.push_back(item);

                trace!(free = state.free.len(), "released instance");

                None
            }
        };

        drop(surplus);

        self.core.released.notify_all();
    }

    /// Removes a leased instance from the owned set without returning it.
    pub(crate) fn forget(&self) {
        let mut state = self.core.lock();
        state.forget_one();

        debug!(owned = state.owned, "instance detached from resource pool");

        drop(state);

        // A detached instance frees a unit of ceiling, which is also progress for waiters.
        self.core.released.notify_all();
    }

    pub(crate) fn same_pool(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> PoolCore<T> {
    fn lock(&self) -> MutexGuard<'_, PoolState<T>> {
        self.state.lock().expect(ERR_POISONED_LOCK)
    }

    /// Waits until the free set is non-empty or `timeout` elapses, then takes the oldest free
    /// instance. The lock is released while waiting.
    fn wait_for_free(
        &self,
        state: MutexGuard<'_, PoolState<T>>,
        timeout: Option<Duration>,
    ) -> Option<T> {
        let mut state = match timeout {
            None => self
                .released
                .wait_while(state, |state| state.free.is_empty())
                .expect(ERR_POISONED_LOCK),
            Some(timeout) => {
                self.released
                    .wait_timeout_while(state, timeout, |state| state.free.is_empty())
                    .expect(ERR_POISONED_LOCK)
                    .0
            }
        };

        let item = state.free.pop_front();

        if item.is_none() {
            trace!(?timeout, "timed out waiting for a free instance");
        }

        item
    }
}

impl<T> Drop for PoolCore<T> {
    fn drop(&mut self) {
        // Leases keep the core alive, so at this point every owned instance is in the free set.
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);

        debug!(destroyed = state.free.len(), "dropping resource pool");
    }
}

impl<T: Reset> Clone for ResourcePool<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Reset + Default> Default for ResourcePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reset> fmt::Debug for ResourcePool<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract to test.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.core.lock();

        f.debug_struct("ResourcePool")
            .field("owned", &state.owned)
            .field("free", &state.free.len())
            .field("max_count", &state.ceiling)
            .finish()
    }
}
