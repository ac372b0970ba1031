#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`ResourcePool`], a bounded, thread-safe pool of reusable objects.
//!
//! Callers check instances out of the pool instead of allocating them, and the pool hands the
//! same instances out again once they are returned. This bounds peak memory usage and reuses
//! expensive allocations (buffers, result records, task state) across a high request rate.
//!
//! # Features
//!
//! - **Bounded growth**: An optional ceiling caps how many instances can exist at once. The
//!   ceiling can be raised or lowered at runtime.
//! - **Lazy construction**: Instances can be pre-allocated up front and/or constructed on demand.
//! - **Blocking with timeout**: Callers can wait for an instance to be returned, indefinitely or
//!   for a bounded time.
//! - **Automatic return**: [`Lease<T>`] and [`Recycled<T>`] return the instance to the pool
//!   when dropped.
//! - **Reset on return**: Every returned instance is [reset][Reset] before it is reused.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use recycle_pool::{Reset, ResourcePool};
//!
//! #[derive(Default)]
//! struct Scratch {
//!     bytes: Vec<u8>,
//! }
//!
//! impl Reset for Scratch {
//!     fn reset(&mut self) {
//!         self.bytes.clear();
//!     }
//! }
//!
//! // One scratch buffer up front, at most two in total.
//! let pool = ResourcePool::<Scratch>::builder()
//!     .pre_allocate(1)
//!     .max_count(2)
//!     .build();
//!
//! let mut first = pool.try_acquire().unwrap();
//! first.bytes.extend_from_slice(b"request 1");
//!
//! // The free set is empty but the pool may grow by one.
//! let second = pool.acquire_or_create(Some(Duration::from_millis(100))).unwrap();
//! assert_eq!(pool.len(), 2);
//!
//! // At the ceiling, no more instances can be created and none are free.
//! assert!(pool.acquire_or_create(Some(Duration::from_millis(1))).is_none());
//!
//! drop(first);
//! drop(second);
//! assert_eq!(pool.available(), 2);
//! ```

mod builder;
mod constants;
mod error;
mod lease;
mod pool;
mod recycled;
mod reset;
mod timeout;

pub use builder::*;
pub use error::*;
pub use lease::*;
pub use pool::*;
pub use recycled::*;
pub use reset::*;
pub use timeout::*;
