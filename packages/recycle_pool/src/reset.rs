use std::collections::VecDeque;

/// Clears the transient state of a recycled object so it can be handed out again.
///
/// This is the only behavior a [`ResourcePool`][crate::ResourcePool] requires from the objects it
/// manages. The pool calls [`reset()`][Self::reset] every time an instance is returned, before the
/// instance becomes available to the next caller.
///
/// Implementations must be idempotent: resetting an already-reset object must leave it unchanged.
/// Resetting should keep any allocations that make reuse worthwhile (e.g. buffer capacity).
///
/// # Example
///
/// ```rust
/// use recycle_pool::Reset;
///
/// #[derive(Default)]
/// struct Frame {
///     pixels: Vec<u8>,
///     sequence: u64,
/// }
///
/// impl Reset for Frame {
///     fn reset(&mut self) {
///         self.pixels.clear();
///         self.sequence = 0;
///     }
/// }
/// ```
pub trait Reset {
    /// Clears all caller-visible state of the object.
    fn reset(&mut self);
}

impl<T> Reset for Vec<T> {
    #[inline]
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T> Reset for VecDeque<T> {
    #[inline]
    fn reset(&mut self) {
        self.clear();
    }
}

impl Reset for String {
    #[inline]
    fn reset(&mut self) {
        self.clear();
    }
}
