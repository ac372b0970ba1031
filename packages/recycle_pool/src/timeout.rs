use std::time::Duration;

/// Converts a wait window expressed in milliseconds into the form accepted by the
/// acquire methods of [`ResourcePool`][crate::ResourcePool].
///
/// Zero and negative values mean "wait indefinitely" and map to `None`. This matches the
/// convention used by configuration files and C-style APIs that carry timeouts as integers.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use recycle_pool::timeout_from_millis;
///
/// assert_eq!(timeout_from_millis(250), Some(Duration::from_millis(250)));
/// assert_eq!(timeout_from_millis(0), None);
/// assert_eq!(timeout_from_millis(-1), None);
/// ```
#[must_use]
pub fn timeout_from_millis(millis: i64) -> Option<Duration> {
    u64::try_from(millis)
        .ok()
        .filter(|millis| *millis > 0)
        .map(Duration::from_millis)
}
