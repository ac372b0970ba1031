use thiserror::Error;

/// Errors that can occur when handing instances back to a [`ResourcePool`][crate::ResourcePool].
///
/// Running out of instances is not an error: acquisition reports it by returning `None`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller tried to release a lease into a pool that did not hand it out.
    ///
    /// The lease is still returned to the pool that owns it, so nothing is lost.
    #[error("the released instance is not owned by this pool")]
    ForeignInstance,
}
