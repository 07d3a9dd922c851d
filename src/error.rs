//! Errors reported by the checked map operations.

/// Failure of a checked `LinkedHashMap` operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// `at`/`at_mut` (or indexing) with a key that is not in the map.
    #[error("key not found")]
    KeyNotFound,
    /// The handle's entry was removed, or the handle came from another map.
    #[error("handle does not refer to a live entry")]
    InvalidHandle,
    /// The end of a range is not reachable from its start.
    #[error("range end is not reachable from range start")]
    InvalidRange,
    /// `try_insert` with a key that is already present.
    #[error("key already present")]
    DuplicateKey,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
