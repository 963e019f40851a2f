use thiserror::Error;

/// Errors returned when an [`OrderedMap`](crate::OrderedMap), one of its views, or a
/// [`Cursor`](crate::Cursor) is misused.
///
/// Every fallible operation validates its arguments before touching the map, so an
/// `Err` always means the map is exactly as it was before the call.
///
/// Problems found in persisted data are *not* errors; see
/// [`Diagnostics`](crate::Diagnostics).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
#[non_exhaustive]
pub enum Error {
    /// A position was outside the valid range for the operation.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The position that was requested.
        index: usize,
        /// The length of the sequence at the time of the call.
        len: usize,
    },

    /// A missing key was passed to an explicit mutation.
    #[error("key must not be null")]
    NullKey,

    /// The key is already present in the map.
    #[error("an entry with the same key already exists at index {index}")]
    DuplicateKey {
        /// Position of the existing entry.
        index: usize,
    },

    /// A mutation was attempted through a read-only view.
    #[error("collection is read-only")]
    ReadOnly,

    /// The map was structurally modified after the cursor was created.
    #[error("collection was modified; enumeration operation may not execute (expected version {expected}, found {found})")]
    VersionMismatch {
        /// Version captured when the cursor was created or last reset.
        expected: u64,
        /// Version of the map when the cursor was used.
        found: u64,
    },
}

/// A `Result` alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
