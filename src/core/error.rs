// ============================================================================
// spark-observable - Errors
// The single error type returned by every fallible operation
// ============================================================================

use thiserror::Error;

/// Errors produced by observable collections and property proxies.
///
/// Every failure is reported before the backing store is touched, so an
/// `Err` always means "nothing changed and nobody was notified".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservableError {
    /// A mutation was attempted while another mutation of the same instance
    /// was still dispatching its notifications.
    #[error("cannot modify the collection during a change notification")]
    Reentrancy,

    /// The instance is configured read-only.
    #[error("collection is read only and cannot be modified")]
    ReadOnly,

    /// `add` was called with a key that is already present.
    #[error("an item with the same key has already been added")]
    DuplicateKey,

    /// A keyed read found no entry.
    #[error("the given key was not present in the dictionary")]
    KeyNotFound,

    /// An index was outside `0..len` (or `0..=len` for insertion).
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A required argument was unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A proxy was asked for a property its schema does not declare.
    #[error("no writable property named `{0}`")]
    UnknownProperty(String),

    /// A proxy property was read or written with the wrong value type.
    #[error("property `{property}` does not hold a value of type {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ObservableError>;
