// ============================================================================
// spark-observable - Core Module
// Errors, event records, property tags and the reentrancy guard
// ============================================================================

pub mod constants;
pub mod error;
pub mod guard;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use error::{ObservableError, Result};
pub use guard::{MutationScope, ReentrancyGuard};
pub use types::{ChangeKind, CollectionChange, PropertyName};
