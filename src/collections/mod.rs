// ============================================================================
// spark-observable - Observable Collections
// Dictionaries and sequences that report every mutation to observers
// ============================================================================
//
// Both collections follow the same protocol for each mutation:
//
// 1. Acquire the reentrancy guard (fails fast if a dispatch is in flight)
// 2. Validate and commit the change to the backing store
// 3. Release the store borrow
// 4. Fire property notifications, then one collection notification
// 5. Release the guard (also on panic)
// ============================================================================

mod dictionary;
mod options;
mod sequence;

pub use dictionary::{ReactiveDictionary, WeakReactiveDictionary};
pub use options::{DictionaryOptions, SequenceOptions};
pub use sequence::{ReactiveSequence, WeakReactiveSequence};
