// ============================================================================
// spark-observable - Constants
// Property tags and logging targets shared by every observable type
// ============================================================================

// =============================================================================
// PROPERTY NAMES
// =============================================================================
//
// Binding layers key their refresh logic off these exact strings, so they
// must not change. `Item[]` is the conventional indexer tag.

/// Name reported when the number of items changes.
pub const COUNT_PROPERTY: &str = "Count";

/// Name reported when any indexed/keyed value may have changed.
pub const INDEXER_PROPERTY: &str = "Item[]";

/// Name reported when the key set of a dictionary changes.
pub const KEYS_PROPERTY: &str = "Keys";

/// Name reported when the value set of a dictionary changes.
pub const VALUES_PROPERTY: &str = "Values";

// =============================================================================
// LOGGING
// =============================================================================

/// `tracing` target used for all events emitted by this crate.
pub const LOG_TARGET: &str = "spark_observable";
