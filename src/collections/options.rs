// ============================================================================
// spark-observable - Collection Options
// Construction-time configuration for the observable collections
// ============================================================================

/// Options for creating a [`ReactiveDictionary`](super::ReactiveDictionary).
///
/// ```
/// use spark_observable::{DictionaryOptions, ReactiveDictionary};
///
/// let frozen: ReactiveDictionary<&str, i32> =
///     ReactiveDictionary::with_options(DictionaryOptions::default().capacity(8).read_only(true));
/// assert!(frozen.is_read_only());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DictionaryOptions {
    /// Initial capacity of the backing store.
    pub capacity: usize,
    /// Start in read-only mode.
    pub read_only: bool,
}

impl DictionaryOptions {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Options for creating a [`ReactiveSequence`](super::ReactiveSequence).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    /// Initial capacity of the backing store.
    pub capacity: usize,
}

impl SequenceOptions {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
