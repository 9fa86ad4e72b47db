// ============================================================================
// spark-observable - Event Types
// Property tags and collection change records delivered to observers
// ============================================================================

use std::fmt;

use super::constants::{COUNT_PROPERTY, INDEXER_PROPERTY, KEYS_PROPERTY, VALUES_PROPERTY};

// =============================================================================
// PROPERTY NAME
// =============================================================================

/// Tag identifying which property of an observable changed.
///
/// Collections only ever report the four fixed tags. Property proxies report
/// `Field` with the schema name of the written field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    /// Number of items.
    Count,
    /// Indexed/keyed contents (`Item[]`).
    Indexer,
    /// Dictionary key set.
    Keys,
    /// Dictionary value set.
    Values,
    /// A named field of a proxied object.
    Field(&'static str),
}

impl PropertyName {
    /// The binding-layer string for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyName::Count => COUNT_PROPERTY,
            PropertyName::Indexer => INDEXER_PROPERTY,
            PropertyName::Keys => KEYS_PROPERTY,
            PropertyName::Values => VALUES_PROPERTY,
            PropertyName::Field(name) => name,
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CHANGE KIND
// =============================================================================

/// Discriminant of a [`CollectionChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
    Replace,
    Move,
    Reset,
}

// =============================================================================
// COLLECTION CHANGE
// =============================================================================

/// Structured description of one committed mutation.
///
/// Every variant except `Reset` carries the affected items. Batched range
/// operations put the entire batch into a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChange<T> {
    /// Items were added. `index` is where the first one landed, when known.
    Add { items: Vec<T>, index: Option<usize> },

    /// Items were removed. `index` is where the first one was, when the
    /// removed items were contiguous.
    Remove { items: Vec<T>, index: Option<usize> },

    /// Items at `index` were replaced.
    Replace {
        new_items: Vec<T>,
        old_items: Vec<T>,
        index: usize,
    },

    /// Items moved from `old_index` to `new_index`.
    Move {
        items: Vec<T>,
        old_index: usize,
        new_index: usize,
    },

    /// The whole collection must be treated as invalidated.
    Reset,
}

impl<T> CollectionChange<T> {
    pub(crate) fn added(item: T, index: usize) -> Self {
        CollectionChange::Add {
            items: vec![item],
            index: Some(index),
        }
    }

    pub(crate) fn removed(item: T, index: usize) -> Self {
        CollectionChange::Remove {
            items: vec![item],
            index: Some(index),
        }
    }

    pub(crate) fn replaced(new_item: T, old_item: T, index: usize) -> Self {
        CollectionChange::Replace {
            new_items: vec![new_item],
            old_items: vec![old_item],
            index,
        }
    }

    /// Which kind of change this is.
    pub fn kind(&self) -> ChangeKind {
        match self {
            CollectionChange::Add { .. } => ChangeKind::Add,
            CollectionChange::Remove { .. } => ChangeKind::Remove,
            CollectionChange::Replace { .. } => ChangeKind::Replace,
            CollectionChange::Move { .. } => ChangeKind::Move,
            CollectionChange::Reset => ChangeKind::Reset,
        }
    }

    /// Items now present because of this change.
    ///
    /// Empty for `Remove` and `Reset`.
    pub fn new_items(&self) -> &[T] {
        match self {
            CollectionChange::Add { items, .. } | CollectionChange::Move { items, .. } => items,
            CollectionChange::Replace { new_items, .. } => new_items,
            CollectionChange::Remove { .. } | CollectionChange::Reset => &[],
        }
    }

    /// Items no longer present (or no longer at their old position).
    ///
    /// Empty for `Add` and `Reset`.
    pub fn old_items(&self) -> &[T] {
        match self {
            CollectionChange::Remove { items, .. } | CollectionChange::Move { items, .. } => items,
            CollectionChange::Replace { old_items, .. } => old_items,
            CollectionChange::Add { .. } | CollectionChange::Reset => &[],
        }
    }

    /// Index the change starts at, when one applies.
    ///
    /// For `Move` this is the destination index.
    pub fn starting_index(&self) -> Option<usize> {
        match self {
            CollectionChange::Add { index, .. } | CollectionChange::Remove { index, .. } => *index,
            CollectionChange::Replace { index, .. } => Some(*index),
            CollectionChange::Move { new_index, .. } => Some(*new_index),
            CollectionChange::Reset => None,
        }
    }

    /// Number of items the change describes (zero for `Reset`).
    pub fn len(&self) -> usize {
        match self {
            CollectionChange::Replace { new_items, .. } => new_items.len(),
            other => other.new_items().len().max(other.old_items().len()),
        }
    }

    /// True for `Reset` and for records that carry no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_names_match_binding_strings() {
        assert_eq!(PropertyName::Count.as_str(), "Count");
        assert_eq!(PropertyName::Indexer.as_str(), "Item[]");
        assert_eq!(PropertyName::Keys.to_string(), "Keys");
        assert_eq!(PropertyName::Values.to_string(), "Values");
        assert_eq!(PropertyName::Field("Title").as_str(), "Title");
    }

    #[test]
    fn reset_carries_nothing() {
        let change: CollectionChange<i32> = CollectionChange::Reset;
        assert_eq!(change.kind(), ChangeKind::Reset);
        assert!(change.new_items().is_empty());
        assert!(change.old_items().is_empty());
        assert_eq!(change.starting_index(), None);
        assert!(change.is_empty());
    }

    #[test]
    fn replace_exposes_both_sides() {
        let change = CollectionChange::replaced("new", "old", 3);
        assert_eq!(change.kind(), ChangeKind::Replace);
        assert_eq!(change.new_items(), &["new"]);
        assert_eq!(change.old_items(), &["old"]);
        assert_eq!(change.starting_index(), Some(3));
        assert_eq!(change.len(), 1);
    }

    #[test]
    fn batch_add_reports_every_item() {
        let change = CollectionChange::Add {
            items: vec![1, 2, 3],
            index: Some(0),
        };
        assert_eq!(change.new_items(), &[1, 2, 3]);
        assert!(change.old_items().is_empty());
        assert_eq!(change.len(), 3);
    }

    #[test]
    fn move_reports_destination() {
        let change = CollectionChange::Move {
            items: vec!['a'],
            old_index: 0,
            new_index: 2,
        };
        assert_eq!(change.kind(), ChangeKind::Move);
        assert_eq!(change.starting_index(), Some(2));
        assert_eq!(change.new_items(), change.old_items());
    }
}
