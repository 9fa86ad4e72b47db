// ============================================================================
// spark-observable - Observable Collections for Rust
// ============================================================================
//
// Dictionaries and sequences that tell observers about every change, plus a
// schema-driven proxy that adds the same property-changed contract to plain
// values. Single-threaded: handles share state through `Rc`.
// ============================================================================

pub mod collections;
pub mod core;
pub mod notify;
pub mod proxy;

mod macros;

// Re-export core items at crate root for ergonomic access
pub use core::constants;
pub use core::error::{ObservableError, Result};
pub use core::guard::{MutationScope, ReentrancyGuard};
pub use core::types::{ChangeKind, CollectionChange, PropertyName};

// Re-export notification plumbing
pub use notify::{
    ChangeNotifier, CollectionHandler, HandlerId, HandlerList, NotifyCollectionChanged,
    NotifyPropertyChanged, PropertyHandler, Subscription,
};

// Re-export collections
pub use collections::{
    DictionaryOptions, ReactiveDictionary, ReactiveSequence, SequenceOptions,
    WeakReactiveDictionary, WeakReactiveSequence,
};

// Re-export the proxy
pub use proxy::{PropertyProxy, Schema};

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn property_names_match_binding_conventions() {
        assert_eq!(PropertyName::Count.as_str(), constants::COUNT_PROPERTY);
        assert_eq!(PropertyName::Indexer.as_str(), "Item[]");
        assert_eq!(PropertyName::Keys.to_string(), "Keys");
        assert_eq!(PropertyName::Values.to_string(), "Values");
    }

    #[test]
    fn both_collections_share_the_notification_traits() {
        fn count_properties(source: &impl NotifyPropertyChanged, act: impl FnOnce()) -> usize {
            let hits = Rc::new(RefCell::new(0));
            let h = hits.clone();
            let _sub = source.subscribe_property_changed(Box::new(move |_: PropertyName| {
                *h.borrow_mut() += 1;
            }));
            act();
            let n = *hits.borrow();
            n
        }

        let dict = ReactiveDictionary::<&str, i32>::new();
        let seq = ReactiveSequence::<i32>::new();

        // Count, Item[], Keys, Values
        assert_eq!(count_properties(&dict, || dict.add("a", 1).unwrap()), 4);
        // Count, Item[]
        assert_eq!(count_properties(&seq, || seq.push(1).unwrap()), 2);
    }

    #[test]
    fn observer_sees_committed_state() {
        let dict = ReactiveDictionary::<String, u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let weak = dict.downgrade();
        let sink = seen.clone();
        let _sub = dict.on_collection_changed(move |_| {
            if let Some(dict) = weak.upgrade() {
                sink.borrow_mut().push(dict.len());
            }
        });

        dict.add("x".into(), 1).unwrap();
        dict.add("y".into(), 2).unwrap();
        dict.remove("x").unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn errors_are_reexported() {
        let seq = reactive_sequence![1, 2];
        assert_eq!(
            seq.set(5, 0),
            Err(ObservableError::IndexOutOfRange { index: 5, len: 2 })
        );
    }
}
