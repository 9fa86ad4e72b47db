// ============================================================================
// spark-observable - Change Notifier
// The property-changed + collection-changed contract shared by all observables
// ============================================================================

use crate::core::types::{CollectionChange, PropertyName};

use super::handlers::{HandlerList, Subscription};

/// Boxed property-changed handler.
pub type PropertyHandler = Box<dyn Fn(PropertyName)>;

/// Boxed collection-changed handler for items of type `T`.
pub type CollectionHandler<T> = Box<dyn Fn(&CollectionChange<T>)>;

// =============================================================================
// CONTRACT TRAITS
// =============================================================================

/// Something that reports property changes to a binding layer.
pub trait NotifyPropertyChanged {
    /// Register a handler for property-changed notifications.
    fn subscribe_property_changed(&self, handler: PropertyHandler) -> Subscription;
}

/// Something that reports structural changes to a binding layer.
pub trait NotifyCollectionChanged {
    /// Item type carried by [`CollectionChange`] records.
    type Item;

    /// Register a handler for collection-changed notifications.
    fn subscribe_collection_changed(&self, handler: CollectionHandler<Self::Item>)
    -> Subscription;
}

// =============================================================================
// CHANGE NOTIFIER
// =============================================================================

/// Both handler lists of one observable instance.
///
/// `notify` fixes the dispatch order: all property notifications of a
/// mutation, then its single collection notification.
pub struct ChangeNotifier<T> {
    property_changed: HandlerList<PropertyName>,
    collection_changed: HandlerList<CollectionChange<T>>,
}

impl<T: 'static> ChangeNotifier<T> {
    pub fn new() -> Self {
        Self {
            property_changed: HandlerList::new(),
            collection_changed: HandlerList::new(),
        }
    }

    pub fn on_property_changed(&self, handler: impl Fn(PropertyName) + 'static) -> Subscription {
        self.property_changed.subscribe(move |name: &PropertyName| handler(*name))
    }

    pub fn on_collection_changed(
        &self,
        handler: impl Fn(&CollectionChange<T>) + 'static,
    ) -> Subscription {
        self.collection_changed.subscribe(handler)
    }

    /// Fire one property-changed notification.
    pub fn property_changed(&self, name: PropertyName) {
        self.property_changed.emit(&name);
    }

    /// Fire one collection-changed notification.
    pub fn collection_changed(&self, change: &CollectionChange<T>) {
        self.collection_changed.emit(change);
    }

    /// Fire `properties` in order, then `change`.
    pub fn notify(&self, properties: &[PropertyName], change: &CollectionChange<T>) {
        for name in properties {
            self.property_changed(*name);
        }
        self.collection_changed(change);
    }

    /// Number of property-changed handlers.
    pub fn property_handler_count(&self) -> usize {
        self.property_changed.len()
    }

    /// Number of collection-changed handlers.
    pub fn collection_handler_count(&self) -> usize {
        self.collection_changed.len()
    }
}

impl<T: 'static> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("property_changed", &self.property_changed)
            .field("collection_changed", &self.collection_changed)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn properties_fire_before_collection_change() {
        let notifier: ChangeNotifier<i32> = ChangeNotifier::new();
        let log = Rc::new(RefCell::new(Vec::<String>::new()));

        let l = log.clone();
        let _c = notifier.on_collection_changed(move |change| {
            l.borrow_mut().push(format!("{:?}", change.kind()));
        });
        let l = log.clone();
        let _p = notifier.on_property_changed(move |name| {
            l.borrow_mut().push(name.to_string());
        });

        notifier.notify(
            &[PropertyName::Count, PropertyName::Indexer],
            &CollectionChange::added(5, 0),
        );

        assert_eq!(*log.borrow(), vec!["Count", "Item[]", "Add"]);
    }

    #[test]
    fn handler_counts() {
        let notifier: ChangeNotifier<()> = ChangeNotifier::new();
        let p = notifier.on_property_changed(|_| {});
        let _c = notifier.on_collection_changed(|_| {});

        assert_eq!(notifier.property_handler_count(), 1);
        assert_eq!(notifier.collection_handler_count(), 1);

        drop(p);
        assert_eq!(notifier.property_handler_count(), 0);
    }
}
