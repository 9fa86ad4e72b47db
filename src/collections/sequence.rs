// ============================================================================
// spark-observable - ReactiveSequence
// An ordered, index-addressed list with batched range notifications
// ============================================================================
//
// Single-item operations dispatch one record per call. Range operations
// (`add_range`, `remove_range`) commit the whole batch first and then
// dispatch exactly one record carrying every affected item, so a binding
// layer refreshes once per batch instead of once per element.
//
// An empty batch is a no-op: no guard, no notification, no error.
// ============================================================================

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::core::constants::LOG_TARGET;
use crate::core::error::{ObservableError, Result};
use crate::core::guard::{MutationScope, ReentrancyGuard};
use crate::core::types::{CollectionChange, PropertyName};
use crate::notify::{
    ChangeNotifier, CollectionHandler, NotifyCollectionChanged, NotifyPropertyChanged,
    PropertyHandler, Subscription,
};

use super::options::SequenceOptions;

/// Properties reported when the length changes.
const STRUCTURAL_PROPERTIES: [PropertyName; 2] = [PropertyName::Count, PropertyName::Indexer];

/// Properties reported when contents change but the length does not.
const CONTENT_PROPERTIES: [PropertyName; 1] = [PropertyName::Indexer];

// =============================================================================
// SHARED STATE
// =============================================================================

struct SequenceInner<T> {
    data: RefCell<Vec<T>>,
    guard: ReentrancyGuard,
    notifier: ChangeNotifier<T>,
}

// =============================================================================
// REACTIVE SEQUENCE
// =============================================================================

/// An insertion-ordered sequence with change notification.
///
/// Duplicates are allowed. Cloning shares the same sequence.
///
/// # Example
///
/// ```
/// use spark_observable::ReactiveSequence;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let items: ReactiveSequence<&str> = ReactiveSequence::new();
/// let events = Rc::new(Cell::new(0));
///
/// let counter = events.clone();
/// let _sub = items.on_collection_changed(move |_| counter.set(counter.get() + 1));
///
/// items.add_range(["a", "b", "c"]).unwrap();
/// items.add_range(Vec::new()).unwrap();
///
/// assert_eq!(items.len(), 3);
/// assert_eq!(events.get(), 1);
/// ```
pub struct ReactiveSequence<T> {
    inner: Rc<SequenceInner<T>>,
}

impl<T: Clone + 'static> ReactiveSequence<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an empty sequence with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }

    /// Create an empty sequence from options.
    pub fn with_options(options: SequenceOptions) -> Self {
        Self::with_capacity(options.capacity)
    }

    /// Wrap an existing vec.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: Rc::new(SequenceInner {
                data: RefCell::new(data),
                guard: ReentrancyGuard::new(),
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn store(&self) -> Ref<'_, Vec<T>> {
        self.inner.data.borrow()
    }

    fn store_mut(&self) -> Result<RefMut<'_, Vec<T>>> {
        self.inner
            .data
            .try_borrow_mut()
            .map_err(|_| ObservableError::Reentrancy)
    }

    fn begin_mutation(&self) -> Result<MutationScope<'_>> {
        self.inner.guard.enter()
    }

    fn dispatch(&self, properties: &[PropertyName], change: CollectionChange<T>) {
        tracing::trace!(
            target: LOG_TARGET,
            kind = ?change.kind(),
            items = change.len(),
            len = self.len(),
            "sequence changed"
        );
        self.inner.notifier.notify(properties, &change);
    }

    fn out_of_range(index: usize, len: usize) -> ObservableError {
        ObservableError::IndexOutOfRange { index, len }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.store().len()
    }

    /// Alias of [`len`](Self::len) using the binding-layer name.
    pub fn count(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<T> {
        self.store().get(index).cloned()
    }

    /// Borrow the items as a slice.
    ///
    /// The sequence cannot be mutated while `f` runs; attempts fail with
    /// [`ObservableError::Reentrancy`].
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.store())
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.store().contains(item)
    }

    /// Position of the first item equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.store().iter().position(|x| x == item)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.store().clone()
    }

    /// Iterate over a snapshot of the items.
    pub fn iter(&self) -> std::vec::IntoIter<T> {
        self.to_vec().into_iter()
    }

    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        for item in self.store().iter() {
            f(item);
        }
    }

    /// True while a mutation is dispatching its notifications.
    pub fn is_being_modified(&self) -> bool {
        self.inner.guard.is_active()
    }

    // =========================================================================
    // SINGLE-ITEM MUTATIONS
    // =========================================================================

    /// Append one item.
    pub fn push(&self, item: T) -> Result<()> {
        let _scope = self.begin_mutation()?;

        let index = {
            let mut data = self.store_mut()?;
            data.push(item.clone());
            data.len() - 1
        };

        self.dispatch(&STRUCTURAL_PROPERTIES, CollectionChange::added(item, index));
        Ok(())
    }

    /// Insert `item` at `index`, shifting later items right.
    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        let _scope = self.begin_mutation()?;

        {
            let mut data = self.store_mut()?;
            if index > data.len() {
                return Err(Self::out_of_range(index, data.len()));
            }
            data.insert(index, item.clone());
        }

        self.dispatch(&STRUCTURAL_PROPERTIES, CollectionChange::added(item, index));
        Ok(())
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&self, index: usize, item: T) -> Result<T> {
        let _scope = self.begin_mutation()?;

        let old = {
            let mut data = self.store_mut()?;
            let len = data.len();
            let slot = data
                .get_mut(index)
                .ok_or_else(|| Self::out_of_range(index, len))?;
            std::mem::replace(slot, item.clone())
        };

        self.dispatch(
            &CONTENT_PROPERTIES,
            CollectionChange::replaced(item, old.clone(), index),
        );
        Ok(old)
    }

    /// Remove and return the item at `index`.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        let _scope = self.begin_mutation()?;

        let removed = {
            let mut data = self.store_mut()?;
            if index >= data.len() {
                return Err(Self::out_of_range(index, data.len()));
            }
            data.remove(index)
        };

        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::removed(removed.clone(), index),
        );
        Ok(removed)
    }

    /// Remove the first item equal to `item`. `Ok(false)` if there is none.
    pub fn remove(&self, item: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        let _scope = self.begin_mutation()?;

        let removed = {
            let mut data = self.store_mut()?;
            let position = data.iter().position(|x| x == item);
            position.map(|index| (index, data.remove(index)))
        };
        let Some((index, removed)) = removed else {
            return Ok(false);
        };

        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::removed(removed, index),
        );
        Ok(true)
    }

    /// Move the item at `old_index` so that it ends up at `new_index`.
    pub fn move_item(&self, old_index: usize, new_index: usize) -> Result<()> {
        let _scope = self.begin_mutation()?;

        let item = {
            let mut data = self.store_mut()?;
            let len = data.len();
            if old_index >= len {
                return Err(Self::out_of_range(old_index, len));
            }
            if new_index >= len {
                return Err(Self::out_of_range(new_index, len));
            }
            let item = data.remove(old_index);
            data.insert(new_index, item.clone());
            item
        };

        self.dispatch(
            &CONTENT_PROPERTIES,
            CollectionChange::Move {
                items: vec![item],
                old_index,
                new_index,
            },
        );
        Ok(())
    }

    /// Remove every item and dispatch a single `Reset`.
    pub fn clear(&self) -> Result<()> {
        let _scope = self.begin_mutation()?;

        self.store_mut()?.clear();

        self.dispatch(&STRUCTURAL_PROPERTIES, CollectionChange::Reset);
        Ok(())
    }

    // =========================================================================
    // RANGE MUTATIONS
    // =========================================================================

    /// Append every item of `items` and dispatch one `Add` record holding the
    /// whole batch in order. An empty batch does nothing.
    pub fn add_range<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let batch: Vec<T> = items.into_iter().collect();
        if batch.is_empty() {
            return Ok(());
        }

        let _scope = self.begin_mutation()?;

        let start = {
            let mut data = self.store_mut()?;
            let start = data.len();
            data.extend(batch.iter().cloned());
            start
        };

        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::Add {
                items: batch,
                index: Some(start),
            },
        );
        Ok(())
    }

    /// Remove the first match of each item in `items` and dispatch one
    /// `Remove` record. Returns how many items were removed.
    ///
    /// Items with no match are skipped without error. Any non-empty batch
    /// dispatches the properties and one record, even when nothing matched;
    /// the record lists only the items actually removed, in batch order. An
    /// empty batch does nothing.
    pub fn remove_range<I>(&self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
        T: PartialEq,
    {
        let batch: Vec<T> = items.into_iter().collect();
        if batch.is_empty() {
            return Ok(0);
        }

        let _scope = self.begin_mutation()?;

        let removed: Vec<T> = {
            let mut data = self.store_mut()?;
            batch
                .into_iter()
                .filter_map(|item| {
                    let index = data.iter().position(|x| *x == item)?;
                    Some(data.remove(index))
                })
                .collect()
        };

        let count = removed.len();
        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::Remove {
                items: removed,
                index: None,
            },
        );
        Ok(count)
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    pub fn on_property_changed(&self, handler: impl Fn(PropertyName) + 'static) -> Subscription {
        self.inner.notifier.on_property_changed(handler)
    }

    pub fn on_collection_changed(
        &self,
        handler: impl Fn(&CollectionChange<T>) + 'static,
    ) -> Subscription {
        self.inner.notifier.on_collection_changed(handler)
    }

    // =========================================================================
    // HANDLES
    // =========================================================================

    pub fn downgrade(&self) -> WeakReactiveSequence<T> {
        WeakReactiveSequence {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// =============================================================================
// WEAK HANDLE
// =============================================================================

/// Weak counterpart of [`ReactiveSequence`].
pub struct WeakReactiveSequence<T> {
    inner: Weak<SequenceInner<T>>,
}

impl<T> WeakReactiveSequence<T> {
    pub fn upgrade(&self) -> Option<ReactiveSequence<T>> {
        self.inner.upgrade().map(|inner| ReactiveSequence { inner })
    }
}

impl<T> Clone for WeakReactiveSequence<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl<T> Clone for ReactiveSequence<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Default for ReactiveSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> FromIterator<T> for ReactiveSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + 'static> From<Vec<T>> for ReactiveSequence<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: Clone + 'static> IntoIterator for &ReactiveSequence<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + 'static> NotifyPropertyChanged for ReactiveSequence<T> {
    fn subscribe_property_changed(&self, handler: PropertyHandler) -> Subscription {
        self.on_property_changed(handler)
    }
}

impl<T: Clone + 'static> NotifyCollectionChanged for ReactiveSequence<T> {
    type Item = T;

    fn subscribe_collection_changed(&self, handler: CollectionHandler<T>) -> Subscription {
        self.on_collection_changed(handler)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReactiveSequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("ReactiveSequence");
        match self.inner.data.try_borrow() {
            Ok(data) => out.field("len", &data.len()).field("items", &*data),
            Err(_) => out.field("items", &"<borrowed>"),
        };
        out.finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
