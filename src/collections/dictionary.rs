// ============================================================================
// spark-observable - ReactiveDictionary
// An insertion-ordered map that reports every mutation to its observers
// ============================================================================
//
// Three contracts meet here:
//
// 1. Mapping: unique keys, `add` never overwrites, `set` upserts
// 2. Observers: property notifications, then exactly one collection
//    notification, all dispatched before the mutating call returns
// 3. Reentrancy: no mutation may start while another one is dispatching
//
// The store borrow is always released before dispatch, so observers read the
// committed state. Mutations are rejected (not queued) while in flight.
// ============================================================================

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::core::constants::LOG_TARGET;
use crate::core::error::{ObservableError, Result};
use crate::core::guard::{MutationScope, ReentrancyGuard};
use crate::core::types::{CollectionChange, PropertyName};
use crate::notify::{
    ChangeNotifier, CollectionHandler, NotifyCollectionChanged, NotifyPropertyChanged,
    PropertyHandler, Subscription,
};

use super::options::DictionaryOptions;

/// Properties reported by structural mutations (add, remove, clear).
const STRUCTURAL_PROPERTIES: [PropertyName; 4] = [
    PropertyName::Count,
    PropertyName::Indexer,
    PropertyName::Keys,
    PropertyName::Values,
];

/// Properties reported when an existing key gets a new value.
const REPLACE_PROPERTIES: [PropertyName; 3] = [
    PropertyName::Count,
    PropertyName::Indexer,
    PropertyName::Values,
];

// =============================================================================
// SHARED STATE
// =============================================================================

struct DictionaryInner<K, V, S> {
    data: RefCell<IndexMap<K, V, S>>,
    read_only: Cell<bool>,
    guard: ReentrancyGuard,
    notifier: ChangeNotifier<(K, V)>,
}

// =============================================================================
// REACTIVE DICTIONARY
// =============================================================================

/// A key-unique, insertion-ordered dictionary with change notification.
///
/// Cloning produces another handle to the **same** dictionary; observers
/// typically hold a clone (or a [`WeakReactiveDictionary`]) to read it back.
///
/// # Example
///
/// ```
/// use spark_observable::{ChangeKind, ReactiveDictionary};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let scores: ReactiveDictionary<String, u32> = ReactiveDictionary::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = seen.clone();
/// let _sub = scores.on_collection_changed(move |change| log.borrow_mut().push(change.kind()));
///
/// scores.add("ada".to_string(), 10).unwrap();
/// scores.set("ada".to_string(), 12).unwrap();
/// assert!(scores.remove("ada").unwrap());
///
/// assert_eq!(*seen.borrow(), vec![ChangeKind::Add, ChangeKind::Replace, ChangeKind::Remove]);
/// assert!(scores.is_empty());
/// ```
pub struct ReactiveDictionary<K, V, S = RandomState> {
    inner: Rc<DictionaryInner<K, V, S>>,
}

impl<K, V> ReactiveDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create an empty dictionary with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Create an empty dictionary from options.
    pub fn with_options(options: DictionaryOptions) -> Self {
        let dict = Self::with_capacity(options.capacity);
        dict.set_read_only(options.read_only);
        dict
    }

    /// Seed a dictionary from pairs, rejecting repeated keys.
    ///
    /// Unlike [`FromIterator`], where the last duplicate wins, this fails with
    /// [`ObservableError::DuplicateKey`].
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut data = IndexMap::new();
        for (key, value) in pairs {
            if data.contains_key(&key) {
                return Err(ObservableError::DuplicateKey);
            }
            data.insert(key, value);
        }
        Ok(Self::from_map(data))
    }
}

impl<K, V, S> ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + 'static,
{
    /// Create an empty dictionary using `hasher` for key lookups.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_map(IndexMap::with_hasher(hasher))
    }

    /// Create an empty dictionary with capacity and a custom hasher.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_map(IndexMap::with_capacity_and_hasher(capacity, hasher))
    }

    /// Wrap an existing map. Its iteration order is kept.
    pub fn from_map(data: IndexMap<K, V, S>) -> Self {
        Self {
            inner: Rc::new(DictionaryInner {
                data: RefCell::new(data),
                read_only: Cell::new(false),
                guard: ReentrancyGuard::new(),
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn store(&self) -> Ref<'_, IndexMap<K, V, S>> {
        self.inner.data.borrow()
    }

    /// Mutable store access. A live read borrow (e.g. inside `with_value`)
    /// means the caller is nested inside this dictionary, so treat it the
    /// same as reentrant dispatch.
    fn store_mut(&self) -> Result<RefMut<'_, IndexMap<K, V, S>>> {
        self.inner
            .data
            .try_borrow_mut()
            .map_err(|_| ObservableError::Reentrancy)
    }

    /// Reentrancy first, then read-only: the order callers observe.
    fn begin_mutation(&self) -> Result<MutationScope<'_>> {
        let scope = self.inner.guard.enter()?;
        if self.inner.read_only.get() {
            tracing::debug!(target: LOG_TARGET, "rejected mutation of read-only dictionary");
            return Err(ObservableError::ReadOnly);
        }
        Ok(scope)
    }

    fn dispatch(&self, properties: &[PropertyName], change: CollectionChange<(K, V)>) {
        tracing::trace!(
            target: LOG_TARGET,
            kind = ?change.kind(),
            count = self.len(),
            "dictionary changed"
        );
        self.inner.notifier.notify(properties, &change);
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Number of entries.
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

    /// Value for `key`, or [`ObservableError::KeyNotFound`].
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).ok_or(ObservableError::KeyNotFound)
    }

    /// Value for `key`, if present.
    pub fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store().get(key).cloned()
    }

    /// Borrow the value for `key` without cloning it.
    ///
    /// The dictionary cannot be mutated while `f` runs; attempts fail with
    /// [`ObservableError::Reentrancy`].
    pub fn with_value<Q, R>(&self, key: &Q, f: impl FnOnce(&V) -> R) -> Option<R>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store().get(key).map(f)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store().contains_key(key)
    }

    /// True if `key` is present and maps to a value equal to `value`.
    pub fn contains(&self, (key, value): &(K, V)) -> bool
    where
        V: PartialEq,
    {
        self.store().get(key).is_some_and(|v| v == value)
    }

    /// Rank of `key` in iteration order.
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store().get_index_of(key)
    }

    /// Entry at rank `index` in iteration order.
    pub fn get_index(&self, index: usize) -> Option<(K, V)> {
        self.store()
            .get_index(index)
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Keys in iteration order.
    pub fn keys(&self) -> Vec<K> {
        self.store().keys().cloned().collect()
    }

    /// Values in iteration order.
    pub fn values(&self) -> Vec<V> {
        self.store().values().cloned().collect()
    }

    /// Copy of all entries in iteration order.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.store()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Iterate over a snapshot of the entries.
    ///
    /// The snapshot is taken up front, so the dictionary may be mutated while
    /// the iterator is alive.
    pub fn iter(&self) -> std::vec::IntoIter<(K, V)> {
        self.to_vec().into_iter()
    }

    /// Visit each entry by reference, in iteration order.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.store().iter() {
            f(k, v);
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn is_read_only(&self) -> bool {
        self.inner.read_only.get()
    }

    /// Switch read-only mode. While on, every mutation fails with
    /// [`ObservableError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.set(read_only);
    }

    /// True while a mutation is dispatching its notifications.
    pub fn is_being_modified(&self) -> bool {
        self.inner.guard.is_active()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Add a new entry. Fails with [`ObservableError::DuplicateKey`] if `key`
    /// is already present; use [`set`](Self::set) to overwrite.
    pub fn add(&self, key: K, value: V) -> Result<()> {
        let _scope = self.begin_mutation()?;

        let index = {
            let mut data = self.store_mut()?;
            if data.contains_key(&key) {
                tracing::debug!(target: LOG_TARGET, "rejected duplicate key");
                return Err(ObservableError::DuplicateKey);
            }
            data.insert(key.clone(), value.clone());
            data.len() - 1
        };

        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::added((key, value), index),
        );
        Ok(())
    }

    /// Add a `(key, value)` pair. Same as [`add`](Self::add).
    pub fn add_entry(&self, (key, value): (K, V)) -> Result<()> {
        self.add(key, value)
    }

    /// Insert or replace.
    ///
    /// A new key behaves like [`add`](Self::add). An existing key keeps its
    /// position, gets `value`, and a `Replace` record is dispatched. Returns
    /// the previous value, if any.
    pub fn set(&self, key: K, value: V) -> Result<Option<V>> {
        let _scope = self.begin_mutation()?;

        let (index, old) = {
            let mut data = self.store_mut()?;
            match data.get_index_of(&key) {
                Some(index) => {
                    let old = std::mem::replace(&mut data[index], value.clone());
                    (index, Some(old))
                }
                None => {
                    data.insert(key.clone(), value.clone());
                    (data.len() - 1, None)
                }
            }
        };

        match old {
            Some(old) => {
                self.dispatch(
                    &REPLACE_PROPERTIES,
                    CollectionChange::replaced((key.clone(), value), (key, old.clone()), index),
                );
                Ok(Some(old))
            }
            None => {
                self.dispatch(
                    &STRUCTURAL_PROPERTIES,
                    CollectionChange::added((key, value), index),
                );
                Ok(None)
            }
        }
    }

    /// Remove `key` and return its value. `Ok(None)` (and no notification)
    /// when the key is absent.
    pub fn take<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let _scope = self.begin_mutation()?;

        // shift_remove keeps the remaining ranks stable
        let removed = self.store_mut()?.shift_remove_full(key);
        let Some((index, key, value)) = removed else {
            return Ok(None);
        };

        self.dispatch(
            &STRUCTURAL_PROPERTIES,
            CollectionChange::removed((key, value.clone()), index),
        );
        Ok(Some(value))
    }

    /// Remove `key`. Returns `Ok(false)` without notifying when it is absent.
    pub fn remove<Q>(&self, key: &Q) -> Result<bool>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).map(|value| value.is_some())
    }

    /// Remove the entry for the pair's key. The value is not compared.
    pub fn remove_entry(&self, (key, _): &(K, V)) -> Result<bool> {
        self.remove(key)
    }

    /// Remove every entry and dispatch a single `Reset`.
    pub fn clear(&self) -> Result<()> {
        let _scope = self.begin_mutation()?;

        self.store_mut()?.clear();

        self.dispatch(&STRUCTURAL_PROPERTIES, CollectionChange::Reset);
        Ok(())
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register a property-changed handler.
    pub fn on_property_changed(&self, handler: impl Fn(PropertyName) + 'static) -> Subscription {
        self.inner.notifier.on_property_changed(handler)
    }

    /// Register a collection-changed handler.
    pub fn on_collection_changed(
        &self,
        handler: impl Fn(&CollectionChange<(K, V)>) + 'static,
    ) -> Subscription {
        self.inner.notifier.on_collection_changed(handler)
    }

    // =========================================================================
    // HANDLES
    // =========================================================================

    /// Non-owning handle, for observers that must not keep the dictionary
    /// alive.
    pub fn downgrade(&self) -> WeakReactiveDictionary<K, V, S> {
        WeakReactiveDictionary {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// True if both handles point at the same dictionary.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

// =============================================================================
// WEAK HANDLE
// =============================================================================

/// Weak counterpart of [`ReactiveDictionary`].
pub struct WeakReactiveDictionary<K, V, S = RandomState> {
    inner: Weak<DictionaryInner<K, V, S>>,
}

impl<K, V, S> WeakReactiveDictionary<K, V, S> {
    pub fn upgrade(&self) -> Option<ReactiveDictionary<K, V, S>> {
        self.inner.upgrade().map(|inner| ReactiveDictionary { inner })
    }
}

impl<K, V, S> Clone for WeakReactiveDictionary<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// =============================================================================
// TRAIT IMPLS
// =============================================================================

impl<K, V, S> Clone for ReactiveDictionary<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for ReactiveDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> FromIterator<(K, V)> for ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + Default + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K, V, S> From<IndexMap<K, V, S>> for ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + 'static,
{
    fn from(data: IndexMap<K, V, S>) -> Self {
        Self::from_map(data)
    }
}

impl<K, V, S> IntoIterator for &ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + 'static,
{
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> NotifyPropertyChanged for ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + 'static,
{
    fn subscribe_property_changed(&self, handler: PropertyHandler) -> Subscription {
        self.on_property_changed(handler)
    }
}

impl<K, V, S> NotifyCollectionChanged for ReactiveDictionary<K, V, S>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    S: BuildHasher + 'static,
{
    type Item = (K, V);

    fn subscribe_collection_changed(&self, handler: CollectionHandler<(K, V)>) -> Subscription {
        self.on_collection_changed(handler)
    }
}

impl<K, V, S> std::fmt::Debug for ReactiveDictionary<K, V, S>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("ReactiveDictionary");
        match self.inner.data.try_borrow() {
            Ok(data) => out.field("count", &data.len()).field("entries", &*data),
            Err(_) => out.field("entries", &"<borrowed>"),
        };
        out.field("read_only", &self.inner.read_only.get()).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
