// ============================================================================
// spark-observable - Handler List
// Multi-subscriber synchronous event registry with RAII unsubscription
// ============================================================================
//
// Dispatch walks a snapshot of the registered entries, taken before the first
// handler runs. The registry borrow is released before any handler is called,
// so handlers may subscribe or unsubscribe (themselves or others) freely:
//
// - A handler added during dispatch is first called on the next event.
// - A handler removed during dispatch is skipped if it has not run yet.
// - Removing yourself while running does not affect the remaining handlers.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::constants::LOG_TARGET;

/// Identifier of a registered handler, unique per list.
pub type HandlerId = u64;

// =============================================================================
// REGISTRY
// =============================================================================

struct Entry<E> {
    id: HandlerId,
    active: Cell<bool>,
    handler: Box<dyn Fn(&E)>,
}

struct Registry<E> {
    next_id: Cell<HandlerId>,
    entries: RefCell<Vec<Rc<Entry<E>>>>,
}

impl<E> Registry<E> {
    fn remove(&self, id: HandlerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                let entry = entries.remove(pos);
                entry.active.set(false);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// HANDLER LIST
// =============================================================================

/// Ordered list of event handlers for events of type `E`.
///
/// Handlers run in registration order, synchronously, inside [`emit`].
///
/// [`emit`]: HandlerList::emit
pub struct HandlerList<E> {
    registry: Rc<Registry<E>>,
}

impl<E: 'static> HandlerList<E> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                next_id: Cell::new(1),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `handler`. It stays registered until the returned
    /// [`Subscription`] is dropped (or forever, after [`Subscription::detach`]).
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);

        self.registry.entries.borrow_mut().push(Rc::new(Entry {
            id,
            active: Cell::new(true),
            handler: Box::new(handler),
        }));

        let weak: Weak<Registry<E>> = Rc::downgrade(&self.registry);
        Subscription {
            id,
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }

    /// Remove a handler by id. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        self.registry.remove(id)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.registry.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every registered handler with `event`. Returns how many ran.
    pub fn emit(&self, event: &E) -> usize {
        // Snapshot first; handlers must be able to touch the registry
        let snapshot: Vec<Rc<Entry<E>>> = self.registry.entries.borrow().clone();

        let mut invoked = 0;
        for entry in &snapshot {
            if !entry.active.get() {
                continue;
            }
            (entry.handler)(event);
            invoked += 1;
        }

        tracing::trace!(target: LOG_TARGET, handlers = invoked, "dispatched event");
        invoked
    }
}

impl<E: 'static> Default for HandlerList<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for HandlerList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerList")
            .field("handlers", &self.registry.entries.borrow().len())
            .finish()
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// RAII registration handle. Dropping it unsubscribes the handler.
///
/// The handle does not keep the observed instance alive; dropping it after
/// the instance is gone is a no-op.
#[must_use = "dropping a Subscription immediately unsubscribes its handler"]
pub struct Subscription {
    id: HandlerId,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Id of the handler inside its list.
    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// Unsubscribe now. Same as dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the handler registered for the lifetime of the observed instance.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("detached", &self.cancel.is_none())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
