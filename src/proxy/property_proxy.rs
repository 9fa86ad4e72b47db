// ============================================================================
// spark-observable - PropertyProxy
// Adds property-changed notification to any value through a schema
// ============================================================================
//
// The proxy owns the wrapped value. Reads and writes go through the schema's
// typed accessors; every successful write fires one property-changed
// notification tagged with the field's schema name. The set of properties is
// fixed by the schema, only their values change.
// ============================================================================

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::constants::LOG_TARGET;
use crate::core::error::{ObservableError, Result};
use crate::core::guard::ReentrancyGuard;
use crate::core::types::PropertyName;
use crate::notify::{HandlerList, NotifyPropertyChanged, PropertyHandler, Subscription};

use super::schema::Schema;

struct ProxyInner<T> {
    target: RefCell<T>,
    schema: Schema<T>,
    guard: ReentrancyGuard,
    property_changed: HandlerList<PropertyName>,
}

/// A change-notifying view over a value of type `T`.
///
/// # Example
///
/// ```
/// use spark_observable::{PropertyName, PropertyProxy, Schema};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// struct Settings { volume: u8 }
///
/// let schema = Schema::new().field("Volume", |s: &Settings| s.volume, |s, v| s.volume = v)?;
/// let proxy = PropertyProxy::new(Settings { volume: 3 }, schema);
///
/// let changed = Rc::new(RefCell::new(Vec::new()));
/// let sink = changed.clone();
/// let _sub = proxy.on_property_changed(move |name| sink.borrow_mut().push(name));
///
/// proxy.set("Volume", 7u8)?;
/// assert_eq!(proxy.get::<u8>("Volume")?, 7);
/// assert_eq!(*changed.borrow(), vec![PropertyName::Field("Volume")]);
/// # Ok::<(), spark_observable::ObservableError>(())
/// ```
pub struct PropertyProxy<T> {
    inner: Rc<ProxyInner<T>>,
}

impl<T: 'static> PropertyProxy<T> {
    pub fn new(target: T, schema: Schema<T>) -> Self {
        Self {
            inner: Rc::new(ProxyInner {
                target: RefCell::new(target),
                schema,
                guard: ReentrancyGuard::new(),
                property_changed: HandlerList::new(),
            }),
        }
    }

    /// Read property `name` as an `F`.
    pub fn get<F: 'static>(&self, name: &str) -> Result<F> {
        let (key, accessor) = self.inner.schema.lookup(name)?;
        let value = (accessor.get)(&*self.inner.target.borrow());
        value
            .downcast::<F>()
            .map(|boxed| *boxed)
            .map_err(|_| ObservableError::TypeMismatch {
                property: key.to_string(),
                expected: accessor.type_name,
            })
    }

    /// Write property `name` and notify observers.
    pub fn set<F: 'static>(&self, name: &str, value: F) -> Result<()> {
        let (key, accessor) = self.inner.schema.lookup(name)?;
        if accessor.type_id != TypeId::of::<F>() {
            tracing::debug!(
                target: LOG_TARGET,
                property = key,
                given = type_name::<F>(),
                "rejected write with wrong value type"
            );
            return Err(ObservableError::TypeMismatch {
                property: key.to_string(),
                expected: accessor.type_name,
            });
        }

        let _scope = self.inner.guard.enter()?;
        {
            let mut target = self
                .inner
                .target
                .try_borrow_mut()
                .map_err(|_| ObservableError::Reentrancy)?;
            (accessor.set)(&mut *target, Box::new(value)).map_err(|_| {
                ObservableError::TypeMismatch {
                    property: key.to_string(),
                    expected: accessor.type_name,
                }
            })?;
        }

        tracing::trace!(target: LOG_TARGET, property = key, "proxy property changed");
        self.inner.property_changed.emit(&PropertyName::Field(key));
        Ok(())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.inner.schema.contains(name)
    }

    /// Writable property names in schema order.
    pub fn property_names(&self) -> Vec<&'static str> {
        self.inner.schema.names()
    }

    /// Borrow the wrapped value. Writes through the proxy fail with
    /// [`ObservableError::Reentrancy`] while `f` runs.
    pub fn with_target<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.target.borrow())
    }

    /// Unwrap the value if this is the last handle; otherwise give the proxy
    /// back.
    pub fn try_into_inner(self) -> std::result::Result<T, Self> {
        Rc::try_unwrap(self.inner)
            .map(|inner| inner.target.into_inner())
            .map_err(|inner| Self { inner })
    }

    pub fn on_property_changed(&self, handler: impl Fn(PropertyName) + 'static) -> Subscription {
        self.inner
            .property_changed
            .subscribe(move |name: &PropertyName| handler(*name))
    }
}

impl<T> Clone for PropertyProxy<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> NotifyPropertyChanged for PropertyProxy<T> {
    fn subscribe_property_changed(&self, handler: PropertyHandler) -> Subscription {
        self.on_property_changed(handler)
    }
}

impl<T> std::fmt::Debug for PropertyProxy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyProxy")
            .field("schema", &self.inner.schema)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
