// ============================================================================
// spark-observable - Property Schema
// Named, typed accessor/mutator pairs declared once per proxied type
// ============================================================================

use std::any::{type_name, Any, TypeId};

use indexmap::IndexMap;

use crate::core::error::{ObservableError, Result};

type Getter<T> = Box<dyn Fn(&T) -> Box<dyn Any>>;
type Setter<T> = Box<dyn Fn(&mut T, Box<dyn Any>) -> std::result::Result<(), Box<dyn Any>>>;

// =============================================================================
// FIELD ACCESSOR
// =============================================================================

/// Type-erased accessor for one field.
pub(crate) struct FieldAccessor<T> {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) get: Getter<T>,
    pub(crate) set: Setter<T>,
}

// =============================================================================
// SCHEMA
// =============================================================================

/// The writable properties of a `T`, in declaration order.
///
/// # Example
///
/// ```
/// use spark_observable::Schema;
///
/// struct Person { name: String, age: u32 }
///
/// let schema = Schema::<Person>::new()
///     .field("Name", |p| p.name.clone(), |p, v| p.name = v)?
///     .field("Age", |p| p.age, |p, v| p.age = v)?;
///
/// assert_eq!(schema.names(), vec!["Name", "Age"]);
/// # Ok::<(), spark_observable::ObservableError>(())
/// ```
pub struct Schema<T> {
    fields: IndexMap<&'static str, FieldAccessor<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Declare a property of type `F`.
    ///
    /// Fails with [`ObservableError::InvalidArgument`] for a blank name and
    /// [`ObservableError::DuplicateKey`] if `name` is already declared.
    pub fn field<F: 'static>(
        mut self,
        name: &'static str,
        get: impl Fn(&T) -> F + 'static,
        set: impl Fn(&mut T, F) + 'static,
    ) -> Result<Self> {
        validate_name(name)?;
        if self.fields.contains_key(name) {
            return Err(ObservableError::DuplicateKey);
        }

        let getter: Getter<T> = Box::new(move |target: &T| Box::new(get(target)) as Box<dyn Any>);
        let setter: Setter<T> = Box::new(move |target: &mut T, value: Box<dyn Any>| {
            value.downcast::<F>().map(|value| set(target, *value))
        });

        self.fields.insert(
            name,
            FieldAccessor {
                type_id: TypeId::of::<F>(),
                type_name: type_name::<F>(),
                get: getter,
                set: setter,
            },
        );
        Ok(self)
    }

    /// Declared property names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve `name` to its canonical key and accessor.
    pub(crate) fn lookup(&self, name: &str) -> Result<(&'static str, &FieldAccessor<T>)> {
        validate_name(name)?;
        self.fields
            .get_key_value(name)
            .map(|(key, accessor)| (*key, accessor))
            .ok_or_else(|| ObservableError::UnknownProperty(name.to_string()))
    }
}

impl<T: 'static> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(name, acc)| (name, acc.type_name)))
            .finish()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ObservableError::InvalidArgument(
            "property name must not be blank".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Point {
        x: i32,
        label: String,
    }

    fn schema() -> Schema<Point> {
        Schema::new()
            .field("X", |p: &Point| p.x, |p, v| p.x = v)
            .and_then(|s| s.field("Label", |p: &Point| p.label.clone(), |p, v| p.label = v))
            .unwrap()
    }

    #[test]
    fn declares_in_order() {
        let schema = schema();
        assert_eq!(schema.names(), vec!["X", "Label"]);
        assert!(schema.contains("Label"));
        assert!(!schema.contains("Y"));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn rejects_blank_and_duplicate_names() {
        let blank = Schema::<Point>::new().field("  ", |p| p.x, |p, v| p.x = v);
        assert!(matches!(blank, Err(ObservableError::InvalidArgument(_))));

        let dup = schema().field("X", |p| p.x, |p, v| p.x = v);
        assert!(matches!(dup, Err(ObservableError::DuplicateKey)));
    }

    #[test]
    fn accessor_round_trip() {
        let schema = schema();
        let mut point = Point::default();

        let (key, acc) = schema.lookup("X").unwrap();
        assert_eq!(key, "X");
        (acc.set)(&mut point, Box::new(5i32) as Box<dyn Any>).unwrap();
        assert_eq!(*(acc.get)(&point).downcast::<i32>().unwrap(), 5);

        assert!((acc.set)(&mut point, Box::new("wrong") as Box<dyn Any>).is_err());
        assert_eq!(point.x, 5);
    }

    #[test]
    fn lookup_errors() {
        let schema = schema();
        assert_eq!(
            schema.lookup("Nope").err(),
            Some(ObservableError::UnknownProperty("Nope".into()))
        );
        assert!(matches!(
            schema.lookup(""),
            Err(ObservableError::InvalidArgument(_))
        ));
    }

    #[test]
    fn debug_lists_types() {
        let debug = format!("{:?}", schema());
        assert!(debug.contains("\"X\": \"i32\""));
    }
}
