// ============================================================================
// spark-observable - Ergonomic Macros
// ============================================================================

/// Clone variables into a move closure.
///
/// Observers usually need their own handle to the collection they watch.
/// This saves cloning each one by hand before the `move`.
///
/// # Usage
///
/// ```rust
/// use spark_observable::{cloned, CollectionChange, ReactiveSequence};
///
/// let items = ReactiveSequence::<i32>::new();
/// let total = std::rc::Rc::new(std::cell::Cell::new(0));
///
/// let observer = cloned!(items, total => move |_: &CollectionChange<i32>| {
///     total.set(items.with(|xs| xs.iter().sum()));
/// });
/// let _sub = items.on_collection_changed(observer);
///
/// items.add_range([1, 2, 3]).unwrap();
/// assert_eq!(total.get(), 6);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}

/// Build a [`ReactiveDictionary`](crate::ReactiveDictionary) from literal
/// entries.
///
/// Evaluates to `Result<ReactiveDictionary<_, _>>`; a repeated key yields
/// [`ObservableError::DuplicateKey`](crate::ObservableError::DuplicateKey).
///
/// # Usage
///
/// ```rust
/// use spark_observable::reactive_dictionary;
///
/// let ports = reactive_dictionary! { "http" => 80, "https" => 443 }?;
/// assert_eq!(ports.get("https")?, 443);
/// assert_eq!(ports.keys(), vec!["http", "https"]);
///
/// assert!(reactive_dictionary! { "a" => 1, "a" => 2 }.is_err());
/// # Ok::<(), spark_observable::ObservableError>(())
/// ```
#[macro_export]
macro_rules! reactive_dictionary {
    () => {
        ::std::result::Result::<_, $crate::ObservableError>::Ok($crate::ReactiveDictionary::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::ReactiveDictionary::try_from_pairs([$(($key, $value)),+])
    };
}

/// Build a [`ReactiveSequence`](crate::ReactiveSequence) from literal items.
///
/// # Usage
///
/// ```rust
/// use spark_observable::reactive_sequence;
///
/// let queue = reactive_sequence![3, 1, 2];
/// assert_eq!(queue.to_vec(), vec![3, 1, 2]);
///
/// let empty = reactive_sequence![];
/// empty.push("x").unwrap();
/// assert_eq!(empty.len(), 1);
/// ```
#[macro_export]
macro_rules! reactive_sequence {
    () => {
        $crate::ReactiveSequence::new()
    };
    ($($item:expr),+ $(,)?) => {
        $crate::ReactiveSequence::from_vec(::std::vec![$($item),+])
    };
}
