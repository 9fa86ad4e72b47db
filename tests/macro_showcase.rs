use spark_observable::{
    cloned, reactive_dictionary, reactive_sequence, ChangeKind, CollectionChange,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_dictionary_literal() {
    let dict = reactive_dictionary! {
        "red" => 0xff0000,
        "green" => 0x00ff00,
        "blue" => 0x0000ff,
    }
    .unwrap();

    assert_eq!(dict.count(), 3);
    assert_eq!(dict.keys(), vec!["red", "green", "blue"]);
    assert_eq!(dict.get("green"), Ok(0x00ff00));
}

#[test]
fn test_empty_dictionary_literal() {
    let dict = reactive_dictionary! {}.unwrap();
    dict.add(1u8, "one").unwrap();
    assert_eq!(dict.len(), 1);
}

#[test]
fn test_sequence_literal_with_cloned_observer() {
    let todo = reactive_sequence!["write", "test"];
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let last_len = Rc::new(Cell::new(0));

    let weak = todo.downgrade();
    let observer = cloned!(kinds, last_len => move |change: &CollectionChange<&'static str>| {
        kinds.borrow_mut().push(change.kind());
        if let Some(todo) = weak.upgrade() {
            last_len.set(todo.len());
        }
    });
    let _sub = todo.on_collection_changed(observer);

    todo.push("ship").unwrap();
    todo.remove(&"write").unwrap();

    assert_eq!(*kinds.borrow(), vec![ChangeKind::Add, ChangeKind::Remove]);
    assert_eq!(last_len.get(), 2);
    assert_eq!(todo.to_vec(), vec!["test", "ship"]);
}
