use spark_observable::{
    ChangeKind, CollectionChange, DictionaryOptions, ObservableError, PropertyName,
    ReactiveDictionary,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

type Events = Rc<RefCell<Vec<CollectionChange<(String, i32)>>>>;
type Props = Rc<RefCell<Vec<PropertyName>>>;

fn observed() -> (ReactiveDictionary<String, i32>, Events, Props) {
    let dict = ReactiveDictionary::new();
    let events: Events = Rc::default();
    let props: Props = Rc::default();

    let sink = events.clone();
    dict.on_collection_changed(move |change| sink.borrow_mut().push(change.clone()))
        .detach();
    let sink = props.clone();
    dict.on_property_changed(move |name| sink.borrow_mut().push(name))
        .detach();

    (dict, events, props)
}

#[test]
fn test_add_set_remove_scenario() {
    let (dict, events, _) = observed();

    dict.add("x".into(), 1).unwrap();
    dict.set("x".into(), 2).unwrap();
    assert!(dict.remove("x").unwrap());

    let kinds: Vec<_> = events.borrow().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![ChangeKind::Add, ChangeKind::Replace, ChangeKind::Remove]);
    assert_eq!(dict.count(), 0);

    let events = events.borrow();
    assert_eq!(events[0].new_items(), &[("x".to_string(), 1)]);
    assert_eq!(events[1].new_items(), &[("x".to_string(), 2)]);
    assert_eq!(events[1].old_items(), &[("x".to_string(), 1)]);
    assert_eq!(events[2].old_items(), &[("x".to_string(), 2)]);
}

#[test]
fn test_property_notifications_precede_collection_notification() {
    let dict = ReactiveDictionary::<String, i32>::new();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let sink = log.clone();
    let _a = dict.on_collection_changed(move |c| sink.borrow_mut().push(format!("{:?}", c.kind())));
    let sink = log.clone();
    let _b = dict.on_property_changed(move |p| sink.borrow_mut().push(p.to_string()));

    dict.add("k".into(), 1).unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["Count", "Item[]", "Keys", "Values", "Add"]
    );
}

#[test]
fn test_replace_reports_count_indexer_values() {
    let (dict, _, props) = observed();
    dict.add("k".into(), 1).unwrap();
    props.borrow_mut().clear();

    assert_eq!(dict.set("k".into(), 5).unwrap(), Some(1));
    assert_eq!(
        *props.borrow(),
        vec![PropertyName::Count, PropertyName::Indexer, PropertyName::Values]
    );
}

#[test]
fn test_duplicate_add_fails_without_notifying() {
    let (dict, events, props) = observed();
    dict.add("k".into(), 1).unwrap();
    let before = (events.borrow().len(), props.borrow().len());

    assert_eq!(dict.add("k".into(), 9), Err(ObservableError::DuplicateKey));

    assert_eq!(dict.get("k"), Ok(1));
    assert_eq!((events.borrow().len(), props.borrow().len()), before);
}

#[test]
fn test_missing_key_lookup() {
    let dict = ReactiveDictionary::<String, i32>::new();
    assert_eq!(dict.get("nope"), Err(ObservableError::KeyNotFound));
    assert_eq!(dict.try_get("nope"), None);
    assert!(!dict.remove("nope").unwrap());
}

#[test]
fn test_clear_dispatches_single_reset() {
    let (dict, events, _) = observed();
    dict.add("a".into(), 1).unwrap();
    dict.add("b".into(), 2).unwrap();
    events.borrow_mut().clear();

    dict.clear().unwrap();

    assert!(dict.is_empty());
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0], CollectionChange::Reset);
}

#[test]
fn test_removal_keeps_insertion_order() {
    let dict: ReactiveDictionary<String, i32> =
        ReactiveDictionary::try_from_pairs([("a".into(), 1), ("b".into(), 2), ("c".into(), 3)])
            .unwrap();

    dict.remove("a").unwrap();
    dict.add("d".into(), 4).unwrap();

    assert_eq!(dict.keys(), vec!["b", "c", "d"]);
    assert_eq!(dict.index_of("c"), Some(1));
}

#[test]
fn test_read_only_rejects_every_mutation() {
    let dict = ReactiveDictionary::<String, i32>::with_options(
        DictionaryOptions::default().read_only(true),
    );

    assert_eq!(dict.add("a".into(), 1), Err(ObservableError::ReadOnly));
    assert_eq!(dict.set("a".into(), 1), Err(ObservableError::ReadOnly));
    assert_eq!(dict.remove("a"), Err(ObservableError::ReadOnly));
    assert_eq!(dict.clear(), Err(ObservableError::ReadOnly));

    dict.set_read_only(false);
    dict.add("a".into(), 1).unwrap();
    assert_eq!(dict.len(), 1);
}

#[test]
fn test_handles_share_state_and_weak_does_not_keep_alive() {
    let dict = ReactiveDictionary::<String, i32>::new();
    let other = dict.clone();
    let weak = dict.downgrade();

    other.add("shared".into(), 7).unwrap();
    assert_eq!(dict.get("shared"), Ok(7));
    assert!(dict.ptr_eq(&other));

    drop(dict);
    drop(other);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_built_from_existing_map_enumerates_same_pairs() {
    let source: HashMap<String, i32> =
        [("one".to_string(), 1), ("two".to_string(), 2), ("three".to_string(), 3)]
            .into_iter()
            .collect();

    let dict: ReactiveDictionary<String, i32> = source.clone().into_iter().collect();

    let mut expected: Vec<_> = source.into_iter().collect();
    expected.sort();
    let mut pairs: Vec<_> = dict.iter().collect();
    pairs.sort();
    assert_eq!(pairs, expected);

    let mut enumerated = Vec::new();
    for (key, value) in &dict {
        enumerated.push((key, value));
    }
    enumerated.sort();
    assert_eq!(enumerated, pairs);
    assert_eq!(dict.count(), 3);
}
