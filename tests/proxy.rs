use spark_observable::{
    NotifyPropertyChanged, ObservableError, PropertyName, PropertyProxy, Schema,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default, PartialEq)]
struct Account {
    owner: String,
    balance: i64,
    frozen: bool,
}

fn account_proxy() -> PropertyProxy<Account> {
    let schema = Schema::<Account>::new()
        .field("Owner", |a| a.owner.clone(), |a, v| a.owner = v)
        .and_then(|s| s.field("Balance", |a| a.balance, |a, v| a.balance = v))
        .and_then(|s| s.field("Frozen", |a| a.frozen, |a, v| a.frozen = v))
        .unwrap();
    PropertyProxy::new(Account::default(), schema)
}

#[test]
fn test_each_write_fires_its_property_name() {
    let proxy = account_proxy();
    let names = Rc::new(RefCell::new(Vec::new()));
    let sink = names.clone();
    let _sub = proxy.subscribe_property_changed(Box::new(move |name: PropertyName| {
        sink.borrow_mut().push(name.as_str())
    }));

    proxy.set("Owner", "ada".to_string()).unwrap();
    proxy.set("Balance", 250i64).unwrap();
    proxy.set("Frozen", true).unwrap();

    assert_eq!(*names.borrow(), vec!["Owner", "Balance", "Frozen"]);
    proxy.with_target(|a| {
        assert_eq!(a.owner, "ada");
        assert_eq!(a.balance, 250);
        assert!(a.frozen);
    });
}

#[test]
fn test_rejected_writes_leave_target_untouched() {
    let proxy = account_proxy();

    assert_eq!(
        proxy.set("Missing", 1i64),
        Err(ObservableError::UnknownProperty("Missing".into()))
    );
    assert!(matches!(
        proxy.set("Balance", 1i32),
        Err(ObservableError::TypeMismatch { .. })
    ));

    let account = proxy.try_into_inner().unwrap();
    assert_eq!(account, Account::default());
}

#[test]
fn test_observer_can_read_but_not_write() {
    let proxy = account_proxy();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let handle = proxy.clone();
    let sink = seen.clone();
    let _sub = proxy.on_property_changed(move |_| {
        sink.borrow_mut().push((
            handle.get::<i64>("Balance"),
            handle.set("Frozen", true).is_err(),
        ));
    });

    proxy.set("Balance", 10i64).unwrap();

    assert_eq!(*seen.borrow(), vec![(Ok(10), true)]);
    assert_eq!(proxy.get::<bool>("Frozen"), Ok(false));
}

#[test]
fn test_dropping_subscription_stops_notifications() {
    let proxy = account_proxy();
    let hits = Rc::new(RefCell::new(0));

    let h = hits.clone();
    let sub = proxy.on_property_changed(move |_| *h.borrow_mut() += 1);
    proxy.set("Balance", 1i64).unwrap();
    drop(sub);
    proxy.set("Balance", 2i64).unwrap();

    assert_eq!(*hits.borrow(), 1);
}
