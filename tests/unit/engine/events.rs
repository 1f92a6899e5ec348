use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn names_are_kebab_case() {
    let id = TransitionId(1);
    assert_eq!(
        RouterEvent::MotionProgressStart { transition: id }.name(),
        "motion-progress-start"
    );
    assert_eq!(RouterEvent::GoBack { key: EntryKey(0) }.name(), "go-back");
    assert_eq!(
        RouterEvent::GestureCancel { transition: id }.transition(),
        Some(id)
    );
}

#[test]
fn serializes_with_type_tag() {
    let ev = RouterEvent::MotionProgress {
        transition: TransitionId(3),
        progress: 50.0,
    };
    let v = serde_json::to_value(&ev).unwrap();
    assert_eq!(v["type"], "motion-progress");
    assert_eq!(v["transition"], 3);
    assert_eq!(v["progress"], 50.0);
}

#[test]
fn failing_listener_does_not_stop_delivery() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut bus = EventBus::default();
    bus.subscribe(|_| anyhow::bail!("listener exploded"));
    let sink = seen.clone();
    bus.subscribe(move |e| {
        sink.borrow_mut().push(e.name());
        Ok(())
    });
    bus.emit(&RouterEvent::TransitionEnd {
        transition: TransitionId(0),
    });
    assert_eq!(*seen.borrow(), ["transition-end"]);
}

#[test]
fn unsubscribe_removes_listener() {
    let count = Rc::new(RefCell::new(0));
    let mut bus = EventBus::default();
    let c = count.clone();
    let id = bus.subscribe(move |_| {
        *c.borrow_mut() += 1;
        Ok(())
    });
    bus.emit(&RouterEvent::GoBack { key: EntryKey(1) });
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    bus.emit(&RouterEvent::GoBack { key: EntryKey(1) });
    assert_eq!(*count.borrow(), 1);
    assert!(bus.is_empty());
}
