use super::*;

#[test]
fn settles_exactly_once() {
    let d = Deferred::new();
    assert!(d.is_pending());
    assert!(d.resolve(1));
    assert!(!d.resolve(2));
    assert!(!d.reject(RouterError::abort("late")));
    assert_eq!(d.value(), Some(1));
}

#[test]
fn clones_observe_the_same_slot() {
    let producer: Deferred<()> = Deferred::new();
    let observer = producer.clone();
    assert!(producer.same_slot(&observer));
    producer.reject(RouterError::abort("superseded"));
    assert!(observer.is_rejected());
    assert!(observer.is_aborted());
    assert!(matches!(observer.result(), Some(Err(_))));
}

#[test]
fn non_abort_rejection_is_not_aborted() {
    let d: Deferred<()> = Deferred::new();
    d.reject(RouterError::invalid_state("x"));
    assert!(d.is_rejected());
    assert!(!d.is_aborted());
}

#[test]
fn abort_controller_keeps_first_reason() {
    let c = AbortController::new();
    let s = c.signal();
    assert!(!s.aborted());
    assert!(c.abort("first"));
    assert!(!c.abort("second"));
    assert_eq!(s.reason().as_deref(), Some("first"));
}
