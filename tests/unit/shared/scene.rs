use super::*;
use crate::headless::HeadlessSharedElement;
use crate::shared::element::SharedElementConfig;
use std::rc::Rc;

fn node(id: &str) -> SharedElementNode {
    SharedElementNode::new(
        id,
        HeadlessSharedElement::new(id, Rect::new(0.0, 0.0, 10.0, 10.0)),
        SharedElementConfig::default(),
    )
}

#[test]
fn duplicate_ids_are_rejected_eagerly() {
    let mut scene = SharedElementScene::new("home");
    scene.add_node(node("a")).unwrap();
    let err = scene.add_node(node("a")).unwrap_err();
    match err {
        RouterError::DuplicateSharedElement { id, scene } => {
            assert_eq!(id, "a");
            assert_eq!(scene, "home");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(scene.len(), 1);
}

#[test]
fn nodes_iterate_in_id_order_and_can_be_removed() {
    let mut scene = SharedElementScene::new("s");
    for id in ["c", "a", "b"] {
        scene.add_node(node(id)).unwrap();
    }
    let ids: Vec<_> = scene.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert!(scene.remove_node("b").is_some());
    assert!(scene.node("b").is_none());
}

#[test]
fn empty_or_disabled_scenes_cannot_transition() {
    let mut scene = SharedElementScene::new("s");
    assert!(!scene.is_transitionable());
    scene.add_node(node("a")).unwrap();
    assert!(scene.is_transitionable());
    scene.can_transition = false;
    assert!(!scene.is_transitionable());
}

#[test]
fn previous_scene_is_a_weak_link() {
    let outgoing = SharedElementScene::new_handle("out");
    let incoming = SharedElementScene::new_handle("in");
    incoming.borrow_mut().set_previous_scene(Some(&outgoing));
    let prev = incoming.borrow().previous_scene().unwrap();
    assert_eq!(prev.borrow().id(), "out");
    drop(prev);
    drop(outgoing);
    assert!(incoming.borrow().previous_scene().is_none());
    assert_eq!(Rc::strong_count(&incoming), 1);
}

#[test]
fn screen_rect_accessor() {
    let mut scene = SharedElementScene::new("s");
    assert!(scene.screen_rect().is_none());
    scene.set_screen_rect(|| Rect::new(0.0, 0.0, 390.0, 844.0));
    assert_eq!(scene.screen_rect().map(|r| r.width()), Some(390.0));
}
