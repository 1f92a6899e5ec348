use super::*;
use crate::animation::effect::AnimationEffect;
use crate::headless::HeadlessSharedElement;
use crate::shared::element::SharedElementConfig;
use crate::shared::scene::SharedElementScene;

const START: Rect = Rect::new(10.0, 20.0, 60.0, 70.0);
const END: Rect = Rect::new(0.0, 100.0, 300.0, 400.0);

struct Pair {
    outgoing: SceneHandle,
    incoming: SceneHandle,
    start: Rc<HeadlessSharedElement>,
    end: Rc<HeadlessSharedElement>,
}

fn pair(id: &str, start_cfg: SharedElementConfig, end_cfg: SharedElementConfig) -> Pair {
    let outgoing = SharedElementScene::new_handle("out");
    let incoming = SharedElementScene::new_handle("in");
    let start = HeadlessSharedElement::new(id, START);
    let end = HeadlessSharedElement::new(id, END);
    outgoing
        .borrow_mut()
        .add_node(SharedElementNode::new(id, start.clone(), start_cfg))
        .unwrap();
    incoming
        .borrow_mut()
        .add_node(SharedElementNode::new(id, end.clone(), end_cfg))
        .unwrap();
    Pair {
        outgoing,
        incoming,
        start,
        end,
    }
}

fn kind(k: TransitionKind) -> SharedElementConfig {
    SharedElementConfig {
        kind: Some(k),
        ..SharedElementConfig::default()
    }
}

#[test]
fn kind_precedence() {
    let p = pair("a", kind(TransitionKind::Fade), kind(TransitionKind::CrossFade));
    let m = match_set(&p.outgoing.borrow(), &p.incoming.borrow());
    assert_eq!(m[0].kind, TransitionKind::CrossFade);

    let p = pair("a", kind(TransitionKind::Fade), SharedElementConfig::default());
    let m = match_set(&p.outgoing.borrow(), &p.incoming.borrow());
    assert_eq!(m[0].kind, TransitionKind::Fade);

    let p = pair("a", SharedElementConfig::default(), SharedElementConfig::default());
    let m = match_set(&p.outgoing.borrow(), &p.incoming.borrow());
    assert_eq!(m[0].kind, TransitionKind::Morph);
}

#[test]
fn disabled_nodes_and_unmatched_ids_are_excluded() {
    let disabled = SharedElementConfig {
        disabled: true,
        ..SharedElementConfig::default()
    };
    let p = pair("a", SharedElementConfig::default(), disabled);
    assert!(match_set(&p.outgoing.borrow(), &p.incoming.borrow()).is_empty());

    let p = pair("a", SharedElementConfig::default(), SharedElementConfig::default());
    p.incoming
        .borrow_mut()
        .add_node(SharedElementNode::new(
            "only-in",
            HeadlessSharedElement::new("only-in", END),
            SharedElementConfig::default(),
        ))
        .unwrap();
    let ids: Vec<_> = match_set(&p.outgoing.borrow(), &p.incoming.borrow())
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, ["a"]);
}

#[test]
fn morph_uses_one_ghost_between_the_two_boxes() {
    let p = pair("hero", SharedElementConfig::default(), SharedElementConfig::default());
    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 300.0, Ease::Linear)
        .unwrap()
        .unwrap();
    assert_eq!(built.animated, ["hero"]);
    assert_eq!(surface.len(), 1);
    assert!(p.start.is_hidden() && p.end.is_hidden());
    assert!(p.start.clones().is_empty());
    assert_eq!(p.end.clones().len(), 1);
    assert_eq!(
        p.incoming.borrow().previous_scene().map(|s| s.borrow().id().to_string()),
        Some("out".to_string())
    );

    let ghost = p.end.clones()[0].clone();
    let mut effect = built.effect;
    effect.apply(Some(150.0));
    let style = ghost.style().unwrap();
    assert_eq!(style.translate, Some(Translate::px(5.0, 60.0)));
    assert_eq!(style.width, Some(175.0));
    assert_eq!(style.height, Some(175.0));
    effect.update_timing(&crate::animation::timing::OptionalEffectTiming::duration(600.0));
    assert_eq!(effect.timing().duration, 600.0);
}

#[test]
fn cross_fade_ramps_both_ghosts_with_plus_lighter() {
    let p = pair("a", SharedElementConfig::default(), kind(TransitionKind::CrossFade));
    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
        .unwrap()
        .unwrap();
    assert_eq!(surface.len(), 2);
    built.effect.apply(Some(25.0));
    let start = p.start.clones()[0].style().unwrap();
    let end = p.end.clones()[0].style().unwrap();
    assert_eq!(start.blend_mode, Some(BlendMode::PlusLighter));
    assert!((start.opacity.unwrap() - 0.75).abs() < 1e-9);
    assert!((end.opacity.unwrap() - 0.25).abs() < 1e-9);
}

#[test]
fn fade_through_crosses_zero_at_the_midpoint() {
    let p = pair("a", SharedElementConfig::default(), kind(TransitionKind::FadeThrough));
    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
        .unwrap()
        .unwrap();
    built.effect.apply(Some(50.0));
    assert_eq!(p.start.clones()[0].style().unwrap().opacity, Some(0.0));
    assert_eq!(p.end.clones()[0].style().unwrap().opacity, Some(0.0));
    built.effect.apply(Some(75.0));
    assert!((p.end.clones()[0].style().unwrap().opacity.unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn fade_keeps_end_ghost_opaque() {
    let p = pair("a", SharedElementConfig::default(), kind(TransitionKind::Fade));
    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
        .unwrap()
        .unwrap();
    built.effect.apply(Some(50.0));
    assert_eq!(p.end.clones()[0].style().unwrap().opacity, Some(1.0));
    assert!((p.start.clones()[0].style().unwrap().opacity.unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn cleanup_runs_once() {
    let p = pair("a", SharedElementConfig::default(), SharedElementConfig::default());
    let mut surface = TransitionSurface::new();
    let mut built =
        build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
            .unwrap()
            .unwrap();
    assert!(built.cleanup.run(&mut surface));
    assert!(surface.is_empty());
    assert!(!p.start.is_hidden() && !p.end.is_hidden());
    assert!(!built.cleanup.run(&mut surface));
    assert!(built.cleanup.is_done());
}

#[test]
fn empty_scene_or_zero_duration_skips_the_phase() {
    let outgoing = SharedElementScene::new_handle("out");
    let incoming = SharedElementScene::new_handle("in");
    let mut surface = TransitionSurface::new();
    assert!(
        build_shared_transition(&outgoing, &incoming, &mut surface, 100.0, Ease::Linear)
            .unwrap()
            .is_none()
    );

    let p = pair("a", SharedElementConfig::default(), SharedElementConfig::default());
    assert!(
        build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 0.0, Ease::Linear)
            .unwrap()
            .is_none()
    );
    assert!(surface.is_empty());
    assert!(!p.end.is_hidden());
}

#[test]
fn detached_pair_is_skipped_and_rolled_back() {
    let p = pair("a", SharedElementConfig::default(), kind(TransitionKind::CrossFade));
    let b_start = HeadlessSharedElement::new("b", START);
    let b_end = HeadlessSharedElement::new("b", END);
    p.outgoing
        .borrow_mut()
        .add_node(SharedElementNode::new("b", b_start.clone(), SharedElementConfig::default()))
        .unwrap();
    p.incoming
        .borrow_mut()
        .add_node(SharedElementNode::new("b", b_end.clone(), SharedElementConfig::default()))
        .unwrap();
    // Start clone succeeds, end clone fails: the start ghost must be removed again.
    p.end.refuse_clone();

    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
        .unwrap()
        .unwrap();
    assert_eq!(built.animated, ["b"]);
    assert_eq!(surface.len(), 1);
    assert!(surface.contains("b"));
    assert!(!p.start.is_hidden());
    assert!(!p.end.is_hidden());
    assert!(b_start.is_hidden() && b_end.is_hidden());
}

#[test]
fn pair_without_rects_is_skipped() {
    let p = pair("a", SharedElementConfig::default(), SharedElementConfig::default());
    p.start.detach();
    let mut surface = TransitionSurface::new();
    let built =
        build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 100.0, Ease::Linear)
            .unwrap();
    assert!(built.is_none());
    assert!(surface.is_empty());
}

#[test]
fn node_timing_overrides_the_pinned_duration() {
    let cfg = SharedElementConfig {
        duration: Some(50.0),
        delay: Some(10.0),
        ..SharedElementConfig::default()
    };
    let p = pair("a", SharedElementConfig::default(), cfg);
    let mut surface = TransitionSurface::new();
    let built = build_shared_transition(&p.outgoing, &p.incoming, &mut surface, 300.0, Ease::Linear)
        .unwrap()
        .unwrap();
    let t = built.effect.timing();
    assert_eq!(t.duration, 50.0);
    assert_eq!(t.delay, 10.0);
}
