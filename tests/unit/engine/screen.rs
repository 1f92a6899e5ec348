use super::*;
use crate::headless::HeadlessScreen;
use crate::navigation::config::{AnimationConfig, AnimationSpec, AnimationType};
use serde_json::json;

fn router() -> Router {
    let mut r = Router::new(RouterConfig::default());
    r.add_route("/", Rc::new(HeadlessScreen::new("home")), RouteConfig::default())
        .unwrap()
        .add_route(
            "/details/:id",
            Rc::new(HeadlessScreen::new("details")),
            RouteConfig::default(),
        )
        .unwrap()
        .add_route(
            "/details/new",
            Rc::new(HeadlessScreen::new("never")),
            RouteConfig::default(),
        )
        .unwrap();
    r
}

#[test]
fn first_declared_match_wins() {
    let r = router();
    let (idx, entry) = r.resolve("/details/new", &Params::new()).unwrap();
    assert_eq!(idx, 1);
    assert_eq!(entry.pattern.as_deref(), Some("/details/:id"));
    assert_eq!(entry.param("id").as_deref(), Some("new"));
}

#[test]
fn params_merge_captures_query_then_explicit() {
    let r = router();
    let mut explicit = Params::new();
    explicit.insert("tab".into(), json!("photos"));
    let (_, entry) = r.resolve("/details/7?tab=info&ref=home", &explicit).unwrap();
    assert_eq!(entry.resolved_pathname, "/details/7");
    assert_eq!(entry.param("id").as_deref(), Some("7"));
    assert_eq!(entry.param("ref").as_deref(), Some("home"));
    assert_eq!(entry.param("tab").as_deref(), Some("photos"));
}

#[test]
fn fallback_catches_unmatched_paths() {
    let mut r = router();
    assert!(r.resolve("/missing", &Params::new()).is_none());
    r.set_fallback(Rc::new(HeadlessScreen::new("404")), RouteConfig::default())
        .unwrap();
    let (idx, entry) = r.resolve("/missing", &Params::new()).unwrap();
    assert_eq!(idx, 3);
    assert!(entry.pattern.is_none());
    assert!(
        r.set_fallback(Rc::new(HeadlessScreen::new("again")), RouteConfig::default())
            .is_err()
    );
}

#[test]
fn invalid_route_config_is_rejected() {
    let mut r = Router::default();
    let cfg = RouteConfig {
        gesture: crate::navigation::config::GestureOverrides {
            hysteresis: Some(200.0),
            ..Default::default()
        },
        ..RouteConfig::default()
    };
    assert!(r.add_route("/", Rc::new(HeadlessScreen::new("x")), cfg).is_err());
    assert!(
        r.add_route("nope", Rc::new(HeadlessScreen::new("x")), RouteConfig::default())
            .is_err()
    );
}

#[test]
fn route_animation_overrides_router_default() {
    let mut r = Router::new(RouterConfig {
        animation: AnimationSpec::Static(
            AnimationConfig::new(AnimationType::Fade, None, 100.0).into(),
        ),
        ..RouterConfig::default()
    });
    let slide = RouteConfig {
        animation: Some(AnimationSpec::Static(
            AnimationConfig::new(AnimationType::Slide, None, 300.0).into(),
        )),
        ..RouteConfig::default()
    };
    r.add_route("/a", Rc::new(HeadlessScreen::new("a")), slide)
        .unwrap()
        .add_route("/b", Rc::new(HeadlessScreen::new("b")), RouteConfig::default())
        .unwrap();
    let ctx = AnimationContext {
        previous_path: "/a".into(),
        next_path: "/b".into(),
        gesture_navigating: false,
    };
    let (_, a) = r.resolve("/a", &Params::new()).unwrap();
    let (_, b) = r.resolve("/b", &Params::new()).unwrap();
    assert_eq!(r.animation_for(&a, &ctx).enter.duration(), 300.0);
    assert_eq!(r.animation_for(&b, &ctx).enter.duration(), 100.0);
}
