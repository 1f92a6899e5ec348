use super::*;

#[test]
fn opposite_direction_is_an_involution() {
    for d in [
        AnimationDirection::Up,
        AnimationDirection::Down,
        AnimationDirection::Left,
        AnimationDirection::Right,
        AnimationDirection::In,
        AnimationDirection::Out,
    ] {
        assert_ne!(d.opposite(), d);
        assert_eq!(d.opposite().opposite(), d);
    }
    assert_eq!(AnimationDirection::Left.opposite(), AnimationDirection::Right);
    assert_eq!(AnimationDirection::Up.opposite(), AnimationDirection::Down);
}

#[test]
fn gesture_defaults() {
    let g = GestureConfig::default();
    assert_eq!(g.swipe_direction, SwipeDirection::Right);
    assert_eq!(g.swipe_area_width, 100.0);
    assert_eq!(g.min_fling_velocity, 400.0);
    assert_eq!(g.hysteresis, 50.0);
    assert!(!g.disable_discovery);
}

#[test]
fn single_value_expands_to_symmetric_pair() {
    let v: AnimationValue =
        serde_json::from_str(r#"{"type":"slide","direction":"left","duration":300}"#).unwrap();
    let set = v.into_set();
    assert_eq!(set.enter, set.exit);
    assert_eq!(set.enter.duration(), 300.0);
}

#[test]
fn pair_without_out_reuses_in() {
    let v: AnimationValue =
        serde_json::from_str(r#"{"in":{"type":"fade","duration":200}}"#).unwrap();
    let set = v.into_set();
    assert_eq!(set.exit, set.enter);

    let v: AnimationValue = serde_json::from_str(
        r#"{"in":{"type":"fade","duration":200},"out":{"type":"zoom","duration":100}}"#,
    )
    .unwrap();
    let set = v.into_set();
    assert_eq!(set.exit.duration(), 100.0);
}

#[test]
fn keyframe_configs_deserialize() {
    let v: AnimationValue = serde_json::from_str(
        r#"{"keyframes":[{"opacity":0},{"opacity":1}],"timing":{"duration":120}}"#,
    )
    .unwrap();
    assert_eq!(v.into_set().enter.duration(), 120.0);
}

#[test]
fn factory_receives_context() {
    let spec = AnimationSpec::factory(|ctx| {
        let dir = if ctx.gesture_navigating {
            AnimationDirection::Right
        } else {
            AnimationDirection::Left
        };
        AnimationConfig::new(AnimationType::Slide, Some(dir), 250.0).into()
    });
    let set = spec.resolve(&AnimationContext {
        previous_path: "/".into(),
        next_path: "/a".into(),
        gesture_navigating: true,
    });
    let ScreenAnimation::Preset(cfg) = set.enter else {
        panic!("expected preset");
    };
    assert_eq!(cfg.direction, Some(AnimationDirection::Right));
}

#[test]
fn router_config_loads_and_validates() {
    let cfg = RouterConfig::from_json_str(
        r#"{"animation":{"type":"slide","duration":300},"hysteresis":30,"swipe_direction":"left"}"#,
    )
    .unwrap();
    assert_eq!(cfg.gesture.hysteresis, 30.0);
    assert_eq!(cfg.gesture.swipe_direction, SwipeDirection::Left);
    assert_eq!(cfg.gesture.min_fling_velocity, 400.0);

    let err = RouterConfig::from_json_str(r#"{"hysteresis":150}"#).unwrap_err();
    assert!(matches!(err, RouterError::Config(_)));

    let err = RouterConfig::from_json_str(r#"{"animation":{"type":"fade","duration":-1}}"#)
        .unwrap_err();
    assert!(matches!(err, RouterError::Config(_)));

    assert!(matches!(
        RouterConfig::from_json_str("{").unwrap_err(),
        RouterError::Serde(_)
    ));
}

#[test]
fn route_overrides_layer_over_router_gesture() {
    let route: RouteConfig =
        serde_json::from_str(r#"{"keep_alive":true,"swipe_area_width":40}"#).unwrap();
    route.validate().unwrap();
    assert!(route.keep_alive);
    let g = GestureConfig::default().with_overrides(&route.gesture);
    assert_eq!(g.swipe_area_width, 40.0);
    assert_eq!(g.hysteresis, 50.0);
}
