use super::*;
use crate::animation::keyframes::{Keyframe, KeyframeEffect, StyleFrame};
use crate::animation::timing::FillMode;
use crate::headless::HeadlessElement;

fn fade(duration: f64) -> Box<dyn AnimationEffect> {
    let el = HeadlessElement::new("el");
    Box::new(
        KeyframeEffect::new(
            el,
            vec![
                Keyframe::new(StyleFrame {
                    opacity: Some(0.0),
                    ..StyleFrame::default()
                }),
                Keyframe::new(StyleFrame {
                    opacity: Some(1.0),
                    ..StyleFrame::default()
                }),
            ],
            EffectTiming {
                fill: FillMode::Both,
                ..EffectTiming::with_duration(duration)
            },
        )
        .unwrap(),
    )
}

#[test]
fn parallel_duration_is_the_longest_child() {
    let p = ParallelEffect::new(vec![fade(100.0), fade(300.0), fade(200.0)]);
    assert_eq!(p.timing().duration, 300.0);
    assert_eq!(p.computed_timing(None).end_time, 300.0);
}

#[test]
fn parallel_progress_follows_the_shortest_child() {
    let p = ParallelEffect::new(vec![fade(400.0), fade(100.0)]);
    // The 100ms child is already complete while the 400ms one is a quarter through.
    assert_eq!(p.computed_timing(Some(100.0)).progress, Some(1.0));
    assert_eq!(p.computed_timing(Some(50.0)).progress, Some(0.5));
}

#[test]
fn parallel_update_fans_out() {
    let mut p = ParallelEffect::new(vec![fade(100.0), fade(200.0)]);
    p.update_timing(&OptionalEffectTiming::duration(500.0));
    assert_eq!(p.timing().duration, 500.0);
    let leaves = Box::new(p).into_leaves();
    assert_eq!(leaves.len(), 2);
    assert!(leaves.iter().all(|l| l.timing().duration == 500.0));
}

#[test]
fn nested_groups_flatten_to_leaves() {
    let inner = ParallelEffect::new(vec![fade(10.0), fade(20.0)]);
    let outer = ParallelEffect::new(vec![Box::new(inner), fade(30.0)]);
    assert_eq!(Box::new(outer).into_leaves().len(), 3);
}

#[test]
fn empty_parallel_has_zero_duration() {
    let p = ParallelEffect::default();
    assert!(p.is_empty());
    assert_eq!(p.timing().duration, 0.0);
    assert_eq!(p.computed_timing(Some(0.0)).progress, None);
}

#[test]
fn sequence_accumulates_delays() {
    let s = SequenceEffect::new(vec![fade(100.0), fade(50.0), fade(25.0)]);
    assert_eq!(s.timing().duration, 175.0);
    let delays: Vec<f64> = Box::new(s)
        .into_leaves()
        .iter()
        .map(|l| l.timing().delay)
        .collect();
    assert_eq!(delays, vec![0.0, 100.0, 150.0]);
}

#[test]
fn sequence_progress_is_linear_over_the_whole_run() {
    let s = SequenceEffect::new(vec![fade(100.0), fade(100.0)]);
    assert_eq!(s.computed_timing(Some(50.0)).progress, Some(0.25));
}
