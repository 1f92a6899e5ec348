use super::*;
use crate::animation::effect::{ParallelEffect, SequenceEffect};
use crate::animation::keyframes::{Keyframe, KeyframeEffect, StyleFrame};
use crate::animation::timing::{EffectTiming, FillMode};
use crate::headless::HeadlessElement;
use std::rc::Rc;

fn fade(el: &Rc<HeadlessElement>, duration: f64, rate: f64) -> Box<dyn AnimationEffect> {
    Box::new(
        KeyframeEffect::new(
            el.clone(),
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
                playback_rate: rate,
                ..EffectTiming::with_duration(duration)
            },
        )
        .unwrap(),
    )
}

fn group(durations: &[f64]) -> (GroupAnimation, Vec<Rc<HeadlessElement>>) {
    let els: Vec<_> = durations
        .iter()
        .enumerate()
        .map(|(i, _)| HeadlessElement::new(&format!("el{i}")))
        .collect();
    let effects = durations
        .iter()
        .zip(&els)
        .map(|(d, el)| fade(el, *d, 1.0))
        .collect();
    (GroupAnimation::new(Box::new(ParallelEffect::new(effects))), els)
}

#[test]
fn controls_leave_every_child_in_the_same_state() {
    let (mut g, _) = group(&[100.0, 200.0, 300.0]);
    g.play();
    assert!(g.children().iter().all(|c| c.play_state() == PlayState::Running));
    g.pause();
    assert!(g.children().iter().all(|c| c.play_state() == PlayState::Paused));
    g.cancel();
    assert!(g.children().iter().all(|c| c.play_state() == PlayState::Idle));
}

#[test]
fn duration_is_max_and_progress_follows_shortest() {
    let (mut g, _) = group(&[400.0, 100.0]);
    assert_eq!(g.duration(), 400.0);
    g.play();
    g.advance(50.0);
    assert_eq!(g.progress(), Some(0.5));
    g.advance(100.0);
    // Shortest child is done; progress reports it even though the group still runs.
    assert_eq!(g.progress(), Some(1.0));
    assert_eq!(g.play_state(), PlayState::Running);
}

#[test]
fn finished_waits_for_every_child() {
    let (mut g, _) = group(&[100.0, 300.0]);
    let finished = g.finished();
    g.play();
    g.advance(150.0);
    assert!(g.children()[0].finished().is_fulfilled());
    assert!(finished.is_pending());
    g.advance(200.0);
    assert!(finished.is_fulfilled());
    assert_eq!(g.play_state(), PlayState::Finished);
}

#[test]
fn cancel_rejects_finished_once() {
    let (mut g, els) = group(&[100.0]);
    let finished = g.finished();
    g.play();
    g.advance(10.0);
    g.cancel();
    assert!(finished.is_aborted());
    assert!(els[0].style().is_none());
    g.cancel();
    assert!(g.finished().same_slot(&finished));
}

#[test]
fn seeking_sets_the_same_local_time_on_children() {
    let (mut g, els) = group(&[100.0, 200.0]);
    g.pause();
    g.set_current_time(50.0);
    assert_eq!(g.children()[0].current_time(), Some(50.0));
    assert_eq!(g.children()[1].current_time(), Some(50.0));
    assert_eq!(els[1].style().and_then(|s| s.opacity), Some(0.25));
    g.set_current_time(150.0);
    assert_eq!(g.children()[0].current_time(), Some(100.0));
    assert_eq!(g.current_time(), Some(150.0));
}

#[test]
fn negative_rate_scrubs_back_to_zero() {
    let (mut g, _) = group(&[100.0, 100.0]);
    g.pause();
    g.set_current_time(100.0);
    g.set_playback_rate(-1.0);
    g.play();
    g.advance(60.0);
    assert_eq!(g.current_time(), Some(40.0));
    assert_eq!(g.advance(60.0), PlayState::Finished);
    assert_eq!(g.current_time(), Some(0.0));
    assert!(g.finished().is_fulfilled());
}

#[test]
fn group_rate_scales_intrinsic_rates() {
    let el = HeadlessElement::new("a");
    let effect = ParallelEffect::new(vec![fade(&el, 100.0, 1.0), fade(&el, 100.0, 2.0)]);
    let mut g = GroupAnimation::new(Box::new(effect));
    g.set_playback_rate(-5.0);
    assert_eq!(g.children()[0].playback_rate(), -5.0);
    assert_eq!(g.children()[1].playback_rate(), -10.0);
}

#[test]
fn children_run_at_their_intrinsic_rates() {
    let a = HeadlessElement::new("a");
    let b = HeadlessElement::new("b");
    let effect = ParallelEffect::new(vec![fade(&a, 100.0, 1.0), fade(&b, 100.0, 2.0)]);
    let mut g = GroupAnimation::new(Box::new(effect));
    assert_eq!(g.duration(), 100.0);
    g.play();
    g.advance(25.0);
    assert_eq!(a.style().and_then(|s| s.opacity), Some(0.25));
    assert_eq!(b.style().and_then(|s| s.opacity), Some(0.5));
    g.advance(25.0);
    assert_eq!(b.style().and_then(|s| s.opacity), Some(1.0));
    assert!(g.children()[1].finished().is_fulfilled());
    assert_eq!(g.play_state(), PlayState::Running);
}

#[test]
fn fast_children_shorten_the_group_clock() {
    let a = HeadlessElement::new("a");
    let b = HeadlessElement::new("b");
    let effect = ParallelEffect::new(vec![fade(&a, 200.0, 4.0), fade(&b, 100.0, 2.0)]);
    let mut g = GroupAnimation::new(Box::new(effect));
    assert_eq!(g.duration(), 50.0);
    g.play();
    assert_eq!(g.advance(50.0), PlayState::Finished);
    assert_eq!(a.style().and_then(|s| s.opacity), Some(1.0));
}

#[test]
fn progress_ignores_delays_when_picking_the_shortest_child() {
    let a = HeadlessElement::new("a");
    let b = HeadlessElement::new("b");
    let delayed = Box::new(
        KeyframeEffect::new(
            a.clone(),
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
                delay: 100.0,
                ..EffectTiming::with_duration(100.0)
            },
        )
        .unwrap(),
    );
    let effect = ParallelEffect::new(vec![fade(&b, 150.0, 1.0), delayed]);
    let mut g = GroupAnimation::new(Box::new(effect));
    g.play();
    g.advance(150.0);
    // The delayed child ends later but is shorter, so it drives progress.
    assert_eq!(g.progress(), Some(0.5));
}

#[test]
fn reverse_mid_flight_returns_to_start() {
    let (mut g, _) = group(&[100.0]);
    g.play();
    g.advance(30.0);
    g.reverse();
    assert_eq!(g.playback_rate(), -1.0);
    g.advance(30.0);
    assert_eq!(g.play_state(), PlayState::Finished);
    assert_eq!(g.current_time(), Some(0.0));
}

#[test]
fn empty_group_finishes_on_play() {
    let mut g = GroupAnimation::new(Box::new(ParallelEffect::default()));
    g.play();
    assert!(g.finished().is_fulfilled());
    assert!(g.ready().is_fulfilled());
}

#[test]
fn sequence_leaves_start_after_predecessors() {
    let a = HeadlessElement::new("a");
    let b = HeadlessElement::new("b");
    let seq = SequenceEffect::new(vec![fade(&a, 100.0, 1.0), fade(&b, 100.0, 1.0)]);
    let mut g = GroupAnimation::new(Box::new(seq));
    assert_eq!(g.duration(), 200.0);
    g.play();
    g.advance(150.0);
    assert_eq!(a.style().and_then(|s| s.opacity), Some(1.0));
    assert_eq!(b.style().and_then(|s| s.opacity), Some(0.5));
}
