//! Shared element transition layer.
//!
//! Diffs the outgoing and incoming scenes, clones every matched pair into the
//! [`TransitionSurface`] and builds one [`ParallelEffect`] animating the ghosts between the two
//! layout boxes.
//!
//! Failure modes:
//! - A node that is detached (no bounding rect, or clone refused) skips only its own pair; any
//!   ghost already inserted for that pair is removed again.
//! - An effect construction error undoes everything this phase inserted before returning.

use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::animation::effect::ParallelEffect;
use crate::animation::keyframes::{
    BlendMode, Keyframe, KeyframeEffect, StyleFrame, StyleTarget, Translate,
};
use crate::animation::timing::{EffectTiming, FillMode};
use crate::foundation::core::{Millis, Rect};
use crate::foundation::error::RouterResult;
use crate::shared::element::{SharedElementHandle, SharedElementNode, TransitionKind};
use crate::shared::scene::{SceneHandle, SharedElementScene};
use crate::shared::surface::{OverlayEntry, TransitionSurface};

/// A shared element id present in both scenes.
#[derive(Clone, Debug)]
pub struct MatchedPair {
    pub id: String,
    pub kind: TransitionKind,
    pub start: SharedElementNode,
    pub end: SharedElementNode,
}

/// Ids present in both scenes with neither node disabled, in id order.
pub fn match_set(outgoing: &SharedElementScene, incoming: &SharedElementScene) -> Vec<MatchedPair> {
    if !outgoing.is_transitionable() || !incoming.is_transitionable() {
        return Vec::new();
    }
    incoming
        .nodes()
        .filter(|end| !end.config.disabled)
        .filter_map(|end| {
            let start = outgoing.node(&end.id).filter(|s| !s.config.disabled)?;
            Some(MatchedPair {
                id: end.id.clone(),
                kind: TransitionKind::resolve(end.config.kind, start.config.kind),
                start: start.clone(),
                end: end.clone(),
            })
        })
        .collect()
}

/// Side effects of one shared element phase; undone exactly once.
#[derive(Debug, Default)]
pub struct SharedCleanup {
    ghosts: Vec<String>,
    hidden: Vec<Rc<dyn SharedElementHandle>>,
    done: bool,
}

impl SharedCleanup {
    /// Remove this phase's ghosts and unhide the originals. Returns `false` when already run.
    pub fn run(&mut self, surface: &mut TransitionSurface) -> bool {
        if self.done {
            return false;
        }
        self.done = true;
        for id in self.ghosts.drain(..) {
            surface.remove(&id);
        }
        for h in self.hidden.drain(..) {
            h.set_hidden(false);
        }
        true
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Built shared element phase: the composite effect plus its cleanup.
#[derive(Debug)]
pub struct SharedElementTransition {
    pub effect: ParallelEffect,
    pub cleanup: SharedCleanup,
    /// Ids of the pairs that are actually animated.
    pub animated: Vec<String>,
}

fn frame(rect: Rect, declared: &StyleFrame, origin: &Option<String>) -> StyleFrame {
    StyleFrame {
        translate: Some(Translate::px(rect.x0, rect.y0)),
        width: Some(rect.width()),
        height: Some(rect.height()),
        border_radius: declared.border_radius,
        transform_origin: origin.clone(),
        ..StyleFrame::default()
    }
}

fn with_opacity(mut f: StyleFrame, opacity: f64, blend: Option<BlendMode>) -> StyleFrame {
    f.opacity = Some(opacity);
    f.blend_mode = blend;
    f
}

fn opacity_at(offset: f64, opacity: f64, blend: Option<BlendMode>) -> Keyframe {
    Keyframe::at(
        offset,
        StyleFrame {
            opacity: Some(opacity),
            blend_mode: blend,
            ..StyleFrame::default()
        },
    )
}

/// Ghost plan for one pair: `(overlay id, source handle, keyframes)`.
type GhostPlan = (String, Rc<dyn SharedElementHandle>, Vec<Keyframe>);

fn plan(pair: &MatchedPair, start: Rect, end: Rect) -> Vec<GhostPlan> {
    let origin = pair
        .end
        .config
        .transform_origin
        .clone()
        .or_else(|| pair.start.config.transform_origin.clone());
    let s = frame(start, &pair.start.handle.declared_style(), &origin);
    let e = frame(end, &pair.end.handle.declared_style(), &origin);
    let start_id = format!("{}:start", pair.id);
    let end_id = format!("{}:end", pair.id);
    let start_h = pair.start.handle.clone();
    let end_h = pair.end.handle.clone();

    match pair.kind {
        TransitionKind::Morph => vec![(
            pair.id.clone(),
            end_h,
            vec![Keyframe::new(s), Keyframe::new(e)],
        )],
        TransitionKind::Fade => vec![
            (
                start_id,
                start_h,
                vec![
                    Keyframe::new(with_opacity(s.clone(), 1.0, None)),
                    Keyframe::new(with_opacity(e.clone(), 0.0, None)),
                ],
            ),
            (
                end_id,
                end_h,
                vec![
                    Keyframe::new(with_opacity(s, 1.0, None)),
                    Keyframe::new(with_opacity(e, 1.0, None)),
                ],
            ),
        ],
        TransitionKind::FadeThrough => vec![
            (
                start_id,
                start_h,
                vec![
                    Keyframe::new(with_opacity(s.clone(), 1.0, None)),
                    opacity_at(0.5, 0.0, None),
                    Keyframe::new(with_opacity(e.clone(), 0.0, None)),
                ],
            ),
            (
                end_id,
                end_h,
                vec![
                    Keyframe::new(with_opacity(s, 0.0, None)),
                    opacity_at(0.5, 0.0, None),
                    Keyframe::new(with_opacity(e, 1.0, None)),
                ],
            ),
        ],
        TransitionKind::CrossFade => {
            let blend = Some(BlendMode::PlusLighter);
            vec![
                (
                    start_id,
                    start_h,
                    vec![
                        Keyframe::new(with_opacity(s.clone(), 1.0, blend)),
                        Keyframe::new(with_opacity(e.clone(), 0.0, blend)),
                    ],
                ),
                (
                    end_id,
                    end_h,
                    vec![
                        Keyframe::new(with_opacity(s, 0.0, blend)),
                        Keyframe::new(with_opacity(e, 1.0, blend)),
                    ],
                ),
            ]
        }
    }
}

fn pair_timing(pair: &MatchedPair, duration: Millis, easing: Ease) -> EffectTiming {
    let (s, e) = (&pair.start.config, &pair.end.config);
    EffectTiming {
        duration: e.duration.or(s.duration).unwrap_or(duration),
        delay: e.delay.or(s.delay).unwrap_or(0.0),
        easing: e.easing.or(s.easing).unwrap_or(easing),
        fill: FillMode::Both,
        ..EffectTiming::default()
    }
}

/// Build the shared element phase between two scenes.
///
/// Returns `None` when nothing can be animated (no matches, a non-transitionable scene, or a
/// zero `duration`). Pairs without their own duration are pinned to `duration`.
#[tracing::instrument(level = "debug", skip_all, fields(duration = duration))]
pub fn build_shared_transition(
    outgoing: &SceneHandle,
    incoming: &SceneHandle,
    surface: &mut TransitionSurface,
    duration: Millis,
    easing: Ease,
) -> RouterResult<Option<SharedElementTransition>> {
    incoming.borrow_mut().set_previous_scene(Some(outgoing));
    outgoing.borrow_mut().set_previous_scene(None);
    if duration <= 0.0 {
        return Ok(None);
    }
    let pairs = match_set(&outgoing.borrow(), &incoming.borrow());
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut cleanup = SharedCleanup::default();
    let mut effect = ParallelEffect::default();
    let mut animated = Vec::new();

    'pairs: for pair in &pairs {
        let (Some(start), Some(end)) = (
            pair.start.handle.bounding_rect(),
            pair.end.handle.bounding_rect(),
        ) else {
            tracing::debug!(id = %pair.id, "shared element detached; skipping pair");
            continue;
        };

        let timing = pair_timing(pair, duration, easing);
        let mut ghosts: Vec<(String, Rc<dyn StyleTarget>, Vec<Keyframe>)> = Vec::new();
        for (id, handle, keyframes) in plan(pair, start, end) {
            match handle.clone_node() {
                Some(target) => {
                    surface.insert(OverlayEntry {
                        id: id.clone(),
                        target: target.clone(),
                        will_change: pair.end.config.will_change.clone(),
                    });
                    ghosts.push((id, target, keyframes));
                }
                None => {
                    tracing::debug!(id = %pair.id, "shared element clone failed; skipping pair");
                    for (id, _, _) in &ghosts {
                        surface.remove(id);
                    }
                    continue 'pairs;
                }
            }
        }

        let mut pair_effect = ParallelEffect::default();
        for (id, target, keyframes) in ghosts {
            cleanup.ghosts.push(id);
            match KeyframeEffect::new(target, keyframes, timing) {
                Ok(e) => pair_effect.append(Box::new(e)),
                Err(err) => {
                    cleanup.run(surface);
                    return Err(err);
                }
            }
        }
        for h in [&pair.start.handle, &pair.end.handle] {
            h.set_hidden(true);
            cleanup.hidden.push(h.clone());
        }
        effect.append(Box::new(pair_effect));
        animated.push(pair.id.clone());
    }

    if effect.is_empty() {
        return Ok(None);
    }
    tracing::debug!(pairs = animated.len(), ghosts = surface.len(), "shared element phase built");
    Ok(Some(SharedElementTransition {
        effect,
        cleanup,
        animated,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/shared/layer.rs"]
mod tests;
