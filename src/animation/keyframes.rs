use std::fmt;
use std::rc::Rc;

use crate::animation::effect::AnimationEffect;
use crate::animation::timing::{ComputedTiming, EffectTiming, OptionalEffectTiming};
use crate::foundation::core::{Length, Millis};
use crate::foundation::error::{RouterError, RouterResult};

/// Interpolation contract for animatable property values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Length {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Length::Px(a), Length::Px(b)) => Length::Px(f64::lerp(a, b, t)),
            (Length::Vw(a), Length::Vw(b)) => Length::Vw(f64::lerp(a, b, t)),
            (Length::Vh(a), Length::Vh(b)) => Length::Vh(f64::lerp(a, b, t)),
            // Mixed units cannot be resolved without a viewport; flip at the midpoint.
            _ => {
                if t < 0.5 {
                    *a
                } else {
                    *b
                }
            }
        }
    }
}

/// 2D translation in possibly viewport-relative units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Translate {
    pub x: Length,
    pub y: Length,
}

impl Translate {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            x: Length::Px(x),
            y: Length::Px(y),
        }
    }
}

impl Lerp for Translate {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            x: Length::lerp(&a.x, &b.x, t),
            y: Length::lerp(&a.y, &b.y, t),
        }
    }
}

/// Compositing mode for overlapping ghosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    PlusLighter,
}

/// One set of animatable style values. Unset fields are left to the target's own styles.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleFrame {
    pub translate: Option<Translate>,
    pub scale: Option<f64>,
    pub opacity: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub border_radius: Option<f64>,
    pub blend_mode: Option<BlendMode>,
    pub transform_origin: Option<String>,
}

impl StyleFrame {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Anything keyframe effects can write sampled styles into (screen roots, overlay ghosts).
pub trait StyleTarget: fmt::Debug {
    /// Replace the animated style layer with `style`.
    fn apply_style(&self, style: &StyleFrame);
    /// Drop the animated style layer, reverting to the target's own styles.
    fn clear_style(&self);
}

/// Keyframe at an optional offset in `[0, 1]`; missing offsets are spaced evenly.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(flatten)]
    pub style: StyleFrame,
}

impl Keyframe {
    pub fn new(style: StyleFrame) -> Self {
        Self {
            offset: None,
            style,
        }
    }

    pub fn at(offset: f64, style: StyleFrame) -> Self {
        Self {
            offset: Some(offset),
            style,
        }
    }
}

/// Validate keyframe offsets and fill in the missing ones.
pub fn computed_offsets(keys: &[Keyframe]) -> RouterResult<Vec<f64>> {
    let n = keys.len();
    let mut offsets: Vec<Option<f64>> = keys.iter().map(|k| k.offset).collect();
    if n == 0 {
        return Ok(Vec::new());
    }
    if let Some(first) = offsets.first_mut() {
        first.get_or_insert(0.0);
    }
    if n > 1
        && let Some(last) = offsets.last_mut()
    {
        last.get_or_insert(1.0);
    }

    let mut prev = f64::NEG_INFINITY;
    for o in offsets.iter().flatten() {
        if !(0.0..=1.0).contains(o) {
            return Err(RouterError::animation("keyframe offsets must be within [0, 1]"));
        }
        if *o < prev {
            return Err(RouterError::animation("keyframe offsets must be non-decreasing"));
        }
        prev = *o;
    }

    let mut i = 0;
    while i < n {
        if offsets[i].is_some() {
            i += 1;
            continue;
        }
        let start = i - 1;
        let mut end = i;
        while offsets[end].is_none() {
            end += 1;
        }
        let (a, b) = (offsets[start].unwrap_or(0.0), offsets[end].unwrap_or(1.0));
        let span = (end - start) as f64;
        for (k, slot) in offsets.iter_mut().enumerate().take(end).skip(start + 1) {
            *slot = Some(a + (b - a) * ((k - start) as f64 / span));
        }
        i = end;
    }
    Ok(offsets.into_iter().map(|o| o.unwrap_or(0.0)).collect())
}

fn sample_prop<T: Lerp + Clone>(points: &[(f64, T)], p: f64) -> Option<T> {
    let first = points.first()?;
    if points.len() == 1 || p <= first.0 {
        return Some(first.1.clone());
    }
    let idx = points.partition_point(|(o, _)| *o <= p);
    if idx >= points.len() {
        return points.last().map(|(_, v)| v.clone());
    }
    let (oa, a) = &points[idx - 1];
    let (ob, b) = &points[idx];
    let span = ob - oa;
    if span <= 0.0 {
        return Some(b.clone());
    }
    Some(T::lerp(a, b, (p - oa) / span))
}

fn sample_discrete<T: Clone>(points: &[(f64, T)], p: f64) -> Option<T> {
    let idx = points.partition_point(|(o, _)| *o <= p);
    points
        .get(idx.saturating_sub(1))
        .or(points.first())
        .map(|(_, v)| v.clone())
}

/// Sample a keyframe list at iteration progress `p`, interpolating each property only among
/// the keyframes that set it.
pub fn sample_keyframes(keys: &[Keyframe], offsets: &[f64], p: f64) -> StyleFrame {
    fn collect<T: Clone>(
        keys: &[Keyframe],
        offsets: &[f64],
        get: impl Fn(&StyleFrame) -> Option<T>,
    ) -> Vec<(f64, T)> {
        keys.iter()
            .zip(offsets)
            .filter_map(|(k, o)| get(&k.style).map(|v| (*o, v)))
            .collect()
    }

    StyleFrame {
        translate: sample_prop(&collect(keys, offsets, |s| s.translate), p),
        scale: sample_prop(&collect(keys, offsets, |s| s.scale), p),
        opacity: sample_prop(&collect(keys, offsets, |s| s.opacity), p)
            .map(|o| o.clamp(0.0, 1.0)),
        width: sample_prop(&collect(keys, offsets, |s| s.width), p),
        height: sample_prop(&collect(keys, offsets, |s| s.height), p),
        border_radius: sample_prop(&collect(keys, offsets, |s| s.border_radius), p),
        blend_mode: sample_discrete(&collect(keys, offsets, |s| s.blend_mode), p),
        transform_origin: sample_discrete(
            &collect(keys, offsets, |s| s.transform_origin.clone()),
            p,
        ),
    }
}

/// Leaf effect animating one [`StyleTarget`] through a keyframe list.
pub struct KeyframeEffect {
    target: Rc<dyn StyleTarget>,
    keyframes: Vec<Keyframe>,
    offsets: Vec<f64>,
    timing: EffectTiming,
}

impl fmt::Debug for KeyframeEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeEffect")
            .field("target", &self.target)
            .field("keyframes", &self.keyframes.len())
            .field("timing", &self.timing)
            .finish()
    }
}

impl KeyframeEffect {
    pub fn new(
        target: Rc<dyn StyleTarget>,
        keyframes: Vec<Keyframe>,
        timing: EffectTiming,
    ) -> RouterResult<Self> {
        timing.validate()?;
        let offsets = computed_offsets(&keyframes)?;
        Ok(Self {
            target,
            keyframes,
            offsets,
            timing,
        })
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn target(&self) -> &Rc<dyn StyleTarget> {
        &self.target
    }

    /// Style this effect produces at `local_time`, if it is in effect.
    pub fn sample(&self, local_time: Option<Millis>) -> Option<StyleFrame> {
        let p = self.timing.compute(local_time).progress?;
        Some(sample_keyframes(&self.keyframes, &self.offsets, p))
    }
}

impl AnimationEffect for KeyframeEffect {
    fn timing(&self) -> EffectTiming {
        self.timing
    }

    fn computed_timing(&self, local_time: Option<Millis>) -> ComputedTiming {
        self.timing.compute(local_time)
    }

    fn update_timing(&mut self, patch: &OptionalEffectTiming) {
        self.timing.update(patch);
    }

    fn apply(&self, local_time: Option<Millis>) {
        match self.sample(local_time) {
            Some(style) => self.target.apply_style(&style),
            None => self.target.clear_style(),
        }
    }

    fn into_leaves(self: Box<Self>) -> Vec<Box<dyn AnimationEffect>> {
        vec![self]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
