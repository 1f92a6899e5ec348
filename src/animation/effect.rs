//! Effect capability and group composition.
//!
//! A group effect never owns a clock. It only aggregates timing over its children and fans
//! updates out; [`crate::animation::group::GroupAnimation`] flattens it into one playable
//! handle per leaf.

use std::fmt;

use crate::animation::timing::{ComputedTiming, EffectTiming, OptionalEffectTiming};
use crate::foundation::core::Millis;

/// Anything with effect timing that can be sampled onto its target(s).
pub trait AnimationEffect: fmt::Debug {
    fn timing(&self) -> EffectTiming;
    fn computed_timing(&self, local_time: Option<Millis>) -> ComputedTiming;
    fn update_timing(&mut self, patch: &OptionalEffectTiming);
    /// Write the state at `local_time` into the target(s); `None` removes the effect.
    fn apply(&self, local_time: Option<Millis>);
    /// Decompose into leaf effects, one per independently playable animation.
    fn into_leaves(self: Box<Self>) -> Vec<Box<dyn AnimationEffect>>;
}

/// Children that share one local time.
///
/// Duration is the longest child's; progress follows the child with the shortest duration so
/// the fastest layer leads perceived progress.
#[derive(Debug, Default)]
pub struct ParallelEffect {
    children: Vec<Box<dyn AnimationEffect>>,
}

impl ParallelEffect {
    pub fn new(children: Vec<Box<dyn AnimationEffect>>) -> Self {
        Self { children }
    }

    pub fn append(&mut self, effect: Box<dyn AnimationEffect>) {
        self.children.push(effect);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn shortest(&self) -> Option<&dyn AnimationEffect> {
        let mut best: Option<&dyn AnimationEffect> = None;
        for c in &self.children {
            match best {
                Some(b) if b.timing().duration <= c.timing().duration => {}
                _ => best = Some(c.as_ref()),
            }
        }
        best
    }
}

impl AnimationEffect for ParallelEffect {
    fn timing(&self) -> EffectTiming {
        let mut iter = self.children.iter().map(|c| c.timing());
        let Some(first) = iter.next() else {
            return EffectTiming::default();
        };
        iter.fold(first, |mut acc, t| {
            acc.delay = acc.delay.min(t.delay);
            acc.end_delay = acc.end_delay.max(t.end_delay);
            acc.duration = acc.duration.max(t.duration);
            acc.iterations = acc.iterations.max(t.iterations);
            acc
        })
    }

    fn computed_timing(&self, local_time: Option<Millis>) -> ComputedTiming {
        let mut out = self.timing().compute(local_time);
        out.active_duration = 0.0;
        out.end_time = 0.0;
        out.current_iteration = None;
        for c in &self.children {
            let ct = c.computed_timing(local_time);
            out.active_duration = out.active_duration.max(ct.active_duration);
            out.end_time = out.end_time.max(ct.end_time);
            out.current_iteration = match (out.current_iteration, ct.current_iteration) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            };
        }
        out.progress = self
            .shortest()
            .and_then(|c| c.computed_timing(local_time).progress);
        out
    }

    fn update_timing(&mut self, patch: &OptionalEffectTiming) {
        for c in &mut self.children {
            c.update_timing(patch);
        }
    }

    fn apply(&self, local_time: Option<Millis>) {
        for c in &self.children {
            c.apply(local_time);
        }
    }

    fn into_leaves(self: Box<Self>) -> Vec<Box<dyn AnimationEffect>> {
        self.children
            .into_iter()
            .flat_map(|c| c.into_leaves())
            .collect()
    }
}

/// Children played back to back: each child's delay is shifted by the end times of its
/// predecessors.
#[derive(Debug, Default)]
pub struct SequenceEffect {
    children: Vec<Box<dyn AnimationEffect>>,
}

impl SequenceEffect {
    pub fn new(children: Vec<Box<dyn AnimationEffect>>) -> Self {
        let mut out = Self::default();
        for c in children {
            out.append(c);
        }
        out
    }

    pub fn append(&mut self, mut effect: Box<dyn AnimationEffect>) {
        let offset = self.total();
        if offset > 0.0 {
            let delay = effect.timing().delay;
            effect.update_timing(&OptionalEffectTiming::delay(delay + offset));
        }
        self.children.push(effect);
    }

    fn total(&self) -> Millis {
        self.children
            .iter()
            .map(|c| c.computed_timing(None).end_time)
            .fold(0.0, f64::max)
    }
}

impl AnimationEffect for SequenceEffect {
    fn timing(&self) -> EffectTiming {
        let first = self.children.first().map(|c| c.timing()).unwrap_or_default();
        EffectTiming {
            delay: 0.0,
            end_delay: 0.0,
            duration: self.total(),
            iterations: 1.0,
            ..first
        }
    }

    fn computed_timing(&self, local_time: Option<Millis>) -> ComputedTiming {
        let mut t = self.timing();
        t.easing = crate::animation::ease::Ease::Linear;
        t.compute(local_time)
    }

    // Delays are owned by the sequence; only the remaining fields fan out.
    fn update_timing(&mut self, patch: &OptionalEffectTiming) {
        let patch = OptionalEffectTiming {
            delay: None,
            ..*patch
        };
        for c in &mut self.children {
            c.update_timing(&patch);
        }
    }

    fn apply(&self, local_time: Option<Millis>) {
        for c in &self.children {
            c.apply(local_time);
        }
    }

    fn into_leaves(self: Box<Self>) -> Vec<Box<dyn AnimationEffect>> {
        self.children
            .into_iter()
            .flat_map(|c| c.into_leaves())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/effect.rs"]
mod tests;
