//! Effect timing model: static timing, partial updates and sampled (computed) timing.

use crate::animation::ease::Ease;
use crate::foundation::core::Millis;
use crate::foundation::error::{RouterError, RouterResult};

/// How an effect applies outside its active interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    None,
    Forwards,
    Backwards,
    Both,
    #[default]
    Auto,
}

impl FillMode {
    fn fills_backwards(self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }

    fn fills_forwards(self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }
}

/// Iteration direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackDirection {
    #[default]
    Normal,
    Reverse,
    Alternate,
    AlternateReverse,
}

/// Static timing of one effect.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectTiming {
    pub delay: Millis,
    pub end_delay: Millis,
    pub duration: Millis,
    /// Iteration count; `f64::INFINITY` repeats forever.
    pub iterations: f64,
    pub easing: Ease,
    pub fill: FillMode,
    pub direction: PlaybackDirection,
    /// Intrinsic rate the effect is played at before any group scaling.
    pub playback_rate: f64,
}

impl Default for EffectTiming {
    fn default() -> Self {
        Self {
            delay: 0.0,
            end_delay: 0.0,
            duration: 0.0,
            iterations: 1.0,
            easing: Ease::Linear,
            fill: FillMode::Auto,
            direction: PlaybackDirection::Normal,
            playback_rate: 1.0,
        }
    }
}

/// Partial timing update; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OptionalEffectTiming {
    pub delay: Option<Millis>,
    pub end_delay: Option<Millis>,
    pub duration: Option<Millis>,
    pub iterations: Option<f64>,
    pub easing: Option<Ease>,
    pub fill: Option<FillMode>,
    pub direction: Option<PlaybackDirection>,
    pub playback_rate: Option<f64>,
}

impl OptionalEffectTiming {
    pub fn duration(duration: Millis) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn delay(delay: Millis) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }
}

/// Timing sampled at one local time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComputedTiming {
    pub timing: EffectTiming,
    pub local_time: Option<Millis>,
    /// Eased, directed iteration progress; `None` when the effect is not in effect.
    pub progress: Option<f64>,
    pub active_duration: Millis,
    pub end_time: Millis,
    pub current_iteration: Option<f64>,
}

impl EffectTiming {
    pub fn with_duration(duration: Millis) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> RouterResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(RouterError::animation("duration must be finite and >= 0"));
        }
        if self.iterations.is_nan() || self.iterations < 0.0 {
            return Err(RouterError::animation("iterations must be >= 0"));
        }
        if !self.delay.is_finite() || !self.end_delay.is_finite() {
            return Err(RouterError::animation("delays must be finite"));
        }
        if !self.playback_rate.is_finite() || self.playback_rate == 0.0 {
            return Err(RouterError::animation(
                "intrinsic playback rate must be finite and non-zero",
            ));
        }
        Ok(())
    }

    pub fn update(&mut self, patch: &OptionalEffectTiming) {
        if let Some(v) = patch.delay {
            self.delay = v;
        }
        if let Some(v) = patch.end_delay {
            self.end_delay = v;
        }
        if let Some(v) = patch.duration {
            self.duration = v;
        }
        if let Some(v) = patch.iterations {
            self.iterations = v;
        }
        if let Some(v) = patch.easing {
            self.easing = v;
        }
        if let Some(v) = patch.fill {
            self.fill = v;
        }
        if let Some(v) = patch.direction {
            self.direction = v;
        }
        if let Some(v) = patch.playback_rate {
            self.playback_rate = v;
        }
    }

    pub fn active_duration(&self) -> Millis {
        if self.duration == 0.0 || self.iterations == 0.0 {
            return 0.0;
        }
        self.duration * self.iterations
    }

    pub fn end_time(&self) -> Millis {
        (self.delay + self.active_duration() + self.end_delay).max(0.0)
    }

    /// Sample timing at `local_time`.
    pub fn compute(&self, local_time: Option<Millis>) -> ComputedTiming {
        let active = self.active_duration();
        let mut out = ComputedTiming {
            timing: *self,
            local_time,
            progress: None,
            active_duration: active,
            end_time: self.end_time(),
            current_iteration: None,
        };
        let Some(local) = local_time else {
            return out;
        };

        let (overall, in_effect) = if local < self.delay {
            (0.0, self.fill.fills_backwards())
        } else if local < self.delay + active {
            ((local - self.delay) / self.duration, true)
        } else {
            (self.iterations, self.fill.fills_forwards())
        };
        if !in_effect {
            return out;
        }

        // The end of a whole iteration reports progress 1 of that iteration, not 0 of the next.
        let mut iteration = overall.floor();
        let mut simple = overall - iteration;
        if simple == 0.0 && overall > 0.0 && (local >= self.delay + active || active == 0.0) {
            iteration -= 1.0;
            simple = 1.0;
        }
        if active == 0.0 && local >= self.delay {
            iteration = (self.iterations - 1.0).max(0.0);
            simple = 1.0;
        }

        let forwards = match self.direction {
            PlaybackDirection::Normal => true,
            PlaybackDirection::Reverse => false,
            PlaybackDirection::Alternate => iteration % 2.0 == 0.0,
            PlaybackDirection::AlternateReverse => iteration % 2.0 != 0.0,
        };
        let directed = if forwards { simple } else { 1.0 - simple };

        out.current_iteration = Some(iteration.max(0.0));
        out.progress = Some(self.easing.apply(directed));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
