//! Router and per-route configuration.
//!
//! Static configuration deserializes from JSON; animation factories can only be installed from
//! code.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::animation::keyframes::Keyframe;
use crate::animation::timing::EffectTiming;
use crate::foundation::core::Millis;
use crate::foundation::error::{RouterError, RouterResult};

/// Built-in screen animation families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationType {
    Slide,
    Fade,
    Zoom,
    #[default]
    None,
}

/// Direction token of a screen animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationDirection {
    Up,
    Down,
    Left,
    Right,
    In,
    Out,
}

impl AnimationDirection {
    /// Mirror used when navigating back.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

/// Swipe direction that triggers back navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl SwipeDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Preset-based screen animation.
#[derive(Clone, Copy, Debug, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct AnimationConfig {
    #[serde(rename = "type")]
    pub kind: AnimationType,
    #[serde(default)]
    pub direction: Option<AnimationDirection>,
    #[serde(default)]
    pub duration: Millis,
    #[serde(default)]
    pub easing: Option<Ease>,
}

impl AnimationConfig {
    pub fn new(
        kind: AnimationType,
        direction: Option<AnimationDirection>,
        duration: Millis,
    ) -> Self {
        Self {
            kind,
            direction,
            duration,
            easing: None,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Explicit keyframes for one screen role.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeAnimationConfig {
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub timing: EffectTiming,
}

/// Animation of one screen role: a preset or explicit keyframes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScreenAnimation {
    Preset(AnimationConfig),
    Keyframes(KeyframeAnimationConfig),
}

impl ScreenAnimation {
    pub fn duration(&self) -> Millis {
        match self {
            Self::Preset(c) => c.duration,
            Self::Keyframes(k) => k.timing.duration,
        }
    }

    fn validate(&self) -> RouterResult<()> {
        match self {
            Self::Preset(c) => {
                if !c.duration.is_finite() || c.duration < 0.0 {
                    return Err(RouterError::config("animation duration must be >= 0"));
                }
                Ok(())
            }
            Self::Keyframes(k) => {
                k.timing.validate()?;
                crate::animation::keyframes::computed_offsets(&k.keyframes).map(|_| ())
            }
        }
    }
}

impl Default for ScreenAnimation {
    fn default() -> Self {
        Self::Preset(AnimationConfig::none())
    }
}

/// Resolved animation pair for the entering and exiting screen roles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationConfigSet {
    pub enter: ScreenAnimation,
    pub exit: ScreenAnimation,
}

/// What a config or factory yields: a symmetric config or an `{in, out}` pair.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AnimationValue {
    Pair {
        #[serde(rename = "in")]
        enter: ScreenAnimation,
        #[serde(rename = "out", default)]
        exit: Option<ScreenAnimation>,
    },
    Single(ScreenAnimation),
}

impl AnimationValue {
    /// Expand into a pair; a missing `out` reuses `in`.
    pub fn into_set(self) -> AnimationConfigSet {
        match self {
            Self::Single(a) => AnimationConfigSet {
                enter: a.clone(),
                exit: a,
            },
            Self::Pair { enter, exit } => AnimationConfigSet {
                exit: exit.unwrap_or_else(|| enter.clone()),
                enter,
            },
        }
    }

    pub fn validate(&self) -> RouterResult<()> {
        match self {
            Self::Single(a) => a.validate(),
            Self::Pair { enter, exit } => {
                enter.validate()?;
                exit.as_ref().map_or(Ok(()), ScreenAnimation::validate)
            }
        }
    }
}

impl Default for AnimationValue {
    fn default() -> Self {
        Self::Single(ScreenAnimation::default())
    }
}

impl From<AnimationConfig> for AnimationValue {
    fn from(value: AnimationConfig) -> Self {
        Self::Single(ScreenAnimation::Preset(value))
    }
}

/// Arguments handed to an animation factory.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationContext {
    pub previous_path: String,
    pub next_path: String,
    pub gesture_navigating: bool,
}

pub type AnimationFactory = Rc<dyn Fn(&AnimationContext) -> AnimationValue>;

/// Static animation or a factory consulted per navigation.
#[derive(Clone, serde::Deserialize)]
#[serde(from = "AnimationValue")]
pub enum AnimationSpec {
    Static(AnimationValue),
    Factory(AnimationFactory),
}

impl fmt::Debug for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(v) => f.debug_tuple("Static").field(v).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<AnimationValue> for AnimationSpec {
    fn from(value: AnimationValue) -> Self {
        Self::Static(value)
    }
}

impl AnimationSpec {
    pub fn factory(f: impl Fn(&AnimationContext) -> AnimationValue + 'static) -> Self {
        Self::Factory(Rc::new(f))
    }

    pub fn resolve(&self, ctx: &AnimationContext) -> AnimationConfigSet {
        match self {
            Self::Static(v) => v.clone().into_set(),
            Self::Factory(f) => f(ctx).into_set(),
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::Static(AnimationValue::default())
    }
}

/// Swipe-back gesture settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub swipe_direction: SwipeDirection,
    /// Distance from the starting edge, in px, inside which a swipe may begin.
    pub swipe_area_width: f64,
    /// Release velocity, in px/s, above which a swipe always commits.
    pub min_fling_velocity: f64,
    /// Percent of travel (0–100) past which a released swipe commits.
    pub hysteresis: f64,
    pub disable_discovery: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_direction: SwipeDirection::Right,
            swipe_area_width: 100.0,
            min_fling_velocity: 400.0,
            hysteresis: 50.0,
            disable_discovery: false,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> RouterResult<()> {
        if !(0.0..=100.0).contains(&self.hysteresis) {
            return Err(RouterError::config("hysteresis must be within [0, 100]"));
        }
        if !self.swipe_area_width.is_finite() || self.swipe_area_width < 0.0 {
            return Err(RouterError::config("swipe_area_width must be >= 0"));
        }
        if !self.min_fling_velocity.is_finite() || self.min_fling_velocity < 0.0 {
            return Err(RouterError::config("min_fling_velocity must be >= 0"));
        }
        Ok(())
    }

    /// Apply route-level overrides on top of these defaults.
    pub fn with_overrides(mut self, o: &GestureOverrides) -> Self {
        if let Some(v) = o.swipe_direction {
            self.swipe_direction = v;
        }
        if let Some(v) = o.swipe_area_width {
            self.swipe_area_width = v;
        }
        if let Some(v) = o.min_fling_velocity {
            self.min_fling_velocity = v;
        }
        if let Some(v) = o.hysteresis {
            self.hysteresis = v;
        }
        if let Some(v) = o.disable_discovery {
            self.disable_discovery = v;
        }
        self
    }
}

/// Route-level gesture settings; unset fields fall back to the router's.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureOverrides {
    pub swipe_direction: Option<SwipeDirection>,
    pub swipe_area_width: Option<f64>,
    pub min_fling_velocity: Option<f64>,
    pub hysteresis: Option<f64>,
    pub disable_discovery: Option<bool>,
}

/// Per-route configuration.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub animation: Option<AnimationSpec>,
    pub keep_alive: bool,
    #[serde(flatten)]
    pub gesture: GestureOverrides,
}

impl RouteConfig {
    pub fn validate(&self) -> RouterResult<()> {
        if let Some(AnimationSpec::Static(v)) = &self.animation {
            v.validate()?;
        }
        GestureConfig::default().with_overrides(&self.gesture).validate()
    }
}

/// Router-wide defaults.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub animation: AnimationSpec,
    #[serde(flatten)]
    pub gesture: GestureConfig,
}

impl RouterConfig {
    pub fn from_json_str(s: &str) -> RouterResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> RouterResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| RouterError::config(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> RouterResult<()> {
        if let AnimationSpec::Static(v) = &self.animation {
            v.validate()?;
        }
        self.gesture.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/config.rs"]
mod tests;
