pub use kurbo::{Point, Rect, Size, Vec2};

/// Upper bound of reported motion progress.
pub const MAX_PROGRESS: f64 = 100.0;
/// Lower bound of reported motion progress.
pub const MIN_PROGRESS: f64 = 0.0;

/// Milliseconds on the host clock or on an animation's local timeline.
pub type Millis = f64;

/// Clamp `v` into `[min, max]`, mapping NaN to `min`.
pub fn clamp_f64(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        return min;
    }
    v.clamp(min, max)
}

/// Convert a normalized `[0, 1]` progress into the `[0, 100]` event range.
pub fn to_percent(progress: f64) -> f64 {
    clamp_f64(progress * MAX_PROGRESS, MIN_PROGRESS, MAX_PROGRESS)
}

/// Viewport-relative length used by screen presets and ghost positioning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    /// Absolute CSS pixels.
    Px(f64),
    /// Percentage of the viewport width.
    Vw(f64),
    /// Percentage of the viewport height.
    Vh(f64),
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    /// Resolve to pixels against `viewport`.
    pub fn to_px(self, viewport: Size) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Vw(v) => v / 100.0 * viewport.width,
            Self::Vh(v) => v / 100.0 * viewport.height,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
