//! Swipe-back gesture math.
//!
//! A swipe qualifies when it starts near the edge it moves away from: a rightward swipe must
//! begin within `swipe_area_width` of the left edge, a downward one near the top, and so on.
//! Displacement is measured along the swipe axis and clamped to the viewport extent on that
//! axis.

use crate::foundation::core::{Point, Rect, Size, clamp_f64};
use crate::navigation::config::{GestureConfig, SwipeDirection};

/// Rate a committed swipe plays back at.
pub const COMMIT_RATE: f64 = -1.0;
/// Rate a flung swipe plays back at.
pub const FLING_RATE: f64 = -5.0;
/// Rate a released, uncommitted swipe snaps back at.
pub const REVERT_RATE: f64 = 0.5;

/// One pointer sample, consumed immediately.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GestureSample {
    pub x: f64,
    pub y: f64,
    pub direction: SwipeDirection,
    /// Velocity along `direction`, px/s.
    #[serde(default)]
    pub velocity: f64,
}

impl GestureSample {
    pub fn new(x: f64, y: f64, direction: SwipeDirection, velocity: f64) -> Self {
        Self {
            x,
            y,
            direction,
            velocity,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Distance from `p` to the edge a swipe in `direction` starts from.
pub fn edge_distance(direction: SwipeDirection, p: Point, viewport: Size) -> f64 {
    match direction {
        SwipeDirection::Right => p.x,
        SwipeDirection::Left => viewport.width - p.x,
        SwipeDirection::Down => p.y,
        SwipeDirection::Up => viewport.height - p.y,
    }
}

/// Distance a full swipe travels.
pub fn travel(direction: SwipeDirection, viewport: Size) -> f64 {
    if direction.is_horizontal() {
        viewport.width
    } else {
        viewport.height
    }
}

/// Regions where swipes must not start navigation.
#[derive(Clone, Debug, Default)]
pub struct GestureRegions {
    regions: Vec<(u64, Rect)>,
    next_id: u64,
}

impl GestureRegions {
    pub fn add(&mut self, rect: Rect) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.regions.push((id, rect));
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.regions.len();
        self.regions.retain(|(r, _)| *r != id);
        before != self.regions.len()
    }

    pub fn contains(&self, p: Point) -> bool {
        self.regions.iter().any(|(_, r)| r.contains(p))
    }
}

/// Whether a swipe may start with `sample`, ignoring engine state.
pub fn qualifies(
    cfg: &GestureConfig,
    sample: &GestureSample,
    touches: u32,
    viewport: Size,
    regions: &GestureRegions,
) -> bool {
    !cfg.disable_discovery
        && touches == 1
        && sample.direction == cfg.swipe_direction
        && edge_distance(sample.direction, sample.point(), viewport) < cfg.swipe_area_width
        && !regions.contains(sample.point())
}

/// Tracking state of one swipe.
#[derive(Clone, Debug)]
pub struct GestureSession {
    origin: Point,
    direction: SwipeDirection,
    travel: f64,
    swiped: f64,
    config: GestureConfig,
}

impl GestureSession {
    pub fn new(start: &GestureSample, config: GestureConfig, viewport: Size) -> Self {
        Self {
            origin: start.point(),
            direction: config.swipe_direction,
            travel: travel(config.swipe_direction, viewport),
            swiped: 0.0,
            config,
        }
    }

    /// Feed a move sample; returns the swiped fraction in `[0, 1]`.
    pub fn update(&mut self, sample: &GestureSample) -> f64 {
        let d = sample.point() - self.origin;
        let along = match self.direction {
            SwipeDirection::Right => d.x,
            SwipeDirection::Left => -d.x,
            SwipeDirection::Down => d.y,
            SwipeDirection::Up => -d.y,
        };
        self.swiped = if self.travel > 0.0 {
            clamp_f64(along, 0.0, self.travel) / self.travel
        } else {
            0.0
        };
        self.swiped
    }

    pub fn swiped(&self) -> f64 {
        self.swiped
    }

    pub fn percent(&self) -> f64 {
        self.swiped * 100.0
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn should_commit(&self, velocity: f64) -> bool {
        self.percent() > self.config.hysteresis || velocity > self.config.min_fling_velocity
    }

    /// Group playback rate after release.
    pub fn release_rate(&self, velocity: f64) -> f64 {
        if !self.should_commit(velocity) {
            REVERT_RATE
        } else if velocity > self.config.min_fling_velocity {
            FLING_RATE
        } else {
            COMMIT_RATE
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/gesture.rs"]
mod tests;
