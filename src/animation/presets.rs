//! Built-in screen animation keyframes.
//!
//! Values follow the usual mobile stack conventions (the exiting screen travels half as far as
//! the entering one) but are not contractual.

use crate::animation::keyframes::{Keyframe, StyleFrame, Translate};
use crate::foundation::core::Length;
use crate::navigation::config::{AnimationDirection, AnimationType};

/// Which side of the transition a screen plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenRole {
    Enter,
    Exit,
}

fn translate(x: Length, y: Length) -> StyleFrame {
    StyleFrame {
        translate: Some(Translate { x, y }),
        ..StyleFrame::default()
    }
}

fn scaled(scale: f64, opacity: f64) -> StyleFrame {
    StyleFrame {
        scale: Some(scale),
        opacity: Some(opacity),
        ..StyleFrame::default()
    }
}

fn faded(opacity: f64) -> StyleFrame {
    StyleFrame {
        opacity: Some(opacity),
        ..StyleFrame::default()
    }
}

/// Offset of a sliding screen, as a signed percentage along the slide axis.
fn slide_offset(direction: AnimationDirection, percent: f64) -> StyleFrame {
    match direction {
        AnimationDirection::Left => translate(Length::Vw(-percent), Length::ZERO),
        AnimationDirection::Right => translate(Length::Vw(percent), Length::ZERO),
        AnimationDirection::Up => translate(Length::ZERO, Length::Vh(-percent)),
        AnimationDirection::Down => translate(Length::ZERO, Length::Vh(percent)),
        AnimationDirection::In | AnimationDirection::Out => translate(Length::ZERO, Length::ZERO),
    }
}

fn slide(direction: AnimationDirection, role: ScreenRole, back: bool) -> Vec<Keyframe> {
    let rest = slide_offset(direction, 0.0);
    // Content moves toward `direction`: it enters from the opposite side.
    let (from, to) = match (role, back) {
        (ScreenRole::Enter, false) => (slide_offset(direction, -100.0), rest),
        (ScreenRole::Exit, false) => (rest, slide_offset(direction, 50.0)),
        // Back variants uncover the screen underneath instead of covering it.
        (ScreenRole::Enter, true) => (slide_offset(direction, -50.0), rest),
        (ScreenRole::Exit, true) => (rest, slide_offset(direction, 100.0)),
    };
    vec![Keyframe::new(from), Keyframe::new(to)]
}

fn zoom(direction: AnimationDirection, role: ScreenRole) -> Vec<Keyframe> {
    let zoom_in = !matches!(direction, AnimationDirection::Out);
    let (from, to) = match (role, zoom_in) {
        (ScreenRole::Enter, true) => (scaled(0.85, 0.0), scaled(1.0, 1.0)),
        (ScreenRole::Exit, true) => (scaled(1.0, 1.0), scaled(1.15, 0.0)),
        (ScreenRole::Enter, false) => (scaled(1.15, 0.0), scaled(1.0, 1.0)),
        (ScreenRole::Exit, false) => (scaled(1.0, 1.0), scaled(0.85, 0.0)),
    };
    vec![Keyframe::new(from), Keyframe::new(to)]
}

/// Keyframes for `kind`/`direction` played by a screen in `role`.
///
/// `back` selects the back-navigation variants; callers mirror `direction` through
/// [`AnimationDirection::opposite`] first. A missing direction means `left` for slides and
/// `in` for zooms.
pub fn screen_keyframes(
    kind: AnimationType,
    direction: Option<AnimationDirection>,
    role: ScreenRole,
    back: bool,
) -> Vec<Keyframe> {
    match kind {
        AnimationType::Slide => slide(direction.unwrap_or(AnimationDirection::Left), role, back),
        AnimationType::Zoom => zoom(direction.unwrap_or(AnimationDirection::In), role),
        AnimationType::Fade => match role {
            ScreenRole::Enter => vec![Keyframe::new(faded(0.0)), Keyframe::new(faded(1.0))],
            ScreenRole::Exit => vec![Keyframe::new(faded(1.0)), Keyframe::new(faded(0.0))],
        },
        AnimationType::None => Vec::new(),
    }
}

/// Registry name of a preset, e.g. `slide-back-right-in`.
pub fn preset_name(
    kind: AnimationType,
    direction: Option<AnimationDirection>,
    role: ScreenRole,
    back: bool,
) -> String {
    let suffix = match role {
        ScreenRole::Enter => "in",
        ScreenRole::Exit => "out",
    };
    let kind_name = match kind {
        AnimationType::Slide => "slide",
        AnimationType::Fade => "fade",
        AnimationType::Zoom => "zoom",
        AnimationType::None => return "none".to_string(),
    };
    let direction = match (kind, direction) {
        (AnimationType::Fade, _) => None,
        (AnimationType::Slide, None) => Some(AnimationDirection::Left),
        (AnimationType::Zoom, None) => Some(AnimationDirection::In),
        (_, d) => d,
    };
    let mut name = kind_name.to_string();
    if back && kind == AnimationType::Slide {
        name.push_str("-back");
    }
    if let Some(d) = direction {
        name.push('-');
        name.push_str(match d {
            AnimationDirection::Up => "up",
            AnimationDirection::Down => "down",
            AnimationDirection::Left => "left",
            AnimationDirection::Right => "right",
            AnimationDirection::In => "in",
            AnimationDirection::Out => "out",
        });
    }
    name.push('-');
    name.push_str(suffix);
    name
}

#[cfg(test)]
#[path = "../../tests/unit/animation/presets.rs"]
mod tests;
