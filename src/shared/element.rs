use std::fmt;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::animation::keyframes::{StyleFrame, StyleTarget};
use crate::foundation::core::{Millis, Rect};

/// How a matched pair animates between its two positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    #[default]
    Morph,
    Fade,
    FadeThrough,
    CrossFade,
}

impl TransitionKind {
    /// Kind for a pair: the incoming node's explicit choice, then the outgoing node's, then
    /// morph.
    pub fn resolve(incoming: Option<Self>, outgoing: Option<Self>) -> Self {
        incoming.or(outgoing).unwrap_or_default()
    }
}

/// Per-node shared element settings.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SharedElementConfig {
    #[serde(rename = "type")]
    pub kind: Option<TransitionKind>,
    pub transform_origin: Option<String>,
    pub easing: Option<Ease>,
    pub duration: Option<Millis>,
    pub delay: Option<Millis>,
    pub will_change: Option<String>,
    pub disabled: bool,
}

/// Host handle of a mounted shared element.
pub trait SharedElementHandle: fmt::Debug {
    /// Layout box in viewport coordinates; `None` once the element is detached.
    fn bounding_rect(&self) -> Option<Rect>;
    /// Deep copy suitable for the overlay; `None` once the element is detached.
    fn clone_node(&self) -> Option<Rc<dyn StyleTarget>>;
    fn set_hidden(&self, hidden: bool);
    fn is_hidden(&self) -> bool;
    /// Explicitly declared animatable styles (e.g. border radius) carried into morphs.
    fn declared_style(&self) -> StyleFrame {
        StyleFrame::default()
    }
}

#[derive(Clone, Debug)]
pub struct SharedElementNode {
    pub id: String,
    pub handle: Rc<dyn SharedElementHandle>,
    pub config: SharedElementConfig,
}

impl SharedElementNode {
    pub fn new(
        id: impl Into<String>,
        handle: Rc<dyn SharedElementHandle>,
        config: SharedElementConfig,
    ) -> Self {
        Self {
            id: id.into(),
            handle,
            config,
        }
    }
}
