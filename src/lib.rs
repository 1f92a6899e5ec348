//! motion-router is a view-transition and navigation engine.
//!
//! It keeps a URL-driven screen stack and choreographs every route change as one group
//! animation: the exiting screen's effect, the entering screen's effect and, when both screens
//! declare shared elements with the same id, ghost copies that morph between the two layouts.
//!
//! - Describe routes with a [`Router`] of [`Screen`]s
//! - Drive a [`TransitionEngine`] with navigations, swipe samples and frame ticks
//! - Observe [`RouterEvent`]s; await [`TransitionHandle`]s
//! - Replay JSON navigation scripts headlessly with [`simulate::Script`]
//!
//! The host platform is reached only through capability traits ([`StyleTarget`],
//! [`ScreenElement`], [`SharedElementHandle`]); [`headless`] implements them in memory.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod engine;
pub mod headless;
pub mod navigation;
pub mod shared;
pub mod simulate;

pub use crate::foundation::core::{
    Length, MAX_PROGRESS, MIN_PROGRESS, Millis, Point, Rect, Size, Vec2,
};
pub use crate::foundation::deferred::{AbortController, AbortSignal, Deferred, Settlement};
pub use crate::foundation::error::{RouterError, RouterResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::group::GroupAnimation;
pub use crate::animation::keyframes::{Keyframe, StyleFrame, StyleTarget, Translate};
pub use crate::animation::player::{Animation, PlayState};
pub use crate::engine::events::{ListenerId, RouterEvent, TransitionId};
pub use crate::engine::gesture::GestureSample;
pub use crate::engine::machine::{EngineState, TransitionEngine};
pub use crate::engine::screen::{Router, Screen, ScreenElement, ScreenId, ScreenInstance};
pub use crate::engine::transition::{
    HistoryMode, NavigateOptions, NavigationType, Transition, TransitionHandle,
};
pub use crate::navigation::config::{
    AnimationConfig, AnimationDirection, AnimationSpec, AnimationType, AnimationValue,
    GestureConfig, RouteConfig, RouterConfig, SwipeDirection,
};
pub use crate::navigation::history::{EntryKey, History, HistoryEntry};
pub use crate::navigation::route::{Params, RouteEntry};
pub use crate::shared::element::{SharedElementConfig, SharedElementHandle, TransitionKind};
pub use crate::shared::surface::TransitionSurface;
