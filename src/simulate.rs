//! JSON-scripted simulation over headless screens.
//!
//! A [`Script`] declares a route table, shared elements per route and a list of [`Step`]s
//! (navigations, frame advances, swipe samples). [`Script::run`] replays it against a
//! [`TransitionEngine`] and returns the event log plus the final history.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::animation::keyframes::StyleFrame;
use crate::engine::events::RouterEvent;
use crate::engine::gesture::GestureSample;
use crate::engine::machine::{EngineState, TransitionEngine};
use crate::engine::screen::Router;
use crate::engine::transition::{HistoryMode, NavigateOptions};
use crate::foundation::core::{Millis, Rect, Size};
use crate::foundation::error::{RouterError, RouterResult};
use crate::headless::{HeadlessScreen, SharedDeclaration};
use crate::navigation::config::{RouteConfig, RouterConfig, SwipeDirection};
use crate::navigation::history::{EntryKey, HistorySnapshot};
use crate::navigation::route::Params;
use crate::shared::element::SharedElementConfig;

/// Upper bound on frames a single `run` step may advance.
const MAX_RUN_FRAMES: usize = 100_000;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: Size,
    #[serde(default)]
    pub config: RouterConfig,
    #[serde(default = "default_initial")]
    pub initial: String,
    pub routes: Vec<ScriptRoute>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_viewport() -> Size {
    Size::new(390.0, 844.0)
}

fn default_initial() -> String {
    "/".to_string()
}

/// One route; a missing `pattern` registers the fallback.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ScriptRoute {
    #[serde(default)]
    pub pattern: Option<String>,
    pub name: String,
    #[serde(default)]
    pub config: RouteConfig,
    #[serde(default)]
    pub shared: Vec<ScriptShared>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct ScriptShared {
    pub id: String,
    pub rect: Rect,
    #[serde(default)]
    pub config: SharedElementConfig,
    #[serde(default)]
    pub style: StyleFrame,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Navigate {
        path: String,
        #[serde(default)]
        params: Params,
        #[serde(default)]
        replace: bool,
        #[serde(default)]
        state: Option<serde_json::Value>,
    },
    Back,
    Traverse {
        key: EntryKey,
    },
    Cancel,
    /// Advance the clock by `ms`.
    Advance {
        ms: Millis,
    },
    /// Advance in `frame_ms` steps until no transition is in flight.
    Run {
        #[serde(default = "default_frame")]
        frame_ms: Millis,
    },
    SwipeStart {
        x: f64,
        y: f64,
        #[serde(default)]
        direction: SwipeDirection,
        #[serde(default = "default_touches")]
        touches: u32,
    },
    SwipeMove {
        x: f64,
        y: f64,
        #[serde(default)]
        direction: SwipeDirection,
    },
    SwipeEnd {
        x: f64,
        y: f64,
        #[serde(default)]
        direction: SwipeDirection,
        /// px/s along the swipe direction.
        #[serde(default)]
        velocity: f64,
    },
}

fn default_frame() -> Millis {
    1000.0 / 60.0
}

fn default_touches() -> u32 {
    1
}

/// Result of a script run.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Report {
    pub events: Vec<RouterEvent>,
    pub history: HistorySnapshot,
    pub state: EngineState,
    /// Swipe starts that did not engage.
    pub ignored_swipes: usize,
}

impl Script {
    pub fn from_json_str(s: &str) -> RouterResult<Self> {
        let script: Self = serde_json::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> RouterResult<()> {
        if self.routes.is_empty() {
            return Err(RouterError::config("script declares no routes"));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(RouterError::config("viewport must have a positive size"));
        }
        self.config.validate()?;
        for step in &self.steps {
            match step {
                Step::Advance { ms } if !ms.is_finite() || *ms < 0.0 => {
                    return Err(RouterError::config("advance step needs ms >= 0"));
                }
                Step::Run { frame_ms } if !frame_ms.is_finite() || *frame_ms <= 0.0 => {
                    return Err(RouterError::config("run step needs frame_ms > 0"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Build the engine; returned screens are keyed by route name.
    pub fn build(&self) -> RouterResult<(TransitionEngine, BTreeMap<String, Rc<HeadlessScreen>>)> {
        let mut router = Router::new(self.config.clone());
        let mut screens = BTreeMap::new();
        for route in &self.routes {
            let screen = route.shared.iter().fold(HeadlessScreen::new(&route.name), |s, d| {
                s.declare(SharedDeclaration {
                    id: d.id.clone(),
                    rect: d.rect,
                    config: d.config.clone(),
                    declared: d.style.clone(),
                })
            });
            let screen = Rc::new(screen);
            match &route.pattern {
                Some(p) => router.add_route(p, screen.clone(), route.config.clone())?,
                None => router.set_fallback(screen.clone(), route.config.clone())?,
            };
            screens.insert(route.name.clone(), screen);
        }
        let engine = TransitionEngine::new(router, &self.initial, self.viewport)?;
        Ok((engine, screens))
    }

    #[tracing::instrument(level = "debug", skip(self), fields(steps = self.steps.len()))]
    pub fn run(&self) -> RouterResult<Report> {
        let (mut engine, _screens) = self.build()?;
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = log.clone();
        engine.on(move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });

        let mut ignored_swipes = 0;
        for (i, step) in self.steps.iter().enumerate() {
            tracing::debug!(step = i, ?step, "replaying step");
            match step {
                Step::Navigate {
                    path,
                    params,
                    replace,
                    state,
                } => {
                    let opts = NavigateOptions {
                        params: params.clone(),
                        history: if *replace {
                            HistoryMode::Replace
                        } else {
                            HistoryMode::Push
                        },
                        state: state.clone(),
                    };
                    engine.navigate(path, opts)?;
                }
                Step::Back => {
                    engine.go_back()?;
                }
                Step::Traverse { key } => {
                    engine.traverse_to(*key)?;
                }
                Step::Cancel => {
                    engine.cancel();
                }
                Step::Advance { ms } => engine.advance(*ms),
                Step::Run { frame_ms } => {
                    let mut frames = 0;
                    while engine.is_transitioning() {
                        if frames == MAX_RUN_FRAMES {
                            return Err(RouterError::invalid_state(format!(
                                "step {i}: transition still running after {frames} frames"
                            )));
                        }
                        engine.advance(*frame_ms);
                        frames += 1;
                    }
                }
                Step::SwipeStart {
                    x,
                    y,
                    direction,
                    touches,
                } => {
                    let sample = GestureSample::new(*x, *y, *direction, 0.0);
                    if !engine.swipe_start(sample, *touches) {
                        tracing::info!(step = i, "swipe did not engage");
                        ignored_swipes += 1;
                    }
                }
                Step::SwipeMove { x, y, direction } => {
                    engine.swipe_move(GestureSample::new(*x, *y, *direction, 0.0));
                }
                Step::SwipeEnd {
                    x,
                    y,
                    direction,
                    velocity,
                } => {
                    engine.swipe_end(GestureSample::new(*x, *y, *direction, *velocity));
                }
            }
        }

        let events = log.borrow().clone();
        Ok(Report {
            events,
            history: engine.history().snapshot(),
            state: engine.state(),
            ignored_swipes,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/simulate.rs"]
mod tests;
