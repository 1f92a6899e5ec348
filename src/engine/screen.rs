//! Screen capability and router composition.

use std::fmt;
use std::rc::Rc;

use crate::animation::keyframes::StyleTarget;
use crate::foundation::error::{RouterError, RouterResult};
use crate::navigation::config::{
    AnimationConfigSet, AnimationContext, GestureConfig, RouteConfig, RouterConfig,
};
use crate::navigation::history::EntryKey;
use crate::navigation::route::{Params, RouteEntry, RoutePattern, parse_query, split_query};
use crate::shared::scene::SceneHandle;

/// Root element of a mounted screen.
pub trait ScreenElement: StyleTarget {
    /// Toggle the in-transition mode (compositor hints on, pointer events off).
    fn set_animating(&self, animating: bool);
    /// Kept-alive screens stay mounted but hidden.
    fn set_visible(&self, visible: bool);
}

/// A routable screen.
pub trait Screen: fmt::Debug {
    /// Mount the screen for `entry` and register its shared elements in `scene`.
    fn render(
        &self,
        entry: &RouteEntry,
        scene: &SceneHandle,
    ) -> RouterResult<Rc<dyn ScreenElement>>;

    /// Called once the screen has become the current one.
    fn on_enter(&self, _entry: &RouteEntry) {}

    /// Called once the screen stopped being the current one.
    fn on_exit(&self, _entry: &RouteEntry) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ScreenId(pub u64);

/// A mounted screen.
#[derive(Debug)]
pub struct ScreenInstance {
    pub id: ScreenId,
    /// Index of the route definition that produced it.
    pub route: usize,
    pub entry: RouteEntry,
    pub history_key: EntryKey,
    pub element: Rc<dyn ScreenElement>,
    pub scene: SceneHandle,
    /// Retained off-screen after exiting.
    pub kept_alive: bool,
}

#[derive(Debug)]
pub struct RouteDefinition {
    /// `None` marks the fallback route.
    pub pattern: Option<RoutePattern>,
    pub screen: Rc<dyn Screen>,
    pub config: RouteConfig,
}

/// Ordered route table plus router-wide defaults.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<RouteDefinition>,
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            routes: Vec::new(),
            config,
        }
    }

    pub fn add_route(
        &mut self,
        pattern: &str,
        screen: Rc<dyn Screen>,
        config: RouteConfig,
    ) -> RouterResult<&mut Self> {
        config.validate()?;
        self.routes.push(RouteDefinition {
            pattern: Some(RoutePattern::parse(pattern)?),
            screen,
            config,
        });
        Ok(self)
    }

    /// Screen used when no pattern matches.
    pub fn set_fallback(
        &mut self,
        screen: Rc<dyn Screen>,
        config: RouteConfig,
    ) -> RouterResult<&mut Self> {
        config.validate()?;
        if self.routes.iter().any(|r| r.pattern.is_none()) {
            return Err(RouterError::config("a fallback route is already registered"));
        }
        self.routes.push(RouteDefinition {
            pattern: None,
            screen,
            config,
        });
        Ok(self)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn definition(&self, index: usize) -> Option<&RouteDefinition> {
        self.routes.get(index)
    }

    /// Match `pathname` against the table in declaration order, falling back to the
    /// catch-all route. Params merge path captures, then query values, then `params`.
    pub fn resolve(&self, pathname: &str, params: &Params) -> Option<(usize, RouteEntry)> {
        let (path, query) = split_query(pathname);
        let (index, captures) = self
            .routes
            .iter()
            .enumerate()
            .find_map(|(i, r)| r.pattern.as_ref()?.matches(path).map(|c| (i, c)))
            .or_else(|| {
                self.routes
                    .iter()
                    .position(|r| r.pattern.is_none())
                    .map(|i| (i, Params::new()))
            })?;
        let def = &self.routes[index];
        let mut entry = RouteEntry {
            pattern: def.pattern.as_ref().map(|p| p.as_str().to_string()),
            resolved_pathname: path.to_string(),
            params: captures,
            config: def.config.clone(),
        };
        if let Some(q) = query {
            entry.set_params(parse_query(q));
        }
        entry.set_params(params.clone());
        Some((index, entry))
    }

    /// Gesture settings in effect while `entry` is current.
    pub fn gesture_config(&self, entry: &RouteEntry) -> GestureConfig {
        self.config.gesture.with_overrides(&entry.config.gesture)
    }

    /// Animation pair for `entry`: its own config, else the router default.
    pub fn animation_for(&self, entry: &RouteEntry, ctx: &AnimationContext) -> AnimationConfigSet {
        entry
            .config
            .animation
            .as_ref()
            .unwrap_or(&self.config.animation)
            .resolve(ctx)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/screen.rs"]
mod tests;
