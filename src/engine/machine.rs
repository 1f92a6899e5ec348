//! Transition engine: the navigation state machine.
//!
//! States: `Idle → Preparing → Playing → Committing → Idle`, or `… → Cancelling → Idle`
//! when a transition is aborted. A swipe enters `Scrubbing` instead of `Playing` and moves on
//! to `Playing` when released.
//!
//! Invariants:
//! - At most one transition is in flight; starting another aborts it first.
//! - A transition settles exactly once. Settling takes it out of the engine, so re-entrant
//!   commit or cancel calls find nothing to do.
//! - After settlement the overlay is empty and every shared element original is unhidden.
//! - History changes when a transition starts, and `committed` settles with it. A swipe changes
//!   history when it is released past the threshold.
//! - An aborted transition rolls the visible screen back but keeps its history entry, so a
//!   superseding navigation stacks on top of it. A transition that fails to build leaves
//!   history and the visible screen as they were.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::animation::ease::Ease;
use crate::animation::effect::{AnimationEffect, ParallelEffect};
use crate::animation::group::GroupAnimation;
use crate::animation::keyframes::{KeyframeEffect, StyleTarget};
use crate::animation::presets::{ScreenRole, preset_name, screen_keyframes};
use crate::animation::timing::{EffectTiming, FillMode};
use crate::engine::events::{EventBus, ListenerId, RouterEvent, TransitionId};
use crate::engine::gesture::{self, GestureRegions, GestureSample, GestureSession};
use crate::engine::screen::{Router, ScreenId, ScreenInstance};
use crate::engine::transition::{
    HistoryMode, HistoryOp, NavigateOptions, NavigationType, Transition, TransitionHandle,
};
use crate::foundation::core::{MAX_PROGRESS, Millis, Rect, Size, to_percent};
use crate::foundation::deferred::{AbortController, Deferred};
use crate::foundation::error::{RouterError, RouterResult};
use crate::navigation::config::{
    AnimationContext, AnimationDirection, AnimationType, ScreenAnimation,
};
use crate::navigation::history::{EntryKey, History, HistoryEntry};
use crate::navigation::route::RouteEntry;
use crate::shared::layer::{SharedCleanup, build_shared_transition};
use crate::shared::scene::SharedElementScene;
use crate::shared::surface::TransitionSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    Preparing,
    Playing,
    Scrubbing,
    Committing,
    Cancelling,
}

#[derive(Debug)]
enum Mode {
    Navigation,
    /// `released` is `Some(commit)` once the pointer is up.
    Gesture {
        session: GestureSession,
        released: Option<bool>,
    },
}

#[derive(Debug)]
struct Active {
    transition: Transition,
    controller: AbortController,
    group: GroupAnimation,
    /// Screen visible before the transition.
    from: ScreenId,
    /// Screen visible after a commit.
    to: ScreenId,
    to_was_kept_alive: bool,
    mode: Mode,
    shared: Option<SharedCleanup>,
    progress: Option<f64>,
}

impl Active {
    fn is_gesture(&self) -> bool {
        matches!(self.mode, Mode::Gesture { .. })
    }

    /// Navigation progress. Gestures scrub the forward animation backwards, so theirs is
    /// mirrored.
    fn motion_progress(&self) -> f64 {
        let p = to_percent(self.group.progress().unwrap_or(0.0));
        if self.is_gesture() { MAX_PROGRESS - p } else { p }
    }
}

/// Screen roles of one transition build.
struct Roles {
    exit: ScreenId,
    enter: ScreenId,
    back: bool,
    gesture: bool,
}

/// Owns history, mounted screens, the overlay and at most one in-flight transition.
///
/// The host drives time through [`TransitionEngine::tick`] (or [`TransitionEngine::advance`])
/// once per frame.
#[derive(Debug)]
pub struct TransitionEngine {
    router: Router,
    history: History,
    screens: BTreeMap<ScreenId, ScreenInstance>,
    current: ScreenId,
    surface: TransitionSurface,
    events: EventBus,
    regions: GestureRegions,
    state: EngineState,
    active: Option<Active>,
    viewport: Size,
    clock: Option<Millis>,
    next_screen: u64,
    next_transition: u64,
}

impl TransitionEngine {
    pub fn new(router: Router, initial_path: &str, viewport: Size) -> RouterResult<Self> {
        Self::with_history(router, History::new(initial_path, Default::default()), viewport)
    }

    /// Start from restored history; the current entry's screen is mounted without animation.
    pub fn with_history(router: Router, history: History, viewport: Size) -> RouterResult<Self> {
        let current = history.current().clone();
        let (route, entry) = router
            .resolve(&current.pathname, &current.params)
            .ok_or_else(|| {
                RouterError::invalid_state(format!("no route matches '{}'", current.pathname))
            })?;
        let mut engine = Self {
            router,
            history,
            screens: BTreeMap::new(),
            current: ScreenId(0),
            surface: TransitionSurface::new(),
            events: EventBus::default(),
            regions: GestureRegions::default(),
            state: EngineState::Idle,
            active: None,
            viewport,
            clock: None,
            next_screen: 0,
            next_transition: 0,
        };
        let id = engine.mount(route, entry)?;
        engine.current = id;
        if let Some(inst) = engine.screens.get(&id) {
            let screen = engine.router.definition(inst.route).map(|d| d.screen.clone());
            if let Some(screen) = screen {
                screen.on_enter(&inst.entry);
            }
        }
        Ok(engine)
    }

    pub fn on(
        &mut self,
        listener: impl FnMut(&RouterEvent) -> anyhow::Result<()> + 'static,
    ) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn surface(&self) -> &TransitionSurface {
        &self.surface
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_transition(&self) -> Option<&Transition> {
        self.active.as_ref().map(|a| &a.transition)
    }

    /// Last reported navigation progress of the in-flight transition.
    pub fn progress(&self) -> Option<f64> {
        self.active.as_ref().and_then(|a| a.progress)
    }

    pub fn current_screen(&self) -> Option<&ScreenInstance> {
        self.screens.get(&self.current)
    }

    /// Route entry of the visible screen.
    pub fn current_entry(&self) -> Option<&RouteEntry> {
        self.current_screen().map(|s| &s.entry)
    }

    pub fn previous_entry(&self) -> Option<&HistoryEntry> {
        self.history.previous()
    }

    pub fn screen(&self, id: ScreenId) -> Option<&ScreenInstance> {
        self.screens.get(&id)
    }

    /// Mounted screens, including kept-alive ones, in mount order.
    pub fn screens(&self) -> impl Iterator<Item = &ScreenInstance> {
        self.screens.values()
    }

    pub fn add_gesture_region(&mut self, rect: Rect) -> u64 {
        self.regions.add(rect)
    }

    pub fn remove_gesture_region(&mut self, id: u64) -> bool {
        self.regions.remove(id)
    }

    #[tracing::instrument(level = "debug", skip(self, opts))]
    pub fn navigate(
        &mut self,
        path: &str,
        opts: NavigateOptions,
    ) -> RouterResult<TransitionHandle> {
        let (route, entry) = self
            .router
            .resolve(path, &opts.params)
            .ok_or_else(|| RouterError::invalid_state(format!("no route matches '{path}'")))?;
        self.supersede();

        let replace = opts.history == HistoryMode::Replace;
        self.events.emit(&RouterEvent::Navigate {
            pathname: path.to_string(),
            params: opts.params.clone(),
            replace,
        });
        let pathname = entry.resolved_pathname.clone();
        let params = entry.params.clone();
        let (op, navigation_type) = if replace {
            let op = HistoryOp::Replace {
                pathname,
                params,
                state: opts.state,
            };
            (op, NavigationType::Replace)
        } else {
            let op = HistoryOp::Push {
                pathname,
                params,
                state: opts.state,
            };
            (op, NavigationType::Push)
        };
        self.begin(route, entry, op, navigation_type, false)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn go_back(&mut self) -> RouterResult<TransitionHandle> {
        let key = self
            .history
            .previous()
            .map(|e| e.key)
            .ok_or_else(|| RouterError::invalid_state("cannot go back from the first entry"))?;
        self.traverse_to(key)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn traverse_to(&mut self, key: EntryKey) -> RouterResult<TransitionHandle> {
        let target = self
            .history
            .entry(key)
            .cloned()
            .ok_or_else(|| RouterError::invalid_state(format!("unknown history key {}", key.0)))?;
        if target.key == self.history.current().key {
            return Err(RouterError::invalid_state("already at the requested entry"));
        }
        let (route, entry) = self
            .router
            .resolve(&target.pathname, &target.params)
            .ok_or_else(|| {
                RouterError::invalid_state(format!("no route matches '{}'", target.pathname))
            })?;
        self.supersede();

        let back = target.index < self.history.index();
        if back {
            self.events.emit(&RouterEvent::GoBack { key });
        } else {
            self.events.emit(&RouterEvent::Navigate {
                pathname: target.pathname.clone(),
                params: target.params.clone(),
                replace: false,
            });
        }
        self.begin(
            route,
            entry,
            HistoryOp::Traverse(key),
            NavigationType::Traverse,
            back,
        )
    }

    /// Abort the in-flight transition. Returns `false` when there was none.
    pub fn cancel(&mut self) -> bool {
        self.abort_active("transition cancelled")
    }

    /// Advance to host time `now`. The first call after a transition starts only sets the clock,
    /// so time spent idle is never played.
    pub fn tick(&mut self, now: Millis) {
        let dt = self.clock.map_or(0.0, |prev| (now - prev).max(0.0));
        self.clock = Some(now);
        self.advance(dt);
    }

    /// Advance the in-flight transition by `dt` milliseconds.
    pub fn advance(&mut self, dt: Millis) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.group.advance(dt);
        self.poll();
    }

    /// Begin a swipe-back. Returns whether the swipe engaged.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn swipe_start(&mut self, sample: GestureSample, touches: u32) -> bool {
        if self.state != EngineState::Idle || self.active.is_some() {
            return false;
        }
        let Some(previous) = self.history.previous().cloned() else {
            return false;
        };
        let Some(current) = self.current_entry() else {
            return false;
        };
        let config = self.router.gesture_config(current);
        if !gesture::qualifies(&config, &sample, touches, self.viewport, &self.regions) {
            return false;
        }
        let Some((route, entry)) = self.router.resolve(&previous.pathname, &previous.params)
        else {
            return false;
        };

        self.state = EngineState::Preparing;
        let (transition, controller) = self.new_transition(NavigationType::Traverse);
        let from = self.current;
        let (to, reused) = match self.acquire(route, entry) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "swipe target failed to mount");
                self.state = EngineState::Idle;
                return false;
            }
        };
        let roles = Roles {
            exit: to,
            enter: from,
            back: false,
            gesture: true,
        };
        let (mut group, shared) = match self.build_group(&roles) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "swipe transition failed to build");
                self.release(to, reused);
                self.state = EngineState::Idle;
                return false;
            }
        };
        group.set_playback_rate(-1.0);
        let duration = group.duration();
        group.set_current_time(duration);

        let active = Active {
            transition,
            controller,
            group,
            from,
            to,
            to_was_kept_alive: reused,
            mode: Mode::Gesture {
                session: GestureSession::new(&sample, config, self.viewport),
                released: None,
            },
            shared,
            progress: None,
        };
        self.start(active, EngineState::Scrubbing);
        true
    }

    pub fn swipe_move(&mut self, sample: GestureSample) {
        if self.state != EngineState::Scrubbing {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Mode::Gesture { session, .. } = &mut active.mode else {
            return;
        };
        let swiped = session.update(&sample);
        let duration = active.group.duration();
        active.group.set_current_time((1.0 - swiped) * duration);
        self.emit_progress();
    }

    /// Release the swipe: commit the back navigation or snap back.
    pub fn swipe_end(&mut self, sample: GestureSample) {
        if self.state != EngineState::Scrubbing {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Mode::Gesture { session, released } = &mut active.mode else {
            return;
        };
        session.update(&sample);
        let commit = session.should_commit(sample.velocity);
        let rate = session.release_rate(sample.velocity);
        *released = Some(commit);
        tracing::debug!(
            swiped = session.percent(),
            velocity = sample.velocity,
            commit,
            rate,
            "swipe released"
        );

        let group = &mut active.group;
        group.set_playback_rate(rate);
        let t = group.current_time().unwrap_or(0.0);
        let at_boundary = (rate < 0.0 && t <= 0.0) || (rate > 0.0 && t >= group.duration());
        if at_boundary {
            if let Err(err) = group.finish() {
                tracing::warn!(error = %err, "could not finish released swipe");
            }
        } else {
            group.play();
        }

        let id = active.transition.id;
        let to = active.to;
        let committed = active.transition.committed.clone();
        self.state = EngineState::Playing;
        self.events.emit(&RouterEvent::GestureEnd {
            transition: id,
            committed: commit,
        });
        if commit {
            match self.history.back().map(|e| e.key) {
                Ok(key) => {
                    if let Some(inst) = self.screens.get_mut(&to) {
                        inst.history_key = key;
                    }
                    committed.resolve(());
                    self.events.emit(&RouterEvent::GoBack { key });
                }
                Err(err) => {
                    tracing::warn!(transition = %id, error = %err, "history update failed");
                    self.abort_active(&format!("history update failed: {err}"));
                    return;
                }
            }
        } else {
            committed.reject(RouterError::abort("swipe released below threshold"));
            self.events
                .emit(&RouterEvent::GestureCancel { transition: id });
        }
        self.poll();
    }

    fn new_transition(
        &mut self,
        navigation_type: NavigationType,
    ) -> (Transition, AbortController) {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        let controller = AbortController::new();
        let transition = Transition {
            id,
            from: self.history.current().clone(),
            navigation_type,
            current_index: self.history.index(),
            entries: self.history.entries().to_vec(),
            committed: Deferred::new(),
            finished: Deferred::new(),
            signal: controller.signal(),
        };
        (transition, controller)
    }

    fn supersede(&mut self) {
        if self.active.is_some() {
            self.abort_active("superseded by a new navigation");
        }
    }

    fn begin(
        &mut self,
        route: usize,
        entry: RouteEntry,
        op: HistoryOp,
        navigation_type: NavigationType,
        back: bool,
    ) -> RouterResult<TransitionHandle> {
        self.state = EngineState::Preparing;
        let (transition, controller) = self.new_transition(navigation_type);
        let handle = transition.handle();
        let from = self.current;

        let (to, reused) = match self.acquire(route, entry) {
            Ok(v) => v,
            Err(err) => {
                self.fail(&transition, err);
                return Ok(handle);
            }
        };
        let roles = Roles {
            exit: from,
            enter: to,
            back,
            gesture: false,
        };
        let (mut group, mut shared) = match self.build_group(&roles) {
            Ok(v) => v,
            Err(err) => {
                self.release(to, reused);
                self.fail(&transition, err);
                return Ok(handle);
            }
        };
        if let Err(err) = self.apply_history(&op) {
            if let Some(cleanup) = shared.as_mut() {
                cleanup.run(&mut self.surface);
            }
            self.release(to, reused);
            self.fail(&transition, err);
            return Ok(handle);
        }
        if let Some(inst) = self.screens.get_mut(&to) {
            inst.history_key = self.history.current().key;
        }
        transition.committed.resolve(());
        group.play();

        let active = Active {
            transition,
            controller,
            group,
            from,
            to,
            to_was_kept_alive: reused,
            mode: Mode::Navigation,
            shared,
            progress: None,
        };
        self.start(active, EngineState::Playing);
        Ok(handle)
    }

    fn fail(&mut self, transition: &Transition, err: RouterError) {
        tracing::warn!(transition = %transition.id, error = %err, "transition failed to build");
        self.surface.clear();
        self.surface.close();
        transition
            .committed
            .reject(RouterError::abort(format!("transition failed: {err}")));
        transition.finished.reject(err);
        self.state = EngineState::Idle;
    }

    fn start(&mut self, mut active: Active, state: EngineState) {
        for id in [active.from, active.to] {
            if let Some(inst) = self.screens.get(&id) {
                inst.element.set_animating(true);
                inst.element.set_visible(true);
            }
        }
        if active.shared.is_some() {
            self.surface.open();
        }
        let id = active.transition.id;
        let path = |s: ScreenId| {
            self.screens
                .get(&s)
                .map(|i| i.entry.resolved_pathname.clone())
                .unwrap_or_default()
        };
        let (from, to) = (path(active.from), path(active.to));
        tracing::debug!(transition = %id, %from, %to, "transition started");

        self.events.emit(&RouterEvent::TransitionStart {
            transition: id,
            from,
            to,
        });
        if active.is_gesture() {
            self.events
                .emit(&RouterEvent::GestureStart { transition: id });
        }
        self.events
            .emit(&RouterEvent::MotionProgressStart { transition: id });
        active.progress = Some(0.0);
        self.events.emit(&RouterEvent::MotionProgress {
            transition: id,
            progress: 0.0,
        });
        self.active = Some(active);
        self.state = state;
        self.clock = None;
        self.poll();
    }

    fn emit_progress(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let progress = active.motion_progress();
        if active.progress == Some(progress) {
            return;
        }
        active.progress = Some(progress);
        self.events.emit(&RouterEvent::MotionProgress {
            transition: active.transition.id,
            progress,
        });
    }

    fn poll(&mut self) {
        self.emit_progress();
        let finished = self
            .active
            .as_ref()
            .is_some_and(|a| a.group.finished().is_fulfilled());
        if finished {
            self.commit();
        }
    }

    fn mount(&mut self, route: usize, entry: RouteEntry) -> RouterResult<ScreenId> {
        let def = self
            .router
            .definition(route)
            .ok_or_else(|| RouterError::invalid_state(format!("no route at index {route}")))?;
        let screen = def.screen.clone();
        let id = ScreenId(self.next_screen);
        self.next_screen += 1;

        let scene =
            SharedElementScene::new_handle(format!("{}#{}", entry.resolved_pathname, id.0));
        {
            let mut s = scene.borrow_mut();
            s.keep_alive = entry.config.keep_alive;
            let viewport = self.viewport;
            s.set_screen_rect(move || viewport.to_rect());
        }
        let element = screen.render(&entry, &scene)?;
        tracing::debug!(screen = id.0, path = %entry.resolved_pathname, "screen mounted");
        self.screens.insert(
            id,
            ScreenInstance {
                id,
                route,
                entry,
                history_key: self.history.current().key,
                element,
                scene,
                kept_alive: false,
            },
        );
        Ok(id)
    }

    /// Screen for `entry`: a kept-alive instance with the same pathname, else a fresh mount.
    fn acquire(&mut self, route: usize, entry: RouteEntry) -> RouterResult<(ScreenId, bool)> {
        let reusable = self
            .screens
            .values_mut()
            .find(|s| {
                s.kept_alive
                    && s.route == route
                    && s.entry.resolved_pathname == entry.resolved_pathname
            });
        if let Some(inst) = reusable {
            inst.kept_alive = false;
            inst.entry.set_params(entry.params);
            inst.element.set_visible(true);
            tracing::debug!(screen = inst.id.0, "reusing kept-alive screen");
            return Ok((inst.id, true));
        }
        Ok((self.mount(route, entry)?, false))
    }

    /// Undo [`Self::acquire`] for a transition that did not commit.
    fn release(&mut self, id: ScreenId, reused: bool) {
        if reused {
            if let Some(inst) = self.screens.get_mut(&id) {
                inst.kept_alive = true;
                inst.element.set_animating(false);
                inst.element.clear_style();
                inst.element.set_visible(false);
            }
        } else {
            self.screens.remove(&id);
        }
    }

    fn screen_effect(
        target: Rc<dyn StyleTarget>,
        animation: &ScreenAnimation,
        role: ScreenRole,
        back: bool,
        gesture: bool,
    ) -> RouterResult<KeyframeEffect> {
        match animation {
            ScreenAnimation::Preset(cfg) => {
                let direction = cfg.direction.or(match cfg.kind {
                    AnimationType::Slide => Some(AnimationDirection::Left),
                    AnimationType::Zoom => Some(AnimationDirection::In),
                    AnimationType::Fade | AnimationType::None => None,
                });
                let direction = if back {
                    direction.map(AnimationDirection::opposite)
                } else {
                    direction
                };
                let easing = cfg
                    .easing
                    .unwrap_or(if gesture { Ease::Linear } else { Ease::EaseInOut });
                tracing::trace!(
                    preset = %preset_name(cfg.kind, direction, role, back),
                    duration = cfg.duration,
                    "screen preset"
                );
                KeyframeEffect::new(
                    target,
                    screen_keyframes(cfg.kind, direction, role, back),
                    EffectTiming {
                        duration: cfg.duration,
                        easing,
                        fill: FillMode::Both,
                        ..EffectTiming::default()
                    },
                )
            }
            ScreenAnimation::Keyframes(k) => {
                KeyframeEffect::new(target, k.keyframes.clone(), k.timing)
            }
        }
    }

    /// Build the group animation: exit effect, enter effect and the shared element phase.
    fn build_group(
        &mut self,
        roles: &Roles,
    ) -> RouterResult<(GroupAnimation, Option<SharedCleanup>)> {
        let missing = || RouterError::invalid_state("transition screen is not mounted");
        let exit = self.screens.get(&roles.exit).ok_or_else(missing)?;
        let enter = self.screens.get(&roles.enter).ok_or_else(missing)?;

        // Factories see the navigation direction, not the build direction.
        let (prev, next) = if roles.gesture {
            (&enter.entry, &exit.entry)
        } else {
            (&exit.entry, &enter.entry)
        };
        let ctx = AnimationContext {
            previous_path: prev.resolved_pathname.clone(),
            next_path: next.resolved_pathname.clone(),
            gesture_navigating: roles.gesture,
        };
        let exit_set = self.router.animation_for(&exit.entry, &ctx);
        let enter_set = self.router.animation_for(&enter.entry, &ctx);
        // Back navigation mirrors the forward pair that brought the exiting screen in.
        let (enter_anim, exit_anim) = if roles.back {
            (enter_set.exit, exit_set.enter)
        } else {
            (enter_set.enter, exit_set.exit)
        };

        let exit_effect = Self::screen_effect(
            exit.element.clone(),
            &exit_anim,
            ScreenRole::Exit,
            roles.back,
            roles.gesture,
        )?;
        let enter_effect = Self::screen_effect(
            enter.element.clone(),
            &enter_anim,
            ScreenRole::Enter,
            roles.back,
            roles.gesture,
        )?;
        let duration = exit_effect.timing().end_time().max(enter_effect.timing().end_time());
        let easing = enter_effect.timing().easing;
        let (exit_scene, enter_scene) = (exit.scene.clone(), enter.scene.clone());

        let screens: Vec<Box<dyn AnimationEffect>> =
            vec![Box::new(exit_effect), Box::new(enter_effect)];
        let mut effect = ParallelEffect::new(screens);
        self.surface.clear();
        let shared = build_shared_transition(
            &exit_scene,
            &enter_scene,
            &mut self.surface,
            duration,
            easing,
        )?;
        let cleanup = shared.map(|s| {
            effect.append(Box::new(s.effect));
            s.cleanup
        });
        Ok((GroupAnimation::new(Box::new(effect)), cleanup))
    }

    fn apply_history(&mut self, op: &HistoryOp) -> RouterResult<()> {
        match op {
            HistoryOp::Push {
                pathname,
                params,
                state,
            } => {
                self.history.push(pathname.clone(), params.clone());
                if let Some(state) = state {
                    self.history.set_state(state.clone());
                }
            }
            HistoryOp::Replace {
                pathname,
                params,
                state,
            } => {
                self.history.replace(pathname.clone(), params.clone());
                if let Some(state) = state {
                    self.history.set_state(state.clone());
                }
            }
            HistoryOp::Traverse(key) => {
                self.history.traverse_to(*key)?;
            }
        }
        Ok(())
    }

    /// Settle the in-flight transition after its group finished.
    fn commit(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        self.state = EngineState::Committing;
        let id = active.transition.id;

        let navigated = matches!(
            active.mode,
            Mode::Navigation
                | Mode::Gesture {
                    released: Some(true),
                    ..
                }
        );

        if let Some(cleanup) = active.shared.as_mut() {
            cleanup.run(&mut self.surface);
        }
        self.surface.clear();
        self.surface.close();

        if navigated {
            self.retire(active.from);
            self.settle_screen(active.to);
            if let Some(inst) = self.screens.get(&active.to) {
                let screen = self.router.definition(inst.route).map(|d| d.screen.clone());
                if let Some(screen) = screen {
                    screen.on_enter(&inst.entry);
                }
            }
            self.current = active.to;
        } else {
            self.release(active.to, active.to_was_kept_alive);
            self.settle_screen(active.from);
        }

        tracing::debug!(transition = %id, navigated, "transition committed");
        self.events
            .emit(&RouterEvent::MotionProgressEnd { transition: id });
        self.events
            .emit(&RouterEvent::TransitionEnd { transition: id });
        active.transition.finished.resolve(());
        self.state = EngineState::Idle;
    }

    fn settle_screen(&self, id: ScreenId) {
        if let Some(inst) = self.screens.get(&id) {
            inst.element.set_animating(false);
            inst.element.clear_style();
            inst.element.set_visible(true);
        }
    }

    /// Exit the previously visible screen: keep it alive hidden or unmount it.
    fn retire(&mut self, id: ScreenId) {
        let Some(inst) = self.screens.get_mut(&id) else {
            return;
        };
        if let Some(def) = self.router.definition(inst.route) {
            def.screen.on_exit(&inst.entry);
        }
        inst.element.set_animating(false);
        inst.element.clear_style();
        if inst.entry.config.keep_alive {
            inst.kept_alive = true;
            inst.element.set_visible(false);
            tracing::debug!(screen = id.0, "screen kept alive");
        } else {
            self.screens.remove(&id);
            tracing::debug!(screen = id.0, "screen unmounted");
        }
    }

    fn abort_active(&mut self, reason: &str) -> bool {
        let Some(mut active) = self.active.take() else {
            return false;
        };
        self.state = EngineState::Cancelling;
        let id = active.transition.id;
        active.controller.abort(reason);
        active.group.cancel();

        if let Some(cleanup) = active.shared.as_mut() {
            cleanup.run(&mut self.surface);
        }
        self.surface.clear();
        self.surface.close();
        self.release(active.to, active.to_was_kept_alive);
        self.settle_screen(active.from);

        tracing::debug!(transition = %id, reason, "transition cancelled");
        self.events
            .emit(&RouterEvent::MotionProgressEnd { transition: id });
        self.events.emit(&RouterEvent::TransitionCancel {
            transition: id,
            reason: reason.to_string(),
        });
        if active.is_gesture() {
            self.events
                .emit(&RouterEvent::GestureCancel { transition: id });
        }
        active
            .transition
            .committed
            .reject(RouterError::abort(reason));
        active
            .transition
            .finished
            .reject(RouterError::abort(reason));
        self.state = EngineState::Idle;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/machine.rs"]
mod tests;
