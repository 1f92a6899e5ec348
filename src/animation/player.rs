use crate::animation::effect::AnimationEffect;
use crate::foundation::core::Millis;
use crate::foundation::deferred::Deferred;
use crate::foundation::error::{RouterError, RouterResult};

/// Playback state of an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// One playable effect on a host-driven clock.
///
/// Time only moves in [`Animation::advance`], which the owner calls once per frame with the
/// elapsed milliseconds. Styles are written to the effect's targets whenever time changes.
#[derive(Debug)]
pub struct Animation {
    effect: Box<dyn AnimationEffect>,
    state: PlayState,
    current_time: Option<Millis>,
    playback_rate: f64,
    ready: Deferred<()>,
    finished: Deferred<()>,
}

impl Animation {
    pub fn new(effect: Box<dyn AnimationEffect>) -> Self {
        let playback_rate = effect.timing().playback_rate;
        Self {
            effect,
            state: PlayState::Idle,
            current_time: None,
            playback_rate,
            ready: Deferred::fulfilled(()),
            finished: Deferred::new(),
        }
    }

    pub fn effect(&self) -> &dyn AnimationEffect {
        self.effect.as_ref()
    }

    pub fn effect_mut(&mut self) -> &mut dyn AnimationEffect {
        self.effect.as_mut()
    }

    pub fn play_state(&self) -> PlayState {
        self.state
    }

    pub fn current_time(&self) -> Option<Millis> {
        self.current_time
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn ready(&self) -> Deferred<()> {
        self.ready.clone()
    }

    pub fn finished(&self) -> Deferred<()> {
        self.finished.clone()
    }

    /// End of the effect's active interval plus delays.
    pub fn end_time(&self) -> Millis {
        self.effect.computed_timing(None).end_time
    }

    /// Eased iteration progress at the current time.
    pub fn progress(&self) -> Option<f64> {
        self.effect.computed_timing(self.current_time).progress
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    pub fn play(&mut self) {
        if self.finished.is_settled() {
            self.finished = Deferred::new();
        }
        let end = self.end_time();
        let t = self.current_time;
        if self.playback_rate >= 0.0 {
            if t.is_none_or(|t| t >= end) {
                self.current_time = Some(0.0);
            }
        } else if t.is_none_or(|t| t <= 0.0) {
            self.current_time = Some(end);
        }
        self.state = PlayState::Running;
        self.ready = Deferred::fulfilled(());
        self.effect.apply(self.current_time);
    }

    pub fn pause(&mut self) {
        if self.current_time.is_none() {
            let start = if self.playback_rate >= 0.0 {
                0.0
            } else {
                self.end_time()
            };
            self.current_time = Some(start);
        }
        self.state = PlayState::Paused;
        self.ready = Deferred::fulfilled(());
        self.effect.apply(self.current_time);
    }

    pub fn reverse(&mut self) {
        self.playback_rate = -self.playback_rate;
        self.play();
    }

    /// Seek to the boundary in the current playback direction and settle `finished`.
    pub fn finish(&mut self) -> RouterResult<()> {
        if self.playback_rate == 0.0 {
            return Err(RouterError::invalid_state(
                "cannot finish an animation with zero playback rate",
            ));
        }
        let t = if self.playback_rate > 0.0 {
            self.end_time()
        } else {
            0.0
        };
        self.current_time = Some(t);
        self.effect.apply(self.current_time);
        self.state = PlayState::Finished;
        self.finished.resolve(());
        Ok(())
    }

    /// Drop all effect output and reject `finished` with an abort. No-op when idle.
    pub fn cancel(&mut self) {
        if self.state == PlayState::Idle {
            return;
        }
        self.state = PlayState::Idle;
        self.current_time = None;
        self.effect.apply(None);
        self.finished.reject(RouterError::abort("animation cancelled"));
        self.ready.reject(RouterError::abort("animation cancelled"));
        self.finished = Deferred::new();
    }

    /// Seek, clamped to `[0, end]`. Idle and finished animations become paused.
    pub fn set_current_time(&mut self, t: Millis) {
        let t = t.clamp(0.0, self.end_time());
        self.current_time = Some(t);
        if matches!(self.state, PlayState::Idle | PlayState::Finished) {
            if self.finished.is_settled() {
                self.finished = Deferred::new();
            }
            self.state = PlayState::Paused;
        }
        self.effect.apply(self.current_time);
    }

    /// Slave this animation to an owner's clock: set time and state directly.
    ///
    /// A running animation that already sits on its boundary in the playback direction is
    /// reported as finished.
    pub(crate) fn drive(&mut self, time: Option<Millis>, state: PlayState) {
        let end = self.end_time();
        self.current_time = time.map(|t| t.clamp(0.0, end));
        let reached = self.current_time.is_some_and(|t| {
            (self.playback_rate > 0.0 && t >= end) || (self.playback_rate < 0.0 && t <= 0.0)
        });
        let state = if state == PlayState::Running && reached {
            PlayState::Finished
        } else {
            state
        };
        match state {
            PlayState::Finished => {
                self.finished.resolve(());
            }
            PlayState::Idle => {}
            PlayState::Running | PlayState::Paused => {
                if self.finished.is_settled() {
                    self.finished = Deferred::new();
                }
            }
        }
        self.state = state;
        self.ready = Deferred::fulfilled(());
        self.effect.apply(self.current_time);
    }

    /// Move time forward by `dt` host milliseconds scaled by the playback rate.
    pub fn advance(&mut self, dt: Millis) -> PlayState {
        if self.state != PlayState::Running {
            return self.state;
        }
        let end = self.end_time();
        let t = self.current_time.unwrap_or(0.0) + dt * self.playback_rate;
        let done = (self.playback_rate > 0.0 && t >= end) || (self.playback_rate < 0.0 && t <= 0.0);
        self.current_time = Some(t.clamp(0.0, end));
        self.effect.apply(self.current_time);
        if done {
            self.state = PlayState::Finished;
            self.finished.resolve(());
        }
        self.state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/player.rs"]
mod tests;
