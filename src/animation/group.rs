use crate::animation::effect::AnimationEffect;
use crate::animation::player::{Animation, PlayState};
use crate::foundation::core::Millis;
use crate::foundation::deferred::Deferred;
use crate::foundation::error::{RouterError, RouterResult};

/// Many leaf animations driven as one logical unit on a shared virtual clock.
///
/// Children are composed in parallel: each child's local time is the group time scaled by the
/// child's intrinsic playback rate, clamped to its own end. A child with a negative intrinsic rate
/// runs from its end towards zero. Every playback control fans out to all children, so after any call every child is in
/// the same play state (a child sitting on its own boundary while the group runs reports
/// finished). `ready`/`finished` settle only once all children have.
#[derive(Debug)]
pub struct GroupAnimation {
    children: Vec<Animation>,
    base_rates: Vec<f64>,
    rate: f64,
    time: Option<Millis>,
    state: PlayState,
    ready: Deferred<()>,
    finished: Deferred<()>,
}

impl GroupAnimation {
    pub fn new(effect: Box<dyn AnimationEffect>) -> Self {
        let children: Vec<Animation> = effect
            .into_leaves()
            .into_iter()
            .map(Animation::new)
            .collect();
        let base_rates = children.iter().map(Animation::playback_rate).collect();
        Self {
            children,
            base_rates,
            rate: 1.0,
            time: None,
            state: PlayState::Idle,
            ready: Deferred::fulfilled(()),
            finished: Deferred::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Animation] {
        &self.children
    }

    pub fn ready(&self) -> Deferred<()> {
        self.ready.clone()
    }

    pub fn finished(&self) -> Deferred<()> {
        self.finished.clone()
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }

    pub fn play_state(&self) -> PlayState {
        self.state
    }

    pub fn current_time(&self) -> Option<Millis> {
        self.time
    }

    /// Group duration: the latest child end time on the group clock.
    pub fn duration(&self) -> Millis {
        self.children
            .iter()
            .zip(&self.base_rates)
            .map(|(c, base)| span(c, *base))
            .fold(0.0, f64::max)
    }

    /// Progress of the child with the shortest duration (first one on ties).
    pub fn progress(&self) -> Option<f64> {
        let mut best: Option<&Animation> = None;
        for c in &self.children {
            match best {
                Some(b) if b.effect().timing().duration <= c.effect().timing().duration => {}
                _ => best = Some(c),
            }
        }
        match best {
            Some(c) => c.progress(),
            None => self.time.map(|_| 1.0),
        }
    }

    /// Scale every child's intrinsic rate by `rate`.
    pub fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
        for (c, base) in self.children.iter_mut().zip(&self.base_rates) {
            c.set_playback_rate(base * rate);
        }
    }

    fn sync(&mut self) {
        for (c, base) in self.children.iter_mut().zip(&self.base_rates) {
            let local = self.time.map(|t| local_time(c, *base, t));
            c.drive(local, self.state);
        }
        if self.children.iter().all(|c| c.ready().is_fulfilled()) {
            self.ready.resolve(());
        }
        let all_finished = self.children.iter().all(|c| c.finished().is_fulfilled());
        if self.state == PlayState::Finished && all_finished {
            self.finished.resolve(());
        }
    }

    fn renew(&mut self) {
        if self.finished.is_settled() {
            self.finished = Deferred::new();
        }
        self.ready = Deferred::new();
    }

    /// Play from the current time, rewinding first when already at the boundary in the
    /// playback direction.
    pub fn play(&mut self) {
        self.renew();
        let dur = self.duration();
        if self.rate >= 0.0 {
            if self.time.is_none_or(|t| t >= dur) {
                self.time = Some(0.0);
            }
        } else if self.time.is_none_or(|t| t <= 0.0) {
            self.time = Some(dur);
        }
        self.state = PlayState::Running;
        self.sync();
        self.settle_if_done();
    }

    pub fn pause(&mut self) {
        self.renew();
        if self.time.is_none() {
            self.time = Some(if self.rate >= 0.0 { 0.0 } else { self.duration() });
        }
        self.state = PlayState::Paused;
        self.sync();
    }

    pub fn reverse(&mut self) {
        self.set_playback_rate(-self.rate);
        self.play();
    }

    pub fn finish(&mut self) -> RouterResult<()> {
        if self.rate == 0.0 {
            return Err(RouterError::invalid_state(
                "cannot finish a group with zero playback rate",
            ));
        }
        self.time = Some(if self.rate > 0.0 { self.duration() } else { 0.0 });
        self.state = PlayState::Finished;
        self.sync();
        self.finished.resolve(());
        Ok(())
    }

    /// Cancel every child; `finished` rejects with an abort. Idempotent.
    pub fn cancel(&mut self) {
        if self.state == PlayState::Idle && !self.finished.is_pending() {
            return;
        }
        self.state = PlayState::Idle;
        self.time = None;
        for c in &mut self.children {
            c.cancel();
        }
        self.finished
            .reject(RouterError::abort("group animation cancelled"));
        self.ready.reject(RouterError::abort("group animation cancelled"));
    }

    /// Seek the group clock; children follow at their own rates. Idle and finished groups become paused.
    pub fn set_current_time(&mut self, t: Millis) {
        self.time = Some(t.clamp(0.0, self.duration()));
        if matches!(self.state, PlayState::Idle | PlayState::Finished) {
            self.renew();
            self.state = PlayState::Paused;
        }
        self.sync();
    }

    /// Move the group clock by `dt` host milliseconds scaled by the group rate.
    pub fn advance(&mut self, dt: Millis) -> PlayState {
        if self.state != PlayState::Running {
            return self.state;
        }
        let dur = self.duration();
        let t = self.time.unwrap_or(0.0) + dt * self.rate;
        self.time = Some(t.clamp(0.0, dur));
        self.sync();
        self.settle_if_done();
        self.state
    }

    fn settle_if_done(&mut self) {
        let Some(t) = self.time else {
            return;
        };
        let dur = self.duration();
        let done = (self.rate > 0.0 && t >= dur) || (self.rate < 0.0 && t <= 0.0);
        if self.state == PlayState::Running && done {
            self.state = PlayState::Finished;
            self.sync();
            self.finished.resolve(());
        }
    }
}

/// Length of a child's interval on the group clock.
fn span(child: &Animation, base: f64) -> Millis {
    if base == 0.0 {
        return 0.0;
    }
    child.end_time() / base.abs()
}

fn local_time(child: &Animation, base: f64, t: Millis) -> Millis {
    let end = child.end_time();
    let local = if base >= 0.0 { t * base } else { end + t * base };
    local.clamp(0.0, end)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/group.rs"]
mod tests;
