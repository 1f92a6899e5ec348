//! Lifecycle events and their listener registry.

use std::fmt;

use crate::navigation::history::EntryKey;
use crate::navigation::route::Params;

/// Identity of one transition, unique per engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct TransitionId(pub u64);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events emitted by the engine, in the order they happen.
///
/// Every transition produces `TransitionStart`, `MotionProgressStart`, one or more
/// `MotionProgress` (first value 0), `MotionProgressEnd`, then exactly one of
/// `TransitionEnd` / `TransitionCancel`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RouterEvent {
    TransitionStart {
        transition: TransitionId,
        from: String,
        to: String,
    },
    TransitionEnd {
        transition: TransitionId,
    },
    TransitionCancel {
        transition: TransitionId,
        reason: String,
    },
    MotionProgressStart {
        transition: TransitionId,
    },
    /// Navigation progress in `[0, 100]`.
    MotionProgress {
        transition: TransitionId,
        progress: f64,
    },
    MotionProgressEnd {
        transition: TransitionId,
    },
    Navigate {
        pathname: String,
        params: Params,
        replace: bool,
    },
    GoBack {
        key: EntryKey,
    },
    GestureStart {
        transition: TransitionId,
    },
    GestureEnd {
        transition: TransitionId,
        committed: bool,
    },
    GestureCancel {
        transition: TransitionId,
    },
}

impl RouterEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransitionStart { .. } => "transition-start",
            Self::TransitionEnd { .. } => "transition-end",
            Self::TransitionCancel { .. } => "transition-cancel",
            Self::MotionProgressStart { .. } => "motion-progress-start",
            Self::MotionProgress { .. } => "motion-progress",
            Self::MotionProgressEnd { .. } => "motion-progress-end",
            Self::Navigate { .. } => "navigate",
            Self::GoBack { .. } => "go-back",
            Self::GestureStart { .. } => "gesture-start",
            Self::GestureEnd { .. } => "gesture-end",
            Self::GestureCancel { .. } => "gesture-cancel",
        }
    }

    pub fn transition(&self) -> Option<TransitionId> {
        match self {
            Self::TransitionStart { transition, .. }
            | Self::TransitionEnd { transition }
            | Self::TransitionCancel { transition, .. }
            | Self::MotionProgressStart { transition }
            | Self::MotionProgress { transition, .. }
            | Self::MotionProgressEnd { transition }
            | Self::GestureStart { transition }
            | Self::GestureEnd { transition, .. }
            | Self::GestureCancel { transition } => Some(*transition),
            Self::Navigate { .. } | Self::GoBack { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&RouterEvent) -> anyhow::Result<()>>;

/// Listener registry. A failing listener is logged and never stops delivery to the others.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&RouterEvent) -> anyhow::Result<()> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &RouterEvent) {
        tracing::trace!(event = event.name(), "emit");
        for (id, listener) in &mut self.listeners {
            if let Err(err) = listener(event) {
                tracing::warn!(
                    listener = id.0,
                    event = event.name(),
                    error = %err,
                    "listener failed"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/events.rs"]
mod tests;
