use crate::engine::events::TransitionId;
use crate::foundation::deferred::{AbortSignal, Deferred};
use crate::navigation::history::{EntryKey, HistoryEntry};
use crate::navigation::route::Params;

/// How a navigation changes history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
    Push,
    Replace,
    Traverse,
}

/// History mode requested by [`NavigateOptions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    #[default]
    Push,
    Replace,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigateOptions {
    pub params: Params,
    pub history: HistoryMode,
    /// Host state stored on the new entry.
    pub state: Option<serde_json::Value>,
}

impl NavigateOptions {
    pub fn params(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn replace() -> Self {
        Self {
            history: HistoryMode::Replace,
            ..Self::default()
        }
    }
}

/// Caller-side view of one transition.
///
/// `committed` resolves when history is updated, as the transition starts; `finished` after
/// cleanup. `finished` rejects with an abort error when the transition is cancelled or
/// superseded. `committed` rejects only when history never changed.
#[derive(Clone, Debug)]
pub struct TransitionHandle {
    pub id: TransitionId,
    pub committed: Deferred<()>,
    pub finished: Deferred<()>,
    pub signal: AbortSignal,
}

/// History change applied when a transition starts.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HistoryOp {
    Push {
        pathname: String,
        params: Params,
        state: Option<serde_json::Value>,
    },
    Replace {
        pathname: String,
        params: Params,
        state: Option<serde_json::Value>,
    },
    Traverse(EntryKey),
}

/// One navigation in flight.
#[derive(Clone, Debug)]
pub struct Transition {
    pub id: TransitionId,
    /// Entry current when the transition started.
    pub from: HistoryEntry,
    pub navigation_type: NavigationType,
    pub current_index: usize,
    pub entries: Vec<HistoryEntry>,
    pub committed: Deferred<()>,
    pub finished: Deferred<()>,
    pub signal: AbortSignal,
}

impl Transition {
    pub fn handle(&self) -> TransitionHandle {
        TransitionHandle {
            id: self.id,
            committed: self.committed.clone(),
            finished: self.finished.clone(),
            signal: self.signal.clone(),
        }
    }
}
