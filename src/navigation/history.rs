//! Navigation history: an ordered entry list with a current-index pointer.
//!
//! Invariants:
//! - Keys are allocated monotonically and never reused within one [`History`], including
//!   across [`History::restore`].
//! - `index < entries.len()` at all times; there is always a current entry.
//! - A push discards every entry after the current one before appending.
//!
//! Persistence only happens at explicit points: [`History::snapshot`] and
//! [`History::restore`].

use crate::foundation::error::{RouterError, RouterResult};
use crate::navigation::route::Params;

/// Unique identity of one history entry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EntryKey(pub u64);

/// One navigable location.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub key: EntryKey,
    pub index: usize,
    pub pathname: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub state: serde_json::Value,
}

/// Serializable history state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistorySnapshot {
    pub entries: Vec<HistoryEntry>,
    pub index: usize,
    pub next_key: u64,
}

#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    next_key: u64,
}

impl History {
    pub fn new(pathname: impl Into<String>, params: Params) -> Self {
        let mut h = Self {
            entries: Vec::new(),
            index: 0,
            next_key: 0,
        };
        let entry = h.make_entry(pathname.into(), params, 0);
        h.entries.push(entry);
        h
    }

    fn make_entry(&mut self, pathname: String, params: Params, index: usize) -> HistoryEntry {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        HistoryEntry {
            key,
            index,
            pathname,
            params,
            state: serde_json::Value::Null,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn previous(&self) -> Option<&HistoryEntry> {
        self.index.checked_sub(1).map(|i| &self.entries[i])
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn entry(&self, key: EntryKey) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Append a new entry after the current one, discarding any forward entries.
    pub fn push(&mut self, pathname: impl Into<String>, params: Params) -> &HistoryEntry {
        self.entries.truncate(self.index + 1);
        let index = self.entries.len();
        let entry = self.make_entry(pathname.into(), params, index);
        self.entries.push(entry);
        self.index = index;
        &self.entries[index]
    }

    /// Replace the current entry with a freshly keyed one.
    pub fn replace(&mut self, pathname: impl Into<String>, params: Params) -> &HistoryEntry {
        let index = self.index;
        let entry = self.make_entry(pathname.into(), params, index);
        self.entries[index] = entry;
        &self.entries[index]
    }

    /// Move the current pointer to the entry with `key`.
    pub fn traverse_to(&mut self, key: EntryKey) -> RouterResult<&HistoryEntry> {
        let Some(pos) = self.entries.iter().position(|e| e.key == key) else {
            return Err(RouterError::invalid_state(format!(
                "no history entry with key {}",
                key.0
            )));
        };
        self.index = pos;
        Ok(&self.entries[pos])
    }

    pub fn back(&mut self) -> RouterResult<&HistoryEntry> {
        let Some(prev) = self.index.checked_sub(1) else {
            return Err(RouterError::invalid_state(
                "cannot go back from the first history entry",
            ));
        };
        self.index = prev;
        Ok(&self.entries[prev])
    }

    /// Attach host state to the current entry.
    pub fn set_state(&mut self, state: serde_json::Value) {
        let index = self.index;
        self.entries[index].state = state;
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            entries: self.entries.clone(),
            index: self.index,
            next_key: self.next_key,
        }
    }

    pub fn restore(snapshot: HistorySnapshot) -> RouterResult<Self> {
        let HistorySnapshot {
            mut entries,
            index,
            next_key,
        } = snapshot;
        if entries.is_empty() {
            return Err(RouterError::serde("history snapshot has no entries"));
        }
        if index >= entries.len() {
            return Err(RouterError::serde("history snapshot index out of range"));
        }
        let max_key = entries.iter().map(|e| e.key.0).max().unwrap_or(0);
        for (i, e) in entries.iter_mut().enumerate() {
            e.index = i;
        }
        Ok(Self {
            entries,
            index,
            next_key: next_key.max(max_key + 1),
        })
    }

    pub fn to_json(&self) -> RouterResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn from_json(s: &str) -> RouterResult<Self> {
        Self::restore(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/history.rs"]
mod tests;
