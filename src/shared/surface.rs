use std::rc::Rc;

use crate::animation::keyframes::StyleTarget;

/// One ghost mounted in the overlay.
#[derive(Clone, Debug)]
pub struct OverlayEntry {
    pub id: String,
    pub target: Rc<dyn StyleTarget>,
    pub will_change: Option<String>,
}

/// Router-owned overlay that hosts shared element ghosts above both screens.
#[derive(Debug, Default)]
pub struct TransitionSurface {
    entries: Vec<OverlayEntry>,
    open: bool,
}

impl TransitionSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn insert(&mut self, entry: OverlayEntry) {
        self.entries.push(entry);
    }

    /// Remove a ghost by id, dropping its styles.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(pos);
        entry.target.clear_style();
        true
    }

    /// Remove every ghost; returns how many were mounted.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        for e in self.entries.drain(..) {
            e.target.clear_style();
        }
        n
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[OverlayEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
