//! Settle-once completion handles.
//!
//! A [`Deferred`] is the single-threaded analogue of a promise: it starts pending and settles
//! exactly once, either fulfilled with a value or rejected with a [`RouterError`]. Clones share
//! the same slot, so the producer keeps one handle and hands others out to observers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::foundation::error::RouterError;

/// Observed state of a [`Deferred`].
pub enum Settlement<T> {
    Pending,
    Fulfilled(T),
    Rejected(Rc<RouterError>),
}

impl<T: fmt::Debug> fmt::Debug for Settlement<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Fulfilled(v) => f.debug_tuple("Fulfilled").field(v).finish(),
            Self::Rejected(e) => f.debug_tuple("Rejected").field(&e.to_string()).finish(),
        }
    }
}

/// Shared settle-once slot.
pub struct Deferred<T> {
    slot: Rc<RefCell<Settlement<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deferred").field(&*self.slot.borrow()).finish()
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Settlement::Pending)),
        }
    }

    /// A handle that is already fulfilled.
    pub fn fulfilled(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Settlement::Fulfilled(value))),
        }
    }

    /// Fulfil the slot. Returns `false` (and drops `value`) if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        let mut slot = self.slot.borrow_mut();
        if !matches!(*slot, Settlement::Pending) {
            return false;
        }
        *slot = Settlement::Fulfilled(value);
        true
    }

    /// Reject the slot. Returns `false` if it was already settled.
    pub fn reject(&self, err: RouterError) -> bool {
        let mut slot = self.slot.borrow_mut();
        if !matches!(*slot, Settlement::Pending) {
            return false;
        }
        *slot = Settlement::Rejected(Rc::new(err));
        true
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.slot.borrow(), Settlement::Pending)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(*self.slot.borrow(), Settlement::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(*self.slot.borrow(), Settlement::Rejected(_))
    }

    /// Rejection reason, if rejected.
    pub fn error(&self) -> Option<Rc<RouterError>> {
        match &*self.slot.borrow() {
            Settlement::Rejected(e) => Some(Rc::clone(e)),
            _ => None,
        }
    }

    /// `true` when rejected with [`RouterError::Abort`].
    pub fn is_aborted(&self) -> bool {
        self.error().is_some_and(|e| e.is_abort())
    }

    /// `true` when both handles share one slot.
    pub fn same_slot(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: Clone> Deferred<T> {
    /// Fulfilled value, if fulfilled.
    pub fn value(&self) -> Option<T> {
        match &*self.slot.borrow() {
            Settlement::Fulfilled(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// `None` while pending, otherwise the settled outcome.
    pub fn result(&self) -> Option<Result<T, Rc<RouterError>>> {
        match &*self.slot.borrow() {
            Settlement::Pending => None,
            Settlement::Fulfilled(v) => Some(Ok(v.clone())),
            Settlement::Rejected(e) => Some(Err(Rc::clone(e))),
        }
    }
}

/// Read side of an [`AbortController`].
#[derive(Clone, Debug, Default)]
pub struct AbortSignal {
    reason: Rc<RefCell<Option<String>>>,
}

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.reason.borrow().is_some()
    }

    pub fn reason(&self) -> Option<String> {
        self.reason.borrow().clone()
    }
}

/// Write side of a cancellation token.
#[derive(Debug, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort with `reason`. Only the first call has an effect; returns whether it did.
    pub fn abort(&self, reason: impl Into<String>) -> bool {
        let mut slot = self.signal.reason.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason.into());
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/deferred.rs"]
mod tests;
