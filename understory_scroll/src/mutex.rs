// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Priority-based mutual exclusion for scroll sessions.
//!
//! A [`MutatorMutex`] admits one session at a time. Acquiring it with a
//! priority greater than or equal to the active session's priority cancels the
//! active session's [`SessionToken`] and installs the new session immediately.
//! The superseded session keeps running on the stack until it reaches its next
//! suspension point, where it observes the cancelled token and unwinds.
//!
//! Acquiring with a strictly lower priority fails with [`ScrollError::Busy`].
//!
//! ```
//! use understory_scroll::{MutatePriority, MutatorMutex, ScrollError};
//!
//! let mutex = MutatorMutex::new();
//! let fling = mutex.try_acquire(MutatePriority::Default).unwrap();
//!
//! // A drag supersedes the fling.
//! let drag = mutex.try_acquire(MutatePriority::UserInput).unwrap();
//! assert!(fling.token().is_cancelled());
//! assert!(drag.token().is_active());
//!
//! // A new fling cannot interrupt the drag.
//! let err = mutex.try_acquire(MutatePriority::Default).unwrap_err();
//! assert!(matches!(err, ScrollError::Busy { .. }));
//! ```

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use crate::error::ScrollError;
use crate::types::MutatePriority;

/// Cancellation flag shared between a session and the mutex that admitted it.
#[derive(Clone, Debug, Default)]
pub struct SessionToken {
    cancelled: Rc<Cell<bool>>,
}

impl SessionToken {
    /// Creates a fresh, active token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once the session has been superseded.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Returns `true` while the session has not been superseded.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancelled.get()
    }

    /// Marks the session as superseded.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }
}

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    priority: MutatePriority,
    token: SessionToken,
}

/// Mutual exclusion over a scrollable state, ordered by [`MutatePriority`].
#[derive(Debug, Default)]
pub struct MutatorMutex {
    active: RefCell<Option<ActiveSession>>,
    next_id: Cell<u64>,
}

impl MutatorMutex {
    /// Creates an unlocked mutex.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session at `priority`.
    ///
    /// Cancels the active session if its priority is less than or equal to
    /// `priority`; otherwise returns [`ScrollError::Busy`].
    pub fn try_acquire(&self, priority: MutatePriority) -> Result<MutatorGuard<'_>, ScrollError> {
        let mut active = self.active.borrow_mut();
        if let Some(current) = active.as_ref() {
            if priority < current.priority {
                log::debug!(
                    "rejecting {priority:?} scroll session, {:?} session is active",
                    current.priority
                );
                return Err(ScrollError::Busy {
                    active: current.priority,
                    requested: priority,
                });
            }
            log::debug!(
                "{priority:?} scroll session cancels active {:?} session",
                current.priority
            );
            current.token.cancel();
        }
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let token = SessionToken::new();
        *active = Some(ActiveSession {
            id,
            priority,
            token: token.clone(),
        });
        Ok(MutatorGuard {
            mutex: self,
            id,
            token,
        })
    }

    /// Runs `block` inside a session at `priority`.
    ///
    /// The session is released when `block` returns, whatever its outcome.
    pub fn mutate<R>(
        &self,
        priority: MutatePriority,
        block: impl FnOnce(&SessionToken) -> Result<R, ScrollError>,
    ) -> Result<R, ScrollError> {
        let guard = self.try_acquire(priority)?;
        block(guard.token())
    }

    /// Returns `true` while a session holds the mutex.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.active.borrow().is_some()
    }

    /// Priority of the session holding the mutex, if any.
    #[must_use]
    pub fn active_priority(&self) -> Option<MutatePriority> {
        self.active.borrow().as_ref().map(|s| s.priority)
    }
}

/// Ownership of a [`MutatorMutex`] for the duration of one session.
///
/// Dropping the guard unlocks the mutex only if this session still owns it, so
/// a cancelled session that unwinds after its successor started never unlocks
/// the successor.
#[derive(Debug)]
pub struct MutatorGuard<'a> {
    mutex: &'a MutatorMutex,
    id: u64,
    token: SessionToken,
}

impl MutatorGuard<'_> {
    /// Cancellation token of this session.
    #[must_use]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}

impl Drop for MutatorGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.mutex.active.borrow_mut();
        if active.as_ref().is_some_and(|s| s.id == self.id) {
            *active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_is_released_on_drop() {
        let mutex = MutatorMutex::new();
        {
            let _guard = mutex.try_acquire(MutatePriority::Default).unwrap();
            assert!(mutex.is_locked());
            assert_eq!(mutex.active_priority(), Some(MutatePriority::Default));
        }
        assert!(!mutex.is_locked());
    }

    #[test]
    fn equal_priority_supersedes() {
        let mutex = MutatorMutex::new();
        let first = mutex.try_acquire(MutatePriority::UserInput).unwrap();
        let second = mutex.try_acquire(MutatePriority::UserInput).unwrap();
        assert!(first.token().is_cancelled());
        assert!(second.token().is_active());
    }

    #[test]
    fn lower_priority_is_rejected_and_active_session_survives() {
        let mutex = MutatorMutex::new();
        let active = mutex.try_acquire(MutatePriority::UserInput).unwrap();
        let err = mutex.try_acquire(MutatePriority::Default).unwrap_err();
        assert_eq!(
            err,
            ScrollError::Busy {
                active: MutatePriority::UserInput,
                requested: MutatePriority::Default,
            }
        );
        assert!(active.token().is_active());
        assert_eq!(mutex.active_priority(), Some(MutatePriority::UserInput));
    }

    #[test]
    fn superseded_guard_does_not_unlock_successor() {
        let mutex = MutatorMutex::new();
        let first = mutex.try_acquire(MutatePriority::Default).unwrap();
        let second = mutex.try_acquire(MutatePriority::UserInput).unwrap();
        drop(first);
        assert!(mutex.is_locked());
        assert_eq!(mutex.active_priority(), Some(MutatePriority::UserInput));
        drop(second);
        assert!(!mutex.is_locked());
    }

    #[test]
    fn mutate_releases_on_error() {
        let mutex = MutatorMutex::new();
        let result: Result<(), _> =
            mutex.mutate(MutatePriority::Default, |_| Err(ScrollError::Cancelled));
        assert_eq!(result, Err(ScrollError::Cancelled));
        assert!(!mutex.is_locked());
    }

    #[test]
    fn nested_acquire_cancels_outer_before_inner_runs() {
        let mutex = MutatorMutex::new();
        let outer_cancelled_when_inner_ran = mutex
            .mutate(MutatePriority::Default, |outer| {
                mutex.mutate(MutatePriority::UserInput, |_| Ok(outer.is_cancelled()))
            })
            .unwrap();
        assert!(outer_cancelled_when_inner_ran);
        assert!(!mutex.is_locked());
    }
}
