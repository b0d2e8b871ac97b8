// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollable state contracts and two stock implementations.

use core::cell::{Cell, RefCell};
use core::fmt;

use crate::error::ScrollError;
use crate::mutex::{MutatorMutex, SessionToken};
use crate::types::MutatePriority;

/// Capability handed to code running inside a scroll session.
pub trait ScrollScope {
    /// Consumes `pixels` of scroll along the state's axis and returns the part
    /// that was actually consumed.
    fn scroll_by(&mut self, pixels: f64) -> f64;

    /// Returns `false` once the enclosing session has been superseded.
    fn is_active(&self) -> bool {
        true
    }
}

/// The scroll model a scrollable surface drives.
///
/// This is the single source of truth for "can we scroll further" and "are we
/// currently mid-scroll". All mutations go through [`scroll`](Self::scroll),
/// which admits one session at a time.
pub trait ScrollableState {
    /// Runs `block` inside a mutually exclusive session at `priority`.
    ///
    /// Implementations must cancel an active session of lower or equal priority
    /// before calling `block`, reject requests of lower priority with
    /// [`ScrollError::Busy`], and release the session on every exit path.
    fn scroll(
        &self,
        priority: MutatePriority,
        block: &mut dyn FnMut(&mut dyn ScrollScope) -> Result<(), ScrollError>,
    ) -> Result<(), ScrollError>;

    /// Consumes `delta` directly, bypassing sessions.
    fn dispatch_raw_delta(&self, delta: f64) -> f64;

    /// Returns `true` while a session is active.
    fn is_scroll_in_progress(&self) -> bool;

    /// Whether content can move further in the positive direction.
    fn can_scroll_forward(&self) -> bool {
        true
    }

    /// Whether content can move further in the negative direction.
    fn can_scroll_backward(&self) -> bool {
        true
    }
}

/// Session scope that consumes through a callback until its token is cancelled.
struct SessionScope<'a> {
    token: &'a SessionToken,
    consume: &'a dyn Fn(f64) -> f64,
}

impl ScrollScope for SessionScope<'_> {
    fn scroll_by(&mut self, pixels: f64) -> f64 {
        if self.token.is_cancelled() {
            return 0.0;
        }
        (self.consume)(pixels)
    }

    fn is_active(&self) -> bool {
        self.token.is_active()
    }
}

fn run_session(
    mutex: &MutatorMutex,
    priority: MutatePriority,
    consume: &dyn Fn(f64) -> f64,
    block: &mut dyn FnMut(&mut dyn ScrollScope) -> Result<(), ScrollError>,
) -> Result<(), ScrollError> {
    mutex.mutate(priority, |token| {
        let mut scope = SessionScope { token, consume };
        block(&mut scope)
    })
}

/// A [`ScrollableState`] over a delta-consuming callback.
///
/// The callback receives a delta in pixels and returns how much of it was
/// consumed. Capacity queries always report `true`.
pub struct DefaultScrollableState<F> {
    on_delta: RefCell<F>,
    mutex: MutatorMutex,
}

impl<F: FnMut(f64) -> f64> DefaultScrollableState<F> {
    /// Creates a state that forwards every delta to `on_delta`.
    pub fn new(on_delta: F) -> Self {
        Self {
            on_delta: RefCell::new(on_delta),
            mutex: MutatorMutex::new(),
        }
    }

    fn consume(&self, delta: f64) -> f64 {
        (self.on_delta.borrow_mut())(delta)
    }
}

impl<F> fmt::Debug for DefaultScrollableState<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultScrollableState")
            .field("on_delta", &"<callback>")
            .field("mutex", &self.mutex)
            .finish()
    }
}

impl<F: FnMut(f64) -> f64> ScrollableState for DefaultScrollableState<F> {
    fn scroll(
        &self,
        priority: MutatePriority,
        block: &mut dyn FnMut(&mut dyn ScrollScope) -> Result<(), ScrollError>,
    ) -> Result<(), ScrollError> {
        run_session(&self.mutex, priority, &|delta| self.consume(delta), block)
    }

    fn dispatch_raw_delta(&self, delta: f64) -> f64 {
        self.consume(delta)
    }

    fn is_scroll_in_progress(&self) -> bool {
        self.mutex.is_locked()
    }
}

/// A bounded scroll position in `0..=max_value`.
///
/// Deltas are clamped to the bounds and the clamped amount is reported as
/// consumed. Hosts update the bounds after measuring content and viewport.
#[derive(Debug)]
pub struct ScrollState {
    value: Cell<f64>,
    max_value: Cell<f64>,
    mutex: MutatorMutex,
}

impl ScrollState {
    /// Creates a position at `initial` with unbounded maximum.
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            value: Cell::new(initial.max(0.0)),
            max_value: Cell::new(f64::INFINITY),
            mutex: MutatorMutex::new(),
        }
    }

    /// Creates a position at `initial` within `0..=max_value`.
    #[must_use]
    pub fn with_max_value(initial: f64, max_value: f64) -> Self {
        let state = Self::new(initial);
        state.set_max_value(max_value);
        state
    }

    /// Current scroll position in pixels.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Largest reachable scroll position.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.max_value.get()
    }

    /// Sets the largest reachable position, pulling the current value back if it
    /// now overshoots.
    pub fn set_max_value(&self, max_value: f64) {
        let max_value = max_value.max(0.0);
        self.max_value.set(max_value);
        if self.value.get() > max_value {
            self.value.set(max_value);
        }
    }

    /// Jumps to `target`, clamped to the bounds, outside any session.
    pub fn scroll_to(&self, target: f64) {
        self.value.set(target.clamp(0.0, self.max_value.get()));
    }

    fn consume(&self, delta: f64) -> f64 {
        let current = self.value.get();
        let next = (current + delta).clamp(0.0, self.max_value.get());
        self.value.set(next);
        next - current
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollableState for ScrollState {
    fn scroll(
        &self,
        priority: MutatePriority,
        block: &mut dyn FnMut(&mut dyn ScrollScope) -> Result<(), ScrollError>,
    ) -> Result<(), ScrollError> {
        run_session(&self.mutex, priority, &|delta| self.consume(delta), block)
    }

    fn dispatch_raw_delta(&self, delta: f64) -> f64 {
        self.consume(delta)
    }

    fn is_scroll_in_progress(&self) -> bool {
        self.mutex.is_locked()
    }

    fn can_scroll_forward(&self) -> bool {
        self.value.get() < self.max_value.get()
    }

    fn can_scroll_backward(&self) -> bool {
        self.value.get() > 0.0
    }
}
