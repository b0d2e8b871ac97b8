// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll orchestration: one scrollable's delta and fling pipeline.
//!
//! [`ScrollingLogic`] sits between input sources and a [`ScrollableState`].
//! It projects 2D requests onto the configured axis, applies direction
//! reversal, and runs every step through the nested scroll protocol in a fixed
//! order:
//!
//! 1) pre-scroll to the ancestors,
//! 2) local consumption by the state,
//! 3) post-scroll to the ancestors with what is left.
//!
//! Flings follow the same pre, local, post ordering. When an
//! [`OverscrollEffect`] is attached and the state reports no capacity in
//! either direction, the effect wraps both pipelines.
//!
//! All mutation goes through [`ScrollingLogic::scroll`], which opens a session
//! on the state. Sessions are mutually exclusive and ordered by
//! [`MutatePriority`]; see [`MutatorMutex`](crate::MutatorMutex).

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::axis::ScrollAxis;
use crate::clock::FrameClock;
use crate::error::ScrollError;
use crate::fling::{FlingBehavior, FlingScope};
use crate::nested::NestedScrollDispatcher;
use crate::overscroll::OverscrollEffect;
use crate::spring::{SpringSpec, animate_to};
use crate::state::{ScrollScope, ScrollableState};
use crate::types::{MutatePriority, NestedScrollSource, Offset, Orientation, Velocity};

/// Scroll, fling, and overscroll coordination for one scrollable surface.
///
/// Built once per surface and reconfigured in place with
/// [`update`](Self::update). Methods take `&self` so that nested scroll
/// connections can call back into the logic while a session is running.
pub struct ScrollingLogic {
    state: RefCell<Rc<dyn ScrollableState>>,
    axis: Cell<ScrollAxis>,
    overscroll_effect: RefCell<Option<Rc<dyn OverscrollEffect>>>,
    fling_behavior: RefCell<Rc<dyn FlingBehavior>>,
    dispatcher: RefCell<Rc<NestedScrollDispatcher>>,
    latest_scroll_source: Cell<NestedScrollSource>,
}

impl fmt::Debug for ScrollingLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollingLogic")
            .field("axis", &self.axis.get())
            .field("has_overscroll_effect", &self.overscroll_effect.borrow().is_some())
            .field("dispatcher", &self.dispatcher.borrow())
            .field("latest_scroll_source", &self.latest_scroll_source.get())
            .finish_non_exhaustive()
    }
}

impl ScrollingLogic {
    /// Creates the logic for `state`.
    pub fn new(
        state: Rc<dyn ScrollableState>,
        orientation: Orientation,
        overscroll_effect: Option<Rc<dyn OverscrollEffect>>,
        reverse_direction: bool,
        fling_behavior: Rc<dyn FlingBehavior>,
        dispatcher: Rc<NestedScrollDispatcher>,
    ) -> Self {
        Self {
            state: RefCell::new(state),
            axis: Cell::new(ScrollAxis::new(orientation, reverse_direction)),
            overscroll_effect: RefCell::new(overscroll_effect),
            fling_behavior: RefCell::new(fling_behavior),
            dispatcher: RefCell::new(dispatcher),
            latest_scroll_source: Cell::new(NestedScrollSource::UserInput),
        }
    }

    /// The state this logic drives.
    #[must_use]
    pub fn state(&self) -> Rc<dyn ScrollableState> {
        Rc::clone(&self.state.borrow())
    }

    /// Active axis and reversal.
    #[must_use]
    pub fn axis(&self) -> ScrollAxis {
        self.axis.get()
    }

    /// Scroll orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.axis.get().orientation
    }

    /// Returns `true` for vertical scrolling.
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.axis.get().is_vertical()
    }

    /// Whether deltas are negated on their way to the state.
    #[must_use]
    pub fn reverse_direction(&self) -> bool {
        self.axis.get().reverse_direction
    }

    /// The fling behavior used when a gesture ends.
    #[must_use]
    pub fn fling_behavior(&self) -> Rc<dyn FlingBehavior> {
        Rc::clone(&self.fling_behavior.borrow())
    }

    /// The attached overscroll effect, if any.
    #[must_use]
    pub fn overscroll_effect(&self) -> Option<Rc<dyn OverscrollEffect>> {
        self.overscroll_effect.borrow().clone()
    }

    /// The dispatcher used to talk to nested scroll ancestors.
    #[must_use]
    pub fn dispatcher(&self) -> Rc<NestedScrollDispatcher> {
        Rc::clone(&self.dispatcher.borrow())
    }

    /// Source of the most recent [`NestedScrollScope::scroll_by_with_overscroll`]
    /// call.
    #[must_use]
    pub fn latest_scroll_source(&self) -> NestedScrollSource {
        self.latest_scroll_source.get()
    }

    /// Overscroll takes over only when the state cannot move either way.
    fn should_dispatch_overscroll(&self) -> bool {
        let state = self.state();
        !state.can_scroll_forward() && !state.can_scroll_backward()
    }

    /// Runs one step of the pre, local, post pipeline against `scope`.
    ///
    /// Returns the part of `delta` consumed by the ancestors and the state
    /// together, in caller space. A superseded `scope` consumes nothing and
    /// dispatches nothing.
    pub fn perform_scroll(
        &self,
        scope: &mut dyn ScrollScope,
        delta: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        if !scope.is_active() {
            return Offset::ZERO;
        }
        let axis = self.axis();
        let dispatcher = self.dispatcher();

        let consumed_by_pre_scroll = dispatcher.dispatch_pre_scroll(delta, source);
        let available_after_pre_scroll = delta - consumed_by_pre_scroll;

        let single_axis_delta = axis.offset_to_scalar(
            axis.reverse_offset_if_needed(axis.single_axis_offset(available_after_pre_scroll)),
        );
        let consumed_by_self_scroll = axis.reverse_offset_if_needed(
            axis.scalar_to_offset(scope.scroll_by(single_axis_delta)),
        );

        let available_after_scroll = available_after_pre_scroll - consumed_by_self_scroll;
        let consumed_by_post_scroll = dispatcher.dispatch_post_scroll(
            consumed_by_self_scroll,
            available_after_scroll,
            source,
        );
        log::trace!(
            "scroll {delta:?} ({source:?}): pre {consumed_by_pre_scroll:?}, \
             self {consumed_by_self_scroll:?}, post {consumed_by_post_scroll:?}"
        );
        consumed_by_pre_scroll + consumed_by_self_scroll + consumed_by_post_scroll
    }

    /// Consumes `delta` directly on the state, outside any session and
    /// without nested dispatch.
    pub fn dispatch_raw_delta(&self, delta: Offset) -> Offset {
        let axis = self.axis();
        let consumed = self
            .state()
            .dispatch_raw_delta(axis.reverse_if_needed(axis.offset_to_scalar(delta)));
        axis.scalar_to_offset(axis.reverse_if_needed(consumed))
    }

    /// Like [`dispatch_raw_delta`](Self::dispatch_raw_delta), but does nothing
    /// while a session is running on the state.
    pub fn perform_raw_scroll(&self, delta: Offset) -> Offset {
        if self.state().is_scroll_in_progress() {
            Offset::ZERO
        } else {
            self.dispatch_raw_delta(delta)
        }
    }

    /// Whether a new drag should start without waiting for touch slop.
    #[must_use]
    pub fn should_scroll_immediately(&self) -> bool {
        self.state().is_scroll_in_progress()
            || self
                .overscroll_effect()
                .is_some_and(|effect| effect.is_in_progress())
    }

    /// Opens a session at `priority` and runs `block` with nested scroll and
    /// overscroll support.
    ///
    /// Fails with [`ScrollError::Busy`] when a higher-priority session holds the
    /// state. The session is released on every exit path.
    pub fn scroll<R>(
        &self,
        priority: MutatePriority,
        block: impl FnOnce(&mut NestedScrollScope<'_>) -> Result<R, ScrollError>,
    ) -> Result<R, ScrollError> {
        let mut block = Some(block);
        let mut output = None;
        self.state().scroll(priority, &mut |scope| {
            if let Some(block) = block.take() {
                let mut nested = NestedScrollScope { logic: self, scope };
                output = Some(block(&mut nested)?);
            }
            Ok(())
        })?;
        output.ok_or(ScrollError::Cancelled)
    }

    /// Handles the end of a drag or wheel gesture with `initial_velocity`.
    ///
    /// Runs pre-fling, the local fling, and post-fling inside a
    /// [`MutatePriority::Default`] session, wrapped by the overscroll effect when
    /// it applies. Returns the velocity consumed along the way.
    ///
    /// A mouse wheel never starts a fling behavior that declines
    /// [`should_be_triggered_by_mouse_wheel`](FlingBehavior::should_be_triggered_by_mouse_wheel).
    pub fn on_scroll_stopped(
        &self,
        initial_velocity: Velocity,
        is_mouse_wheel: bool,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        if is_mouse_wheel && !self.fling_behavior().should_be_triggered_by_mouse_wheel() {
            log::debug!("mouse wheel stopped, fling behavior is not for mouse wheel");
            return Ok(Velocity::ZERO);
        }
        let available_velocity = self.axis().single_axis_velocity(initial_velocity);
        let dispatcher = self.dispatcher();

        self.scroll(MutatePriority::Default, |scope| {
            let mut consumed = Velocity::ZERO;
            let mut perform_fling = |velocity: Velocity| -> Result<Velocity, ScrollError> {
                let pre_consumed_by_parent =
                    dispatcher.dispatch_pre_fling(velocity, &mut *clock)?;
                let available = velocity - pre_consumed_by_parent;
                let velocity_left = self.do_fling_animation(&mut *scope, available, &mut *clock)?;
                let consumed_post = dispatcher.dispatch_post_fling(
                    available - velocity_left,
                    velocity_left,
                    &mut *clock,
                )?;
                let total_left = velocity_left - consumed_post;
                consumed = velocity - total_left;
                Ok(consumed)
            };
            match self.overscroll_effect() {
                Some(overscroll) if self.should_dispatch_overscroll() => {
                    overscroll.apply_to_fling(available_velocity, &mut perform_fling)?;
                }
                _ => {
                    perform_fling(available_velocity)?;
                }
            }
            Ok(consumed)
        })
    }

    /// Runs the fling behavior from `available` inside an open session.
    ///
    /// Every frame's delta goes through
    /// [`scroll_by_with_overscroll`](NestedScrollScope::scroll_by_with_overscroll)
    /// as a [`NestedScrollSource::SideEffect`], so ancestors and overscroll take
    /// part in the fling. Returns the velocity left, keeping `available`'s cross
    /// axis. A cancelled fling reports its velocity left in caller space.
    pub fn do_fling_animation(
        &self,
        scope: &mut NestedScrollScope<'_>,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        let axis = self.axis();
        let fling_behavior = self.fling_behavior();
        let mut reverse_scope = ReverseScope {
            nested: scope,
            axis,
        };
        let mut fling_scope = FlingScope::new(&mut reverse_scope, clock);
        let initial_velocity = axis.reverse_if_needed(axis.velocity_to_scalar(available));
        let velocity_left = fling_behavior
            .perform_fling(&mut fling_scope, initial_velocity)
            .map_err(|err| match err {
                ScrollError::FlingCancelled { velocity_left } => ScrollError::FlingCancelled {
                    velocity_left: axis.reverse_if_needed(velocity_left),
                },
                other => other,
            })?;
        Ok(axis.with_velocity_component(available, axis.reverse_if_needed(velocity_left)))
    }

    /// Animates a scroll by `offset` for an accessibility request.
    ///
    /// Runs a critically damped spring in a [`MutatePriority::Default`] session,
    /// feeding each frame through the nested pipeline as user input. Returns the
    /// offset actually scrolled.
    pub fn semantics_scroll_by(
        &self,
        offset: Offset,
        clock: &mut dyn FrameClock,
    ) -> Result<Offset, ScrollError> {
        let axis = self.axis();
        let mut previous_value = 0.0;
        self.scroll(MutatePriority::Default, |scope| {
            animate_to(
                &SpringSpec::default(),
                axis.offset_to_scalar(offset),
                clock,
                &mut |current_value| {
                    if !scope.is_active() {
                        return Err(ScrollError::Cancelled);
                    }
                    let delta = current_value - previous_value;
                    let consumed = scope.scroll_by(
                        axis.scalar_to_offset(axis.reverse_if_needed(delta)),
                        NestedScrollSource::UserInput,
                    );
                    previous_value += axis.reverse_if_needed(axis.offset_to_scalar(consumed));
                    Ok(())
                },
            )
        })?;
        Ok(axis.scalar_to_offset(previous_value))
    }

    /// Reconfigures the logic in place.
    ///
    /// Returns `true` when pointer input tracking must be reset: the state,
    /// the orientation, or the reversal changed. Swapping the fling behavior,
    /// the overscroll effect, or the dispatcher does not require a reset.
    pub fn update(
        &self,
        state: Rc<dyn ScrollableState>,
        orientation: Orientation,
        overscroll_effect: Option<Rc<dyn OverscrollEffect>>,
        reverse_direction: bool,
        fling_behavior: Rc<dyn FlingBehavior>,
        dispatcher: Rc<NestedScrollDispatcher>,
    ) -> bool {
        let mut reset_pointer_input_handling = false;
        if !Rc::ptr_eq(&self.state.borrow(), &state) {
            *self.state.borrow_mut() = state;
            reset_pointer_input_handling = true;
        }
        *self.overscroll_effect.borrow_mut() = overscroll_effect;
        let axis = ScrollAxis::new(orientation, reverse_direction);
        if self.axis.get() != axis {
            self.axis.set(axis);
            reset_pointer_input_handling = true;
        }
        *self.fling_behavior.borrow_mut() = fling_behavior;
        *self.dispatcher.borrow_mut() = dispatcher;
        reset_pointer_input_handling
    }
}

/// A running scroll session with nested scroll and overscroll support.
///
/// Handed to the block of [`ScrollingLogic::scroll`]. Once the session is
/// superseded, calls on it are no-ops and reach neither the state nor its
/// ancestors.
pub struct NestedScrollScope<'a> {
    logic: &'a ScrollingLogic,
    scope: &'a mut dyn ScrollScope,
}

impl fmt::Debug for NestedScrollScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedScrollScope")
            .field("is_active", &self.scope.is_active())
            .finish_non_exhaustive()
    }
}

impl NestedScrollScope<'_> {
    /// Runs `offset` through the nested pipeline without overscroll.
    pub fn scroll_by(&mut self, offset: Offset, source: NestedScrollSource) -> Offset {
        self.logic.perform_scroll(&mut *self.scope, offset, source)
    }

    /// Runs `offset` through the nested pipeline, letting the overscroll
    /// effect wrap it when the state has no capacity left.
    pub fn scroll_by_with_overscroll(
        &mut self,
        offset: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        if !self.scope.is_active() {
            return Offset::ZERO;
        }
        let logic = self.logic;
        logic.latest_scroll_source.set(source);
        match logic.overscroll_effect() {
            Some(overscroll) if logic.should_dispatch_overscroll() => {
                let scope = &mut *self.scope;
                overscroll.apply_to_scroll(offset, source, &mut |delta| {
                    logic.perform_scroll(&mut *scope, delta, logic.latest_scroll_source.get())
                })
            }
            _ => logic.perform_scroll(&mut *self.scope, offset, source),
        }
    }

    /// Returns `false` once the session has been superseded.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.scope.is_active()
    }

    /// Waits for the next frame of `clock`.
    ///
    /// Returns [`ScrollError::Cancelled`] if the session was superseded while
    /// waiting.
    pub fn await_frame(&self, clock: &mut dyn FrameClock) -> Result<u64, ScrollError> {
        let now = clock.next_frame();
        if self.scope.is_active() {
            Ok(now)
        } else {
            Err(ScrollError::Cancelled)
        }
    }
}

/// Scalar view of a nested scope for fling behaviors, in state space.
struct ReverseScope<'s, 'a> {
    nested: &'s mut NestedScrollScope<'a>,
    axis: ScrollAxis,
}

impl ScrollScope for ReverseScope<'_, '_> {
    fn scroll_by(&mut self, pixels: f64) -> f64 {
        let axis = self.axis;
        let consumed = self.nested.scroll_by_with_overscroll(
            axis.reverse_offset_if_needed(axis.scalar_to_offset(pixels)),
            NestedScrollSource::SideEffect,
        );
        axis.reverse_if_needed(axis.offset_to_scalar(consumed))
    }

    fn is_active(&self) -> bool {
        self.nested.is_active()
    }
}
