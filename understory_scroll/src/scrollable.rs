// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrollable surface: input sources wired into [`ScrollingLogic`].
//!
//! [`Scrollable`] owns the logic for one surface together with its place in the
//! nested scroll chain. Hosts feed it already recognized input:
//!
//! - drags as a stream of pointer deltas, then the release velocity,
//! - mouse wheel deltas in pixels (converted from platform units by the host),
//! - page up and page down key presses,
//! - accessibility scroll requests.
//!
//! Every source funnels into a session on the state, so a new drag cancels a
//! running fling and a fling cannot interrupt a drag.
//!
//! ```
//! use std::rc::Rc;
//! use understory_scroll::{
//!     FixedStepClock, Offset, ScrollState, Scrollable, ScrollableConfig, Velocity,
//! };
//!
//! let state = Rc::new(ScrollState::with_max_value(0.0, 2000.0));
//! let list = Scrollable::new(state.clone(), ScrollableConfig::default());
//!
//! let consumed = list.drag([Offset::new(3.0, 40.0), Offset::new(0.0, 60.0)]).unwrap();
//! assert_eq!(consumed, Offset::new(0.0, 100.0));
//! assert_eq!(state.value(), 100.0);
//!
//! list.on_drag_stopped(Velocity::new(0.0, 1500.0), &mut FixedStepClock::default()).unwrap();
//! assert!(state.value() > 100.0);
//! ```

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Size;

use crate::clock::FrameClock;
use crate::decay::Density;
use crate::error::ScrollError;
use crate::fling::{DefaultFlingBehavior, FlingBehavior};
use crate::logic::ScrollingLogic;
use crate::nested::{NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode};
use crate::overscroll::OverscrollEffect;
use crate::state::ScrollableState;
use crate::types::{
    LayoutDirection, MutatePriority, NestedScrollSource, Offset, Orientation, Velocity,
};

/// Drag lifecycle reported to an [`InteractionSource`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// A drag session started.
    DragStart,
    /// The drag ended normally.
    DragStop,
    /// The drag was superseded or rejected.
    DragCancel,
}

/// Sink for press and drag state, for example to drive a scrollbar's visibility.
pub trait InteractionSource {
    /// Records `interaction`.
    fn emit(&self, interaction: Interaction);
}

/// Keys that page a scrollable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PageKey {
    /// Moves one viewport toward the start.
    PageUp,
    /// Moves one viewport toward the end.
    PageDown,
}

/// Configuration of a [`Scrollable`].
#[derive(Clone)]
pub struct ScrollableConfig {
    /// Axis of motion.
    pub orientation: Orientation,
    /// Disabled scrollables ignore input and do not take part in nested scroll.
    pub enabled: bool,
    /// Negate deltas on the way to the state.
    ///
    /// See [`ScrollableDefaults::reverse_direction`] for the usual value.
    pub reverse_direction: bool,
    /// Fling used when a gesture ends. `None` uses the platform decay.
    pub fling_behavior: Option<Rc<dyn FlingBehavior>>,
    /// Overscroll visual, if any.
    pub overscroll_effect: Option<Rc<dyn OverscrollEffect>>,
    /// Receives drag lifecycle events.
    pub interaction_source: Option<Rc<dyn InteractionSource>>,
}

impl fmt::Debug for ScrollableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollableConfig")
            .field("orientation", &self.orientation)
            .field("enabled", &self.enabled)
            .field("reverse_direction", &self.reverse_direction)
            .field("fling_behavior", &self.fling_behavior.is_some())
            .field("overscroll_effect", &self.overscroll_effect.is_some())
            .field("interaction_source", &self.interaction_source.is_some())
            .finish()
    }
}

impl Default for ScrollableConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            enabled: true,
            reverse_direction: false,
            fling_behavior: None,
            overscroll_effect: None,
            interaction_source: None,
        }
    }
}

impl ScrollableConfig {
    /// Sets the orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Enables or disables input.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets direction reversal.
    #[must_use]
    pub fn with_reverse_direction(mut self, reverse_direction: bool) -> Self {
        self.reverse_direction = reverse_direction;
        self
    }

    /// Uses `fling_behavior` instead of the platform decay.
    #[must_use]
    pub fn with_fling_behavior(mut self, fling_behavior: Rc<dyn FlingBehavior>) -> Self {
        self.fling_behavior = Some(fling_behavior);
        self
    }

    /// Attaches an overscroll effect.
    #[must_use]
    pub fn with_overscroll_effect(mut self, overscroll_effect: Rc<dyn OverscrollEffect>) -> Self {
        self.overscroll_effect = Some(overscroll_effect);
        self
    }

    /// Reports drag lifecycle to `interaction_source`.
    #[must_use]
    pub fn with_interaction_source(
        mut self,
        interaction_source: Rc<dyn InteractionSource>,
    ) -> Self {
        self.interaction_source = Some(interaction_source);
        self
    }
}

/// Default values for scrollables.
#[derive(Copy, Clone, Debug)]
pub struct ScrollableDefaults;

impl ScrollableDefaults {
    /// The `reverse_direction` a scrolling container should use.
    ///
    /// A finger moves with the content, not with the viewport, so the gesture
    /// is reversed once relative to layout. Right-to-left horizontal layouts
    /// flip it back.
    #[must_use]
    pub fn reverse_direction(
        layout_direction: LayoutDirection,
        orientation: Orientation,
        reverse_scrolling: bool,
    ) -> bool {
        let mut reverse_direction = !reverse_scrolling;
        if layout_direction == LayoutDirection::Rtl && orientation != Orientation::Vertical {
            reverse_direction = !reverse_direction;
        }
        reverse_direction
    }
}

/// A scrollable's face toward its nested scroll children.
///
/// What a child leaves unconsumed after its own post-scroll is applied here as
/// a raw delta, and a child's leftover fling velocity runs this scrollable's
/// own fling.
pub struct ScrollableNestedScrollConnection {
    logic: Rc<ScrollingLogic>,
    enabled: Cell<bool>,
}

impl fmt::Debug for ScrollableNestedScrollConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollableNestedScrollConnection")
            .field("logic", &self.logic)
            .field("enabled", &self.enabled.get())
            .finish()
    }
}

impl ScrollableNestedScrollConnection {
    /// Creates a connection for `logic`.
    pub fn new(logic: Rc<ScrollingLogic>, enabled: bool) -> Self {
        Self {
            logic,
            enabled: Cell::new(enabled),
        }
    }

    /// Whether the connection consumes anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enables or disables the connection.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }
}

impl NestedScrollConnection for ScrollableNestedScrollConnection {
    fn on_post_scroll(
        &self,
        _consumed: Offset,
        available: Offset,
        _source: NestedScrollSource,
    ) -> Offset {
        if self.enabled.get() {
            self.logic.perform_raw_scroll(available)
        } else {
            Offset::ZERO
        }
    }

    fn on_post_fling(
        &self,
        _consumed: Velocity,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        if !self.enabled.get() {
            return Ok(Velocity::ZERO);
        }
        let logic = &self.logic;
        let velocity_left = match logic.scroll(MutatePriority::Default, |scope| {
            logic.do_fling_animation(scope, available, clock)
        }) {
            Ok(velocity_left) => velocity_left,
            // Someone is already driving this scrollable; leave the velocity.
            Err(ScrollError::Busy { .. }) => available,
            Err(err) => return Err(err),
        };
        Ok(available - velocity_left)
    }
}

/// One scrollable surface.
///
/// Owns the [`ScrollingLogic`], the nested scroll dispatcher used to reach
/// ancestors, and the [`NestedScrollNode`] descendants attach to.
pub struct Scrollable {
    logic: Rc<ScrollingLogic>,
    connection: Rc<ScrollableNestedScrollConnection>,
    node: Rc<NestedScrollNode>,
    dispatcher: Rc<NestedScrollDispatcher>,
    default_fling_behavior: Rc<DefaultFlingBehavior>,
    config: RefCell<ScrollableConfig>,
    viewport_size: Cell<Size>,
}

impl fmt::Debug for Scrollable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrollable")
            .field("logic", &self.logic)
            .field("config", &self.config.borrow())
            .field("viewport_size", &self.viewport_size.get())
            .finish_non_exhaustive()
    }
}

impl Scrollable {
    /// Creates a scrollable over `state`.
    pub fn new(state: Rc<dyn ScrollableState>, config: ScrollableConfig) -> Self {
        let default_fling_behavior = Rc::new(DefaultFlingBehavior::default());
        let dispatcher = Rc::new(NestedScrollDispatcher::new());
        let logic = Rc::new(ScrollingLogic::new(
            state,
            config.orientation,
            config.overscroll_effect.clone(),
            config.reverse_direction,
            resolve_fling_behavior(&config, &default_fling_behavior),
            Rc::clone(&dispatcher),
        ));
        let connection = Rc::new(ScrollableNestedScrollConnection::new(
            Rc::clone(&logic),
            config.enabled,
        ));
        let node = NestedScrollNode::new(Rc::clone(&connection) as Rc<dyn NestedScrollConnection>);
        Self {
            logic,
            connection,
            node,
            dispatcher,
            default_fling_behavior,
            config: RefCell::new(config),
            viewport_size: Cell::new(Size::ZERO),
        }
    }

    /// The underlying logic.
    #[must_use]
    pub fn logic(&self) -> &Rc<ScrollingLogic> {
        &self.logic
    }

    /// Node that nested scroll descendants use as their parent.
    #[must_use]
    pub fn nested_scroll_node(&self) -> Rc<NestedScrollNode> {
        Rc::clone(&self.node)
    }

    /// Dispatcher this scrollable uses to reach its ancestors.
    #[must_use]
    pub fn dispatcher(&self) -> &Rc<NestedScrollDispatcher> {
        &self.dispatcher
    }

    /// Attaches this scrollable below `parent` in the nested scroll chain.
    pub fn set_parent(&self, parent: Option<Rc<NestedScrollNode>>) {
        self.node.set_parent(parent.clone());
        self.dispatcher.set_parent(parent);
    }

    /// Whether input is accepted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.borrow().enabled
    }

    /// Size of the visible area, used for paging.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.viewport_size.get()
    }

    /// Records the size of the visible area after layout.
    pub fn set_viewport_size(&self, size: Size) {
        self.viewport_size.set(size);
    }

    /// Reconfigures the scrollable.
    ///
    /// Returns `true` when pointer input tracking must be reset; see
    /// [`ScrollingLogic::update`].
    pub fn update(&self, state: Rc<dyn ScrollableState>, config: ScrollableConfig) -> bool {
        self.connection.set_enabled(config.enabled);
        let reset_pointer_input_handling = self.logic.update(
            state,
            config.orientation,
            config.overscroll_effect.clone(),
            config.reverse_direction,
            resolve_fling_behavior(&config, &self.default_fling_behavior),
            Rc::clone(&self.dispatcher),
        );
        *self.config.borrow_mut() = config;
        reset_pointer_input_handling
    }

    /// Re-derives the platform fling for `density`.
    pub fn update_density(&self, density: Density) {
        self.default_fling_behavior.update_density(density);
    }

    /// Whether a new drag should latch on without waiting for touch slop.
    #[must_use]
    pub fn start_drag_immediately(&self) -> bool {
        self.logic.should_scroll_immediately()
    }

    fn emit(&self, interaction: Interaction) {
        let source = self.config.borrow().interaction_source.clone();
        if let Some(source) = source {
            source.emit(interaction);
        }
    }

    /// Runs one drag gesture over `deltas` in a [`MutatePriority::UserInput`]
    /// session.
    ///
    /// Each delta is projected onto the scroll axis and dispatched with
    /// overscroll. Pulling the next delta is a suspension point: if another
    /// session supersedes the drag meanwhile, the drag ends with
    /// [`ScrollError::Cancelled`]. Returns the total consumed.
    pub fn drag(&self, deltas: impl IntoIterator<Item = Offset>) -> Result<Offset, ScrollError> {
        if !self.is_enabled() {
            return Ok(Offset::ZERO);
        }
        self.emit(Interaction::DragStart);
        let axis = self.logic.axis();
        let result = self.logic.scroll(MutatePriority::UserInput, |scope| {
            let mut total = Offset::ZERO;
            for delta in deltas {
                if !scope.is_active() {
                    return Err(ScrollError::Cancelled);
                }
                total += scope.scroll_by_with_overscroll(
                    axis.single_axis_offset(delta),
                    NestedScrollSource::UserInput,
                );
            }
            Ok(total)
        });
        self.emit(if result.is_ok() {
            Interaction::DragStop
        } else {
            Interaction::DragCancel
        });
        result
    }

    /// Flings with the release `velocity` of a drag.
    pub fn on_drag_stopped(
        &self,
        velocity: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        if !self.is_enabled() {
            return Ok(Velocity::ZERO);
        }
        self.logic.on_scroll_stopped(velocity, false, clock)
    }

    /// Applies one mouse wheel `delta`, already converted to pixels.
    pub fn on_wheel(&self, delta: Offset) -> Result<Offset, ScrollError> {
        if !self.is_enabled() {
            return Ok(Offset::ZERO);
        }
        self.logic.scroll(MutatePriority::UserInput, |scope| {
            Ok(scope.scroll_by(delta, NestedScrollSource::UserInput))
        })
    }

    /// Ends a wheel gesture. Only flings that opt into mouse wheel input run.
    pub fn on_wheel_stopped(
        &self,
        velocity: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        if !self.is_enabled() {
            return Ok(Velocity::ZERO);
        }
        self.logic.on_scroll_stopped(velocity, true, clock)
    }

    /// Handles a page key press.
    ///
    /// Scrolls by one viewport along the active axis: [`PageKey::PageUp`] by
    /// the positive extent, [`PageKey::PageDown`] by the negative. Returns
    /// `Ok(false)` without scrolling when disabled or when ctrl is held.
    pub fn on_page_key(&self, key: PageKey, ctrl_pressed: bool) -> Result<bool, ScrollError> {
        if !self.is_enabled() || ctrl_pressed {
            return Ok(false);
        }
        let size = self.viewport_size.get();
        let extent = if self.logic.is_vertical() {
            size.height
        } else {
            size.width
        };
        let amount = match key {
            PageKey::PageUp => extent,
            PageKey::PageDown => -extent,
        };
        let axis = self.logic.axis();
        self.logic.scroll(MutatePriority::UserInput, |scope| {
            Ok(scope.scroll_by(axis.scalar_to_offset(amount), NestedScrollSource::UserInput))
        })?;
        Ok(true)
    }

    /// Animates a scroll by `offset` for an accessibility request.
    ///
    /// Returns the offset actually scrolled; disabled scrollables scroll
    /// nothing.
    pub fn semantics_scroll_by(
        &self,
        offset: Offset,
        clock: &mut dyn FrameClock,
    ) -> Result<Offset, ScrollError> {
        if !self.is_enabled() {
            return Ok(Offset::ZERO);
        }
        self.logic.semantics_scroll_by(offset, clock)
    }
}

fn resolve_fling_behavior(
    config: &ScrollableConfig,
    default_fling_behavior: &Rc<DefaultFlingBehavior>,
) -> Rc<dyn FlingBehavior> {
    match &config.fling_behavior {
        Some(fling_behavior) => Rc::clone(fling_behavior),
        None => Rc::clone(default_fling_behavior) as Rc<dyn FlingBehavior>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedStepClock;
    use crate::fling::FlingScope;
    use crate::state::ScrollState;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Interactions(RefCell<Vec<Interaction>>);

    impl InteractionSource for Interactions {
        fn emit(&self, interaction: Interaction) {
            self.0.borrow_mut().push(interaction);
        }
    }

    fn bounded(max: f64) -> Rc<ScrollState> {
        Rc::new(ScrollState::with_max_value(0.0, max))
    }

    #[test]
    fn reverse_direction_defaults() {
        use LayoutDirection::{Ltr, Rtl};
        use Orientation::{Horizontal, Vertical};
        assert!(ScrollableDefaults::reverse_direction(Ltr, Vertical, false));
        assert!(!ScrollableDefaults::reverse_direction(Ltr, Vertical, true));
        assert!(ScrollableDefaults::reverse_direction(Rtl, Vertical, false));
        assert!(!ScrollableDefaults::reverse_direction(Rtl, Horizontal, false));
        assert!(ScrollableDefaults::reverse_direction(Rtl, Horizontal, true));
    }

    #[test]
    fn drag_projects_onto_the_axis_and_reports_lifecycle() {
        let state = bounded(500.0);
        let interactions = Rc::new(Interactions::default());
        let scrollable = Scrollable::new(
            state.clone(),
            ScrollableConfig::default()
                .with_orientation(Orientation::Horizontal)
                .with_interaction_source(interactions.clone()),
        );
        let consumed = scrollable
            .drag([Offset::new(20.0, 99.0), Offset::new(15.0, -3.0)])
            .unwrap();
        assert_eq!(consumed, Offset::new(35.0, 0.0));
        assert_eq!(state.value(), 35.0);
        assert_eq!(
            *interactions.0.borrow(),
            [Interaction::DragStart, Interaction::DragStop]
        );
    }

    #[test]
    fn disabled_scrollable_ignores_input() {
        struct Nudge;
        impl FlingBehavior for Nudge {
            fn perform_fling(
                &self,
                scope: &mut FlingScope<'_>,
                _: f64,
            ) -> Result<f64, ScrollError> {
                scope.await_frame()?;
                scope.scroll_by(25.0);
                Ok(0.0)
            }
        }
        let state = bounded(500.0);
        let scrollable = Scrollable::new(
            state.clone(),
            ScrollableConfig::default()
                .with_enabled(false)
                .with_fling_behavior(Rc::new(Nudge)),
        );
        scrollable.set_viewport_size(Size::new(100.0, 100.0));
        assert_eq!(scrollable.drag([Offset::new(0.0, 10.0)]), Ok(Offset::ZERO));
        assert_eq!(scrollable.on_wheel(Offset::new(0.0, 10.0)), Ok(Offset::ZERO));
        assert_eq!(scrollable.on_page_key(PageKey::PageDown, false), Ok(false));
        assert_eq!(
            scrollable.semantics_scroll_by(Offset::new(0.0, 10.0), &mut FixedStepClock::default()),
            Ok(Offset::ZERO)
        );
        let mut clock = FixedStepClock::default();
        let fling = Velocity::new(0.0, 2000.0);
        assert_eq!(scrollable.on_drag_stopped(fling, &mut clock), Ok(Velocity::ZERO));
        assert_eq!(scrollable.on_wheel_stopped(fling, &mut clock), Ok(Velocity::ZERO));
        assert_eq!(clock.now(), 0);
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn superseded_scope_no_longer_reaches_the_parent() {
        let outer_state = bounded(1000.0);
        let inner_state = bounded(0.0);
        let outer = Scrollable::new(outer_state.clone(), ScrollableConfig::default());
        let inner = Scrollable::new(inner_state.clone(), ScrollableConfig::default());
        inner.set_parent(Some(outer.nested_scroll_node()));
        let logic = inner.logic();

        logic
            .scroll(MutatePriority::Default, |scope| {
                let nudge = Offset::new(0.0, 10.0);
                assert_eq!(scope.scroll_by(nudge, NestedScrollSource::UserInput), nudge);
                logic.scroll(MutatePriority::UserInput, |_| Ok(()))?;
                assert!(!scope.is_active());
                let delta = Offset::new(0.0, 80.0);
                assert_eq!(scope.scroll_by(delta, NestedScrollSource::UserInput), Offset::ZERO);
                assert_eq!(
                    scope.scroll_by_with_overscroll(delta, NestedScrollSource::SideEffect),
                    Offset::ZERO
                );
                Ok(())
            })
            .unwrap();
        assert_eq!(outer_state.value(), 10.0);
        assert_eq!(inner_state.value(), 0.0);
    }

    #[test]
    fn new_drag_cancels_a_running_drag() {
        let state = bounded(1000.0);
        let interactions = Rc::new(Interactions::default());
        let scrollable = Rc::new(Scrollable::new(
            state.clone(),
            ScrollableConfig::default().with_interaction_source(interactions.clone()),
        ));
        let other = Rc::clone(&scrollable);
        let mut step = 0;
        let deltas = core::iter::from_fn(|| {
            step += 1;
            match step {
                1 => Some(Offset::new(0.0, 10.0)),
                2 => {
                    // A wheel event lands between two drag deltas.
                    other.on_wheel(Offset::new(0.0, 5.0)).unwrap();
                    Some(Offset::new(0.0, 10.0))
                }
                _ => None,
            }
        });
        assert_eq!(scrollable.drag(deltas), Err(ScrollError::Cancelled));
        assert_eq!(state.value(), 15.0);
        assert!(!state.is_scroll_in_progress());
        assert_eq!(
            *interactions.0.borrow(),
            [Interaction::DragStart, Interaction::DragCancel]
        );
    }

    #[test]
    fn page_keys_move_by_one_viewport() {
        let state = bounded(1000.0);
        let reverse = ScrollableDefaults::reverse_direction(
            LayoutDirection::Ltr,
            Orientation::Vertical,
            false,
        );
        let scrollable = Scrollable::new(
            state.clone(),
            ScrollableConfig::default().with_reverse_direction(reverse),
        );
        scrollable.set_viewport_size(Size::new(320.0, 240.0));
        assert_eq!(scrollable.on_page_key(PageKey::PageDown, false), Ok(true));
        assert_eq!(state.value(), 240.0);
        assert_eq!(scrollable.on_page_key(PageKey::PageDown, true), Ok(false));
        assert_eq!(state.value(), 240.0);
        assert_eq!(scrollable.on_page_key(PageKey::PageUp, false), Ok(true));
        assert_eq!(state.value(), 0.0);
    }

    #[test]
    fn horizontal_page_keys_use_the_width() {
        let state = bounded(1000.0);
        let scrollable = Scrollable::new(
            state.clone(),
            ScrollableConfig::default()
                .with_orientation(Orientation::Horizontal)
                .with_reverse_direction(true),
        );
        scrollable.set_viewport_size(Size::new(320.0, 240.0));
        scrollable.on_page_key(PageKey::PageDown, false).unwrap();
        assert_eq!(state.value(), 320.0);
    }

    #[test]
    fn wheel_stop_skips_default_fling_but_drag_stop_flings() {
        let state = bounded(10_000.0);
        let scrollable = Scrollable::new(state.clone(), ScrollableConfig::default());
        let mut clock = FixedStepClock::default();
        let velocity = Velocity::new(0.0, 2000.0);
        assert_eq!(scrollable.on_wheel_stopped(velocity, &mut clock), Ok(Velocity::ZERO));
        assert_eq!(state.value(), 0.0);
        scrollable.on_drag_stopped(velocity, &mut clock).unwrap();
        assert!(state.value() > 0.0);
    }

    #[test]
    fn wheel_scrolls_in_a_user_input_session() {
        let state = bounded(100.0);
        let scrollable = Scrollable::new(state.clone(), ScrollableConfig::default());
        assert_eq!(scrollable.on_wheel(Offset::new(0.0, 60.0)), Ok(Offset::new(0.0, 60.0)));
        assert_eq!(scrollable.on_wheel(Offset::new(0.0, 60.0)), Ok(Offset::new(0.0, 40.0)));
        assert_eq!(state.value(), 100.0);
    }

    #[test]
    fn child_leftover_scroll_moves_the_parent() {
        let outer_state = bounded(1000.0);
        let inner_state = bounded(100.0);
        let outer = Scrollable::new(outer_state.clone(), ScrollableConfig::default());
        let inner = Scrollable::new(inner_state.clone(), ScrollableConfig::default());
        inner.set_parent(Some(outer.nested_scroll_node()));

        let consumed = inner.drag([Offset::new(0.0, 150.0)]).unwrap();
        assert_eq!(consumed, Offset::new(0.0, 150.0));
        assert_eq!(inner_state.value(), 100.0);
        assert_eq!(outer_state.value(), 50.0);
    }

    #[test]
    fn disabled_parent_takes_nothing() {
        let outer_state = bounded(1000.0);
        let inner_state = bounded(100.0);
        let outer = Scrollable::new(outer_state.clone(), ScrollableConfig::default());
        let inner = Scrollable::new(inner_state.clone(), ScrollableConfig::default());
        inner.set_parent(Some(outer.nested_scroll_node()));
        outer.update(outer_state.clone(), ScrollableConfig::default().with_enabled(false));

        let consumed = inner.drag([Offset::new(0.0, 150.0)]).unwrap();
        assert_eq!(consumed, Offset::new(0.0, 100.0));
        assert_eq!(outer_state.value(), 0.0);
    }

    #[test]
    fn child_fling_at_its_end_carries_the_parent() {
        let outer_state = bounded(10_000.0);
        let inner_state = Rc::new(ScrollState::with_max_value(100.0, 100.0));
        let outer = Scrollable::new(outer_state.clone(), ScrollableConfig::default());
        let inner = Scrollable::new(inner_state.clone(), ScrollableConfig::default());
        inner.set_parent(Some(outer.nested_scroll_node()));

        let consumed = inner
            .on_drag_stopped(Velocity::new(0.0, 2000.0), &mut FixedStepClock::default())
            .unwrap();
        assert!((consumed.y - 2000.0).abs() < 1e-9, "{consumed:?}");
        assert_eq!(inner_state.value(), 100.0);
        assert!(outer_state.value() > 0.0);
        assert!(!outer_state.is_scroll_in_progress());
    }

    #[test]
    fn post_fling_runs_the_parent_fling() {
        let outer_state = bounded(10_000.0);
        let outer = Scrollable::new(outer_state.clone(), ScrollableConfig::default());
        let node = outer.nested_scroll_node();
        let mut clock = FixedStepClock::default();
        let consumed = node
            .on_post_fling(Velocity::ZERO, Velocity::new(0.0, 1200.0), &mut clock)
            .unwrap();
        assert_eq!(consumed, Velocity::new(0.0, 1200.0));
        assert!(outer_state.value() > 0.0);
    }

    #[test]
    fn update_swaps_state_and_signals_reset() {
        let first = bounded(100.0);
        let second = bounded(100.0);
        let scrollable = Scrollable::new(first.clone(), ScrollableConfig::default());
        assert!(!scrollable.update(first.clone(), ScrollableConfig::default()));
        assert!(scrollable.update(second.clone(), ScrollableConfig::default()));
        scrollable.on_wheel(Offset::new(0.0, 30.0)).unwrap();
        assert_eq!(first.value(), 0.0);
        assert_eq!(second.value(), 30.0);
        assert!(scrollable.update(
            second.clone(),
            ScrollableConfig::default().with_orientation(Orientation::Horizontal)
        ));
        assert!(!scrollable.logic().is_vertical());
    }

    #[test]
    fn custom_fling_replaces_the_default() {
        struct Snap;
        impl FlingBehavior for Snap {
            fn perform_fling(
                &self,
                scope: &mut FlingScope<'_>,
                _: f64,
            ) -> Result<f64, ScrollError> {
                scope.scroll_by(25.0);
                Ok(0.0)
            }
        }
        let state = bounded(1000.0);
        let scrollable = Scrollable::new(
            state.clone(),
            ScrollableConfig::default().with_fling_behavior(Rc::new(Snap)),
        );
        scrollable
            .on_wheel_stopped(Velocity::new(0.0, 10.0), &mut FixedStepClock::default())
            .unwrap();
        assert_eq!(state.value(), 25.0);
    }

    #[test]
    fn density_update_changes_fling_distance() {
        let fling = |density: f64| {
            let state = bounded(100_000.0);
            let scrollable = Scrollable::new(state.clone(), ScrollableConfig::default());
            scrollable.update_density(Density::new(density));
            scrollable
                .on_drag_stopped(Velocity::new(0.0, 3000.0), &mut FixedStepClock::default())
                .unwrap();
            state.value()
        };
        assert!(fling(3.0) < fling(1.0));
    }

    #[test]
    fn running_fling_makes_drags_start_immediately() {
        let state = bounded(10_000.0);
        let scrollable = Scrollable::new(state.clone(), ScrollableConfig::default());
        assert!(!scrollable.start_drag_immediately());
        let mut seen = false;
        let mut frames = 0_u64;
        let mut clock = || {
            frames += 1;
            seen |= scrollable.start_drag_immediately();
            frames * FixedStepClock::SIXTY_HZ
        };
        scrollable
            .on_drag_stopped(Velocity::new(0.0, 1000.0), &mut clock)
            .unwrap();
        assert!(seen);
    }
}
