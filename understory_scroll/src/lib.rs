// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll --heading-base-level=0

//! Understory Scroll: headless scroll coordination for UI.
//!
//! This crate decides how much of a requested scroll delta is consumed, by
//! whom, and in what order. It resolves concurrent sources of motion (touch
//! drags, mouse wheels, page keys, accessibility requests, programmatic
//! deltas, and nested parent/child scrollables) into one consistent content
//! offset, with fling physics and overscroll hand-off.
//!
//! It does not render, lay out, or recognize gestures. Hosts feed it
//! recognized input and a frame clock, and implement [`ScrollableState`] for
//! their content (or use [`ScrollState`]).
//!
//! The core concepts are:
//!
//! - [`ScrollableState`]: the scroll model. Single source of truth for "can we
//!   scroll further" and "are we mid-scroll", mutated only inside sessions.
//! - [`MutatorMutex`]: priority-ordered mutual exclusion for sessions. A new
//!   session of equal or higher [`MutatePriority`] cancels the active one at
//!   its next suspension point; a lower one is refused with
//!   [`ScrollError::Busy`].
//! - [`NestedScrollDispatcher`] and [`NestedScrollConnection`]: the pre/post
//!   protocol through which ancestors take part in a child's scrolling.
//! - [`FlingBehavior`]: turns a release velocity into per-frame deltas.
//!   [`DefaultFlingBehavior`] is the platform spline decay.
//! - [`OverscrollEffect`]: a visual that wraps scroll and fling when content
//!   has no capacity left.
//! - [`ScrollingLogic`]: the orchestrator tying the above together.
//! - [`Scrollable`]: input glue for one surface (drag, wheel, page keys,
//!   semantics) plus its node in the nested scroll chain.
//!
//! ## Scheduling
//!
//! Everything runs on one logical thread. Animations never read wall time:
//! they pull timestamps from a [`FrameClock`], and each frame is a suspension
//! point where other work may run and supersede the animation. Cancellation is
//! cooperative and surfaces as [`ScrollError::Cancelled`] or
//! [`ScrollError::FlingCancelled`], which carries the velocity left.
//!
//! ## Minimal example
//!
//! A list nested in a page. The list scrolls first; what it cannot take goes to
//! the page.
//!
//! ```rust
//! use std::rc::Rc;
//! use understory_scroll::{
//!     FixedStepClock, Offset, ScrollState, Scrollable, ScrollableConfig, Velocity,
//! };
//!
//! let page_state = Rc::new(ScrollState::with_max_value(0.0, 5000.0));
//! let list_state = Rc::new(ScrollState::with_max_value(0.0, 300.0));
//!
//! let page = Scrollable::new(page_state.clone(), ScrollableConfig::default());
//! let list = Scrollable::new(list_state.clone(), ScrollableConfig::default());
//! list.set_parent(Some(page.nested_scroll_node()));
//!
//! let consumed = list.drag([Offset::new(0.0, 200.0), Offset::new(0.0, 200.0)]).unwrap();
//! assert_eq!(consumed, Offset::new(0.0, 400.0));
//! assert_eq!(list_state.value(), 300.0);
//! assert_eq!(page_state.value(), 100.0);
//!
//! // Releasing the drag flings; the list is at its end, so the page moves.
//! let mut clock = FixedStepClock::default();
//! list.on_drag_stopped(Velocity::new(0.0, 2500.0), &mut clock).unwrap();
//! assert!(page_state.value() > 100.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable `std` (default) or `libm`
//! for float math.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_scroll requires either the `std` or the `libm` feature");

mod axis;
mod clock;
mod decay;
mod error;
mod float;
mod fling;
mod logic;
mod mutex;
mod nested;
mod overscroll;
mod scrollable;
mod spring;
mod state;
mod types;

pub use axis::ScrollAxis;
pub use clock::{FixedStepClock, FrameClock};
pub use decay::{DEFAULT_SCROLL_FRICTION, Density, FlingCalculator, FlingInfo, SplineBasedDecay};
pub use error::ScrollError;
pub use fling::{DefaultFlingBehavior, FlingBehavior, FlingScope};
pub use logic::{NestedScrollScope, ScrollingLogic};
pub use mutex::{MutatorGuard, MutatorMutex, SessionToken};
pub use nested::{NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode};
pub use overscroll::OverscrollEffect;
pub use scrollable::{
    Interaction, InteractionSource, PageKey, Scrollable, ScrollableConfig, ScrollableDefaults,
    ScrollableNestedScrollConnection,
};
pub use spring::{SpringSpec, animate_to};
pub use state::{DefaultScrollableState, ScrollScope, ScrollState, ScrollableState};
pub use types::{LayoutDirection, MutatePriority, NestedScrollSource, Offset, Orientation, Velocity};
