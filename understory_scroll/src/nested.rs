// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested scroll: a two-phase protocol between a scrollable and its ancestors.
//!
//! ## Phases
//!
//! Every scroll step and every fling goes through two dispatches around local
//! consumption:
//!
//! 1) Pre: ancestors may claim part of the delta before the child consumes it.
//!    The outermost ancestor is asked first; each node then offers what is left
//!    to its own connection.
//! 2) Post: after the child consumed what it could, ancestors see both the
//!    consumed and the remaining amount. Each node asks its own connection first
//!    and then forwards the rest to its parent.
//!
//! A [`NestedScrollNode`] is one link of the ancestor chain: a connection plus an
//! optional parent. A [`NestedScrollDispatcher`] is what a child holds to talk to
//! the chain above it. With no parent the dispatcher reports zero consumption for
//! every phase, which is the same as not nesting at all.
//!
//! ```
//! use std::rc::Rc;
//! use understory_scroll::{
//!     NestedScrollConnection, NestedScrollDispatcher, NestedScrollNode, NestedScrollSource,
//!     Offset,
//! };
//!
//! // A header that collapses by taking up to 40 px of every upward scroll first.
//! struct Header;
//! impl NestedScrollConnection for Header {
//!     fn on_pre_scroll(&self, available: Offset, _: NestedScrollSource) -> Offset {
//!         Offset::new(0.0, available.y.clamp(0.0, 40.0))
//!     }
//! }
//!
//! let parent = NestedScrollNode::new(Rc::new(Header));
//! let dispatcher = NestedScrollDispatcher::new();
//! dispatcher.set_parent(Some(parent));
//!
//! let delta = Offset::new(0.0, 100.0);
//! let pre = dispatcher.dispatch_pre_scroll(delta, NestedScrollSource::UserInput);
//! assert_eq!(pre, Offset::new(0.0, 40.0));
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::clock::FrameClock;
use crate::error::ScrollError;
use crate::types::{NestedScrollSource, Offset, Velocity};

/// Participant in nested scrolling.
///
/// Every method defaults to consuming nothing, so implementors override only
/// the phases they care about. Return values are the part of `available` the
/// connection consumed.
pub trait NestedScrollConnection {
    /// Offers `available` before the child consumes it.
    fn on_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        let _ = (available, source);
        Offset::ZERO
    }

    /// Reports what the child `consumed` and offers what is still `available`.
    fn on_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let _ = (consumed, available, source);
        Offset::ZERO
    }

    /// Offers the release velocity before the child flings.
    ///
    /// `clock` paces any animation the connection runs in response.
    fn on_pre_fling(
        &self,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        let _ = (available, clock);
        Ok(Velocity::ZERO)
    }

    /// Reports what the child's fling `consumed` and offers the velocity left.
    fn on_post_fling(
        &self,
        consumed: Velocity,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        let _ = (consumed, available, clock);
        Ok(Velocity::ZERO)
    }
}

/// One link of a nested scroll chain.
pub struct NestedScrollNode {
    connection: Rc<dyn NestedScrollConnection>,
    parent: RefCell<Option<Rc<NestedScrollNode>>>,
}

impl fmt::Debug for NestedScrollNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedScrollNode")
            .field("connection", &"<connection>")
            .field("parent", &self.parent.borrow())
            .finish()
    }
}

impl NestedScrollNode {
    /// Creates a root node for `connection`.
    pub fn new(connection: Rc<dyn NestedScrollConnection>) -> Rc<Self> {
        Rc::new(Self {
            connection,
            parent: RefCell::new(None),
        })
    }

    /// Creates a node for `connection` below `parent`.
    pub fn with_parent(
        connection: Rc<dyn NestedScrollConnection>,
        parent: Rc<Self>,
    ) -> Rc<Self> {
        let node = Self::new(connection);
        node.set_parent(Some(parent));
        node
    }

    /// Re-links this node under `parent`.
    pub fn set_parent(&self, parent: Option<Rc<Self>>) {
        *self.parent.borrow_mut() = parent;
    }

    /// The node above this one, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<Self>> {
        self.parent.borrow().clone()
    }

    /// Pre-scroll for this subtree: parent first, then this connection.
    pub fn on_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        let parent_consumed = self
            .parent()
            .map_or(Offset::ZERO, |p| p.on_pre_scroll(available, source));
        let own_consumed = self
            .connection
            .on_pre_scroll(available - parent_consumed, source);
        parent_consumed + own_consumed
    }

    /// Post-scroll for this subtree: this connection first, then the parent.
    pub fn on_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let own_consumed = self.connection.on_post_scroll(consumed, available, source);
        let parent_consumed = self.parent().map_or(Offset::ZERO, |p| {
            p.on_post_scroll(consumed + own_consumed, available - own_consumed, source)
        });
        own_consumed + parent_consumed
    }

    /// Pre-fling for this subtree: parent first, then this connection.
    pub fn on_pre_fling(
        &self,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        let parent_consumed = match self.parent() {
            Some(p) => p.on_pre_fling(available, clock)?,
            None => Velocity::ZERO,
        };
        let own_consumed = self
            .connection
            .on_pre_fling(available - parent_consumed, clock)?;
        Ok(parent_consumed + own_consumed)
    }

    /// Post-fling for this subtree: this connection first, then the parent.
    pub fn on_post_fling(
        &self,
        consumed: Velocity,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        let own_consumed = self.connection.on_post_fling(consumed, available, clock)?;
        let parent_consumed = match self.parent() {
            Some(p) => p.on_post_fling(consumed + own_consumed, available - own_consumed, clock)?,
            None => Velocity::ZERO,
        };
        Ok(own_consumed + parent_consumed)
    }
}

/// A child's handle on the nested scroll chain above it.
#[derive(Debug, Default)]
pub struct NestedScrollDispatcher {
    parent: RefCell<Option<Rc<NestedScrollNode>>>,
}

impl NestedScrollDispatcher {
    /// Creates a dispatcher with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the dispatcher to `parent`, or detaches it.
    pub fn set_parent(&self, parent: Option<Rc<NestedScrollNode>>) {
        *self.parent.borrow_mut() = parent;
    }

    /// The nearest ancestor node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Rc<NestedScrollNode>> {
        self.parent.borrow().clone()
    }

    /// Offers `available` to the ancestors before local consumption.
    pub fn dispatch_pre_scroll(&self, available: Offset, source: NestedScrollSource) -> Offset {
        let consumed = self
            .parent()
            .map_or(Offset::ZERO, |p| p.on_pre_scroll(available, source));
        log::trace!("pre-scroll {available:?}: ancestors consumed {consumed:?}");
        consumed
    }

    /// Reports local consumption and offers what is left to the ancestors.
    pub fn dispatch_post_scroll(
        &self,
        consumed: Offset,
        available: Offset,
        source: NestedScrollSource,
    ) -> Offset {
        let post = self.parent().map_or(Offset::ZERO, |p| {
            p.on_post_scroll(consumed, available, source)
        });
        log::trace!("post-scroll {available:?}: ancestors consumed {post:?}");
        post
    }

    /// Offers the release velocity to the ancestors before the local fling.
    pub fn dispatch_pre_fling(
        &self,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        match self.parent() {
            Some(p) => p.on_pre_fling(available, clock),
            None => Ok(Velocity::ZERO),
        }
    }

    /// Reports the local fling's consumption and offers the velocity left.
    pub fn dispatch_post_fling(
        &self,
        consumed: Velocity,
        available: Velocity,
        clock: &mut dyn FrameClock,
    ) -> Result<Velocity, ScrollError> {
        match self.parent() {
            Some(p) => p.on_post_fling(consumed, available, clock),
            None => Ok(Velocity::ZERO),
        }
    }
}
