//! Scope frames and the frame stack.
//!
//! Tracks the dynamic nesting of active collection scopes so emissions
//! can be routed to the innermost frame whose tag matches. Push and pop
//! happen only at the top; at every instant the stack mirrors the lexical
//! nesting of currently-executing scope bodies.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::error::GatherError;

/// Identity of one scope frame.
///
/// Ids are allocated from a process-wide counter rather than per collector,
/// so an abort raised against one collector's frame can never be claimed by
/// a frame of a different collector nested on the same thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(0);

impl FrameId {
    /// Allocate a fresh id. Relaxed ordering: uniqueness is the only
    /// requirement, no cross-thread synchronization rides on it.
    fn next() -> FrameId {
        FrameId(NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag carried by a scope frame.
///
/// `Default` is the untagged sentinel. It is reachable only through the
/// untagged half of the API, so it never collides with a caller tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeTag<T> {
    Default,
    Named(T),
}

impl<T: PartialEq> ScopeTag<T> {
    /// Whether this tag answers a resolution query.
    ///
    /// `None` queries the untagged sentinel; `Some(t)` queries named tags
    /// by value equality. The sentinel never matches a named query and
    /// vice versa.
    fn matches(&self, query: Option<&T>) -> bool {
        match (self, query) {
            (ScopeTag::Default, None) => true,
            (ScopeTag::Named(tag), Some(wanted)) => tag == wanted,
            _ => false,
        }
    }
}

/// One active collection scope: identity, tag, and the values collected
/// so far in emission order.
#[derive(Debug)]
pub struct Frame<T, V> {
    pub id: FrameId,
    pub tag: ScopeTag<T>,
    pub values: Vec<V>,
}

/// Stack of live frames, innermost last.
#[derive(Debug)]
pub struct ScopeStack<T, V> {
    frames: SmallVec<[Frame<T, V>; 4]>,
}

impl<T, V> ScopeStack<T, V> {
    /// Create an empty stack.
    pub fn new() -> Self {
        ScopeStack {
            frames: SmallVec::new(),
        }
    }

    /// Push a frame with an empty buffer; returns its identity.
    pub fn begin(&mut self, tag: ScopeTag<T>) -> FrameId {
        let id = FrameId::next();
        self.frames.push(Frame {
            id,
            tag,
            values: Vec::new(),
        });
        id
    }

    /// Pop the frame identified by `id` and return its buffer.
    ///
    /// `id` must be the current top of stack. A mismatch means scopes were
    /// torn down out of order, which is a broken nesting discipline in the
    /// caller, not bad emitted data, so it is fatal.
    pub fn end(&mut self, id: FrameId) -> Vec<V> {
        match self.frames.last() {
            Some(top) if top.id == id => {}
            top => {
                let found = top.map(|frame| frame.id.to_string());
                panic!("{}", GatherError::scope_order(id.to_string(), found));
            }
        }
        self.frames
            .pop()
            .map(|frame| frame.values)
            .unwrap_or_default()
    }

    /// Innermost frame whose tag answers `query`, or None if no live
    /// frame matches.
    pub fn resolve(&self, query: Option<&T>) -> Option<&Frame<T, V>>
    where
        T: PartialEq,
    {
        self.frames.iter().rev().find(|frame| frame.tag.matches(query))
    }

    /// Mutable variant of [`resolve`](Self::resolve), for appending.
    pub fn resolve_mut(&mut self, query: Option<&T>) -> Option<&mut Frame<T, V>>
    where
        T: PartialEq,
    {
        self.frames
            .iter_mut()
            .rev()
            .find(|frame| frame.tag.matches(query))
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl<T, V> Default for ScopeStack<T, V> {
    fn default() -> Self {
        Self::new()
    }
}
