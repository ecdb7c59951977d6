//! The collector capability: scope wrappers, emission routing, and the
//! abort unwind.
//!
//! A [`Collector`] owns one scope stack for one logical execution context.
//! It is deliberately `!Sync` (interior `RefCell`), so two threads can
//! never share a stack; concurrent workers each construct their own.
//!
//! Aborts ride the panic unwinding machinery: an emission that requests
//! termination raises a payload carrying the target frame's identity, and
//! every scope wrapper between the emission point and the target pops its
//! own frame and re-raises until the wrapper that opened the target frame
//! completes. This requires the default `panic = "unwind"` runtime.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use crate::enforcement::enforcement_enabled;
use crate::error::GatherError;
use crate::scope::{FrameId, ScopeStack, ScopeTag};

/// Payload carried by an abort unwind.
///
/// Matched by frame identity, never by type: a wrapper that catches a
/// signal for some other frame tears down its own frame and re-raises.
struct AbortSignal {
    frame: FrameId,
}

/// A context-local collection capability.
///
/// `T` is the tag type (any `PartialEq + Debug` value works; tags are
/// compared by value equality) and `V` is the collected value type.
pub struct Collector<T, V> {
    stack: RefCell<ScopeStack<T, V>>,
    fallback: Option<V>,
}

impl<T, V> Collector<T, V> {
    /// Create a collector with no open scopes.
    pub fn new() -> Self {
        Collector {
            stack: RefCell::new(ScopeStack::new()),
            fallback: None,
        }
    }

    /// Create a collector whose unmatched, unenforced emissions hand back
    /// a clone of `fallback` instead of echoing the emitted value.
    pub fn with_fallback(fallback: V) -> Self {
        Collector {
            stack: RefCell::new(ScopeStack::new()),
            fallback: Some(fallback),
        }
    }

    /// Number of scopes currently open on this collector.
    pub fn depth(&self) -> usize {
        self.stack.borrow().depth()
    }
}

impl<T, V> Collector<T, V>
where
    T: PartialEq + fmt::Debug,
    V: Clone,
{
    /// Run `body` inside a new untagged scope and return the values it
    /// collected, in emission order.
    ///
    /// The scope is torn down exactly once however the body exits:
    /// normal return, an abort targeting this or an ancestor scope, or an
    /// unrelated panic (which keeps propagating after cleanup).
    pub fn collect(&self, body: impl FnOnce()) -> Vec<V> {
        self.run_scope(ScopeTag::Default, body)
    }

    /// Run `body` inside a new scope tagged `tag`.
    ///
    /// Tagging lets emissions inside nested scopes reach past inner
    /// frames to target this one, and lets this scope be shadowed by a
    /// deeper scope carrying an equal tag.
    pub fn collect_tagged(&self, tag: T, body: impl FnOnce()) -> Vec<V> {
        self.run_scope(ScopeTag::Named(tag), body)
    }

    /// Append `value` to the innermost untagged scope and hand it back.
    ///
    /// Outside any untagged scope this is inert: no buffer changes, and
    /// the result is the collector's fallback (or `value` itself when no
    /// fallback is configured) unless enforcement is on, in which case it
    /// is fatal.
    pub fn emit(&self, value: V) -> V {
        self.dispatch(None, value, true)
    }

    /// Append `value` to the innermost scope tagged `tag`.
    pub fn emit_to(&self, tag: &T, value: V) -> V {
        self.dispatch(Some(tag), value, true)
    }

    /// Append `value` to the innermost untagged scope, then terminate
    /// that scope's body immediately.
    ///
    /// Nothing between the call site and the target scope's boundary runs;
    /// intermediate scopes are torn down and their partial buffers
    /// dropped. The target's wrapper returns the values collected up to
    /// and including this one. When no scope matches, behaves exactly
    /// like [`emit`](Self::emit): nothing is aborted.
    pub fn abort(&self, value: V) -> V {
        self.dispatch(None, value, false)
    }

    /// Append `value` to the innermost scope tagged `tag`, then terminate
    /// that scope's body immediately.
    pub fn abort_to(&self, tag: &T, value: V) -> V {
        self.dispatch(Some(tag), value, false)
    }

    /// Whether an untagged scope is open somewhere on this collector.
    pub fn is_collecting(&self) -> bool {
        self.stack.borrow().resolve(None).is_some()
    }

    /// Whether a scope tagged `tag` is open somewhere on this collector.
    pub fn is_collecting_tagged(&self, tag: &T) -> bool {
        self.stack.borrow().resolve(Some(tag)).is_some()
    }

    fn run_scope(&self, tag: ScopeTag<T>, body: impl FnOnce()) -> Vec<V> {
        let frame = self.stack.borrow_mut().begin(tag);
        trace!(frame = %frame, depth = self.depth(), "scope opened");
        let outcome = panic::catch_unwind(AssertUnwindSafe(body));
        match outcome {
            Ok(()) => {
                let values = self.stack.borrow_mut().end(frame);
                trace!(frame = %frame, collected = values.len(), "scope closed");
                values
            }
            Err(payload) => match payload.downcast::<AbortSignal>() {
                Ok(signal) if signal.frame == frame => {
                    let values = self.stack.borrow_mut().end(frame);
                    debug!(frame = %frame, collected = values.len(), "scope aborted");
                    values
                }
                Ok(signal) => {
                    // Abort targets an ancestor: drop this frame's partial
                    // buffer and keep unwinding toward it.
                    drop(self.stack.borrow_mut().end(frame));
                    trace!(frame = %frame, target = %signal.frame, "unwinding through scope");
                    panic::resume_unwind(signal)
                }
                Err(payload) => {
                    // Unrelated panic: restore the stack invariant, then
                    // let it keep propagating.
                    drop(self.stack.borrow_mut().end(frame));
                    panic::resume_unwind(payload)
                }
            },
        }
    }

    fn dispatch(&self, query: Option<&T>, value: V, keep_going: bool) -> V {
        let mut stack = self.stack.borrow_mut();
        if let Some(frame) = stack.resolve_mut(query) {
            frame.values.push(value.clone());
            let target = frame.id;
            drop(stack);
            trace!(frame = %target, "value collected");
            if keep_going {
                value
            } else {
                debug!(frame = %target, "abort requested");
                panic::panic_any(AbortSignal { frame: target })
            }
        } else {
            drop(stack);
            if enforcement_enabled() {
                panic!("{}", GatherError::unmatched_tag(tag_label(query)));
            }
            debug!(tag = %tag_label(query), "emission outside any matching scope");
            match &self.fallback {
                Some(fallback) => fallback.clone(),
                None => value,
            }
        }
    }
}

impl<T, V> Default for Collector<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, V: fmt::Debug> fmt::Debug for Collector<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("depth", &self.depth())
            .field("fallback", &self.fallback)
            .finish()
    }
}

fn tag_label<T: fmt::Debug>(query: Option<&T>) -> String {
    match query {
        Some(tag) => format!("{:?}", tag),
        None => "<untagged>".to_string(),
    }
}
