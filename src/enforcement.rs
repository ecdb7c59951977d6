//! Process-wide policy for emissions that match no open scope.
//!
//! Off by default: code paths exercised outside any scope (top-level
//! calls, tests) stay scope-unaware and their emissions are inert. Hosts
//! turn enforcement on during development to catch missing enclosing
//! scopes immediately.

use std::sync::atomic::{AtomicBool, Ordering};

static ENFORCE_UNMATCHED: AtomicBool = AtomicBool::new(false);

/// Make unmatched emissions fatal (`true`) or inert (`false`).
///
/// Takes effect for all subsequent emissions process-wide.
pub fn configure_enforcement(enabled: bool) {
    ENFORCE_UNMATCHED.store(enabled, Ordering::Relaxed);
}

/// Current unmatched-emission policy.
pub fn enforcement_enabled() -> bool {
    ENFORCE_UNMATCHED.load(Ordering::Relaxed)
}
