//! # Gather - Dynamic-Extent Value Collection
//!
//! Gather collects ad-hoc diagnostic or result data from arbitrarily deep
//! call stacks without threading accumulator parameters through every
//! intervening function. A caller opens a collection scope; any code
//! running inside that scope's dynamic extent may emit values into it; the
//! scope yields the accumulated values, in emission order, when it ends.
//!
//! ## Quick Start
//!
//! ```
//! use gather::Collector;
//!
//! let passes: Collector<&str, i64> = Collector::new();
//! let report = passes.collect(|| {
//!     passes.emit(1);
//!     deep_analysis(&passes);
//! });
//! assert_eq!(report, vec![1, 2]);
//!
//! fn deep_analysis(passes: &Collector<&str, i64>) {
//!     // arbitrarily far below the scope that collects
//!     passes.emit(2);
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **Scope stack** - per-collector stack of live frames, innermost
//!    last, mirroring the nesting of currently-executing scope bodies
//! 2. **Tag resolution** - an emission targets the innermost frame whose
//!    tag equals its own; equal tags shadow, distinct tags reach past
//!    inner scopes to an ancestor
//! 3. **Abort** - an emission may terminate its target scope on the spot;
//!    the unwind skips everything between the call site and the target's
//!    boundary and the scope still returns what it collected
//!
//! Scopes nest freely:
//!
//! ```
//! use gather::Collector;
//!
//! let passes: Collector<&str, i64> = Collector::new();
//! let outer = passes.collect_tagged("outer", || {
//!     passes.emit_to(&"outer", 1);
//!     let inner = passes.collect_tagged("inner", || {
//!         passes.emit_to(&"outer", 2);
//!         passes.emit_to(&"inner", 3);
//!     });
//!     assert_eq!(inner, vec![3]);
//! });
//! assert_eq!(outer, vec![1, 2]);
//! ```
//!
//! One collector serves one logical execution context; the type is `!Sync`,
//! so concurrent workers each build their own and can never observe each
//! other's frames. Aborts ride panic unwinding and need the default
//! `panic = "unwind"` runtime.

pub mod collector;
pub mod enforcement;
pub mod error;
mod scope;

pub use collector::Collector;
pub use enforcement::{configure_enforcement, enforcement_enabled};
pub use error::GatherError;
