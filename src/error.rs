//! Typed diagnostics for misuse of the collection mechanism.
//!
//! Both conditions are programmer errors and surface immediately as panics
//! rendered from these types; neither is recoverable through the normal
//! protocol. Hosts that install a panic hook can match on the rendered
//! message.

use std::error::Error as StdError;
use std::fmt;

/// Fatal misuse conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatherError {
    /// An emission resolved no open scope while enforcement was enabled.
    UnmatchedTag { tag: String },
    /// A scope was torn down while it was not the innermost live frame.
    ScopeOrder {
        expected: String,
        found: Option<String>,
    },
}

impl GatherError {
    /// Create an unmatched-tag error. The tag is carried pre-rendered so
    /// the error type stays independent of the caller's tag type.
    pub fn unmatched_tag(tag: impl Into<String>) -> Self {
        GatherError::UnmatchedTag { tag: tag.into() }
    }

    /// Create an out-of-order teardown error.
    pub fn scope_order(expected: impl Into<String>, found: Option<String>) -> Self {
        GatherError::ScopeOrder {
            expected: expected.into(),
            found,
        }
    }

    /// Human-readable description of the error.
    pub fn description(&self) -> String {
        match self {
            GatherError::UnmatchedTag { tag } => {
                format!("Emission error: no open scope matches tag {}", tag)
            }
            GatherError::ScopeOrder { expected, found } => match found {
                Some(found) => format!(
                    "Scope error: frame {} ended out of order, top of stack is {}",
                    expected, found
                ),
                None => format!(
                    "Scope error: frame {} ended while the stack was empty",
                    expected
                ),
            },
        }
    }
}

impl fmt::Display for GatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl StdError for GatherError {}

impl From<GatherError> for String {
    fn from(err: GatherError) -> String {
        err.description()
    }
}
