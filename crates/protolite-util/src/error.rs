//! Error types for long-value conversion and namespace construction.

use thiserror::Error;

use crate::namespace::NodeKind;

/// Errors from converting caller input into [`LongBits`](crate::LongBits).
///
/// Only caller-contract violations land here. Malformed-but-expected input
/// (a hash of the wrong length, an unresolvable type path) is recovered with a
/// default value instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LongBitsError {
    /// Numeric text was empty or held only a sign.
    #[error("empty numeric string")]
    Empty,

    /// Numeric text contained something other than an optional sign and
    /// decimal digits.
    #[error("invalid digit at position {position} in {input:?}")]
    InvalidDigit { input: String, position: usize },
}

/// Errors from building a namespace tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// A dotted path had an empty segment (`"a..b"`, `"a."`, `""`).
    #[error("empty segment in path {0:?}")]
    EmptySegment(String),

    /// A path was defined twice with different non-package kinds.
    #[error("{path} is already a {existing}, cannot redefine as {requested}")]
    KindConflict {
        path: String,
        existing: NodeKind,
        requested: NodeKind,
    },
}

/// Result type for long-value conversions.
pub type Result<T> = std::result::Result<T, LongBitsError>;
