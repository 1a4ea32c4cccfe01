//! Error types for the filter framework.

use thiserror::Error;

/// Returned by a filter predicate when an event does **not** match.
///
/// Services fronted by a [`FilterChain`](crate::FilterChain) see this as the
/// rejection error; it marks a non-match, not a failure.
#[derive(Debug, Clone, Error)]
#[error("event skipped by filter")]
pub struct EventSkipped;

/// Errors that can occur while building filters.
///
/// Evaluating a filter never fails; these only arise at registration time.
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// No constructor is registered under this identifier.
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    /// A constructor is already registered under this identifier.
    #[error("filter '{0}' is already registered")]
    AlreadyRegistered(String),

    /// The arguments do not fit the filter.
    #[error("invalid arguments for filter '{filter}': {reason}")]
    InvalidArgs {
        /// Filter identifier.
        filter: String,
        /// Reason for rejection.
        reason: String,
    },

    /// A regex filter was given a pattern that does not compile.
    #[error("invalid regex '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl FilterError {
    /// Creates an invalid-arguments error.
    pub fn invalid_args(filter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgs {
            filter: filter.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for filter construction.
pub type FilterResult<T> = Result<T, FilterError>;
