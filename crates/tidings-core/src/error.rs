//! Error types for decoding and collaborator resolution.
//!
//! Decoding errors are fatal to a single decode call only. Resolver errors are
//! wrapped transparently so callers see the collaborator's own failure.

use thiserror::Error;

// =============================================================================
// Resolve Errors
// =============================================================================

/// Errors reported by the peer, media and keyboard collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The raw record does not have the shape the resolver expects.
    #[error("malformed {what} record: {reason}")]
    Malformed {
        /// Which collaborator input was malformed ("peer", "media", ...).
        what: &'static str,
        /// Reason for failure.
        reason: String,
    },

    /// The record carries a constructor tag the resolver does not know.
    #[error("unknown {what} constructor '{tag}'")]
    UnknownConstructor {
        /// Which collaborator input was rejected.
        what: &'static str,
        /// The offending `_` tag.
        tag: String,
    },

    /// The peer could not be found (e.g. not cached by the session layer).
    #[error("peer not found: {0}")]
    PeerNotFound(String),

    /// Any other collaborator failure.
    #[error("{0}")]
    Other(String),
}

impl ResolveError {
    /// Creates a malformed-record error.
    pub fn malformed(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            what,
            reason: reason.into(),
        }
    }

    /// Creates an unknown-constructor error.
    pub fn unknown_constructor(what: &'static str, tag: impl Into<String>) -> Self {
        Self::UnknownConstructor {
            what,
            tag: tag.into(),
        }
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors that can occur while decoding a raw record into an event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A required key is absent from the raw record.
    #[error("missing required field `{field}`")]
    MissingRequiredField {
        /// Dotted path of the missing key.
        field: &'static str,
    },

    /// An entity record lacks `offset` or `length`.
    ///
    /// The decoder never returns this from `decode`; it drops the entity and
    /// skips command parsing when the entity is the first one.
    #[error("malformed entity at index {index}: {reason}")]
    MalformedEntity {
        /// Position of the entity in the raw `entities` list.
        index: usize,
        /// Reason for rejection.
        reason: String,
    },

    /// A key is present but holds a value of the wrong type.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        /// Dotted path of the offending key.
        field: &'static str,
        /// Reason for rejection.
        reason: String,
    },

    /// The input text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// A collaborator failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl DecodeError {
    /// Creates a missing-field error.
    pub fn missing(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    /// Creates an invalid-field error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for collaborator operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
