//! Runtime error types.

use thiserror::Error;
use tidings_core::DecodeError;
use tidings_framework::FilterError;

use crate::config::ConfigError;

/// Errors that can occur while setting up or running the pipeline.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A route's filters could not be built.
    #[error("Failed to build route '{route}': {source}")]
    Route {
        route: String,
        #[source]
        source: FilterError,
    },

    #[error("Failed to decode record: {0}")]
    Decode(#[from] DecodeError),
}

impl RuntimeError {
    pub fn route(route: impl Into<String>, source: FilterError) -> Self {
        Self::Route {
            route: route.into(),
            source,
        }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
