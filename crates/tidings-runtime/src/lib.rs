//! Tidings Runtime - configuration, logging and routing for decoded events.
//!
//! This crate provides:
//! - Layered configuration (`TidingsConfig`, `ConfigLoader`) on figment
//! - Subscriber setup (`LoggingBuilder`, `logging::init_from_config`)
//! - The decode-and-route [`Pipeline`]
//!
//! ```ignore
//! use tidings_adapter_mtproto::mtproto_decoder;
//! use tidings_framework::FilterRegistry;
//! use tidings_runtime::{Pipeline, config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let pipeline = Pipeline::from_config(&config, mtproto_decoder(), &FilterRegistry::default())?;
//! let routed = pipeline.process_str(line)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{
    ConfigError, ConfigLoader, ConfigResult, DecoderConfig, LoggingConfig, RouteConfig,
    TidingsConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use pipeline::{Pipeline, Routed};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, span, trace, warn};
}
