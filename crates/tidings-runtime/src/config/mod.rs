//! Configuration for the Tidings runtime.
//!
//! TOML (and optionally YAML) files layered with `TIDINGS_*` environment
//! variables, loaded through figment and checked by [`validate_config`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DecoderConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, RouteConfig, SpanEventConfig,
    TidingsConfig,
};
pub use validation::validate_config;
