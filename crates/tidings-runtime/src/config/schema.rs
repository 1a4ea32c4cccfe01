//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tidings_core::DecoderOptions;
use tidings_framework::FilterSpec;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TidingsConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Event decoder settings.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Named filter chains evaluated against every decoded event.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl TidingsConfig {
    /// Routes with `enabled = true`, in declaration order.
    pub fn enabled_routes(&self) -> impl Iterator<Item = &RouteConfig> {
        self.routes.iter().filter(|route| route.enabled)
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Appends to [`LoggingConfig::file_path`].
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub span_events: SpanEventConfig,
    /// Include thread ids in each line.
    pub thread_ids: bool,
    /// Include source file and line in each line.
    pub file_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Per-target levels, e.g. `tidings_core = "trace"`.
    pub filters: HashMap<String, LogLevel>,
}

// =============================================================================
// Decoder
// =============================================================================

/// Event decoder configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Render both HTML modes while decoding.
    pub eager_html: bool,
}

impl DecoderConfig {
    pub fn options(&self) -> DecoderOptions {
        DecoderOptions {
            eager_html: self.eager_html,
        }
    }
}

// =============================================================================
// Routes
// =============================================================================

/// A named filter chain.
///
/// ```toml
/// [[routes]]
/// name = "start"
/// filters = ["incoming", { kind = "command", args = "start" }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Filters in evaluation order.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl RouteConfig {
    pub fn new(name: impl Into<String>, filters: Vec<FilterSpec>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            filters,
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = TidingsConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(!config.decoder.eager_html);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_route_from_json() {
        let config: TidingsConfig = serde_json::from_value(json!({
            "logging": {"level": "debug", "filters": {"tidings_core": "trace"}},
            "decoder": {"eager_html": true},
            "routes": [
                {"name": "start", "filters": ["incoming", {"kind": "command", "args": "start"}]},
                {"name": "off", "enabled": false, "filters": ["message"]},
            ],
        }))
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.filters["tidings_core"], LogLevel::Trace);
        assert!(config.decoder.options().eager_html);
        assert_eq!(
            config.routes[0].filters,
            vec![
                FilterSpec::new("incoming"),
                FilterSpec::with_args("command", json!("start")),
            ]
        );
        assert!(config.routes[0].enabled);
        let enabled: Vec<_> = config.enabled_routes().map(|r| r.name.as_str()).collect();
        assert_eq!(enabled, vec!["start"]);
    }

    #[test]
    fn test_log_level_strings() {
        for level in LogLevel::ALL {
            let parsed: LogLevel = serde_json::from_value(json!(level.as_str())).unwrap();
            assert_eq!(parsed, level);
        }
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
    }
}
