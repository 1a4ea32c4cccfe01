//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: `tidings.toml`, `config.toml`
//! - `yaml-config`: `tidings.yaml`, `tidings.yml`, `config.yaml`, `config.yml`
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults and [`ConfigLoader::merge`]d base configs
//! 2. Profile-specific config file (`tidings.{profile}.toml`)
//! 3. Main config file (`tidings.toml`)
//! 4. Environment variables (`TIDINGS_*`)
//! 5. Values set with [`ConfigLoader::set`]
//!
//! # Environment Variable Mapping
//!
//! `TIDINGS_` prefix, `__` as the key separator:
//!
//! - `TIDINGS_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `TIDINGS_DECODER__EAGER_HTML=true` → `decoder.eager_html = true`
//!
//! # Example
//!
//! ```rust,ignore
//! use tidings_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .file("./config/tidings.toml")
//!     .set("logging.level", "debug")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::TidingsConfig;
use super::validation::validate_config;

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "TIDINGS_PROFILE";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; `prod` and `dev` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads [`PROFILE_ENV`], defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Base layers, merged right above the built-in defaults.
    figment: Figment,
    /// Highest-priority layers.
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    ///
    /// Without explicit search paths the current directory and the user
    /// config directory (`~/.config/tidings` on Linux) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges a whole config as a base layer, below files and environment.
    pub fn merge(mut self, config: TidingsConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Sets one dotted key above every other source.
    pub fn set<T: Serialize>(mut self, key: &str, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::default(key, value));
        self
    }

    /// Loads the configuration without validating it.
    pub fn load(self) -> ConfigResult<TidingsConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;
        let config: TidingsConfig = figment.extract()?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            routes = config.routes.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Loads and validates the configuration.
    pub fn load_validated(self) -> ConfigResult<TidingsConfig> {
        let config = self.load()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(TidingsConfig::default()));
        figment = figment.merge(std::mem::take(&mut self.figment));

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with TIDINGS_ prefix");
            figment = figment.merge(
                Env::prefixed("TIDINGS_")
                    .ignore(&["PROFILE"])
                    .split("__"),
            );
        }

        Ok(figment.merge(self.overrides))
    }

    /// Merges a single config file, dispatching on its extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tidings"));
        }
        paths
    }

    /// Searches `search_paths × base_names`. A profile-specific variant is
    /// merged before its base file; the first base file found ends the search.
    #[cfg(any(feature = "toml-config", feature = "yaml-config"))]
    fn load_format_files<F>(
        &self,
        mut figment: Figment,
        search_paths: &[PathBuf],
        base_names: &[&str],
        merge_fn: F,
    ) -> (Figment, bool)
    where
        F: Fn(Figment, &Path) -> Figment,
    {
        for search_path in search_paths {
            for base_name in base_names {
                let Some((stem, ext)) = base_name.rsplit_once('.') else {
                    continue;
                };

                let profile_path =
                    search_path.join(format!("{stem}.{}.{ext}", self.profile.as_str()));
                if profile_path.exists() {
                    debug!(path = %profile_path.display(), "Loading profile-specific config");
                    figment = merge_fn(figment, &profile_path);
                }

                let base_path = search_path.join(base_name);
                if base_path.exists() {
                    info!(path = %base_path.display(), "Loading configuration file");
                    return (merge_fn(figment, &base_path), true);
                }
            }
        }
        (figment, false)
    }

    #[allow(unused_mut)]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        let search_paths = self.resolve_search_paths();
        let mut found = false;

        #[cfg(feature = "toml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["tidings.toml", "config.toml"],
                |fig, path| fig.merge(Toml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        #[cfg(feature = "yaml-config")]
        {
            let (f, ok) = self.load_format_files(
                figment,
                &search_paths,
                &["tidings.yaml", "tidings.yml", "config.yaml", "config.yml"],
                |fig, path| fig.merge(Yaml::file(path)),
            );
            figment = f;
            found |= ok;
        }

        if !found {
            warn!(paths = ?search_paths, "No configuration file found, using defaults");
        }
        figment
    }
}

/// Searches the default locations, applies the environment and validates.
pub fn load_config() -> ConfigResult<TidingsConfig> {
    ConfigLoader::new().load_validated()
}

/// Loads one file plus the environment and validates.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<TidingsConfig> {
    ConfigLoader::new().file(path).load_validated()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use std::fs;
    use tidings_framework::FilterSpec;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tidings-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let dir = scratch_dir("empty");
        let config = ConfigLoader::new()
            .search_path(&dir)
            .without_env()
            .load()
            .unwrap();
        assert_eq!(config, TidingsConfig::default());
        assert_eq!(config.logging.level.as_str(), "info");
    }

    #[test]
    fn test_load_file() {
        let dir = scratch_dir("file");
        let path = dir.join("routes.toml");
        fs::write(
            &path,
            r#"
[logging]
level = "debug"

[decoder]
eager_html = true

[[routes]]
name = "start"
filters = ["incoming", { kind = "command", args = ["start", "help"] }]

[[routes]]
name = "quiz"
enabled = false
filters = ["quiz_poll"]
"#,
        )
        .unwrap();

        let config = ConfigLoader::new().file(&path).without_env().load().unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.decoder.eager_html);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(
            config.routes[0].filters[1],
            FilterSpec::with_args("command", serde_json::json!(["start", "help"]))
        );
        assert!(!config.routes[1].enabled);
    }

    #[test]
    fn test_profile_file_below_main_file() {
        let dir = scratch_dir("profile");
        fs::write(
            dir.join("tidings.staging.toml"),
            "[logging]\nlevel = \"trace\"\nthread_ids = true\n",
        )
        .unwrap();
        fs::write(dir.join("tidings.toml"), "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = ConfigLoader::new()
            .profile("staging")
            .search_path(&dir)
            .without_env()
            .load()
            .unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.logging.thread_ids);
    }

    #[test]
    fn test_overrides_win() {
        let dir = scratch_dir("overrides");
        let path = dir.join("tidings.toml");
        fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = ConfigLoader::new()
            .file(&path)
            .without_env()
            .set("logging.level", "error")
            .load()
            .unwrap();
        assert_eq!(config.logging.level, LogLevel::Error);
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = scratch_dir("errors");
        let missing = ConfigLoader::new().file(dir.join("nope.toml")).load();
        assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

        let ini = dir.join("tidings.ini");
        fs::write(&ini, "level=debug").unwrap();
        let unsupported = ConfigLoader::new().file(&ini).load();
        assert!(matches!(unsupported, Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"));
    }

    #[test]
    fn test_bad_value_fails_extract() {
        let dir = scratch_dir("bad");
        let path = dir.join("tidings.toml");
        fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        let result = ConfigLoader::new().file(&path).without_env().load();
        assert!(matches!(result, Err(ConfigError::Extract(_))));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("PROD"), Profile::Production);
        assert_eq!(Profile::parse("dev"), Profile::Development);
        assert_eq!(Profile::parse("Staging"), Profile::Custom("staging".into()));
        assert_eq!(Profile::Production.to_string(), "production");
    }
}
