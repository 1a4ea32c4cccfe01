//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, RouteConfig, TidingsConfig};

/// Validates the entire configuration.
///
/// Filter identifiers and arguments are checked later, when the routes are
/// built against a registry.
pub fn validate_config(config: &TidingsConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_routes_config(&config.routes)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for target in logging.filters.keys() {
        if target.is_empty() || target.contains(char::is_whitespace) {
            return Err(ConfigError::validation(format!(
                "Invalid log filter target: {target:?}"
            )));
        }
    }

    Ok(())
}

fn validate_routes_config(routes: &[RouteConfig]) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for route in routes {
        validate_route_config(route)?;
        if !seen.insert(route.name.as_str()) {
            return Err(ConfigError::DuplicateRoute(route.name.clone()));
        }
    }

    Ok(())
}

fn validate_route_config(route: &RouteConfig) -> ConfigResult<()> {
    if route.name.trim().is_empty() {
        return Err(ConfigError::missing_field("routes.name"));
    }

    if route.enabled && route.filters.is_empty() {
        return Err(ConfigError::validation(format!(
            "Route '{}' has no filters",
            route.name
        )));
    }

    if let Some(spec) = route.filters.iter().find(|spec| spec.kind.is_empty()) {
        return Err(ConfigError::validation(format!(
            "Route '{}' has a filter without a kind: {spec:?}",
            route.name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tidings_framework::FilterSpec;

    fn route(name: &str) -> RouteConfig {
        RouteConfig::new(name, vec![FilterSpec::new("message")])
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&TidingsConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_duplicate_route() {
        let config = TidingsConfig {
            routes: vec![route("a"), route("b"), route("a")],
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::DuplicateRoute(name)) if name == "a"
        ));
    }

    #[test]
    fn test_validate_route_shape() {
        let mut config = TidingsConfig {
            routes: vec![route(" ")],
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.routes = vec![RouteConfig::new("empty", Vec::new())];
        assert!(validate_config(&config).is_err());

        config.routes[0].enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_file_output() {
        let mut config = TidingsConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some(PathBuf::from("tidings.log"));
        assert!(validate_config(&config).is_ok());
    }
}
