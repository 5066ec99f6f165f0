//! Configuration loading and layering.
//!
//! Precedence, lowest first: built-in defaults, config file, environment,
//! command-line flags.

use std::fs;
use std::path::Path;

use crate::config::cli::Cli;
use crate::config::schema::ServerConfig;
use crate::config::validation::validate_listener;
use crate::error::ConfigError;

/// Environment variables that switch per-request access logging off with
/// the value `off`. The first one set wins; `GIN_LOG` is kept for existing
/// deployments.
pub const ACCESS_LOG_ENVS: [&str; 2] = ["ACCESS_LOG", "GIN_LOG"];

/// Load a configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the final configuration from the command line.
pub fn resolve(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let access_log = access_log_setting(|name| std::env::var(name).ok());
    apply_env(&mut config, access_log.as_deref());
    apply_cli(&mut config, cli);
    validate_listener(&config)?;

    Ok(config)
}

/// The access-log setting from the first of [`ACCESS_LOG_ENVS`] that is set.
pub fn access_log_setting(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ACCESS_LOG_ENVS.iter().find_map(|name| lookup(name))
}

/// Apply environment overrides.
pub fn apply_env(config: &mut ServerConfig, access_log: Option<&str>) {
    if access_log == Some("off") {
        config.observability.access_log = false;
    }
}

/// Overlay explicitly given flags.
pub fn apply_cli(config: &mut ServerConfig, cli: &Cli) {
    if cli.has_routes() {
        let defaults = crate::config::schema::RouteSpecs::default();
        let routes = &mut config.routes;
        routes.types = non_empty_or(&cli.types, defaults.types);
        routes.paths = non_empty_or(&cli.paths, defaults.paths);
        routes.targets = non_empty_or(&cli.targets, defaults.targets);
        routes.headers = cli.headers.clone();
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    if let Some(host) = &cli.host {
        config.listener.host = host.clone();
    }
    if let Some(secs) = cli.drain_timeout {
        config.timeouts.drain_secs = secs;
    }
    if let Some(addr) = &cli.metrics_address {
        config.observability.metrics_address = Some(addr.clone());
    }
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }
}

fn non_empty_or(given: &[String], fallback: Vec<String>) -> Vec<String> {
    if given.is_empty() {
        fallback
    } else {
        given.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use clap::Parser;

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::try_parse_from(["static-proxy"]).unwrap();
        let mut config = ServerConfig::default();
        apply_cli(&mut config, &cli);

        assert_eq!(config.listener.bind_address(), "localhost:4200");
        assert_eq!(config.routes.types, vec!["dir"]);
        assert_eq!(config.routes.paths, vec!["/static"]);
        assert_eq!(config.routes.targets, vec!["./"]);
        assert_eq!(config.timeouts.drain_secs, 5);
    }

    #[test]
    fn test_cli_routes_replace_file_routes() {
        let mut config: ServerConfig = toml::from_str(
            r#"
            [routes]
            types = ["dir", "dir"]
            paths = ["/a", "/b"]
            targets = ["./a", "./b"]
            "#,
        )
        .unwrap();
        let cli = Cli::try_parse_from(["static-proxy", "-p", "/c", "-t", "./c"]).unwrap();
        apply_cli(&mut config, &cli);

        assert_eq!(config.routes.types, vec!["dir"]);
        assert_eq!(config.routes.paths, vec!["/c"]);
        assert_eq!(config.routes.targets, vec!["./c"]);
    }

    #[test]
    fn test_file_values_survive_absent_flags() {
        let mut config: ServerConfig = toml::from_str(
            r#"
            [listener]
            port = 9000

            [timeouts]
            drain_secs = 2

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        let cli = Cli::try_parse_from(["static-proxy", "-H", "127.0.0.1"]).unwrap();
        apply_cli(&mut config, &cli);

        assert_eq!(config.listener.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.timeouts.drain_secs, 2);
        assert_eq!(config.timeouts.read_secs, 10);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_access_log_env_toggle() {
        let mut config = ServerConfig::default();
        apply_env(&mut config, Some("on"));
        assert!(config.observability.access_log);
        apply_env(&mut config, Some("off"));
        assert!(!config.observability.access_log);
    }

    #[test]
    fn test_access_log_env_names() {
        let only_gin = |name: &str| (name == "GIN_LOG").then(|| "off".to_string());
        assert_eq!(access_log_setting(only_gin).as_deref(), Some("off"));

        let both = |name: &str| match name {
            "ACCESS_LOG" => Some("on".to_string()),
            _ => Some("off".to_string()),
        };
        assert_eq!(access_log_setting(both).as_deref(), Some("on"));

        assert_eq!(access_log_setting(|_| None), None);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Path::new("/nonexistent/static-proxy.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
