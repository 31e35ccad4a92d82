use serde::{Deserialize, Serialize};

use std::{env, fs, net::SocketAddr, path::Path};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    Postgres { dsn: String },
    /// Keeps notes in process memory; nothing survives a restart.
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },

    #[error(
        "Config file not found and environment variables are incomplete. \
         Tried: '{tried}', 'config.yaml', 'config.example.yaml', and environment variables. \
         Error: {message}"
    )]
    NotFound { tried: String, message: String },
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

pub fn parse_config(contents: &str, path: &str) -> Result<Config, ConfigError> {
    serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Builds the config from variables resolved through `var`.
fn load_from_env(var: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let listen_addr = var("NOTES_LISTEN_ADDR")
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnv {
            var: "NOTES_LISTEN_ADDR",
            message: e.to_string(),
        })?;

    let storage = match (var("PG_DSN"), var("NOTES_STORAGE")) {
        (Some(dsn), _) => StorageConfig::Postgres { dsn },
        (None, Some(kind)) if kind.eq_ignore_ascii_case("memory") => StorageConfig::Memory,
        (None, Some(kind)) => {
            return Err(ConfigError::InvalidEnv {
                var: "NOTES_STORAGE",
                message: format!("unknown storage '{kind}', expected 'memory' or set PG_DSN"),
            });
        }
        (None, None) => {
            return Err(ConfigError::InvalidEnv {
                var: "PG_DSN",
                message: "PG_DSN or NOTES_STORAGE=memory environment variable is required"
                    .to_string(),
            });
        }
    };

    Ok(Config {
        listen_addr,
        storage,
    })
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path = env::var("NOTES_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    match load_from_env(|name| env::var(name).ok()) {
        Ok(config) => {
            tracing::info!("Successfully loaded configuration from environment variables");
            Ok(config)
        }
        Err(e) => Err(ConfigError::NotFound {
            tried: config_path,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        load_from_env(|name| vars.get(name).cloned())
    }

    #[test]
    fn parses_postgres_config() {
        let yaml = "listen_addr: \"127.0.0.1:9000\"\nstorage:\n  kind: postgres\n  dsn: \"host=db user=notes\"\n";

        let config = parse_config(yaml, "test.yaml").unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.storage,
            StorageConfig::Postgres {
                dsn: "host=db user=notes".to_string()
            }
        );
    }

    #[test]
    fn listen_addr_defaults() {
        let config = parse_config("storage:\n  kind: memory\n", "test.yaml").unwrap();

        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn unknown_storage_kind_is_rejected() {
        let err = parse_config("storage:\n  kind: sqlite\n", "bad.yaml").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn missing_storage_is_rejected() {
        assert!(parse_config("listen_addr: \"0.0.0.0:8000\"\n", "x.yaml").is_err());
    }

    #[test]
    fn example_config_parses() {
        let yaml = include_str!("../config.example.yaml");

        let config = parse_config(yaml, "config.example.yaml").unwrap();

        assert!(matches!(config.storage, StorageConfig::Postgres { .. }));
    }

    #[test]
    fn env_dsn_selects_postgres() {
        let config = from_vars(&[
            ("PG_DSN", "host=localhost user=notes"),
            ("NOTES_LISTEN_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.storage,
            StorageConfig::Postgres {
                dsn: "host=localhost user=notes".to_string()
            }
        );
    }

    #[test]
    fn env_dsn_wins_over_storage_kind() {
        let config = from_vars(&[("PG_DSN", "host=db"), ("NOTES_STORAGE", "memory")]).unwrap();

        assert!(matches!(config.storage, StorageConfig::Postgres { .. }));
    }

    #[test]
    fn env_memory_storage_uses_default_addr() {
        let config = from_vars(&[("NOTES_STORAGE", "Memory")]).unwrap();

        assert_eq!(config.storage, StorageConfig::Memory);
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn env_unknown_storage_is_rejected() {
        let err = from_vars(&[("NOTES_STORAGE", "sqlite")]).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { var: "NOTES_STORAGE", .. }));
    }

    #[test]
    fn env_without_storage_is_rejected() {
        let err = from_vars(&[]).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { var: "PG_DSN", .. }));
    }

    #[test]
    fn env_bad_listen_addr_is_rejected() {
        let err = from_vars(&[("NOTES_STORAGE", "memory"), ("NOTES_LISTEN_ADDR", "not-an-addr")])
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { var: "NOTES_LISTEN_ADDR", .. }));
    }
}
