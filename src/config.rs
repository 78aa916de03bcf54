use std::env;

use thiserror::Error;

pub const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5137",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
    #[error("STORAGE must be 'postgres' or 'memory', got '{0}'")]
    UnknownStorage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String },
    Memory,
}

/// Process configuration, read once at start-up and handed to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    pub storage: Storage,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("STORAGE").as_deref().unwrap_or("postgres") {
            "postgres" => Storage::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "memory" => Storage::Memory,
            other => return Err(ConfigError::UnknownStorage(other.to_string())),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8000,
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| "Shop API".to_string()),
            storage,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            cors_origins,
        })
    }
}

/// Splits a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_database_url() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/shop")]).expect("config");
        assert_eq!(
            cfg.storage,
            Storage::Postgres {
                database_url: "postgres://localhost/shop".to_string()
            }
        );
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.app_name, "Shop API");
        assert_eq!(cfg.cors_origins.len(), DEFAULT_CORS_ORIGINS.len());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(matches!(config(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn memory_storage_needs_no_database() {
        let cfg = config(&[("STORAGE", "memory"), ("PORT", "9090")]).expect("config");
        assert_eq!(cfg.storage, Storage::Memory);
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn invalid_port_and_storage_are_rejected() {
        assert!(matches!(
            config(&[("STORAGE", "memory"), ("PORT", "eighty")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config(&[("STORAGE", "sqlite")]),
            Err(ConfigError::UnknownStorage(_))
        ));
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
