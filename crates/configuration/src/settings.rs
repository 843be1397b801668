use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.port == 0 {
            return Err(ConfigError::ValidationError(
                "database.port must be non-zero".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.pool.max_connections must be at least 1".to_string(),
            ));
        }
        if pool.idle_connections > pool.max_connections {
            return Err(ConfigError::ValidationError(format!(
                "database.pool.idle_connections ({}) exceeds max_connections ({})",
                pool.idle_connections, pool.max_connections
            )));
        }
        Ok(())
    }
}

/// Where and how to reach PostgreSQL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// libpq-style SSL mode: disable, allow, prefer, require, verify-ca, verify-full.
    pub sslmode: String,
    /// Apply the embedded schema migrations when the server starts.
    pub run_migrations: bool,
    pub pool: PoolSettings,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "student_registry".to_string(),
            sslmode: "disable".to_string(),
            run_migrations: true,
            pool: PoolSettings::default(),
        }
    }
}

/// Connection pool bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Connections the pool keeps open while idle.
    pub idle_connections: u32,
    /// Idle connections above `idle_connections` are closed after this long.
    pub idle_timeout_secs: u64,
}

impl PoolSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            idle_connections: 5,
            idle_timeout_secs: 30 * 60,
        }
    }
}

/// The HTTP listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info,sqlx=warn`. `RUST_LOG` takes precedence.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
            file_prefix: "student-registry.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_pool_bounds() {
        let config = Config::default();
        assert_eq!(config.database.pool.max_connections, 10);
        assert_eq!(config.database.pool.idle_connections, 5);
        assert_eq!(
            config.database.pool.idle_timeout(),
            Duration::from_secs(1800)
        );
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn idle_above_max_is_rejected() {
        let mut config = Config::default();
        config.database.pool.idle_connections = 11;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn zero_ports_are_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.port = 0;
        assert!(config.validate().is_err());
    }
}
