use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, DatabaseSettings, LoggingSettings, PoolSettings, ServerSettings};

/// Prefix for environment overrides, e.g. `APP__DATABASE__HOST=db.internal`.
pub const ENV_PREFIX: &str = "APP";

/// Loads the application configuration.
///
/// Sources are layered, later ones winning:
/// 1. built-in defaults (see the `Default` impls in [`settings`]),
/// 2. the TOML file at `path`, or `config.toml` in the working directory if it exists,
/// 3. `APP__<SECTION>__<KEY>` environment variables.
///
/// The result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load_config_with_env(path, environment())
}

/// Environment overrides. Values stay strings here; typed fields are converted
/// when the whole tree is deserialized, so `"0123"` remains `"0123"` for a
/// `String` field and still becomes `123` for a numeric one.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

fn load_config_with_env(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        file = ?path,
        database_host = %config.database.host,
        server = %config.server.address(),
        "Configuration loaded."
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn explicit_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!(
            "student-registry-config-{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"
            [database]
            host = "db.internal"
            dbname = "kampus"
            sslmode = "require"

            [database.pool]
            max_connections = 4
            idle_connections = 2

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.dbname, "kampus");
        assert_eq!(config.database.sslmode, "require");
        // Untouched keys keep their defaults.
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.pool.max_connections, 4);
        assert_eq!(config.database.pool.idle_timeout_secs, 1800);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    fn env_vars(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        environment().source(Some(map))
    }

    #[test]
    fn env_strings_keep_leading_zeros() {
        let config = load_config_with_env(
            None,
            env_vars(&[
                ("APP__DATABASE__PASSWORD", "0123"),
                ("APP__DATABASE__DBNAME", "007"),
                ("APP__DATABASE__USER", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.password, "0123");
        assert_eq!(config.database.dbname, "007");
        assert_eq!(config.database.user, "true");
    }

    #[test]
    fn env_numbers_and_flags_still_convert() {
        let config = load_config_with_env(
            None,
            env_vars(&[
                ("APP__DATABASE__PORT", "6543"),
                ("APP__DATABASE__RUN_MIGRATIONS", "false"),
                ("APP__DATABASE__POOL__MAX_CONNECTIONS", "20"),
                ("APP__SERVER__PORT", "9090"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.port, 6543);
        assert!(!config.database.run_migrations);
        assert_eq!(config.database.pool.max_connections, 20);
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = Path::new("/nonexistent/student-registry.toml");
        assert!(matches!(
            load_config(Some(path)),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let path = std::env::temp_dir().join(format!(
            "student-registry-invalid-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[database.pool]\nmax_connections = 2\nidle_connections = 3\n").unwrap();

        let result = load_config(Some(path.as_path()));
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
