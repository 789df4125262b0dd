use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};

// Import database configs from the database library
use database::PageLimits;
use database::common::RetryConfig;
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub retry: RetryConfig,
    /// Apply pending migrations before serving (`DB_RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
    pub pagination: PageLimits,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let retry = RetryConfig::from_env()?;
        let run_migrations = env_parse("DB_RUN_MIGRATIONS", "true")?;
        let pagination = PageLimits::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            retry,
            run_migrations,
            pagination,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("DATABASE_URL"));
        });
    }

    #[test]
    fn loads_defaults_around_database_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/planner")),
                ("DB_RUN_MIGRATIONS", None),
                ("PAGINATION_DEFAULT_LIMIT", None),
                ("PAGINATION_MAX_LIMIT", None),
                ("PORT", Some("9090")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "planner_api");
                assert!(config.run_migrations);
                assert_eq!(config.pagination, PageLimits::default());
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.database.url(), "postgres://localhost/planner");
            },
        );
    }

    #[test]
    fn migrations_can_be_disabled() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/planner")),
                ("DB_RUN_MIGRATIONS", Some("false")),
            ],
            || {
                assert!(!Config::from_env().unwrap().run_migrations);
            },
        );
    }
}
