//! Application state management.

use database::postgres::DatabaseConnection;

/// Shared application state.
///
/// Cloned per handler; both fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
