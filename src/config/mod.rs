//! Configuration module for tabula.
//!
//! Handles connection configuration, environment variables, and settings.

mod connection;
mod settings;

pub use connection::{
    ConnectionConfig, ConnectionError, Driver, ENV_DRIVER, ENV_HOST, ENV_NAME, ENV_PASSWORD,
    ENV_PORT, ENV_USER,
};
pub use settings::{
    expand_env_vars, ConnectionSettings, DefaultSettings, Settings, SettingsError, TableSettings,
};
