//! TOML-based configuration for tabula.
//!
//! Supports a config file (tabula.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [connection]
//! driver = "postgresql"
//! user = "${DB_USER}"
//! password = "$DB_PASSWORD"
//! host = "db.internal"
//! database = "shop"
//!
//! [defaults]
//! dialect = "duckdb"
//!
//! [tables.orders]
//! columns = [
//!     { name = "id", type = "bigint", primary_key = true },
//!     "customer",
//!     { name = "total", type = "decimal(10,2)" },
//! ]
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::connection::{ConnectionConfig, ConnectionError};
use crate::schema::{ColumnRef, StaticSchemaSource};
use crate::sql::dialect::{Dialect, UnknownDialect};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Dialect(#[from] UnknownDialect),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionSettings,
    pub defaults: DefaultSettings,
    /// Tables known without a live catalog.
    pub tables: BTreeMap<String, TableSettings>,
}

/// `[connection]`: overrides for the built-in connection defaults.
///
/// String fields support `${VAR}` and `$VAR` expansion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub driver: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
}

impl ConnectionSettings {
    /// Apply these settings on top of `base`.
    pub fn apply(&self, mut base: ConnectionConfig) -> Result<ConnectionConfig, SettingsError> {
        if let Some(driver) = &self.driver {
            base.driver = expand_env_vars(driver)?.parse()?;
            base.port = base.driver.default_port();
        }
        if let Some(user) = &self.user {
            base.user = expand_env_vars(user)?;
        }
        if let Some(password) = &self.password {
            base.password = expand_env_vars(password)?;
        }
        if let Some(host) = &self.host {
            base.host = expand_env_vars(host)?;
        }
        if let Some(port) = self.port {
            base.port = Some(port);
        }
        if let Some(database) = &self.database {
            base.database = expand_env_vars(database)?;
        }
        Ok(base)
    }
}

/// `[defaults]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    /// Dialect for rendered SQL; defaults to the connection driver's.
    pub dialect: Option<String>,
}

/// `[tables.<name>]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub columns: Vec<ColumnRef>,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `TABULA_CONFIG`
    /// 2. `./tabula.toml`
    /// 3. `<user config dir>/tabula/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("TABULA_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("tabula.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tabula").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Connection config: built-in defaults, then `[connection]`, then
    /// `TABULA_DATABASE_*` environment variables.
    pub fn connection_config(&self) -> Result<ConnectionConfig, SettingsError> {
        let config = self.connection.apply(ConnectionConfig::default())?;
        Ok(config.overlay(|key| env::var(key).ok())?)
    }

    /// Dialect from `[defaults]`, falling back to the connection driver's.
    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        match &self.defaults.dialect {
            Some(name) => Ok(name.parse()?),
            None => Ok(self.connection_config()?.dialect()),
        }
    }

    /// In-memory schema source over `[tables]`.
    pub fn schema_source(&self) -> StaticSchemaSource {
        self.tables
            .iter()
            .map(|(name, table)| (name.clone(), table.columns.clone()))
            .collect()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next();
            let name = chars.by_ref().take_while(|&ch| ch != '}').collect();
            name
        } else {
            // $VAR ends at the first character that is not alphanumeric or '_'
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                // Lone '$'
                result.push('$');
                continue;
            }
            name
        };

        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
