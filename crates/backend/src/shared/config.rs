use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::usecases::u501_import_roster::config::ImportConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 secret for bearer tokens; generated and kept in sys_settings when absent
    pub jwt_secret: Option<String>,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[server]
port = 3000

[import]
max_upload_bytes = 5242880
phone_country_code = "+233"
default_password_suffix = "@ECG2026"
wallet_prefix = "CH"
transaction_scope = "row"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_roster::config::TransactionScope;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.import.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.import.transaction_scope, TransactionScope::Row);
        assert_eq!(config.import.headers.staff_id, vec!["Staff #".to_string()]);
    }

    #[test]
    fn test_header_aliases_override() {
        let config = parse_config(
            r#"
[database]
path = "x.db"

[import]
transaction_scope = "batch"

[import.headers]
staff_id = ["Staff #", "Staff No"]
"#,
        )
        .unwrap();
        assert_eq!(config.import.transaction_scope, TransactionScope::Batch);
        assert_eq!(config.import.headers.staff_id.len(), 2);
        // untouched labels keep their defaults
        assert_eq!(config.import.headers.name, vec!["Name".to_string()]);
        assert_eq!(config.import.phone_country_code, "+233");
    }
}
