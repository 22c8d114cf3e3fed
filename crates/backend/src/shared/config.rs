use contracts::usecases::u101_bulk_import::MissingCustomerIdPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

/// Import defaults. `on_missing_customer_id` accepts `"reject"` or a fixed
/// customer id; the embedded default keeps the permissive legacy behavior
/// of attributing ownerless rows to customer 1.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_destination")]
    pub default_destination: String,
    #[serde(default = "default_missing_customer_id")]
    pub on_missing_customer_id: MissingCustomerIdSetting,
}

fn default_branch() -> String {
    "Matriz".to_string()
}

fn default_destination() -> String {
    "Estoque".to_string()
}

fn default_missing_customer_id() -> MissingCustomerIdSetting {
    MissingCustomerIdSetting::DefaultTo(1)
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            default_destination: default_destination(),
            on_missing_customer_id: default_missing_customer_id(),
        }
    }
}

/// TOML-friendly form of [`MissingCustomerIdPolicy`]: either the literal
/// string "reject" or a customer id number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MissingCustomerIdSetting {
    Keyword(RejectKeyword),
    DefaultTo(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectKeyword {
    Reject,
}

impl MissingCustomerIdSetting {
    pub fn to_policy(self) -> MissingCustomerIdPolicy {
        match self {
            MissingCustomerIdSetting::Keyword(RejectKeyword::Reject) => {
                MissingCustomerIdPolicy::Reject
            }
            MissingCustomerIdSetting::DefaultTo(id) => MissingCustomerIdPolicy::DefaultTo(id),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[import]
default_branch = "Matriz"
default_destination = "Estoque"
on_missing_customer_id = 1
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
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
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
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.import.default_branch, "Matriz");
        assert_eq!(
            config.import.on_missing_customer_id.to_policy(),
            MissingCustomerIdPolicy::DefaultTo(1)
        );
    }

    #[test]
    fn test_reject_keyword_parses() {
        let config: Config = toml::from_str(
            r#"
            [database]
            path = "x.db"

            [import]
            on_missing_customer_id = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.import.on_missing_customer_id.to_policy(),
            MissingCustomerIdPolicy::Reject
        );
    }
}
