use super::schema::LoginConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./portico.yaml
    /// 2. ~/.portico/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<LoginConfig, ConfigError> {
        let local_config = PathBuf::from("./portico.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".portico").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(LoginConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<LoginConfig, ConfigError> {
        tracing::debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<LoginConfig, ConfigError> {
        // An empty file is a valid "all defaults" config.
        if content.trim().is_empty() {
            return Ok(LoginConfig::default());
        }
        let config: LoginConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

/// Upper bound for any single timeout (one day).
pub const MAX_TIMEOUT_MS: u64 = 24 * 60 * 60 * 1000;

/// Reject configurations the workflow cannot possibly run with.
pub fn validate(config: &LoginConfig) -> Result<(), ConfigError> {
    url::Url::parse(&config.target_url).map_err(|e| {
        ConfigError::Invalid(format!("target_url '{}': {}", config.target_url, e))
    })?;

    let selectors = &config.selectors;
    for (name, group) in [
        ("username", &selectors.username),
        ("password", &selectors.password),
        ("login_button", &selectors.login_button),
    ] {
        if group.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "selector group '{}' has no candidates",
                name
            )));
        }
    }

    if let Some((name, _)) = config.timeouts.all().iter().find(|(_, ms)| *ms == 0) {
        return Err(ConfigError::Invalid(format!("timeout '{}' must be > 0", name)));
    }
    if let Some((name, _)) = config
        .timeouts
        .all()
        .iter()
        .find(|(_, ms)| *ms > MAX_TIMEOUT_MS)
    {
        return Err(ConfigError::Invalid(format!(
            "timeout '{}' must be at most {}ms",
            name, MAX_TIMEOUT_MS
        )));
    }

    Ok(())
}
