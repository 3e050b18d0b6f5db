//! Configuration loader for Giftafy.
//!
//! Reads `config.toml` from the data directory (`~/.giftafy/` in production)
//! and deserializes it into [`GiftafyConfig`]. Falls back to defaults when
//! the file is missing or malformed. The search API key can be supplied
//! through the environment instead of the file.

use std::path::Path;

use giftafy_types::config::GiftafyConfig;

use crate::filesystem::config_path;

/// Environment variable overriding `search_api_key`.
pub const SEARCH_API_KEY_ENV: &str = "GIFTAFY_SEARCH_API_KEY";

/// Load configuration from `{data_dir}/config.toml`, then apply environment
/// overrides.
///
/// - If the file does not exist, starts from [`GiftafyConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and uses the default.
pub async fn load_config(data_dir: &Path) -> GiftafyConfig {
    let mut config = read_config_file(data_dir).await;
    apply_env_overrides(&mut config, std::env::var(SEARCH_API_KEY_ENV).ok());
    config
}

async fn read_config_file(data_dir: &Path) -> GiftafyConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return GiftafyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GiftafyConfig::default();
        }
    };

    match toml::from_str::<GiftafyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GiftafyConfig::default()
        }
    }
}

/// A non-empty key from the environment wins over the file.
pub fn apply_env_overrides(config: &mut GiftafyConfig, env_api_key: Option<String>) {
    if let Some(key) = env_api_key.filter(|k| !k.trim().is_empty()) {
        config.search_api_key = Some(key);
    }
}
