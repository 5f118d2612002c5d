use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub github: GithubSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub session: SessionSettings,
    pub scoring: ScoringSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    pub detail_concurrency: Option<usize>,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub user_profiles: String,
    pub github_credentials: String,
    pub digest_subscriptions: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_bounty_weight")]
    pub bounty: u32,
    #[serde(default = "default_stars_over_100_weight")]
    pub stars_over_100: u32,
    #[serde(default = "default_stars_over_1000_weight")]
    pub stars_over_1000: u32,
    #[serde(default = "default_updated_within_day_weight")]
    pub updated_within_day: u32,
    #[serde(default = "default_updated_within_week_weight")]
    pub updated_within_week: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            bounty: default_bounty_weight(),
            stars_over_100: default_stars_over_100_weight(),
            stars_over_1000: default_stars_over_1000_weight(),
            updated_within_day: default_updated_within_day_weight(),
            updated_within_week: default_updated_within_week_weight(),
        }
    }
}

fn default_bounty_weight() -> u32 {
    50
}
fn default_stars_over_100_weight() -> u32 {
    20
}
fn default_stars_over_1000_weight() -> u32 {
    30
}
fn default_updated_within_day_weight() -> u32 {
    20
}
fn default_updated_within_week_weight() -> u32 {
    10
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides
    /// earlier):
    /// 1. Configuration file (config/default.toml)
    /// 2. Local overrides (config/local.toml)
    /// 3. Environment variables prefixed with GITSCOUT_
    ///    (e.g. GITSCOUT_SERVER__PORT -> server.port)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("GITSCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GITSCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed environment overrides
///
/// DATABASE_URL and REDIS_URL are what deployment platforms inject, so they
/// win over anything in the config files.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.bounty, 50);
        assert_eq!(weights.stars_over_100, 20);
        assert_eq!(weights.stars_over_1000, 30);
        assert_eq!(weights.updated_within_day, 20);
        assert_eq!(weights.updated_within_week, 10);
    }

    #[test]
    fn test_github_api_url_default() {
        assert_eq!(default_github_api_url(), "https://api.github.com");
    }
}
