//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Exchange-rate resolution configuration.
    #[serde(default)]
    pub exchange_rates: ExchangeRatesConfig,
    /// Background maintenance configuration.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Exchange-rate providers and cache policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeRatesConfig {
    /// API key for the primary provider. Without it the primary tier is skipped.
    pub api_key: Option<String>,
    /// Base URL of the keyed primary provider.
    pub primary_url: String,
    /// Base URL of the key-less fallback provider.
    pub fallback_url: String,
    /// Per-request timeout for provider calls.
    pub timeout_secs: u64,
    /// Age under which a cached rate is served without further lookups.
    pub fresh_hours: i64,
    /// Age under which a cached rate is still usable, including for inference.
    pub stale_hours: i64,
    /// Cached rows kept per currency pair.
    pub retain_per_pair: usize,
    /// Currency used to bridge pairs with no direct or reverse rate.
    pub reference_currency: String,
}

impl Default for ExchangeRatesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            primary_url: "https://v6.exchangerate-api.com/v6".to_string(),
            fallback_url: "https://api.exchangerate-api.com/v4/latest".to_string(),
            timeout_secs: 10,
            fresh_hours: 6,
            stale_hours: 48,
            retain_per_pair: 20,
            reference_currency: "USD".to_string(),
        }
    }
}

/// Periodic maintenance run by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Whether the maintenance task runs at all.
    pub enabled: bool,
    /// Seconds between runs.
    pub interval_secs: u64,
    /// Notifications older than this many days are deleted.
    pub notification_retention_days: i64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 3600,
            notification_retention_days: 180,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CAPTAIN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/captain"

            [jwt]
            secret = "secret"
            "#,
        );

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.access_token_expiry_secs, 900);
        assert!(config.exchange_rates.api_key.is_none());
        assert_eq!(config.exchange_rates.timeout_secs, 10);
        assert_eq!(config.exchange_rates.fresh_hours, 6);
        assert_eq!(config.exchange_rates.stale_hours, 48);
        assert_eq!(config.exchange_rates.retain_per_pair, 20);
        assert_eq!(config.exchange_rates.reference_currency, "USD");
        assert!(config.maintenance.enabled);
        assert_eq!(config.maintenance.notification_retention_days, 180);
    }

    #[test]
    fn test_exchange_rate_overrides() {
        let config = parse(
            r#"
            [database]
            url = "sqlite::memory:"

            [jwt]
            secret = "secret"

            [exchange_rates]
            api_key = "abc123"
            fresh_hours = 1
            retain_per_pair = 5

            [maintenance]
            enabled = false
            "#,
        );

        assert_eq!(config.exchange_rates.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.exchange_rates.fresh_hours, 1);
        assert_eq!(config.exchange_rates.stale_hours, 48);
        assert_eq!(config.exchange_rates.retain_per_pair, 5);
        assert!(!config.maintenance.enabled);
        assert_eq!(config.maintenance.interval_secs, 3600);
    }

    #[test]
    fn test_missing_database_section_fails() {
        let result = Config::builder()
            .add_source(File::from_str("[jwt]\nsecret = \"s\"", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>();

        assert!(result.is_err());
    }
}
