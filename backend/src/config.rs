//! Configuration management for the Pointcast panel service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PCAST_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream weather provider configuration
    pub provider: ProviderConfig,

    /// Panel assembly configuration
    pub panel: PanelConfig,

    /// Alert threshold configuration
    pub alerts: AlertConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider API base URL
    pub base_url: String,

    /// Provider API username
    pub username: String,

    /// Provider API password
    pub password: String,
}

/// Horizon limits and climatology depth
#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    /// Zone used when a request names none
    pub default_timezone: String,

    /// Furthest horizon (days) served as live forecast
    pub max_forecast_days: f64,

    /// Furthest horizon (days) for which air quality is requested
    pub max_air_quality_days: f64,

    /// Number of prior years pooled for climatology
    pub climate_years_back: u32,

    /// Half-width (days) of the anniversary window per year
    pub climate_half_window_days: i64,
}

/// Two-tier alert thresholds
///
/// Warning tiers fire first; a danger tier supersedes its warning tier
/// for the same rule.
#[derive(Debug, Deserialize, Clone)]
pub struct AlertConfig {
    pub uv_warning: f64,
    pub uv_danger: f64,

    pub heat_warning_c: f64,
    pub heat_danger_c: f64,
    pub cold_warning_c: f64,
    pub cold_danger_c: f64,

    pub rain_prob_warning_pct: f64,
    pub rain_prob_danger_pct: f64,
    pub rain_amount_warning_mm: f64,
    pub rain_amount_danger_mm: f64,

    pub gust_warning_ms: f64,
    pub gust_danger_ms: f64,

    pub apparent_warning_c: f64,
    pub apparent_danger_c: f64,

    pub air_quality_warning: f64,
    pub air_quality_danger: f64,

    /// Emit an informational "no significant alerts" entry when no
    /// rule fired on degraded (climatology) output
    pub no_alert_notice: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PCAST_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("provider.base_url", "https://api.meteomatics.com")?
            .set_default("provider.username", "")?
            .set_default("provider.password", "")?
            .set_default("panel.default_timezone", "UTC")?
            .set_default("panel.max_forecast_days", 14.0)?
            .set_default("panel.max_air_quality_days", 3.0)?
            .set_default("panel.climate_years_back", 5)?
            .set_default("panel.climate_half_window_days", 7)?
            .set_default("alerts.uv_warning", 6.0)?
            .set_default("alerts.uv_danger", 8.0)?
            .set_default("alerts.heat_warning_c", 35.0)?
            .set_default("alerts.heat_danger_c", 40.0)?
            .set_default("alerts.cold_warning_c", 0.0)?
            .set_default("alerts.cold_danger_c", -10.0)?
            .set_default("alerts.rain_prob_warning_pct", 60.0)?
            .set_default("alerts.rain_prob_danger_pct", 85.0)?
            .set_default("alerts.rain_amount_warning_mm", 4.0)?
            .set_default("alerts.rain_amount_danger_mm", 15.0)?
            .set_default("alerts.gust_warning_ms", 17.0)?
            .set_default("alerts.gust_danger_ms", 25.0)?
            .set_default("alerts.apparent_warning_c", 32.0)?
            .set_default("alerts.apparent_danger_c", 41.0)?
            .set_default("alerts.air_quality_warning", 3.0)?
            .set_default("alerts.air_quality_danger", 4.0)?
            .set_default("alerts.no_alert_notice", true)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PCAST_ prefix)
            .add_source(
                Environment::with_prefix("PCAST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            default_timezone: "UTC".to_string(),
            max_forecast_days: 14.0,
            max_air_quality_days: 3.0,
            climate_years_back: 5,
            climate_half_window_days: 7,
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            uv_warning: 6.0,
            uv_danger: 8.0,
            heat_warning_c: 35.0,
            heat_danger_c: 40.0,
            cold_warning_c: 0.0,
            cold_danger_c: -10.0,
            rain_prob_warning_pct: 60.0,
            rain_prob_danger_pct: 85.0,
            rain_amount_warning_mm: 4.0,
            rain_amount_danger_mm: 15.0,
            gust_warning_ms: 17.0,
            gust_danger_ms: 25.0,
            apparent_warning_c: 32.0,
            apparent_danger_c: 41.0,
            air_quality_warning: 3.0,
            air_quality_danger: 4.0,
            no_alert_notice: true,
        }
    }
}
