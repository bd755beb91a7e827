//! Configuration loader for the `smogwatch-proxy` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;

use anyhow::{anyhow, Result};

/// Public REST endpoint of the GIOS air-quality API.
pub const DEFAULT_API_URL: &str = "https://api.gios.gov.pl/pjp-api/v1/rest";

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Upstream API base URL, without trailing slash.
    pub api_url: String,

    /// Per-call upstream timeout in seconds.
    pub upstream_timeout_secs: u32,

    /// `size` query parameter sent with paged upstream requests.
    pub page_size: u32,

    /// Page ceiling for the full station list.
    pub stations_max_pages: u32,

    /// Page ceiling for historical measurement queries.
    pub historical_max_pages: u32,

    /// `days` used when a historical request does not specify one.
    pub historical_default_days: u32,

    /// Port the HTTP server listens on.
    pub bind_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `GIOS_API_URL` – upstream base URL (default: public GIOS API)
/// - `UPSTREAM_TIMEOUT_SECS` – per-call timeout (default: 10)
/// - `UPSTREAM_PAGE_SIZE` – page size for paged calls (default: 500)
/// - `STATIONS_MAX_PAGES` – station list page ceiling (default: 50)
/// - `HISTORICAL_MAX_PAGES` – historical page ceiling (default: 10)
/// - `HISTORICAL_DEFAULT_DAYS` – default history window (default: 7)
/// - `BIND_PORT` – listen port (default: 5000)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_url = env_or!("GIOS_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string();
    let upstream_timeout_secs = parse_env_u32!("UPSTREAM_TIMEOUT_SECS", 10);
    let page_size = parse_env_u32!("UPSTREAM_PAGE_SIZE", 500);
    let stations_max_pages = parse_env_u32!("STATIONS_MAX_PAGES", 50);
    let historical_max_pages = parse_env_u32!("HISTORICAL_MAX_PAGES", 10);
    let historical_default_days = parse_env_u32!("HISTORICAL_DEFAULT_DAYS", 7);
    let bind_port = u16::try_from(parse_env_u32!("BIND_PORT", 5000))
        .map_err(|e| anyhow!("Invalid BIND_PORT: {}", e))?;

    if upstream_timeout_secs == 0 {
        return Err(anyhow!("UPSTREAM_TIMEOUT_SECS must be greater than zero"));
    }
    if page_size == 0 {
        return Err(anyhow!("UPSTREAM_PAGE_SIZE must be greater than zero"));
    }

    Ok(Config {
        api_url,
        upstream_timeout_secs,
        page_size,
        stations_max_pages,
        historical_max_pages,
        historical_default_days,
        bind_port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  GIOS_API_URL            : {}", self.api_url);
        tracing::info!("  UPSTREAM_TIMEOUT_SECS   : {}", self.upstream_timeout_secs);
        tracing::info!("  UPSTREAM_PAGE_SIZE      : {}", self.page_size);
        tracing::info!("  STATIONS_MAX_PAGES      : {}", self.stations_max_pages);
        tracing::info!("  HISTORICAL_MAX_PAGES    : {}", self.historical_max_pages);
        tracing::info!("  HISTORICAL_DEFAULT_DAYS : {}", self.historical_default_days);
        tracing::info!("  BIND_PORT               : {}", self.bind_port);
    }
}

#[cfg(test)]
impl Config {
    /// Defaults pointed at an arbitrary upstream, for tests.
    pub fn for_upstream(api_url: &str) -> Self {
        // ---
        Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            upstream_timeout_secs: 10,
            page_size: 500,
            stations_max_pages: 50,
            historical_max_pages: 10,
            historical_default_days: 7,
            bind_port: 0,
        }
    }
}
