use std::env;
use std::net::IpAddr;
use std::time::Duration;

use consumet_demo::settings::{DEFAULT_SESSION_DURATION, DEFAULT_SWEEP_INTERVAL};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_DEMO_PAGE_PATH: &str = "demo/apidemo.html";
const DEMO_ENV: &str = "DEMO";

/// Demo-mode settings. Present only when `NODE_ENV=DEMO`.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Lifetime of an activated session
    pub session_duration: Duration,
    /// Period of the expiry sweep
    pub sweep_interval: Duration,
    /// Static activation page served on GET /apidemo
    pub page_path: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            session_duration: DEFAULT_SESSION_DURATION,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            page_path: DEFAULT_DEMO_PAGE_PATH.to_string(),
        }
    }
}

/// Coordinates of the shared cache used by provider routes.
#[derive(Clone)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    /// Listen host
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// Demo mode bundle settings (None = demo mode off)
    pub demo: Option<DemoConfig>,
    /// Take client identity from Forwarded / X-Forwarded-For instead of the socket
    pub trust_proxy: bool,
    /// Shared cache for providers (None = cache disabled)
    pub cache: Option<CacheConfig>,
    /// TMDB API key for the meta provider
    pub tmdb_key: Option<String>,
    /// Bearer token required for /metrics (None = public)
    pub metrics_token: Option<String>,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("demo", &self.demo)
            .field("trust_proxy", &self.trust_proxy)
            .field("cache", &self.cache)
            .field("tmdb_key", &self.tmdb_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            demo: None,
            trust_proxy: false,
            cache: None,
            tmdb_key: None,
            metrics_token: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        // Optional: port, falls back on garbage like the node runtime did
        let port = var("PORT")
            .and_then(|s| s.trim().parse().ok())
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_PORT);

        let host_str = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host_str
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HOST", host_str.clone()))?;

        let demo = if var("NODE_ENV").as_deref() == Some(DEMO_ENV) {
            Some(DemoConfig {
                session_duration: parse_secs(&var, "DEMO_SESSION_SECS", DEFAULT_SESSION_DURATION)?,
                sweep_interval: parse_secs(&var, "DEMO_SWEEP_SECS", DEFAULT_SWEEP_INTERVAL)?,
                page_path: var("DEMO_PAGE_PATH")
                    .unwrap_or_else(|| DEFAULT_DEMO_PAGE_PATH.to_string()),
            })
        } else {
            None
        };

        let trust_proxy = var("TRUST_PROXY")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let cache = var("REDIS_HOST").map(|host| CacheConfig {
            host,
            port: var("REDIS_PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_REDIS_PORT),
            password: var("REDIS_PASSWORD"),
        });

        let tmdb_key = var("TMDB_KEY");
        let metrics_token = var("METRICS_TOKEN");

        if cache.is_none() {
            tracing::warn!("Redis not found. Cache disabled.");
        }
        if tmdb_key.is_none() {
            tracing::warn!("TMDB api key not found. the TMDB meta route may not work.");
        }
        if metrics_token.is_none() {
            tracing::warn!("METRICS_TOKEN not set, /metrics endpoint is publicly accessible");
        }

        Ok(Self {
            host,
            port,
            demo,
            trust_proxy,
            cache,
            tmdb_key,
            metrics_token,
        })
    }

    pub fn demo_mode(&self) -> bool {
        self.demo.is_some()
    }
}

/// Parse a positive number of seconds, or fall back to `default` when unset.
fn parse_secs<F>(var: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(ConfigError::InvalidValue(key, raw)),
            Ok(secs) => Ok(Duration::from_secs(secs)),
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(&'static str, String),
}
