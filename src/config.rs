//! Configuration types for price-pulse

use crate::registry::HistoryRetention;
use crate::telemetry::LogFormat;
use crate::ws::WsConfig;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Streaming endpoint without the `assets` query parameter
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Tracked asset identifiers; also the registry's key set
    pub assets: Vec<String>,

    /// Connection attempts before giving up (1 = no retry, 0 = infinite)
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    #[serde(default = "default_initial_reconnect_delay_ms")]
    pub initial_reconnect_delay_ms: u64,

    #[serde(default = "default_max_reconnect_delay_ms")]
    pub max_reconnect_delay_ms: u64,

    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
}

fn default_endpoint() -> String {
    "wss://ws.coincap.io/prices".to_string()
}
fn default_max_reconnect_attempts() -> u32 {
    1
}
fn default_initial_reconnect_delay_ms() -> u64 {
    1_000
}
fn default_max_reconnect_delay_ms() -> u64 {
    60_000
}
fn default_ping_interval_secs() -> u64 {
    30
}

impl FeedConfig {
    /// Transport settings for the given subscription URL
    pub fn ws_config(&self, url: impl Into<String>) -> WsConfig {
        WsConfig::new(url)
            .max_reconnects(self.max_reconnect_attempts)
            .initial_delay(Duration::from_millis(self.initial_reconnect_delay_ms))
            .max_delay(Duration::from_millis(self.max_reconnect_delay_ms))
            .ping_interval(Duration::from_secs(self.ping_interval_secs))
    }
}

/// History retention configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub retention: RetentionMode,

    /// Observations kept per asset in `capacity` mode
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Age limit in seconds in `window` mode
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// How much history each asset keeps
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetentionMode {
    #[default]
    Unbounded,
    Capacity,
    Window,
}

fn default_capacity() -> usize {
    10_000
}
fn default_window_secs() -> u64 {
    3_600
}

/// Longest accepted retention window, about 100 years
const MAX_WINDOW_SECS: u64 = 100 * 365 * 24 * 3_600;

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention: RetentionMode::Unbounded,
            capacity: default_capacity(),
            window_secs: default_window_secs(),
        }
    }
}

impl HistoryConfig {
    /// Resolve the configured mode into a registry policy
    pub fn policy(&self) -> HistoryRetention {
        match self.retention {
            RetentionMode::Unbounded => HistoryRetention::Unbounded,
            RetentionMode::Capacity => HistoryRetention::Capacity(self.capacity),
            RetentionMode::Window => HistoryRetention::Window(
                i64::try_from(self.window_secs.min(MAX_WINDOW_SECS))
                    .ok()
                    .and_then(chrono::Duration::try_seconds)
                    .unwrap_or(chrono::Duration::MAX),
            ),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    /// Asset shown at startup; defaults to the first tracked asset
    #[serde(default)]
    pub selected: Option<String>,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.feed.assets.is_empty(), "feed.assets must not be empty");
        anyhow::ensure!(
            self.history.retention != RetentionMode::Capacity || self.history.capacity > 0,
            "history.capacity must be positive"
        );
        anyhow::ensure!(
            self.feed.ping_interval_secs > 0,
            "feed.ping_interval_secs must be positive"
        );
        anyhow::ensure!(
            self.history.window_secs <= MAX_WINDOW_SECS,
            "history.window_secs must be at most {}",
            MAX_WINDOW_SECS
        );
        if let Some(ref selected) = self.dashboard.selected {
            anyhow::ensure!(
                self.feed.assets.iter().any(|a| a.eq_ignore_ascii_case(selected)),
                "dashboard.selected '{}' is not a tracked asset",
                selected
            );
        }
        Ok(())
    }
}
