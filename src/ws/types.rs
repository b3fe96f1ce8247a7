//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// WebSocket client configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// WebSocket URL to connect to
    pub url: String,
    /// Connection attempts before the transport gives up (0 = retry forever,
    /// 1 = fail on the first error)
    pub max_reconnect_attempts: u32,
    /// Delay before the first reconnection attempt
    pub initial_reconnect_delay: Duration,
    /// Upper bound for the doubling reconnection delay
    pub max_reconnect_delay: Duration,
    /// Interval for sending keepalive pings
    pub ping_interval: Duration,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 1,
            initial_reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl WsConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set maximum connection attempts
    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnect_attempts = n;
        self
    }

    /// Set initial reconnection delay
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_reconnect_delay = d;
        self
    }

    /// Set maximum reconnection delay
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_reconnect_delay = d;
        self
    }

    /// Set ping interval
    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }

    /// Delay to wait after `delay`, doubling up to the configured maximum
    pub(crate) fn next_delay(&self, delay: Duration) -> Duration {
        (delay * 2).min(self.max_reconnect_delay)
    }

    /// Whether another attempt is allowed after `attempts` failures
    pub(crate) fn may_retry(&self, attempts: u32) -> bool {
        self.max_reconnect_attempts == 0 || attempts < self.max_reconnect_attempts
    }
}

/// Events delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    /// Connection established
    Connected,
    /// Text frame from the server
    Text(String),
    /// Connection lost, another attempt follows
    Reconnecting { attempt: u32 },
    /// Server closed the connection with a close frame
    Closed,
    /// Connection failed and no further attempt will be made
    Failed(String),
}

/// WebSocket errors
#[derive(Debug, Clone, Error)]
pub enum WsError {
    /// Connection failed or dropped
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Writing a frame to the socket failed
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// No pong arrived within one ping interval
    #[error("Pong timeout")]
    PongTimeout,
}
