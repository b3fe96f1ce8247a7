//! WebSocket transport
//!
//! Streams text frames from a single endpoint, answers pings, and reports
//! connection lifecycle events. Reconnection with exponential backoff is
//! opt-in through [`WsConfig::max_reconnects`].

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError, WsMessage};
