//! Price feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One asset price reported by the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Asset identifier (e.g., "bitcoin")
    pub asset: String,
    /// Reported price in USD
    pub price: Decimal,
}

impl PriceUpdate {
    pub fn new(asset: impl Into<String>, price: Decimal) -> Self {
        Self {
            asset: asset.into(),
            price,
        }
    }
}

/// All prices decoded from a single inbound frame
///
/// The feed carries no event time, so every update in the frame is stamped
/// with the local time the frame was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFrame {
    /// Local timestamp when the frame was received
    pub received_at: DateTime<Utc>,
    /// Decoded prices, possibly a subset of the subscribed assets
    pub prices: Vec<PriceUpdate>,
}

impl PriceFrame {
    /// Stamp decoded prices with the current time
    pub fn now(prices: Vec<PriceUpdate>) -> Self {
        Self::at(Utc::now(), prices)
    }

    /// Stamp decoded prices with an explicit time
    pub fn at(received_at: DateTime<Utc>, prices: Vec<PriceUpdate>) -> Self {
        Self {
            received_at,
            prices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Price feed errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    /// Frame could not be decoded; the stream continues
    #[error("Malformed price frame: {0}")]
    Decode(String),
    /// Connection could not be established or dropped; terminal
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// A live subscription: decoded frames plus the receive loop's outcome
pub struct Subscription {
    /// Decoded frames in arrival order
    pub frames: mpsc::Receiver<PriceFrame>,
    task: JoinHandle<Result<(), FeedError>>,
}

impl Subscription {
    pub(crate) fn new(
        frames: mpsc::Receiver<PriceFrame>,
        task: JoinHandle<Result<(), FeedError>>,
    ) -> Self {
        Self { frames, task }
    }

    /// Wait for the receive loop to end and return why it ended
    pub async fn finish(self) -> Result<(), FeedError> {
        drop(self.frames);
        self.task
            .await
            .map_err(|e| FeedError::Transport(format!("feed task aborted: {}", e)))?
    }
}
