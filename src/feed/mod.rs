//! Price feed module
//!
//! Subscribes to the CoinCap price stream and decodes each frame into
//! asset/price pairs.

mod coincap;
mod types;

pub use coincap::CoinCapFeed;
pub use types::{FeedError, PriceFrame, PriceUpdate, Subscription};

use async_trait::async_trait;

/// Trait for price feed implementations
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Connect and start the receive loop
    async fn subscribe(&self) -> anyhow::Result<Subscription>;
}
