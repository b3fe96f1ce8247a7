//! CoinCap WebSocket price feed implementation

use super::{FeedError, PriceFeed, PriceFrame, PriceUpdate, Subscription};
use crate::config::FeedConfig;
use crate::telemetry::{self, CounterMetric};
use crate::ws::{WsClient, WsConfig, WsMessage};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use tokio::sync::mpsc;

/// CoinCap price stream URL
const COINCAP_WS_URL: &str = "wss://ws.coincap.io/prices";

/// A price value as it appears on the wire
///
/// CoinCap sends prices as strings (`"6929.82"`), other producers as numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl RawPrice {
    /// Parse into a strictly positive price
    fn to_decimal(&self) -> Option<Decimal> {
        let text = match self {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
            .filter(|price| price.is_sign_positive() && !price.is_zero())
    }
}

/// CoinCap feed for a fixed set of assets
pub struct CoinCapFeed {
    endpoint: String,
    assets: Vec<String>,
    ws_config: Option<WsConfig>,
}

impl CoinCapFeed {
    /// Create a feed for the given endpoint and asset identifiers
    pub fn new<I, S>(endpoint: impl Into<String>, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            endpoint: endpoint.into(),
            assets: assets
                .into_iter()
                .map(|a| a.as_ref().trim().to_lowercase())
                .collect(),
            ws_config: None,
        }
    }

    /// Create a feed against the public CoinCap endpoint
    pub fn with_assets<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(COINCAP_WS_URL, assets)
    }

    /// Create a feed from configuration, including transport settings
    pub fn from_config(config: &FeedConfig) -> Self {
        let mut feed = Self::new(config.endpoint.clone(), &config.assets);
        feed.ws_config = Some(config.ws_config(feed.build_ws_url()));
        feed
    }

    /// Subscribed asset identifiers, lowercased
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Build the WebSocket URL with the comma-joined asset list
    pub fn build_ws_url(&self) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}assets={}",
            self.endpoint,
            separator,
            self.assets.join(",")
        )
    }

    /// Decode one frame into asset/price pairs
    ///
    /// A frame is a flat JSON object of identifier to price and may carry any
    /// subset of the subscribed assets. Pairs keep their wire order. One
    /// unparsable or non-positive price rejects the frame.
    pub fn decode_frame(raw: &str) -> Result<Vec<PriceUpdate>, FeedError> {
        let prices: Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| FeedError::Decode(e.to_string()))?;

        prices
            .into_iter()
            .map(|(asset, value)| {
                let raw_price: RawPrice = serde_json::from_value(value)
                    .map_err(|e| FeedError::Decode(format!("invalid price for {}: {}", asset, e)))?;
                let price = raw_price.to_decimal().ok_or_else(|| {
                    FeedError::Decode(format!("invalid price for {}: {:?}", asset, raw_price))
                })?;
                Ok(PriceUpdate { asset, price })
            })
            .collect()
    }

    /// Run the message processing loop until the transport ends
    ///
    /// Returns `Ok(())` only when the frame receiver is dropped.
    async fn run_message_loop(
        mut ws_rx: mpsc::Receiver<WsMessage>,
        frame_tx: mpsc::Sender<PriceFrame>,
    ) -> Result<(), FeedError> {
        while let Some(msg) = ws_rx.recv().await {
            match msg {
                WsMessage::Text(text) => match Self::decode_frame(&text) {
                    Ok(prices) if prices.is_empty() => {
                        tracing::debug!("Skipping empty price frame");
                    }
                    Ok(prices) => {
                        telemetry::increment(CounterMetric::Frames);
                        if frame_tx.send(PriceFrame::now(prices)).await.is_err() {
                            tracing::debug!("Frame receiver dropped, stopping feed");
                            return Ok(());
                        }
                    }
                    Err(e) => {
                        telemetry::increment(CounterMetric::DecodeErrors);
                        tracing::warn!(error = %e, frame = %text, "Dropping malformed frame");
                    }
                },
                WsMessage::Connected => {
                    tracing::info!("CoinCap feed connected");
                }
                WsMessage::Reconnecting { attempt } => {
                    tracing::warn!(attempt, "CoinCap feed reconnecting...");
                }
                WsMessage::Closed => {
                    return Err(FeedError::Transport("connection closed by server".into()));
                }
                WsMessage::Failed(reason) => {
                    return Err(FeedError::Transport(reason));
                }
            }
        }

        Err(FeedError::Transport("transport stopped".into()))
    }
}

#[async_trait]
impl PriceFeed for CoinCapFeed {
    async fn subscribe(&self) -> anyhow::Result<Subscription> {
        anyhow::ensure!(!self.assets.is_empty(), "no assets to subscribe to");

        let (frame_tx, frame_rx) = mpsc::channel(1024);
        let url = self.build_ws_url();

        tracing::info!(assets = %self.assets.join(","), "Subscribing to CoinCap feed");

        let config = self
            .ws_config
            .clone()
            .unwrap_or_else(|| WsConfig::new(url.clone()));
        let ws_rx = WsClient::new(config).connect();

        let task = tokio::spawn(async move {
            let result = Self::run_message_loop(ws_rx, frame_tx).await;
            if let Err(ref e) = result {
                tracing::error!(error = %e, "CoinCap feed stopped");
            }
            result
        });

        Ok(Subscription::new(frame_rx, task))
    }
}
