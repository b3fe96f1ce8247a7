//! Integration tests for price feed module

use price_pulse::feed::{CoinCapFeed, FeedError, PriceFeed, PriceUpdate};
use rust_decimal_macros::dec;
use std::time::Duration;

#[tokio::test]
async fn test_subscribe_to_unreachable_endpoint_is_terminal() {
    let feed = CoinCapFeed::new("ws://127.0.0.1:1/prices", ["bitcoin", "ethereum"]);
    let mut subscription = feed.subscribe().await.unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), subscription.frames.recv())
        .await
        .expect("Test timed out");
    assert!(frame.is_none());

    assert!(matches!(
        subscription.finish().await,
        Err(FeedError::Transport(_))
    ));
}

#[tokio::test]
async fn test_subscribe_without_assets_fails() {
    let feed = CoinCapFeed::with_assets(Vec::<String>::new());
    assert!(feed.subscribe().await.is_err());
}

#[test]
fn test_decode_coincap_frame() {
    let prices =
        CoinCapFeed::decode_frame(r#"{"bitcoin":"6929.82","litecoin":"55.01"}"#).unwrap();
    assert_eq!(
        prices,
        vec![
            PriceUpdate::new("bitcoin", dec!(6929.82)),
            PriceUpdate::new("litecoin", dec!(55.01)),
        ]
    );
}
