//! Integration tests for the price registry

use chrono::{Duration, TimeZone, Utc};
use price_pulse::feed::{CoinCapFeed, PriceFrame};
use price_pulse::registry::{Delta, Direction, HistoryRetention, PriceRegistry};
use rust_decimal_macros::dec;

const TRACKED: [&str; 4] = ["bitcoin", "ethereum", "monero", "litecoin"];

#[test]
fn test_decoded_frames_drive_registry() {
    let mut registry = PriceRegistry::new(TRACKED, HistoryRetention::Unbounded).unwrap();
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    let frames = [
        r#"{"bitcoin":"100","ethereum":"1800.5"}"#,
        r#"{"bitcoin":"90","dogecoin":"0.07"}"#,
        r#"{"bitcoin":"95"}"#,
    ];
    for (i, raw) in frames.iter().enumerate() {
        let prices = CoinCapFeed::decode_frame(raw).unwrap();
        registry.apply_frame(&PriceFrame::at(start + Duration::seconds(i as i64), prices));
    }

    let bitcoin = registry.snapshot("bitcoin").unwrap();
    assert_eq!(bitcoin.current_price, Some(dec!(95)));
    assert_eq!(bitcoin.highest_price, Some(dec!(100)));
    assert_eq!(bitcoin.lowest_price, Some(dec!(90)));
    assert_eq!(bitcoin.history.len(), 3);
    assert_eq!(
        registry.delta("bitcoin"),
        Some(Delta {
            direction: Direction::Down,
            magnitude: dec!(5)
        })
    );

    assert_eq!(registry.snapshot("ethereum").unwrap().history.len(), 1);
    assert!(registry.snapshot("monero").unwrap().is_empty());
    assert!(!registry.contains("dogecoin"));
}

#[test]
fn test_malformed_frame_leaves_registry_untouched() {
    let mut registry = PriceRegistry::new(TRACKED, HistoryRetention::Unbounded).unwrap();
    registry.apply_observation("monero", dec!(150), Utc::now());
    let before = registry.snapshot("monero").unwrap();

    assert!(CoinCapFeed::decode_frame(r#"{"monero":"oops"}"#).is_err());

    assert_eq!(registry.snapshot("monero").unwrap(), before);
}
