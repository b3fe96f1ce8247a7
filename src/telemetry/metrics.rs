//! Prometheus metrics

use ::metrics::{counter, gauge};

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Decoded frames forwarded to the dashboard
    Frames,
    /// Frames dropped because they could not be decoded
    DecodeErrors,
    /// Observations for identifiers outside the tracked set
    IgnoredObservations,
}

/// Per-asset metric types
#[derive(Debug, Clone, Copy)]
pub enum AssetMetric {
    /// Observations applied (counter)
    Observations,
    /// Latest price (gauge)
    Price,
    /// Retained history length (gauge)
    HistoryLen,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::Frames => "pricepulse_frames_total",
            CounterMetric::DecodeErrors => "pricepulse_decode_errors_total",
            CounterMetric::IgnoredObservations => "pricepulse_ignored_observations_total",
        }
    }
}

impl AssetMetric {
    fn name(self) -> &'static str {
        match self {
            AssetMetric::Observations => "pricepulse_observations_total",
            AssetMetric::Price => "pricepulse_price_usd",
            AssetMetric::HistoryLen => "pricepulse_history_len",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    counter!(metric.name()).increment(1);
}

/// Record a per-asset value; counters are incremented by `value`
pub fn record_asset(metric: AssetMetric, asset: &str, value: f64) {
    let asset = asset.to_string();
    match metric {
        AssetMetric::Observations => {
            counter!(metric.name(), "asset" => asset).increment(value as u64)
        }
        AssetMetric::Price | AssetMetric::HistoryLen => {
            gauge!(metric.name(), "asset" => asset).set(value)
        }
    }
}
