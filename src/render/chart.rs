//! Chart data derived from a snapshot

use crate::registry::{AssetSnapshot, Observation};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Bars used for the terminal sparkline, lowest first
const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Axis domains and the point series of one asset's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFrame {
    /// Earliest and latest timestamp in the history
    pub time_domain: (DateTime<Utc>, DateTime<Utc>),
    /// Lowest and highest price in the history
    pub price_domain: (Decimal, Decimal),
    pub points: Vec<Observation>,
}

impl ChartFrame {
    /// Build the chart data; `None` when the history is empty
    pub fn from_snapshot(snapshot: &AssetSnapshot) -> Option<Self> {
        let first = snapshot.history.first()?;

        let mut time_domain = (first.timestamp, first.timestamp);
        let mut price_domain = (first.price, first.price);
        for point in &snapshot.history[1..] {
            time_domain.0 = time_domain.0.min(point.timestamp);
            time_domain.1 = time_domain.1.max(point.timestamp);
            price_domain.0 = price_domain.0.min(point.price);
            price_domain.1 = price_domain.1.max(point.price);
        }

        Some(Self {
            time_domain,
            price_domain,
            points: snapshot.history.clone(),
        })
    }

    /// Render the last `width` points as a sparkline scaled to the price domain
    pub fn sparkline(&self, width: usize) -> String {
        let (low, high) = self.price_domain;
        // A span too wide for Decimal is drawn flat
        let span = high.checked_sub(low).unwrap_or_default();
        let top = (SPARK_BARS.len() - 1) as f64;
        let skip = self.points.len().saturating_sub(width);

        self.points[skip..]
            .iter()
            .map(|point| {
                if span.is_zero() {
                    return SPARK_BARS[SPARK_BARS.len() / 2];
                }
                let ratio = point
                    .price
                    .checked_sub(low)
                    .and_then(|offset| offset.checked_div(span))
                    .and_then(|r| r.to_f64())
                    .unwrap_or_default();
                SPARK_BARS[(ratio * top).round().clamp(0.0, top) as usize]
            })
            .collect()
    }
}
