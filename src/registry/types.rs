//! Price model types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single (timestamp, price) data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Local time the price was ingested
    pub timestamp: DateTime<Utc>,
    /// Observed price in USD
    pub price: Decimal,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self { timestamp, price }
    }
}

/// How much history each asset keeps
///
/// Extrema and the delta basis cover every observation ever applied,
/// regardless of what the history still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryRetention {
    /// Keep everything; memory grows for the lifetime of the process
    #[default]
    Unbounded,
    /// Keep the most recent `n` observations
    Capacity(usize),
    /// Keep observations no older than the newest one minus the window
    Window(chrono::Duration),
}

/// Direction of the change since the first observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Change of the current price relative to the first-ever observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    pub direction: Direction,
    /// Absolute difference, never negative
    pub magnitude: Decimal,
}

impl Delta {
    /// Compare `current` against `basis`; `None` if the difference overflows
    pub fn between(basis: Decimal, current: Decimal) -> Option<Self> {
        let direction = if current > basis {
            Direction::Up
        } else if current < basis {
            Direction::Down
        } else {
            Direction::Flat
        };

        Some(Self {
            direction,
            magnitude: current.checked_sub(basis)?.abs(),
        })
    }

    /// Signed difference (negative when down)
    pub fn signed(&self) -> Decimal {
        match self.direction {
            Direction::Down => -self.magnitude,
            _ => self.magnitude,
        }
    }
}

/// Read-only copy of one asset's model, safe to hand to a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSnapshot {
    pub identifier: String,
    pub current_price: Option<Decimal>,
    pub highest_price: Option<Decimal>,
    pub lowest_price: Option<Decimal>,
    /// Observation holding the running high (first occurrence)
    pub highest: Option<Observation>,
    /// Observation holding the running low (first occurrence)
    pub lowest: Option<Observation>,
    /// First-ever observation, the delta basis
    pub first: Option<Observation>,
    /// Retained history in arrival order
    pub history: Vec<Observation>,
    /// Observations applied since startup, including evicted ones
    pub observation_count: u64,
}

impl AssetSnapshot {
    /// Change since the first observation, if any price has arrived
    pub fn delta(&self) -> Option<Delta> {
        Delta::between(self.first?.price, self.current_price?)
    }

    pub fn is_empty(&self) -> bool {
        self.observation_count == 0
    }
}
