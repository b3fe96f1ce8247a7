//! Price model registry
//!
//! Owns one [`AssetModel`] per tracked asset. The key set is fixed when the
//! registry is built; observations for any other identifier are ignored.

mod asset;
mod types;

pub use asset::AssetModel;
pub use types::{AssetSnapshot, Delta, Direction, HistoryRetention, Observation};

use crate::feed::PriceFrame;
use crate::telemetry::{self, AssetMetric, CounterMetric};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// Registry construction errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No identifiers were supplied
    #[error("Registry needs at least one asset")]
    NoAssets,
    /// An identifier was supplied twice
    #[error("Duplicate asset: {0}")]
    DuplicateAsset(String),
    /// An identifier was blank
    #[error("Asset identifier must not be blank")]
    BlankIdentifier,
}

/// Fixed set of asset models, updated in place as prices arrive
#[derive(Debug, Clone)]
pub struct PriceRegistry {
    /// Models in configured order
    assets: Vec<AssetModel>,
    /// Identifier to position in `assets`
    index: HashMap<String, usize>,
    retention: HistoryRetention,
}

impl PriceRegistry {
    /// Create one empty model per identifier
    ///
    /// Identifiers are trimmed and lowercased to match the feed's keys.
    pub fn new<I, S>(identifiers: I, retention: HistoryRetention) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut assets = Vec::new();
        let mut index = HashMap::new();

        for identifier in identifiers {
            let identifier = identifier.as_ref().trim().to_lowercase();
            if identifier.is_empty() {
                return Err(RegistryError::BlankIdentifier);
            }
            if index.contains_key(&identifier) {
                return Err(RegistryError::DuplicateAsset(identifier));
            }
            index.insert(identifier.clone(), assets.len());
            assets.push(AssetModel::new(identifier));
        }

        if assets.is_empty() {
            return Err(RegistryError::NoAssets);
        }

        tracing::debug!(count = assets.len(), ?retention, "Price registry initialized");

        Ok(Self {
            assets,
            index,
            retention,
        })
    }

    /// Apply one price observation
    ///
    /// Returns `false` without touching any model when the identifier is not
    /// tracked.
    pub fn apply_observation(
        &mut self,
        identifier: &str,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> bool {
        let Some(&slot) = self.index.get(identifier) else {
            telemetry::increment(CounterMetric::IgnoredObservations);
            tracing::trace!(identifier, %price, "Ignoring untracked asset");
            return false;
        };

        let model = &mut self.assets[slot];
        model.apply(Observation::new(timestamp, price), self.retention);

        telemetry::record_asset(AssetMetric::Observations, identifier, 1.0);
        telemetry::record_asset(
            AssetMetric::Price,
            identifier,
            price.to_f64().unwrap_or_default(),
        );
        telemetry::record_asset(
            AssetMetric::HistoryLen,
            identifier,
            model.history().len() as f64,
        );

        true
    }

    /// Apply every price in a frame, stamped with the frame's receive time
    ///
    /// Returns the identifiers that were updated, in frame order.
    pub fn apply_frame(&mut self, frame: &PriceFrame) -> Vec<String> {
        frame
            .prices
            .iter()
            .filter(|update| self.apply_observation(&update.asset, update.price, frame.received_at))
            .map(|update| update.asset.clone())
            .collect()
    }

    /// Owned copy of one asset's state
    pub fn snapshot(&self, identifier: &str) -> Option<AssetSnapshot> {
        self.get(identifier).map(AssetModel::snapshot)
    }

    /// Change since the first observation; `None` until a price arrives
    pub fn delta(&self, identifier: &str) -> Option<Delta> {
        self.get(identifier)?.delta()
    }

    /// Borrow one asset's model
    pub fn get(&self, identifier: &str) -> Option<&AssetModel> {
        self.index.get(identifier).map(|&slot| &self.assets[slot])
    }

    /// All models in configured order
    pub fn assets(&self) -> impl Iterator<Item = &AssetModel> {
        self.assets.iter()
    }

    /// Tracked identifiers in configured order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(AssetModel::identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false: a registry tracks at least one asset
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn retention(&self) -> HistoryRetention {
        self.retention
    }
}
