//! Per-asset rolling price model

use super::types::{AssetSnapshot, Delta, HistoryRetention, Observation};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Running state for one tracked asset
#[derive(Debug, Clone)]
pub struct AssetModel {
    identifier: String,
    current: Option<Observation>,
    highest: Option<Observation>,
    lowest: Option<Observation>,
    first: Option<Observation>,
    history: VecDeque<Observation>,
    observation_count: u64,
}

impl AssetModel {
    /// Create an empty model
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            current: None,
            highest: None,
            lowest: None,
            first: None,
            history: VecDeque::new(),
            observation_count: 0,
        }
    }

    /// Apply one observation
    ///
    /// Extrema are replaced only on a strictly greater (or lower) price, so a
    /// tie keeps the observation that reached the extremum first.
    pub(crate) fn apply(&mut self, observation: Observation, retention: HistoryRetention) {
        self.history.push_back(observation);
        self.current = Some(observation);
        self.first.get_or_insert(observation);
        self.observation_count += 1;

        match self.highest {
            Some(high) if observation.price <= high.price => {}
            _ => self.highest = Some(observation),
        }
        match self.lowest {
            Some(low) if observation.price >= low.price => {}
            _ => self.lowest = Some(observation),
        }

        self.evict(retention);
    }

    /// Drop the oldest entries the retention policy no longer covers
    fn evict(&mut self, retention: HistoryRetention) {
        match retention {
            HistoryRetention::Unbounded => {}
            HistoryRetention::Capacity(capacity) => {
                let capacity = capacity.max(1);
                while self.history.len() > capacity {
                    self.history.pop_front();
                }
            }
            HistoryRetention::Window(window) => {
                let Some(newest) = self.current else {
                    return;
                };
                // No representable cutoff means nothing is old enough to drop
                let Some(cutoff) = newest.timestamp.checked_sub_signed(window) else {
                    return;
                };
                while self.history.len() > 1 {
                    match self.history.front() {
                        Some(oldest) if oldest.timestamp < cutoff => {
                            self.history.pop_front();
                        }
                        _ => break,
                    }
                }
            }
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn current_price(&self) -> Option<Decimal> {
        self.current.map(|o| o.price)
    }

    pub fn highest_price(&self) -> Option<Decimal> {
        self.highest.map(|o| o.price)
    }

    pub fn lowest_price(&self) -> Option<Decimal> {
        self.lowest.map(|o| o.price)
    }

    /// Observation holding the running high
    pub fn highest(&self) -> Option<&Observation> {
        self.highest.as_ref()
    }

    /// Observation holding the running low
    pub fn lowest(&self) -> Option<&Observation> {
        self.lowest.as_ref()
    }

    /// First-ever observation
    pub fn first(&self) -> Option<&Observation> {
        self.first.as_ref()
    }

    pub fn history(&self) -> &VecDeque<Observation> {
        &self.history
    }

    pub fn observation_count(&self) -> u64 {
        self.observation_count
    }

    /// Change of the current price since the first observation
    pub fn delta(&self) -> Option<Delta> {
        Delta::between(self.first?.price, self.current?.price)
    }

    /// Owned copy for rendering
    pub fn snapshot(&self) -> AssetSnapshot {
        AssetSnapshot {
            identifier: self.identifier.clone(),
            current_price: self.current_price(),
            highest_price: self.highest_price(),
            lowest_price: self.lowest_price(),
            highest: self.highest,
            lowest: self.lowest,
            first: self.first,
            history: self.history.iter().copied().collect(),
            observation_count: self.observation_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Direction;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn apply_all(model: &mut AssetModel, prices: &[Decimal], retention: HistoryRetention) {
        for (i, price) in prices.iter().enumerate() {
            model.apply(Observation::new(at(i as i64), *price), retention);
        }
    }

    #[test]
    fn test_new_model_is_empty() {
        let model = AssetModel::new("bitcoin");
        assert_eq!(model.identifier(), "bitcoin");
        assert!(model.current_price().is_none());
        assert!(model.highest_price().is_none());
        assert!(model.lowest_price().is_none());
        assert!(model.history().is_empty());
        assert!(model.delta().is_none());
    }

    #[test]
    fn test_first_observation_sets_everything() {
        let mut model = AssetModel::new("bitcoin");
        model.apply(Observation::new(at(0), dec!(100)), HistoryRetention::Unbounded);

        assert_eq!(model.current_price(), Some(dec!(100)));
        assert_eq!(model.highest_price(), Some(dec!(100)));
        assert_eq!(model.lowest_price(), Some(dec!(100)));
        assert_eq!(model.first().unwrap().price, dec!(100));
        assert_eq!(model.delta().unwrap().direction, Direction::Flat);
    }

    #[test]
    fn test_ties_keep_first_extremum() {
        let mut model = AssetModel::new("bitcoin");
        apply_all(
            &mut model,
            &[dec!(100), dec!(90), dec!(100), dec!(90.0)],
            HistoryRetention::Unbounded,
        );

        assert_eq!(model.highest().unwrap().timestamp, at(0));
        assert_eq!(model.lowest().unwrap().timestamp, at(1));
    }

    #[test]
    fn test_capacity_eviction_keeps_extrema_and_basis() {
        let mut model = AssetModel::new("bitcoin");
        apply_all(
            &mut model,
            &[dec!(100), dec!(200), dec!(50), dec!(120), dec!(130)],
            HistoryRetention::Capacity(2),
        );

        let prices: Vec<_> = model.history().iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![dec!(120), dec!(130)]);
        assert_eq!(model.highest_price(), Some(dec!(200)));
        assert_eq!(model.lowest_price(), Some(dec!(50)));
        assert_eq!(model.observation_count(), 5);

        let delta = model.delta().unwrap();
        assert_eq!(delta.direction, Direction::Up);
        assert_eq!(delta.magnitude, dec!(30));
    }

    #[test]
    fn test_window_eviction_drops_old_entries() {
        let mut model = AssetModel::new("bitcoin");
        let retention = HistoryRetention::Window(Duration::seconds(10));
        model.apply(Observation::new(at(0), dec!(1)), retention);
        model.apply(Observation::new(at(5), dec!(2)), retention);
        model.apply(Observation::new(at(12), dec!(3)), retention);

        let times: Vec<_> = model.history().iter().map(|o| o.timestamp).collect();
        assert_eq!(times, vec![at(5), at(12)]);

        model.apply(Observation::new(at(100), dec!(4)), retention);
        assert_eq!(model.history().len(), 1);
        assert_eq!(model.first().unwrap().price, dec!(1));
    }

    #[test]
    fn test_huge_window_keeps_everything() {
        let mut model = AssetModel::new("bitcoin");
        let retention = HistoryRetention::Window(Duration::seconds(10_000_000_000_000));
        model.apply(Observation::new(at(0), dec!(1)), retention);
        model.apply(Observation::new(at(1), dec!(2)), retention);

        assert_eq!(model.history().len(), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut model = AssetModel::new("monero");
        model.apply(Observation::new(at(0), dec!(150)), HistoryRetention::Unbounded);

        let snapshot = model.snapshot();
        model.apply(Observation::new(at(1), dec!(160)), HistoryRetention::Unbounded);

        assert_eq!(snapshot.current_price, Some(dec!(150)));
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(model.history().len(), 2);
    }
}
