use crate::models::{MeasurementAggregator, StationHashBuilder, StationKey};
use crate::utils::constants::DEFAULT_SHARD_CAPACITY;
use std::collections::hash_map;
use std::collections::HashMap;

/// Per-worker aggregation table. Owned by exactly one worker until that
/// worker finishes and hands it back to the orchestrator.
#[derive(Debug)]
pub struct ShardMap<'a> {
    stations: HashMap<StationKey<'a>, MeasurementAggregator, StationHashBuilder>,
    records: u64,
}

impl<'a> ShardMap<'a> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SHARD_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stations: HashMap::with_capacity_and_hasher(capacity, StationHashBuilder::default()),
            records: 0,
        }
    }

    #[inline]
    pub fn update(&mut self, key: StationKey<'a>, value: i32) {
        self.records += 1;
        match self.stations.get_mut(&key) {
            Some(agg) => agg.add(value),
            None => {
                self.stations.insert(key, MeasurementAggregator::new(value));
            }
        }
    }

    /// Lookup keys must borrow for as long as the stored ones, since the map
    /// only offers `Borrow<StationKey<'a>>`.
    pub fn get(&self, name: &'a [u8]) -> Option<&MeasurementAggregator> {
        self.stations.get(&StationKey::new(name))
    }

    /// Number of distinct stations seen.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn record_count(&self) -> u64 {
        self.records
    }

    pub fn iter(&self) -> hash_map::Iter<'_, StationKey<'a>, MeasurementAggregator> {
        self.stations.iter()
    }
}

impl Default for ShardMap<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for ShardMap<'a> {
    type Item = (StationKey<'a>, MeasurementAggregator);
    type IntoIter = hash_map::IntoIter<StationKey<'a>, MeasurementAggregator>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.into_iter()
    }
}
