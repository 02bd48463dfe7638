use crate::models::{MeasurementAggregator, StationReport};
use crate::processors::ShardMap;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Folds finished worker shards into one name-ordered table.
///
/// Aggregator merging is associative and commutative, so the order in which
/// shards arrive does not affect the result. Stations stay keyed by their
/// raw bytes until the report is built.
pub struct ShardMerger {
    stations: BTreeMap<Vec<u8>, MeasurementAggregator>,
}

impl ShardMerger {
    pub fn new() -> Self {
        Self {
            stations: BTreeMap::new(),
        }
    }

    /// Merge a single finished shard.
    pub fn merge_shard(&mut self, shard: ShardMap<'_>) {
        for (key, agg) in shard {
            match self.stations.entry(key.name().to_vec()) {
                Entry::Vacant(slot) => {
                    slot.insert(agg);
                }
                Entry::Occupied(slot) => slot.into_mut().merge(&agg),
            }
        }
    }

    /// Merge all shards and derive the final report.
    pub fn merge_all<'a, I>(mut self, shards: I) -> StationReport
    where
        I: IntoIterator<Item = ShardMap<'a>>,
    {
        for shard in shards {
            self.merge_shard(shard);
        }
        self.into_report()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn into_report(self) -> StationReport {
        // BTreeMap<Vec<u8>, _> iterates in byte-wise name order
        StationReport::from_sorted(self.stations)
    }
}

impl Default for ShardMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StationKey;
    use pretty_assertions::assert_eq;

    fn shard<'a>(records: &[(&'a str, i32)]) -> ShardMap<'a> {
        let mut shard = ShardMap::with_capacity(8);
        for &(name, value) in records {
            shard.update(StationKey::new(name.as_bytes()), value);
        }
        shard
    }

    fn merged(shards: Vec<ShardMap<'_>>) -> StationReport {
        let mut merger = ShardMerger::new();
        for s in shards {
            merger.merge_shard(s);
        }
        merger.into_report()
    }

    #[test]
    fn test_merges_same_station_across_shards() {
        let report = merged(vec![
            shard(&[("Hamburg", 120), ("Paris", 95)]),
            shard(&[("Hamburg", 140)]),
        ]);

        assert_eq!(report.to_string(), "{Hamburg=12.0/13.0/14.0, Paris=9.5/9.5/9.5}");
        assert_eq!(report.record_count(), 3);
    }

    #[test]
    fn test_shard_order_does_not_matter() {
        let a = || shard(&[("X", 10), ("Y", -5), ("Z", 33)]);
        let b = || shard(&[("Y", 7), ("Z", -33)]);
        let c = || shard(&[("X", 999), ("W", 0)]);

        let forward = merged(vec![a(), b(), c()]);
        let backward = merged(vec![c(), b(), a()]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_names_ordered_bytewise() {
        let report = merged(vec![shard(&[
            ("b", 1),
            ("B", 1),
            ("a", 1),
            ("Ä", 1),
            ("Z", 1),
            ("aa", 1),
        ])]);

        let names: Vec<&str> = report.results().iter().map(|r| r.station.as_str()).collect();
        assert_eq!(names, vec!["B", "Z", "a", "aa", "b", "Ä"]);
    }

    #[test]
    fn test_undecodable_names_kept_apart_in_byte_order() {
        let data = b"Z\xfcrich;1.0\n\xff;2.0\n\xfe;3.0\nParis;4.0\n".to_vec();
        let mut shard = ShardMap::with_capacity(4);
        shard.update(StationKey::new(&data[0..6]), 10);
        shard.update(StationKey::new(&data[11..12]), 20);
        shard.update(StationKey::new(&data[17..18]), 30);
        shard.update(StationKey::new(&data[23..28]), 40);

        let report = ShardMerger::new().merge_all(vec![shard]);
        let rows: Vec<(&str, String)> = report
            .results()
            .iter()
            .map(|r| (r.station.as_str(), r.row.to_string()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("Paris", "4.0/4.0/4.0".to_string()),
                ("Z\u{FFFD}rich", "1.0/1.0/1.0".to_string()),
                ("\u{FFFD}", "3.0/3.0/3.0".to_string()),
                ("\u{FFFD}", "2.0/2.0/2.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_shards_is_empty_report() {
        let report = ShardMerger::new().merge_all(Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "{}");
    }
}
