use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use crate::models::{MeasurementAggregator, ResultRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationResult {
    pub station: String,
    pub row: ResultRow,
    pub count: u64,
}

/// Name-ordered result set for one completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationReport {
    results: Vec<StationResult>,
}

impl StationReport {
    /// Builds the report from `(name, aggregator)` pairs that are already in
    /// ascending byte-wise order of the raw name bytes. Names that are not
    /// UTF-8 are decoded lossily here and nowhere earlier.
    pub fn from_sorted<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = (Vec<u8>, MeasurementAggregator)>,
    {
        let stations = stations.into_iter().collect::<Vec<_>>();
        debug_assert!(stations.windows(2).all(|pair| pair[0].0 < pair[1].0));

        let results = stations
            .into_iter()
            .map(|(name, agg)| StationResult {
                station: String::from_utf8_lossy(&name).into_owned(),
                row: agg.to_result_row(),
                count: agg.count,
            })
            .collect();

        Self { results }
    }

    pub fn results(&self) -> &[StationResult] {
        &self.results
    }

    /// Lossily decoded names need not stay sorted, so this is a linear scan.
    pub fn get(&self, station: &str) -> Option<&ResultRow> {
        self.results
            .iter()
            .find(|r| r.station == station)
            .map(|r| &r.row)
    }

    pub fn station_count(&self) -> usize {
        self.results.len()
    }

    pub fn record_count(&self) -> u64 {
        self.results.iter().map(|r| r.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// `{name=min/mean/max, name=min/mean/max}`
impl fmt::Display for StationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", result.station, result.row)?;
        }
        write!(f, "}}")
    }
}

impl Serialize for StationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for result in &self.results {
            map.serialize_entry(&result.station, &result.row)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> StationReport {
        let mut hamburg = MeasurementAggregator::new(120);
        hamburg.add(140);
        let paris = MeasurementAggregator::new(95);

        StationReport::from_sorted(vec![
            (b"Hamburg".to_vec(), hamburg),
            (b"Paris".to_vec(), paris),
        ])
    }

    #[test]
    fn test_display_format() {
        assert_eq!(
            report().to_string(),
            "{Hamburg=12.0/13.0/14.0, Paris=9.5/9.5/9.5}"
        );
        assert_eq!(StationReport::default().to_string(), "{}");
    }

    #[test]
    fn test_counts_and_lookup() {
        let report = report();

        assert_eq!(report.station_count(), 2);
        assert_eq!(report.record_count(), 3);
        assert_eq!(report.get("Paris").map(|r| r.to_string()), Some("9.5/9.5/9.5".to_string()));
        assert!(report.get("Berlin").is_none());
    }

    #[test]
    fn test_json_keeps_name_order() {
        let json = serde_json::to_string(&report()).unwrap();
        assert_eq!(
            json,
            r#"{"Hamburg":{"min":12.0,"mean":13.0,"max":14.0},"Paris":{"min":9.5,"mean":9.5,"max":9.5}}"#
        );
    }
}
