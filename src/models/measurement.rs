use serde::{Serialize, Serializer};
use std::fmt;

/// Running statistics for one station, in fixed-point tenths.
///
/// Only ever built from a first observation, so `count` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeasurementAggregator {
    pub min: i32,
    pub max: i32,
    pub sum: i64,
    pub count: u64,
}

impl MeasurementAggregator {
    pub fn new(value: i32) -> Self {
        Self {
            min: value,
            max: value,
            sum: i64::from(value),
            count: 1,
        }
    }

    #[inline]
    pub fn add(&mut self, value: i32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += i64::from(value);
        self.count += 1;
    }

    #[inline]
    pub fn merge(&mut self, other: &Self) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    /// Mean in tenths, rounded half toward positive infinity.
    ///
    /// `floor(sum / count + 1/2)` evaluated exactly as
    /// `floor((2 * sum + count) / (2 * count))`.
    pub fn mean_tenths(&self) -> i64 {
        let count = i128::from(self.count);
        let numerator = 2 * i128::from(self.sum) + count;
        numerator.div_euclid(2 * count) as i64
    }

    pub fn to_result_row(&self) -> ResultRow {
        ResultRow {
            min: Tenths::from(self.min),
            mean: Tenths(self.mean_tenths()),
            max: Tenths::from(self.max),
        }
    }
}

/// A decimal with exactly one fractional digit, stored as value × 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tenths(pub i64);

impl Tenths {
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl From<i32> for Tenths {
    fn from(value: i32) -> Self {
        Tenths(i64::from(value))
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, magnitude / 10, magnitude % 10)
    }
}

impl Serialize for Tenths {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Final per-station figures, derived once from a fully merged aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub min: Tenths,
    pub mean: Tenths,
    pub max: Tenths,
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.min, self.mean, self.max)
    }
}
