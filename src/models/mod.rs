pub mod measurement;
pub mod report;
pub mod station;

pub use measurement::{MeasurementAggregator, ResultRow, Tenths};
pub use report::{StationReport, StationResult};
pub use station::{PrehashedHasher, StationHashBuilder, StationKey};
