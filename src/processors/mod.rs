pub mod merger;
pub mod parallel_processor;
pub mod shard;
pub mod worker;

pub use merger::ShardMerger;
pub use parallel_processor::{default_worker_count, ParallelProcessor, ProcessingSummary, RunPhase};
pub use shard::ShardMap;
pub use worker::SegmentWorker;
