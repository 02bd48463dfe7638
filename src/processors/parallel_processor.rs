use crate::error::{ProcessingError, Result};
use crate::models::StationReport;
use crate::processors::{SegmentWorker, ShardMap, ShardMerger};
use crate::readers::{FileSegmenter, MappedFile};
use crate::utils::constants::{DEFAULT_WINDOW_SIZE, MIN_WINDOW_SIZE, RESERVED_THREADS};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Orchestrator phases. A run moves through them in order exactly once; a
/// fatal error in any worker ends the run without reaching `Reporting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Spawning,
    WaitingAll,
    Merging,
    Reporting,
}

impl RunPhase {
    fn message(self) -> &'static str {
        match self {
            RunPhase::Spawning => "Segmenting input...",
            RunPhase::WaitingAll => "Scanning segments...",
            RunPhase::Merging => "Merging shards...",
            RunPhase::Reporting => "Building report...",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingSummary {
    pub bytes: usize,
    pub segments: usize,
    pub records: u64,
    pub stations: usize,
    pub elapsed: Duration,
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Summary:")?;
        writeln!(f, "  Input bytes: {}", self.bytes)?;
        writeln!(f, "  Segments: {}", self.segments)?;
        writeln!(f, "  Records: {}", self.records)?;
        writeln!(f, "  Stations: {}", self.stations)?;
        write!(f, "  Elapsed: {:.3}s", self.elapsed.as_secs_f64())
    }
}

pub struct ParallelProcessor {
    max_workers: usize,
    window_size: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Map `path` and run the whole pipeline over it. The map is released
    /// when this returns, on success or error.
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(StationReport, ProcessingSummary)> {
        let input = MappedFile::open(path)?;
        info!(path = %input.path().display(), bytes = input.len(), "mapped input");
        self.process_bytes(input.bytes(), progress)
    }

    /// Run the pipeline over an in-memory view of the input.
    pub fn process_bytes(
        &self,
        data: &[u8],
        progress: Option<&ProgressReporter>,
    ) -> Result<(StationReport, ProcessingSummary)> {
        if self.window_size < MIN_WINDOW_SIZE {
            return Err(ProcessingError::Config(format!(
                "window size {} is below the minimum of {} bytes",
                self.window_size, MIN_WINDOW_SIZE
            )));
        }

        let started = Instant::now();
        let enter = |phase: RunPhase| {
            debug!(?phase, "entering phase");
            if let Some(p) = progress {
                p.set_message(phase.message());
            }
        };

        // Split the input on line boundaries, one segment per worker
        enter(RunPhase::Spawning);
        let segments = FileSegmenter::new(self.max_workers).segment(data);
        debug!(
            requested = self.max_workers,
            segments = segments.len(),
            "segmented input"
        );

        // Size the Rayon pool to the segment count
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(segments.len())
            .thread_name(|i| format!("segment-worker-{}", i))
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        enter(RunPhase::WaitingAll);
        // One task per segment; collecting is the barrier before merging.
        let window_size = self.window_size;
        let shards: Vec<ShardMap<'_>> = pool.install(|| {
            segments
                .par_iter()
                .enumerate()
                .map(|(index, segment)| SegmentWorker::new(data, window_size).process(index, *segment))
                .collect::<Result<Vec<_>>>()
        })?;

        // Fold worker shards into the ordered report
        enter(RunPhase::Merging);
        let records = shards.iter().map(ShardMap::record_count).sum();
        let report = ShardMerger::new().merge_all(shards);

        // Build run statistics
        enter(RunPhase::Reporting);
        let summary = ProcessingSummary {
            bytes: data.len(),
            segments: segments.len(),
            records,
            stations: report.station_count(),
            elapsed: started.elapsed(),
        };
        info!(
            records = summary.records,
            stations = summary.stations,
            segments = summary.segments,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "run complete"
        );

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Aggregated {} records for {} stations",
                summary.records, summary.stations
            ));
        }

        Ok((report, summary))
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(default_worker_count())
    }
}

/// Hardware parallelism minus the reserved threads, never less than one.
pub fn default_worker_count() -> usize {
    num_cpus::get().saturating_sub(RESERVED_THREADS).max(1)
}
