use crate::error::Result;
use crate::processors::{default_worker_count, ParallelProcessor};
use crate::utils::constants::{DEFAULT_WINDOW_SIZE, SETTINGS_ENV_PREFIX};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Runtime knobs for a run, layered as defaults, then an optional config
/// file, then `BRC_*` environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(range(min = 1))]
    pub max_workers: usize,

    /// Must hold the longest legal line; matches `MIN_WINDOW_SIZE`.
    #[validate(range(min = 128))]
    pub window_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_workers: default_worker_count(),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("max_workers", defaults.max_workers as i64)?
            .set_default("window_size", defaults.window_size as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(SETTINGS_ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_overrides(mut self, max_workers: Option<usize>, window_size: Option<usize>) -> Result<Self> {
        if let Some(workers) = max_workers {
            self.max_workers = workers;
        }
        if let Some(window) = window_size {
            self.window_size = window;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn processor(&self) -> ParallelProcessor {
        ParallelProcessor::new(self.max_workers).with_window_size(self.window_size)
    }
}
