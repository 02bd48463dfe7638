use crate::utils::constants::DEFAULT_INPUT_FILE;
use crate::writers::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "station-aggregator")]
#[command(about = "Multi-core min/mean/max aggregation of station measurements")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (toml, yaml, json, ...)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a measurements file and print the report
    Process {
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
        input_file: PathBuf,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[arg(long, help = "Worker threads [default: available parallelism - 1]")]
        max_workers: Option<usize>,

        #[arg(long, help = "Bytes copied into a worker's scratch buffer per pass")]
        window_size: Option<usize>,

        #[arg(long, default_value = "false", help = "Show a progress spinner on stderr")]
        progress: bool,
    },

    /// Check every record and print run statistics instead of the report
    Validate {
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
        input_file: PathBuf,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long)]
        window_size: Option<usize>,
    },
}
