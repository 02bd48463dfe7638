use clap::Parser;
use station_aggregator::cli::{run, Cli};
use station_aggregator::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
