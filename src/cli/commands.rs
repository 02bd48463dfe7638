use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::ReportWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, Level};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Defaults, then config file, then BRC_* environment
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            input_file,
            output_file,
            format,
            max_workers,
            window_size,
            progress,
        } => {
            // CLI flags win over every other settings layer
            let settings = settings.with_overrides(max_workers, window_size)?;
            info!(
                input = %input_file.display(),
                workers = settings.max_workers,
                window_size = settings.window_size,
                "processing measurements"
            );

            let progress = ProgressReporter::new_spinner("Mapping input...", !progress);
            let processor = settings.processor();

            // Nothing reaches stdout unless the whole run succeeds
            let (report, summary) = match processor.process_file(&input_file, Some(&progress)) {
                Ok(result) => result,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };

            ReportWriter::new()
                .with_format(format)
                .write_report(&report, output_file.as_deref())?;

            info!("{}", summary);
        }

        Commands::Validate {
            input_file,
            max_workers,
            window_size,
        } => {
            let settings = settings.with_overrides(max_workers, window_size)?;
            println!("Validating measurements...");
            println!("Input file: {}", input_file.display());
            println!(
                "Workers: {}, Window size: {}",
                settings.max_workers, settings.window_size
            );

            let (_report, summary) = settings.processor().process_file(&input_file, None)?;

            println!("\n{}", summary);
            println!("All records are well-formed");
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_thread_names(true)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed when running embedded; keep it.
    if let Err(e) = installed {
        debug!(error = %e, "keeping existing tracing subscriber");
    }

    Ok(())
}
