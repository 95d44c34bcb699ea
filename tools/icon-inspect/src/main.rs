//! Scene tree and animation timing inspector for IconKit.
//!
//! Provides commands for:
//! - Printing the scene tree an icon builds into
//! - Sampling animation progress at chosen times
//! - Checking that a batch of icons builds
//!
//! ## Usage
//!
//! ```bash
//! # Show the scene tree
//! icon-inspect tree spinner.svg
//!
//! # Progress of every animation at 0ms, 250ms and 1s
//! icon-inspect sample spinner.svg --at 0 --at 250 --at 1000
//!
//! # Build a directory of icons with lenient path handling
//! icon-inspect --config lenient.json check icons/*.svg
//! ```

use clap::{Parser, Subcommand};
use iconkit_common::{init_logging, LogConfig, LogFormat};
use std::path::PathBuf;

mod report;

#[derive(Parser)]
#[command(name = "icon-inspect")]
#[command(about = "Scene tree and animation timing inspector for IconKit")]
struct Cli {
    /// JSON file with build options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the scene tree
    Tree {
        /// Icon file
        file: PathBuf,
        /// Emit JSON instead of indented text
        #[arg(long)]
        json: bool,
    },

    /// Sample animation progress at the given times
    Sample {
        /// Icon file
        file: PathBuf,
        /// Elapsed time in milliseconds; repeatable
        #[arg(long = "at", required = true, num_args = 1..)]
        at: Vec<f32>,
    },

    /// Build each file and report failures
    Check {
        /// Icon files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output JSON report path
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let format: LogFormat = cli.log_format.parse()?;
    init_logging(
        LogConfig::default()
            .with_level_str(&cli.log_level)?
            .with_format(format),
    )?;

    let options = report::load_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree { file, json } => {
            let icon = report::load_icon(&file, &options)?;
            let nodes = report::tree(&icon);
            if json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                print!("{}", report::render_tree(&nodes));
            }
        }

        Commands::Sample { file, at } => {
            let icon = report::load_icon(&file, &options)?;
            let sampled = report::sample_icon(&icon, &at);
            println!("{}", serde_json::to_string_pretty(&sampled)?);
        }

        Commands::Check { files, report } => {
            let result = report::check_files(&files, &options);

            for file in &result.files {
                match &file.error {
                    None => println!("  [OK]   {} ({} nodes)", file.file, file.nodes),
                    Some(error) => println!("  [FAIL] {}: {}", file.file, error),
                }
            }
            println!("{}/{} icons built", result.passed, result.total);

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&result)?;
                std::fs::write(&report_path, json)?;
                println!("Report written to: {}", report_path.display());
            }

            if result.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
