use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod export;
mod render;

#[derive(Debug, Parser)]
#[command(name = "postmap")]
#[command(about = "Locate the place a Telegram post talks about and map nearby fires")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once for a post URL and print the summary
    Locate(LocateArgs),
    /// Read post URLs from stdin, one per line; each run replaces the last
    Interactive {
        /// Also fetch nearby satellite fire detections
        #[arg(long)]
        fires: bool,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

#[derive(Debug, Args)]
struct LocateArgs {
    /// Public post URL, e.g. <https://t.me/channel/123>
    url: String,
    /// Also fetch nearby satellite fire detections
    #[arg(long)]
    fires: bool,
    /// Fire search radius in kilometres (defaults to `POSTMAP_FIRE_RADIUS_KM`)
    #[arg(long, value_parser = parse_radius)]
    radius_km: Option<f64>,
    /// Days of fire detections to request (defaults to `POSTMAP_FIRE_DAY_RANGE`)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    day_range: Option<u32>,
    /// Write the fire table as CSV to this path
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = export::DEFAULT_CSV_NAME)]
    export_csv: Option<PathBuf>,
    /// Write the strike and fire markers as GeoJSON to this path
    #[arg(long, value_name = "PATH")]
    geojson: Option<PathBuf>,
}

fn parse_radius(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("radius must be a positive number of kilometres".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = postmap_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Locate(args) => commands::run_locate(&config, args).await,
        Commands::Interactive { fires } => commands::run_interactive(&config, fires).await,
        Commands::Config => {
            println!("{config:#?}");
            Ok(ExitCode::SUCCESS)
        }
    }
}
