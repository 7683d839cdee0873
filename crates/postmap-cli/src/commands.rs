//! Command handlers called from `main` once configuration and logging are
//! in place.

use std::process::ExitCode;

use postmap_core::{AppConfig, PipelineResult};
use postmap_pipeline::{Pipeline, Progress, RunRequest, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::export::{write_fires_csv, write_geojson};
use crate::render::summary;
use crate::LocateArgs;

/// Progress goes to stderr so stdout carries only the summary.
fn report_progress(progress: Progress) {
    match progress {
        Progress::StageStarted(stage) => eprintln!("... {stage}"),
        Progress::Percent(pct) => eprintln!("[{pct:>3}%]"),
    }
}

/// Run the pipeline once and print its summary.
///
/// Exit code 1 when a stage failed; a run that finished without a location
/// is not a failure.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or an export file cannot
/// be written.
pub(crate) async fn run_locate(config: &AppConfig, args: LocateArgs) -> anyhow::Result<ExitCode> {
    let pipeline = Pipeline::from_config(config)?;

    let mut request = RunRequest::new(args.url, config).with_fires(args.fires);
    if let Some(radius_km) = args.radius_km {
        request.radius_km = radius_km;
    }
    if let Some(day_range) = args.day_range {
        request.day_range = day_range;
    }

    let result = pipeline.run(&request, 1, report_progress).await;
    print!("{}", summary(&result));

    if let Some(path) = &args.geojson {
        if write_geojson(path, &result)? {
            println!("map written to {}", path.display());
        } else {
            eprintln!("no location resolved; map not written");
        }
    }

    if let Some(path) = &args.export_csv {
        match result.fires() {
            Some(fires) if !fires.is_empty() => {
                let file = std::fs::File::create(path)?;
                write_fires_csv(fires, file)?;
                println!("fire table written to {}", path.display());
            }
            _ => eprintln!("no fire detections; CSV not written"),
        }
    }

    Ok(exit_code(&result))
}

/// Read post URLs from stdin and run each in one session.
///
/// Blank lines are ignored. Each run replaces the previous result; the
/// summary printed is always the session's current one.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or stdin cannot be read.
pub(crate) async fn run_interactive(config: &AppConfig, fires: bool) -> anyhow::Result<ExitCode> {
    let mut session = Session::new(Pipeline::from_config(config)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("enter a post URL per line (Ctrl-D to quit)");
    while let Some(line) = lines.next_line().await? {
        let url = line.trim();
        if url.is_empty() {
            continue;
        }

        let request = RunRequest::new(url, config).with_fires(fires);
        session.run(&request, report_progress).await;
        if let Some(current) = session.current() {
            println!("--- run {} ---", current.version());
            print!("{}", summary(current));
        }
    }

    tracing::info!(runs = session.runs(), "interactive session ended");
    Ok(ExitCode::SUCCESS)
}

fn exit_code(result: &PipelineResult) -> ExitCode {
    if result.status().is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
