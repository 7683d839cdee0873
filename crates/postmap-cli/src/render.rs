//! Plain-text rendering of a run for the terminal.

use std::fmt::Write as _;

use postmap_core::{Coordinate, FireDetection, PipelineResult, PostText, RunStatus};

/// Zoom level of the map link.
pub(crate) const MAP_ZOOM: u8 = 8;

const DASH: &str = "\u{2014}";

/// OpenStreetMap link with a marker on `coordinate`.
pub(crate) fn osm_link(coordinate: Coordinate) -> String {
    let Coordinate { lat, lon } = coordinate;
    format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={MAP_ZOOM}/{lat}/{lon}")
}

/// Position of a detection, accepting both `latitude`/`longitude` and
/// `lat`/`lon` column names.
pub(crate) fn fire_position(fire: &FireDetection) -> Option<Coordinate> {
    let read = |long: &str, short: &str| {
        fire.field(long)
            .or_else(|| fire.field(short))
            .and_then(|v| v.trim().parse::<f64>().ok())
    };
    Some(Coordinate::new(
        read("latitude", "lat")?,
        read("longitude", "lon")?,
    ))
}

/// Full summary of a result: every entity the run produced, then its status.
pub(crate) fn summary(result: &PipelineResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Post: {}", result.reference());

    match result.post_text() {
        Some(PostText::Body(text)) => {
            let _ = writeln!(out, "Extracted text:");
            for line in text.lines() {
                let _ = writeln!(out, "  {line}");
            }
        }
        Some(PostText::Empty) => {
            let _ = writeln!(out, "Extracted text: (empty)");
        }
        None => {}
    }

    if let Some(guess) = result.guess() {
        let _ = writeln!(
            out,
            "Location guess: {} (model {}, {:.3} s)",
            guess.location, guess.model, guess.elapsed_secs
        );
        if guess.has_thinking() {
            let _ = writeln!(out, "Reasoning: {}", guess.thinking);
        }
    }

    if let Some(place) = result.place() {
        let Coordinate { lat, lon } = place.coordinate;
        let _ = writeln!(out, "Approximate location: {lat}, {lon}");
        if !place.address.is_empty() {
            let _ = writeln!(out, "Address: {}", place.address);
        }
        let _ = writeln!(out, "Map: {}", osm_link(place.coordinate));
    }

    if let Some(fires) = result.fires() {
        if fires.is_empty() {
            let _ = writeln!(out, "No fires data found in the area.");
        } else {
            let _ = writeln!(out, "Fires: {} detection(s)", fires.len());
            out.push_str(&fire_table(fires));
        }
    }

    out.push_str(&status_line(result.status()));
    out.push('\n');
    out
}

/// One-line status. Failures read `stage: message`.
pub(crate) fn status_line(status: &RunStatus) -> String {
    match status {
        RunStatus::Located => "located".to_string(),
        RunStatus::NoLocation { reason } => format!("no location resolved: {reason}"),
        RunStatus::Failed(failure) => failure.to_string(),
    }
}

fn fire_table(fires: &[FireDetection]) -> String {
    let mut out = format!(
        "  {:<18}{:<11}{:<11}{:<12}{}\n",
        "SOURCE", "LAT", "LON", "DATE", "CONFIDENCE"
    );
    for fire in fires {
        let (lat, lon) = fire_position(fire).map_or_else(
            || (DASH.to_string(), DASH.to_string()),
            |c| (c.lat.to_string(), c.lon.to_string()),
        );
        let _ = writeln!(
            out,
            "  {:<18}{:<11}{:<11}{:<12}{}",
            fire.source,
            lat,
            lon,
            fire.field("acq_date").unwrap_or(DASH),
            fire.field("confidence").unwrap_or(DASH),
        );
    }
    out
}
