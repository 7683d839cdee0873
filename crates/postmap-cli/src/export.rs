//! File exports: GeoJSON map layers and the fire table as CSV.

use std::io::Write;
use std::path::Path;

use postmap_core::{FireDetection, PipelineResult, SOURCE_COLUMN};
use serde_json::{json, Map, Value};

use crate::render::{fire_position, MAP_ZOOM};

/// Marker radius of the strike location, in metres.
pub(crate) const STRIKE_RADIUS_M: u32 = 5000;
/// Marker radius of each fire detection, in metres.
pub(crate) const FIRE_RADIUS_M: u32 = 1500;

/// Default file name for the fire table export.
pub(crate) const DEFAULT_CSV_NAME: &str = "fires_data.csv";

/// Builds a GeoJSON `FeatureCollection` with the strike marker followed by
/// one marker per fire detection. `None` when the run resolved no place.
///
/// Fires without a readable position are left out of the map.
pub(crate) fn geojson(result: &PipelineResult) -> Option<Value> {
    let place = result.place()?;
    let center = place.coordinate;

    let mut features = vec![json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [center.lon, center.lat] },
        "properties": {
            "kind": "strike",
            "location": result.guess().map(|g| g.location.as_str()),
            "address": place.address,
            "marker-color": "#0000ff",
            "marker-radius": STRIKE_RADIUS_M,
        },
    })];

    for fire in result.fires().unwrap_or_default() {
        let Some(position) = fire_position(fire) else {
            tracing::debug!(source = %fire.source, "fire row without position left off the map");
            continue;
        };
        let mut properties: Map<String, Value> = fire
            .fields
            .iter()
            .map(|(column, value)| (column.clone(), Value::String(value.clone())))
            .collect();
        properties.insert(SOURCE_COLUMN.to_string(), json!(fire.source));
        properties.insert("kind".to_string(), json!("fire"));
        properties.insert("marker-color".to_string(), json!("#ffa500"));
        properties.insert("marker-radius".to_string(), json!(FIRE_RADIUS_M));

        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [position.lon, position.lat] },
            "properties": properties,
        }));
    }

    Some(json!({
        "type": "FeatureCollection",
        "view": { "center": [center.lon, center.lat], "zoom": MAP_ZOOM },
        "features": features,
    }))
}

/// Writes [`geojson`] to `path`. Returns `false` when there was nothing to
/// map.
pub(crate) fn write_geojson(path: &Path, result: &PipelineResult) -> anyhow::Result<bool> {
    let Some(collection) = geojson(result) else {
        return Ok(false);
    };
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &collection)?;
    Ok(true)
}

/// Header of the fire table: every provider column in first-seen order,
/// then [`SOURCE_COLUMN`].
pub(crate) fn csv_columns(fires: &[FireDetection]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for (column, _) in fires.iter().flat_map(|f| f.fields.iter()) {
        if column != SOURCE_COLUMN && !columns.contains(&column.as_str()) {
            columns.push(column);
        }
    }
    columns.push(SOURCE_COLUMN);
    columns
}

/// Writes the fire table as CSV. Cells for columns a source does not report
/// are left empty.
pub(crate) fn write_fires_csv<W: Write>(fires: &[FireDetection], out: W) -> csv::Result<()> {
    let columns = csv_columns(fires);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&columns)?;

    for fire in fires {
        let row = columns.iter().map(|&column| {
            if column == SOURCE_COLUMN {
                fire.source.as_str()
            } else {
                fire.field(column).unwrap_or("")
            }
        });
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}
