use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use tracing::debug;

use oat_core::schema::{weather_feature_columns, CIRCUIT_COLUMN, EVENT_DATE_COLUMN, INDEX_COLUMN};
use oat_core::{WeatherEvent, WeatherWindow};
use oat_io::weather_files::{list_weather_files, parse_weather_filename, read_daily_series};

/// Assemble one weather feature row per daily weather file in `dir`.
///
/// Each file contributes the event identity from its name and a lookback
/// window filled by matching observation dates to (event date − k) for
/// k in 1..=5. Days without a matching observation stay null in the output
/// frame; an outage index appearing in more than one file is an input error.
pub fn extract_weather_features(dir: &Path) -> Result<DataFrame> {
    let files = list_weather_files(dir)?;
    if files.is_empty() {
        bail!("weather directory {} contains no CSV files", dir.display());
    }

    let mut events = Vec::with_capacity(files.len());
    let mut seen = HashSet::new();
    for path in &files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let meta = parse_weather_filename(name)?;
        if !seen.insert(meta.index) {
            bail!("outage index {} appears in more than one weather file", meta.index);
        }

        let series = read_daily_series(path)?;
        let mut window = WeatherWindow::default();
        for observation in &series {
            let offset = (meta.event_date - observation.time).num_days();
            window.record(offset, observation);
        }
        debug!(
            index = meta.index,
            circuit = %meta.circuit_name,
            observations = series.len(),
            "assembled lookback window"
        );
        events.push(WeatherEvent {
            index: meta.index,
            circuit_name: meta.circuit_name,
            event_date: meta.event_date,
            window,
        });
    }

    events_to_frame(&events)
}

fn events_to_frame(events: &[WeatherEvent]) -> Result<DataFrame> {
    let indices: Vec<i64> = events.iter().map(|e| e.index).collect();
    let circuits: Vec<String> = events.iter().map(|e| e.circuit_name.clone()).collect();
    let dates: Vec<String> = events
        .iter()
        .map(|e| e.event_date.format("%Y-%m-%d").to_string())
        .collect();

    let windows: Vec<Vec<Option<f64>>> = events.iter().map(|e| e.window.values()).collect();

    let mut columns = vec![
        Series::new(INDEX_COLUMN, indices),
        Series::new(CIRCUIT_COLUMN, circuits),
        Series::new(EVENT_DATE_COLUMN, dates),
    ];
    for (position, name) in weather_feature_columns().iter().enumerate() {
        let values: Vec<Option<f64>> = windows.iter().map(|w| w[position]).collect();
        columns.push(Series::new(name, values));
    }
    DataFrame::new(columns).context("building weather feature frame")
}
