use std::path::Path;

use anyhow::Result;
use tracing::info;

use oat_cli::cli::WeatherCommands;
use oat_cli::manifest::record_manifest;
use oat_core::schema::INDEX_COLUMN;
use oat_features::{extract_weather_features, join_shutoffs_weather};
use oat_io::{read_shutoffs, write_csv_frame_staged};

/// Handle `oat weather join`: assemble the five-day lookback weather features
/// and inner-join them onto the shutoff table.
pub fn handle(command: &WeatherCommands) -> Result<()> {
    let WeatherCommands::Join {
        shutoffs,
        weather_dir,
        out,
        strict,
    } = command;

    info!(
        "Joining shutoffs {} with weather from {} -> {}",
        shutoffs, weather_dir, out
    );
    let shutoffs_df = read_shutoffs(Path::new(shutoffs))?;
    let weather_df = extract_weather_features(Path::new(weather_dir))?;
    let (joined, summary) = join_shutoffs_weather(&shutoffs_df, &weather_df, *strict)?;

    // The synthetic index served only as the join key.
    let mut merged = joined.drop(INDEX_COLUMN)?;
    write_csv_frame_staged(&mut merged, Path::new(out), "weather-join")?;

    println!(
        "Weather join: {} of {} shutoff rows matched {} weather rows -> {}",
        summary.joined_rows, summary.shutoff_rows, summary.weather_rows, out
    );
    println!(
        "circuit names consistent across join: {}",
        summary.circuit_mismatches == 0
    );
    println!(
        "event dates consistent across join: {}",
        summary.date_mismatches == 0
    );

    record_manifest(
        Path::new(out),
        "weather join",
        &[
            ("shutoffs", shutoffs.clone()),
            ("weather_dir", weather_dir.clone()),
            ("strict", strict.to_string()),
        ],
    )?;
    Ok(())
}
