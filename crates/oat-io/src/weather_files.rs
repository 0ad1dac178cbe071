use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use thiserror::Error;

use oat_core::WeatherObservation;

/// Identity fields encoded in a daily weather file name:
/// `<prefix>_<index>_<circuit_name>_<date>.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherFileMeta {
    pub index: i64,
    pub circuit_name: String,
    pub event_date: NaiveDate,
}

#[derive(Debug, Error)]
pub enum WeatherFileError {
    #[error("weather file name '{0}' does not match <prefix>_<index>_<circuit>_<date>.csv")]
    Malformed(String),
    #[error("weather file name '{name}' has a non-integer index field")]
    Index {
        name: String,
        source: std::num::ParseIntError,
    },
    #[error("weather file name '{name}' has an unparsable event date")]
    Date {
        name: String,
        source: chrono::ParseError,
    },
}

/// Parse the outage index, circuit name and event date out of a weather file
/// name. The name must split on underscores into exactly four fields and end
/// in `.csv`.
pub fn parse_weather_filename(name: &str) -> Result<WeatherFileMeta, WeatherFileError> {
    let stem = name
        .strip_suffix(".csv")
        .ok_or_else(|| WeatherFileError::Malformed(name.to_string()))?;
    let fields: Vec<&str> = stem.split('_').collect();
    if fields.len() != 4 {
        return Err(WeatherFileError::Malformed(name.to_string()));
    }
    let index = fields[1].parse::<i64>().map_err(|source| WeatherFileError::Index {
        name: name.to_string(),
        source,
    })?;
    let event_date =
        NaiveDate::parse_from_str(fields[3], "%Y-%m-%d").map_err(|source| WeatherFileError::Date {
            name: name.to_string(),
            source,
        })?;
    Ok(WeatherFileMeta {
        index,
        circuit_name: fields[2].to_string(),
        event_date,
    })
}

/// List the CSV files of a weather directory in name order.
pub fn list_weather_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading weather directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one daily weather series. Expected header: `time,tmin,tmax,wspd`;
/// empty measurement cells become `None`.
pub fn read_daily_series(path: &Path) -> Result<Vec<WeatherObservation>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening weather file {}", path.display()))?;
    let mut observations = Vec::new();
    for result in reader.deserialize() {
        let observation: WeatherObservation =
            result.with_context(|| format!("parsing weather row in {}", path.display()))?;
        observations.push(observation);
    }
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn filename_fields_parse() {
        let meta = parse_weather_filename("weather_7_APPLE_2020-06-10.csv").unwrap();
        assert_eq!(meta.index, 7);
        assert_eq!(meta.circuit_name, "APPLE");
        assert_eq!(meta.event_date, "2020-06-10".parse().unwrap());
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert!(matches!(
            parse_weather_filename("weather_7_APPLE.csv"),
            Err(WeatherFileError::Malformed(_))
        ));
        assert!(matches!(
            parse_weather_filename("weather_x_APPLE_2020-06-10.csv"),
            Err(WeatherFileError::Index { .. })
        ));
        assert!(matches!(
            parse_weather_filename("weather_7_APPLE_June-10.csv"),
            Err(WeatherFileError::Date { .. })
        ));
        assert!(matches!(
            parse_weather_filename("weather_7_APPLE_2020-06-10.txt"),
            Err(WeatherFileError::Malformed(_))
        ));
    }

    #[test]
    fn daily_series_reads_optional_measurements() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather_0_APPLE_2020-06-10.csv");
        fs::write(
            &path,
            "time,tmin,tmax,wspd\n2020-06-05,10.5,21.0,3.4\n2020-06-06,,22.0,\n",
        )
        .unwrap();
        let series = read_daily_series(&path).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].tmin, Some(10.5));
        assert_eq!(series[1].tmin, None);
        assert_eq!(series[1].tmax, Some(22.0));
        assert_eq!(series[1].wspd, None);
    }

    #[test]
    fn listing_sorts_and_skips_non_csv() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("weather_1_B_2020-06-10.csv"), "time,tmin,tmax,wspd\n").unwrap();
        fs::write(dir.path().join("weather_0_A_2020-06-10.csv"), "time,tmin,tmax,wspd\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        let files = list_weather_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["weather_0_A_2020-06-10.csv", "weather_1_B_2020-06-10.csv"]
        );
    }
}
