use std::{
    ffi::OsStr,
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use polars::prelude::*;

/// Read a CSV file into a DataFrame.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = CsvReader::new(&mut file);
    reader
        .has_header(true)
        .finish()
        .with_context(|| format!("reading CSV file {}", path.display()))
}

/// Write a DataFrame as CSV through a staging directory: the frame lands in
/// `<parent>/<stage>/<file>` first and is then copied to the final path.
pub fn write_csv_frame_staged(df: &mut DataFrame, output: &Path, stage: &str) -> Result<()> {
    let staged = staged_output_path(output, stage);
    if let Some(parent) = staged.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    let mut file =
        File::create(&staged).with_context(|| format!("creating {}", staged.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .context("writing CSV file")?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    fs::copy(&staged, output)
        .with_context(|| format!("copying {} to {}", staged.display(), output.display()))?;
    Ok(())
}

fn staged_output_path(output: &Path, stage: &str) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let file_name = output.file_name().unwrap_or_else(|| OsStr::new("output"));
    parent.join(stage).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staged_write_round_trips() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("merged.csv");
        let mut df = df![
            "circuit_name" => &["APPLE", "BAKER"],
            "total_affected" => &[120i64, 45],
        ]
        .unwrap();
        write_csv_frame_staged(&mut df, &out, "weather-join").unwrap();

        assert!(dir.path().join("weather-join").join("merged.csv").exists());
        let read_back = read_csv_frame(&out).unwrap();
        assert_eq!(read_back.height(), 2);
        assert_eq!(
            read_back.get_column_names(),
            vec!["circuit_name", "total_affected"]
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_csv_frame(&dir.path().join("absent.csv")).is_err());
    }
}
