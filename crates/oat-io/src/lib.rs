//! # oat-io: File I/O for PSPS Outage Analysis
//!
//! CSV-backed readers and writers for both pipelines:
//!
//! - [`frames`]: generic polars DataFrame read/write with the staged
//!   write-then-copy convention
//! - [`shutoffs`]: the processed shutoffs table, with the derived event-date
//!   and synthetic index columns attached
//! - [`weather_files`]: per-event daily weather files, including the
//!   `<prefix>_<index>_<circuit>_<date>.csv` naming convention
//! - [`splits`]: pre-split, pre-one-hot-encoded feature and target tables
//!
//! Malformed inputs are fatal: readers return errors rather than skipping
//! rows, consistent with single-run batch pipelines.

pub mod frames;
pub mod shutoffs;
pub mod splits;
pub mod weather_files;

pub use frames::{read_csv_frame, write_csv_frame_staged};
pub use shutoffs::read_shutoffs;
pub use splits::{read_feature_table, read_target_column};
pub use weather_files::{
    list_weather_files, parse_weather_filename, read_daily_series, WeatherFileError,
    WeatherFileMeta,
};
