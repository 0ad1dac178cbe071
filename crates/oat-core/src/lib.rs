//! # oat-core: Domain Model for PSPS Outage Analysis
//!
//! Shared types for the outage analysis toolkit:
//!
//! - [`weather`]: per-event daily weather observations and the five-day
//!   lookback window assembled for each de-energization event
//! - [`schema`]: canonical column names for the shutoff table, the weather
//!   feature table, and the numeric block fed to the regression model
//! - [`config`]: strongly-typed network configuration (layer counts, widths,
//!   learning rate, epoch budget, activation, dropout) with fail-fast
//!   validation
//!
//! Everything here is plain data; file I/O lives in `oat-io` and the
//! algorithms in `oat-features` / `oat-model`.

pub mod config;
pub mod schema;
pub mod weather;

pub use config::{Activation, ConfigError, ModelConfig};
pub use schema::{
    numeric_feature_columns, weather_feature_columns, CIRCUIT_COLUMN, DEENERGIZE_COLUMN,
    EVENT_DATE_COLUMN, INDEX_COLUMN, RESTORATION_COLUMN,
};
pub use weather::{DayMeasures, WeatherEvent, WeatherObservation, WeatherWindow, LOOKBACK_DAYS};
