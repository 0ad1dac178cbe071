//! # oat-features: Feature Engineering for PSPS Outage Analysis
//!
//! Turns raw inputs into model-ready tables:
//!
//! - [`window`]: assemble the five-day lookback weather window per outage
//!   event from a directory of daily weather files
//! - [`join`]: inner-join weather features onto the shutoff table with the
//!   circuit/date consistency check
//! - [`split`]: seeded train/validation shuffle split
//! - [`scale`]: z-score standardization fit on the training split only

pub mod join;
pub mod scale;
pub mod split;
pub mod window;

pub use join::{join_shutoffs_weather, JoinSummary};
pub use scale::{numeric_block, StandardScaler};
pub use split::train_valid_split;
pub use window::extract_weather_features;
