use once_cell::sync::Lazy;

/// Synthetic row-number column joining shutoff records to weather rows.
pub const INDEX_COLUMN: &str = "index";
pub const CIRCUIT_COLUMN: &str = "circuit_name";
pub const DEENERGIZE_COLUMN: &str = "deenergize_time";
pub const RESTORATION_COLUMN: &str = "restoration_time";
/// Date part of `deenergize_time`, derived before the join and dropped after.
pub const EVENT_DATE_COLUMN: &str = "deenergize_time_date";

/// Demographic/geographic columns expected to be numeric in the model input.
const BASE_NUMERIC_COLUMNS: [&str; 9] = [
    "hftd_tier",
    "total_affected",
    "residential_affected",
    "longitude",
    "latitude",
    "total_pop",
    "median_age",
    "median_income",
    "white_pct",
];

static WEATHER_FEATURE_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut columns = Vec::with_capacity(crate::weather::LOOKBACK_DAYS * 3);
    for offset in (1..=crate::weather::LOOKBACK_DAYS).rev() {
        for measure in ["tmin", "tmax", "wspd"] {
            columns.push(format!("{measure}_d-{offset}"));
        }
    }
    columns
});

static NUMERIC_FEATURE_COLUMNS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut columns: Vec<String> = BASE_NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect();
    columns.extend(WEATHER_FEATURE_COLUMNS.iter().cloned());
    columns.push("day_in_year".to_string());
    columns
});

/// Weather feature columns in canonical order: `tmin_d-5`, `tmax_d-5`,
/// `wspd_d-5`, ..., `wspd_d-1`.
pub fn weather_feature_columns() -> &'static [String] {
    &WEATHER_FEATURE_COLUMNS
}

/// The fixed-order numeric block fed to the regression model. One-hot zip
/// columns are assumed already encoded upstream and are excluded from this
/// list (and therefore from scaling).
pub fn numeric_feature_columns() -> &'static [String] {
    &NUMERIC_FEATURE_COLUMNS
}
