use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use oat_core::schema::{
    CIRCUIT_COLUMN, DEENERGIZE_COLUMN, EVENT_DATE_COLUMN, INDEX_COLUMN, RESTORATION_COLUMN,
};

use crate::frames::read_csv_frame;

/// Read the processed shutoffs table and prepare it for the weather join:
/// verify the fixed columns are present, derive [`EVENT_DATE_COLUMN`] (the
/// date part of the de-energization timestamp) and attach the synthetic
/// [`INDEX_COLUMN`] numbering rows in file order. All other columns pass
/// through untouched.
pub fn read_shutoffs(path: &Path) -> Result<DataFrame> {
    let mut df = read_csv_frame(path)?;

    for required in [CIRCUIT_COLUMN, DEENERGIZE_COLUMN, RESTORATION_COLUMN] {
        if !df.get_column_names().iter().any(|c| *c == required) {
            bail!(
                "shutoffs table {} is missing required column '{}'",
                path.display(),
                required
            );
        }
    }

    let deenergize = df
        .column(DEENERGIZE_COLUMN)?
        .utf8()
        .context("de-energization timestamps must be strings")?;
    let mut event_dates = Vec::with_capacity(df.height());
    for (row, value) in deenergize.into_iter().enumerate() {
        let raw = value.ok_or_else(|| {
            anyhow!("shutoff row {row} has an empty '{DEENERGIZE_COLUMN}' cell")
        })?;
        let date = parse_event_date(raw)
            .with_context(|| format!("shutoff row {row}: unparsable timestamp '{raw}'"))?;
        event_dates.push(date.format("%Y-%m-%d").to_string());
    }

    let indices: Vec<i64> = (0..df.height() as i64).collect();
    df.with_column(Series::new(EVENT_DATE_COLUMN, event_dates))?;
    df.with_column(Series::new(INDEX_COLUMN, indices))?;
    Ok(df)
}

/// Accept a full timestamp (`%Y-%m-%d %H:%M:%S`) or a bare date.
fn parse_event_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| anyhow!(err))
}
