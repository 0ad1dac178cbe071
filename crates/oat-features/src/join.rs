use anyhow::{bail, Context, Result};
use polars::prelude::*;
use tracing::warn;

use oat_core::schema::{CIRCUIT_COLUMN, EVENT_DATE_COLUMN, INDEX_COLUMN};

/// Row counts and consistency counters from the weather join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary {
    pub shutoff_rows: usize,
    pub weather_rows: usize,
    pub joined_rows: usize,
    pub circuit_mismatches: usize,
    pub date_mismatches: usize,
}

/// Inner-join weather feature rows onto the shutoff table on the outage
/// index. Shutoff rows without a weather match drop silently (deliberate
/// inner-join semantics).
///
/// Both sides carry a circuit name and an event date; after the join these
/// must agree pairwise for every row. Disagreement is reported in the summary
/// and logged at `warn`; with `strict` it becomes a hard error instead. The
/// right-hand duplicates and both event-date columns are dropped from the
/// result; the synthetic index column is kept for callers that need it.
pub fn join_shutoffs_weather(
    shutoffs: &DataFrame,
    weather: &DataFrame,
    strict: bool,
) -> Result<(DataFrame, JoinSummary)> {
    let joined = shutoffs
        .inner_join(weather, &[INDEX_COLUMN], &[INDEX_COLUMN])
        .context("joining shutoffs with weather features")?;

    let index_values = joined.column(INDEX_COLUMN)?;
    if index_values.n_unique()? != joined.height() {
        bail!("weather join produced duplicate outage indices");
    }

    let circuit_mismatches = count_mismatches(&joined, CIRCUIT_COLUMN)?;
    let date_mismatches = count_mismatches(&joined, EVENT_DATE_COLUMN)?;
    if circuit_mismatches > 0 || date_mismatches > 0 {
        warn!(
            circuit_mismatches,
            date_mismatches,
            "weather join produced rows whose circuit or event date disagree between sides"
        );
        if strict {
            bail!(
                "weather join consistency check failed: {} circuit and {} event-date mismatches",
                circuit_mismatches,
                date_mismatches
            );
        }
    }

    let summary = JoinSummary {
        shutoff_rows: shutoffs.height(),
        weather_rows: weather.height(),
        joined_rows: joined.height(),
        circuit_mismatches,
        date_mismatches,
    };

    let joined = joined
        .drop(&right_name(CIRCUIT_COLUMN))?
        .drop(EVENT_DATE_COLUMN)?
        .drop(&right_name(EVENT_DATE_COLUMN))?;

    Ok((joined, summary))
}

fn right_name(column: &str) -> String {
    format!("{column}_right")
}

/// Count rows where the left and right copies of `column` differ. A null on
/// one side only also counts as a mismatch.
fn count_mismatches(joined: &DataFrame, column: &str) -> Result<usize> {
    let left = joined
        .column(column)?
        .utf8()
        .with_context(|| format!("column '{column}' must be strings"))?;
    let right_column = right_name(column);
    let right = joined
        .column(&right_column)?
        .utf8()
        .with_context(|| format!("column '{right_column}' must be strings"))?;
    Ok(left
        .into_iter()
        .zip(right.into_iter())
        .filter(|(l, r)| l != r)
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shutoffs() -> DataFrame {
        df![
            "circuit_name" => &["APPLE", "BAKER", "CEDAR"],
            "deenergize_time" => &[
                "2020-06-10 13:45:00",
                "2020-10-25 02:00:00",
                "2020-10-25 03:00:00",
            ],
            "restoration_time" => &[
                "2020-06-11 08:00:00",
                "2020-10-26 12:30:00",
                "2020-10-26 13:00:00",
            ],
            "deenergize_time_date" => &["2020-06-10", "2020-10-25", "2020-10-25"],
            "index" => &[0i64, 1, 2],
        ]
        .unwrap()
    }

    fn weather(circuit_for_one: &str) -> DataFrame {
        df![
            "index" => &[0i64, 1],
            "circuit_name" => &["APPLE", circuit_for_one],
            "deenergize_time_date" => &["2020-06-10", "2020-10-25"],
            "tmin_d-1" => &[Some(5.0), None],
        ]
        .unwrap()
    }

    #[test]
    fn inner_join_keeps_only_matched_indices() {
        let (joined, summary) = join_shutoffs_weather(&shutoffs(), &weather("BAKER"), false).unwrap();
        assert_eq!(summary.joined_rows, 2);
        assert_eq!(summary.circuit_mismatches, 0);
        assert_eq!(summary.date_mismatches, 0);
        let indices = joined.column("index").unwrap().i64().unwrap();
        assert_eq!(indices.get(0), Some(0));
        assert_eq!(indices.get(1), Some(1));
    }

    #[test]
    fn redundant_columns_are_dropped() {
        let (joined, _) = join_shutoffs_weather(&shutoffs(), &weather("BAKER"), false).unwrap();
        let names = joined.get_column_names();
        assert!(names.contains(&"circuit_name"));
        assert!(names.contains(&"tmin_d-1"));
        assert!(!names.contains(&"circuit_name_right"));
        assert!(!names.contains(&"deenergize_time_date"));
        assert!(!names.contains(&"deenergize_time_date_right"));
    }

    #[test]
    fn mismatches_are_counted_but_not_fatal() {
        let (_, summary) = join_shutoffs_weather(&shutoffs(), &weather("ZINC"), false).unwrap();
        assert_eq!(summary.circuit_mismatches, 1);
        assert_eq!(summary.date_mismatches, 0);
    }

    #[test]
    fn strict_mode_turns_mismatch_into_error() {
        let err = join_shutoffs_weather(&shutoffs(), &weather("ZINC"), true).unwrap_err();
        assert!(err.to_string().contains("consistency check failed"));
    }
}
