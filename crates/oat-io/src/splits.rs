use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;

use crate::frames::read_csv_frame;

/// Read a pre-split feature table (`x_train_w_OHE.csv` / `x_test_w_OHE.csv`).
/// The first column is a record identifier and is dropped; everything else
/// passes through for numeric selection downstream.
pub fn read_feature_table(path: &Path) -> Result<DataFrame> {
    let df = read_csv_frame(path)?;
    if df.width() < 2 {
        bail!(
            "feature table {} needs an id column plus features, found {} column(s)",
            path.display(),
            df.width()
        );
    }
    let id_column = df.get_column_names()[0].to_string();
    df.drop(&id_column)
        .with_context(|| format!("dropping id column '{id_column}'"))
}

/// Read a target table (`y_train.csv` / `y_test.csv`): an id column followed
/// by one float column.
pub fn read_target_column(path: &Path) -> Result<Vec<f64>> {
    let df = read_csv_frame(path)?;
    if df.width() < 2 {
        bail!(
            "target table {} needs an id column plus the target, found {} column(s)",
            path.display(),
            df.width()
        );
    }
    let series = df
        .get_columns()
        .get(1)
        .ok_or_else(|| anyhow!("target table {} has no target column", path.display()))?
        .cast(&DataType::Float64)
        .context("casting target column to Float64")?;
    let values = series.f64()?;
    let mut out = Vec::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        out.push(value.ok_or_else(|| {
            anyhow!("target table {} has an empty value at row {row}", path.display())
        })?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn feature_table_drops_id_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x_train_w_OHE.csv");
        fs::write(&path, "id,hftd_tier,zip_is_95060\n12,2,1\n31,3,0\n").unwrap();
        let df = read_feature_table(&path).unwrap();
        assert_eq!(df.get_column_names(), vec!["hftd_tier", "zip_is_95060"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn target_column_parses_floats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("y_train.csv");
        fs::write(&path, "id,time_to_restore\n12,36.5\n31,4.0\n").unwrap();
        assert_eq!(read_target_column(&path).unwrap(), vec![36.5, 4.0]);
    }

    #[test]
    fn empty_target_cell_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("y_train.csv");
        fs::write(&path, "id,time_to_restore\n12,36.5\n31,\n").unwrap();
        assert!(read_target_column(&path).is_err());
    }
}
