use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;

/// Extract the named columns of `df` as a row-major `f64` matrix, coercing
/// each column to numeric. A cell that cannot be coerced, or is missing,
/// aborts with the offending column and row.
pub fn numeric_block(df: &DataFrame, columns: &[String]) -> Result<Vec<Vec<f64>>> {
    let mut column_values: Vec<Vec<f64>> = Vec::with_capacity(columns.len());
    for name in columns {
        let original = df
            .column(name)
            .with_context(|| format!("numeric column '{name}' missing from table"))?;
        let cast = original
            .cast(&DataType::Float64)
            .with_context(|| format!("casting column '{name}' to Float64"))?;
        if cast.null_count() > original.null_count() {
            bail!("column '{name}' contains non-numeric values");
        }
        let values = cast.f64()?;
        let mut out = Vec::with_capacity(values.len());
        for (row, value) in values.into_iter().enumerate() {
            out.push(
                value.ok_or_else(|| anyhow!("column '{name}' has a missing value at row {row}"))?,
            );
        }
        column_values.push(out);
    }

    let height = df.height();
    let mut rows = vec![Vec::with_capacity(columns.len()); height];
    for values in &column_values {
        for (row, value) in values.iter().enumerate() {
            rows[row].push(*value);
        }
    }
    Ok(rows)
}

/// Per-column z-score standardization. Statistics are fit once on the
/// training block and reapplied unchanged to any other split, so validation
/// and test data never leak into the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    columns: Vec<String>,
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(columns: &[String], rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            bail!("cannot fit a scaler on an empty block");
        }
        let width = columns.len();
        if rows.iter().any(|r| r.len() != width) {
            bail!("block width does not match the {} named columns", width);
        }

        let n = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((std, value), mean) in stds.iter_mut().zip(row).zip(&means) {
                let diff = value - mean;
                *std += diff * diff;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            // A constant column scales by 1 so it maps to exactly zero.
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        Ok(StandardScaler {
            columns: columns.to_vec(),
            means,
            stds,
        })
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let width = self.columns.len();
        if rows.iter().any(|r| r.len() != width) {
            bail!("block width does not match the fitted scaler ({} columns)", width);
        }
        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.means)
                    .zip(&self.stds)
                    .map(|((value, mean), std)| (value - mean) / std)
                    .collect()
            })
            .collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("c{i}")).collect()
    }

    #[test]
    fn fitted_block_has_zero_mean_unit_std() {
        let columns = names(2);
        let rows = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let scaler = StandardScaler::fit(&columns, &rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();

        for col in 0..2 {
            let mean: f64 = scaled.iter().map(|r| r[col]).sum::<f64>() / 3.0;
            let var: f64 = scaled.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var.sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn transform_uses_training_statistics_only() {
        let columns = names(1);
        let train = vec![vec![0.0], vec![2.0]];
        let test = vec![vec![10.0]];
        let scaler = StandardScaler::fit(&columns, &train).unwrap();
        let scaled = scaler.transform(&test).unwrap();
        // (10 - 1) / 1 against train stats, not test stats.
        assert!((scaled[0][0] - 9.0).abs() < 1e-12);

        let refit = StandardScaler::fit(&columns, &test).unwrap();
        assert_ne!(refit.transform(&test).unwrap(), scaled);
    }

    #[test]
    fn constant_columns_do_not_divide_by_zero() {
        let columns = names(1);
        let rows = vec![vec![4.0], vec![4.0]];
        let scaler = StandardScaler::fit(&columns, &rows).unwrap();
        let scaled = scaler.transform(&rows).unwrap();
        assert_eq!(scaled, vec![vec![0.0], vec![0.0]]);
    }

    #[test]
    fn numeric_block_coerces_and_rejects() {
        let df = df![
            "hftd_tier" => &["2", "3"],
            "total_affected" => &["120", "oops"],
        ]
        .unwrap();
        let ok = numeric_block(&df, &["hftd_tier".to_string()]).unwrap();
        assert_eq!(ok, vec![vec![2.0], vec![3.0]]);
        assert!(numeric_block(&df, &["total_affected".to_string()]).is_err());
        assert!(numeric_block(&df, &["absent".to_string()]).is_err());
    }
}
