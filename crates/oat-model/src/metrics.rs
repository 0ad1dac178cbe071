/// Regression error metrics for one model on one split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub r_squared: f64,
    pub rmse: f64,
    pub mae: f64,
    pub mape: f64,
}

pub fn mse(predictions: &[f64], actuals: &[f64]) -> f64 {
    paired(predictions, actuals);
    let sum: f64 = predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    sum / predictions.len() as f64
}

pub fn rmse(predictions: &[f64], actuals: &[f64]) -> f64 {
    mse(predictions, actuals).sqrt()
}

pub fn mae(predictions: &[f64], actuals: &[f64]) -> f64 {
    paired(predictions, actuals);
    let sum: f64 = predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a).abs())
        .sum();
    sum / predictions.len() as f64
}

/// Mean absolute percentage error with an epsilon floor on the denominator,
/// so zero targets yield a large-but-finite value instead of infinity.
pub fn mape(predictions: &[f64], actuals: &[f64]) -> f64 {
    paired(predictions, actuals);
    let sum: f64 = predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a).abs() / a.abs().max(f64::EPSILON))
        .sum();
    sum / predictions.len() as f64
}

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    assert!(!values.is_empty(), "variance of an empty slice");
    let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
}

/// Full report for one split. R² is computed against a null model with the
/// given RMSE (√var(y) of the split): `1 − SSE/SST` with
/// `SST = null_rmse² · n`.
pub fn regression_report(
    predictions: &[f64],
    actuals: &[f64],
    null_rmse: f64,
) -> RegressionMetrics {
    paired(predictions, actuals);
    let n = actuals.len() as f64;
    let sse = mse(predictions, actuals) * n;
    let sst = null_rmse * null_rmse * n;
    RegressionMetrics {
        r_squared: 1.0 - sse / sst,
        rmse: (sse / n).sqrt(),
        mae: mae(predictions, actuals),
        mape: mape(predictions, actuals),
    }
}

fn paired(predictions: &[f64], actuals: &[f64]) {
    assert_eq!(
        predictions.len(),
        actuals.len(),
        "predictions and actuals must pair up"
    );
    assert!(!predictions.is_empty(), "metrics need at least one sample");
}
