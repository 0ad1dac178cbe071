use anyhow::{bail, Result};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Seeded shuffle split of a feature table and its aligned target vector into
/// train and validation partitions. `valid_fraction` of the rows (rounded up)
/// go to validation.
pub fn train_valid_split(
    x: &DataFrame,
    y: &[f64],
    valid_fraction: f64,
    seed: u64,
) -> Result<(DataFrame, Vec<f64>, DataFrame, Vec<f64>)> {
    let n = x.height();
    if y.len() != n {
        bail!("feature table has {} rows but target has {}", n, y.len());
    }
    if !(0.0..1.0).contains(&valid_fraction) || valid_fraction == 0.0 {
        bail!("validation fraction {valid_fraction} must be in (0, 1)");
    }
    let n_valid = ((n as f64) * valid_fraction).ceil() as usize;
    if n_valid >= n {
        bail!("validation fraction {valid_fraction} leaves no training rows");
    }

    let mut order: Vec<IdxSize> = (0..n as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (valid_idx, train_idx) = order.split_at(n_valid);

    let train_x = x.take(&IdxCa::new("train_idx", train_idx))?;
    let valid_x = x.take(&IdxCa::new("valid_idx", valid_idx))?;
    let train_y: Vec<f64> = train_idx.iter().map(|&i| y[i as usize]).collect();
    let valid_y: Vec<f64> = valid_idx.iter().map(|&i| y[i as usize]).collect();

    Ok((train_x, train_y, valid_x, valid_y))
}
