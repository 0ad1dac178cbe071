use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use oat_core::{Activation, ModelConfig};

use crate::metrics::rmse;
use crate::mlp::Mlp;
use crate::train::train;

/// Validation RMSE below which a trial leaves a text artifact behind.
pub const DEFAULT_RMSE_THRESHOLD: f64 = 1000.0;

/// Sampling ranges for the random search. The default space is the one the
/// study was run with; tests shrink it.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    pub max_hidden_layers: usize,
    pub hidden_units: RangeInclusive<usize>,
    /// Log-uniform bounds on the Adagrad step size.
    pub learning_rate: (f64, f64),
    pub epochs: RangeInclusive<usize>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        SearchSpace {
            max_hidden_layers: 4,
            hidden_units: 1..=50,
            learning_rate: (1e-5, 0.5),
            epochs: 1_000..=100_000,
        }
    }
}

/// One completed trial: the sampled configuration and its validation score.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub number: usize,
    pub config: ModelConfig,
    pub valid_rmse: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuneOutcome {
    pub best: Trial,
    pub trials_run: usize,
}

/// Draw one configuration from the search space.
pub fn sample_config(space: &SearchSpace, rng: &mut StdRng) -> ModelConfig {
    let hidden_layers = rng.gen_range(0..=space.max_hidden_layers);
    let hidden_units = (0..hidden_layers)
        .map(|_| rng.gen_range(space.hidden_units.clone()))
        .collect();
    let (lr_low, lr_high) = space.learning_rate;
    let learning_rate = 10f64.powf(rng.gen_range(lr_low.log10()..lr_high.log10()));
    ModelConfig {
        hidden_layers,
        hidden_units,
        learning_rate,
        epochs: rng.gen_range(space.epochs.clone()),
        activation: if rng.gen_bool(0.5) {
            Activation::Relu
        } else {
            Activation::Tanh
        },
        dropout: rng.gen_range(0.0..1.0),
    }
}

/// Random search over `space`: each trial trains a fresh model on the
/// training block and scores RMSE on the validation block, the quantity the
/// search minimizes. Trials under `rmse_threshold` append a text artifact to
/// `artifacts_dir`.
#[allow(clippy::too_many_arguments)]
pub fn run_search(
    space: &SearchSpace,
    train_x: &[Vec<f64>],
    train_y: &[f64],
    valid_x: &[Vec<f64>],
    valid_y: &[f64],
    trials: usize,
    rmse_threshold: f64,
    artifacts_dir: &Path,
    rng: &mut StdRng,
) -> Result<TuneOutcome> {
    if trials == 0 {
        bail!("trial count must be positive");
    }
    let input_dim = train_x
        .first()
        .map(Vec::len)
        .ok_or_else(|| anyhow!("training block is empty"))?;
    fs::create_dir_all(artifacts_dir).with_context(|| {
        format!("creating artifacts directory '{}'", artifacts_dir.display())
    })?;

    let mut best: Option<Trial> = None;
    for number in 0..trials {
        let config = sample_config(space, rng);
        let mut model = Mlp::new(input_dim, &config, rng)?;
        let report = train(
            &mut model,
            train_x,
            train_y,
            config.epochs,
            config.learning_rate,
            rng,
        )?;
        let valid_rmse = rmse(&model.predict(valid_x), valid_y);
        info!(
            trial = number,
            valid_rmse,
            epochs_run = report.epochs_run,
            converged = report.converged,
            "trial complete"
        );

        if valid_rmse.is_finite() && valid_rmse < rmse_threshold {
            let artifact = artifacts_dir.join(format!("trial-{number}.txt"));
            fs::write(&artifact, describe_trial(valid_rmse, &config))
                .with_context(|| format!("writing trial artifact '{}'", artifact.display()))?;
        }

        let trial = Trial {
            number,
            config,
            valid_rmse,
        };
        let improved = match &best {
            Some(current) => valid_rmse.is_finite() && valid_rmse < current.valid_rmse,
            None => valid_rmse.is_finite(),
        };
        if improved {
            best = Some(trial);
        }
    }

    let best = best.ok_or_else(|| anyhow!("no trial produced a finite validation RMSE"))?;
    Ok(TuneOutcome {
        best,
        trials_run: trials,
    })
}

fn describe_trial(valid_rmse: f64, config: &ModelConfig) -> String {
    format!(
        "RMSE: {valid_rmse}\n\
         hidden_layers: {}\n\
         hidden_units: {:?}\n\
         learning_rate: {}\n\
         epochs: {}\n\
         activation: {}\n\
         dropout: {}\n",
        config.hidden_layers,
        config.hidden_units,
        config.learning_rate,
        config.epochs,
        config.activation,
        config.dropout,
    )
}

/// Persist the winning trial as a two-column CSV: the validation RMSE and the
/// JSON-encoded configuration.
pub fn write_best_trial(path: &Path, best: &Trial) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating best-trial CSV '{}'", path.display()))?;
    writer.write_record(["value", "params"])?;
    writer.write_record([
        best.valid_rmse.to_string(),
        serde_json::to_string(&best.config).context("encoding best parameters")?,
    ])?;
    writer.flush()?;
    Ok(())
}

/// Load the configuration persisted by [`write_best_trial`].
pub fn read_best_config(path: &Path) -> Result<ModelConfig> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening best-trial CSV '{}'", path.display()))?;
    let record = reader
        .records()
        .next()
        .ok_or_else(|| anyhow!("best-trial CSV '{}' has no rows", path.display()))??;
    let params = record
        .get(1)
        .ok_or_else(|| anyhow!("best-trial CSV '{}' has no params column", path.display()))?;
    let config: ModelConfig =
        serde_json::from_str(params).context("decoding best parameters")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn tiny_space() -> SearchSpace {
        SearchSpace {
            max_hidden_layers: 1,
            hidden_units: 1..=4,
            learning_rate: (1e-3, 1e-1),
            epochs: 5..=20,
        }
    }

    #[test]
    fn sampled_configs_stay_inside_the_space() {
        let space = SearchSpace::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let config = sample_config(&space, &mut rng);
            config.validate().unwrap();
            assert!(config.hidden_layers <= 4);
            assert!(config.hidden_units.iter().all(|&u| (1..=50).contains(&u)));
            assert!(config.learning_rate >= 1e-5 && config.learning_rate <= 0.5);
            assert!((1_000..=100_000).contains(&config.epochs));
            assert!((0.0..1.0).contains(&config.dropout));
        }
    }

    #[test]
    fn search_tracks_the_best_trial_and_writes_artifacts() {
        let dir = tempdir().unwrap();
        let train_x: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 1.0]).collect();
        let train_y: Vec<f64> = train_x.iter().map(|r| r[0] * 2.0).collect();
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = run_search(
            &tiny_space(),
            &train_x,
            &train_y,
            &train_x,
            &train_y,
            3,
            1e12,
            dir.path(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(outcome.trials_run, 3);
        assert!(outcome.best.valid_rmse.is_finite());
        let artifacts: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("trial-"))
            .collect();
        assert!(!artifacts.is_empty());
    }

    #[test]
    fn threshold_suppresses_artifacts() {
        let dir = tempdir().unwrap();
        let train_x = vec![vec![0.0], vec![1.0]];
        let train_y = vec![100.0, 200.0];
        let mut rng = StdRng::seed_from_u64(6);
        run_search(
            &tiny_space(),
            &train_x,
            &train_y,
            &train_x,
            &train_y,
            2,
            1e-12,
            dir.path(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn best_trial_round_trips_through_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("best.csv");
        let best = Trial {
            number: 4,
            config: ModelConfig::baseline(),
            valid_rmse: 12.5,
        };
        write_best_trial(&path, &best).unwrap();
        assert_eq!(read_best_config(&path).unwrap(), ModelConfig::baseline());
    }
}
