use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tabwriter::TabWriter;
use tracing::info;

use oat_cli::cli::ModelCommands;
use oat_cli::manifest::record_manifest;
use oat_core::schema::numeric_feature_columns;
use oat_core::ModelConfig;
use oat_features::{numeric_block, train_valid_split, StandardScaler};
use oat_io::{read_feature_table, read_target_column};
use oat_model::{
    read_best_config, regression_report, run_search, train, variance, Mlp, RegressionMetrics,
    SearchSpace,
};

pub fn handle(command: &ModelCommands) -> Result<()> {
    match command {
        ModelCommands::Tune {
            x_train,
            y_train,
            trials,
            seed,
            valid_fraction,
            split_seed,
            rmse_threshold,
            artifacts_dir,
            best_out,
        } => {
            info!(
                "Tuning on {} ({} trials, seed {}) -> {}",
                x_train, trials, seed, best_out
            );
            let x = read_feature_table(Path::new(x_train))?;
            let y = read_target_column(Path::new(y_train))?;
            let (train_x, train_y, valid_x, valid_y) =
                train_valid_split(&x, &y, *valid_fraction, *split_seed)?;

            let columns = numeric_feature_columns();
            let train_block = numeric_block(&train_x, columns)?;
            let scaler = StandardScaler::fit(columns, &train_block)?;
            let scaled_train = scaler.transform(&train_block)?;
            let scaled_valid = scaler.transform(&numeric_block(&valid_x, columns)?)?;

            let mut rng = StdRng::seed_from_u64(*seed);
            let outcome = run_search(
                &SearchSpace::default(),
                &scaled_train,
                &train_y,
                &scaled_valid,
                &valid_y,
                *trials,
                *rmse_threshold,
                Path::new(artifacts_dir),
                &mut rng,
            )?;
            oat_model::write_best_trial(Path::new(best_out), &outcome.best)?;

            println!(
                "Best of {} trials: #{} with validation RMSE {:.4} -> {}",
                outcome.trials_run, outcome.best.number, outcome.best.valid_rmse, best_out
            );
            record_manifest(
                Path::new(best_out),
                "model tune",
                &[
                    ("x_train", x_train.clone()),
                    ("y_train", y_train.clone()),
                    ("trials", trials.to_string()),
                    ("seed", seed.to_string()),
                    ("valid_fraction", valid_fraction.to_string()),
                    ("split_seed", split_seed.to_string()),
                    ("rmse_threshold", rmse_threshold.to_string()),
                    ("artifacts_dir", artifacts_dir.clone()),
                ],
            )?;
            Ok(())
        }
        ModelCommands::Evaluate {
            x_train,
            y_train,
            x_test,
            y_test,
            best_params,
            seed,
            valid_fraction,
            split_seed,
        } => {
            info!("Evaluating on train {} / test {}", x_train, x_test);
            let x = read_feature_table(Path::new(x_train))?;
            let y = read_target_column(Path::new(y_train))?;
            // Hold out the same validation rows the search saw.
            let (train_x, train_y, _valid_x, _valid_y) =
                train_valid_split(&x, &y, *valid_fraction, *split_seed)?;
            let test_x = read_feature_table(Path::new(x_test))?;
            let test_y = read_target_column(Path::new(y_test))?;

            let columns = numeric_feature_columns();
            let train_block = numeric_block(&train_x, columns)?;
            let scaler = StandardScaler::fit(columns, &train_block)?;
            let scaled_train = scaler.transform(&train_block)?;
            let scaled_test = scaler.transform(&numeric_block(&test_x, columns)?)?;

            let mut candidates = vec![("baseline", ModelConfig::baseline())];
            if let Some(path) = best_params {
                let best = read_best_config(Path::new(path))
                    .with_context(|| format!("loading best parameters from {path}"))?;
                candidates.push(("best", best));
            }

            let null_train_rmse = variance(&train_y).sqrt();
            let null_test_rmse = variance(&test_y).sqrt();
            let input_dim = columns.len();

            let mut rows: Vec<(&str, &str, RegressionMetrics)> = Vec::new();
            for (name, config) in &candidates {
                let mut rng = StdRng::seed_from_u64(*seed);
                let mut model = Mlp::new(input_dim, config, &mut rng)?;
                let report = train(
                    &mut model,
                    &scaled_train,
                    &train_y,
                    config.epochs,
                    config.learning_rate,
                    &mut rng,
                )?;
                info!(
                    model = name,
                    final_loss = report.final_loss,
                    epochs_run = report.epochs_run,
                    converged = report.converged,
                    "retrained"
                );
                rows.push((
                    *name,
                    "train",
                    regression_report(&model.predict(&scaled_train), &train_y, null_train_rmse),
                ));
                rows.push((
                    *name,
                    "test",
                    regression_report(&model.predict(&scaled_test), &test_y, null_test_rmse),
                ));
            }

            print_metrics_table(&rows)?;
            Ok(())
        }
    }
}

fn print_metrics_table(rows: &[(&str, &str, RegressionMetrics)]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "MODEL\tSPLIT\tR2\tRMSE\tMAE\tMAPE")?;
    for (model, split, metrics) in rows {
        writeln!(
            writer,
            "{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            model, split, metrics.r_squared, metrics.rmse, metrics.mae, metrics.mape
        )?;
    }
    writer.flush()?;
    Ok(())
}
