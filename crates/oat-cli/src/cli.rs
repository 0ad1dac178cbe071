use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Weather feature pipeline
    Weather {
        #[command(subcommand)]
        command: WeatherCommands,
    },
    /// Regression model pipeline
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum WeatherCommands {
    /// Join shutoff records with five-day lookback weather features
    Join {
        /// Path to the processed shutoffs CSV
        #[arg(long)]
        shutoffs: String,
        /// Directory of per-event daily weather CSVs
        #[arg(long)]
        weather_dir: String,
        /// Output path for the merged CSV
        #[arg(short, long)]
        out: String,
        /// Treat circuit/date mismatches across the join as a hard error
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelCommands {
    /// Random hyperparameter search minimizing validation RMSE
    Tune {
        /// Pre-split one-hot-encoded training features CSV
        #[arg(long)]
        x_train: String,
        /// Training target CSV
        #[arg(long)]
        y_train: String,
        /// Number of trials to run
        #[arg(long, default_value_t = 100)]
        trials: usize,
        /// Seed for weight init, dropout and trial sampling
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Fraction of the training split held out for validation
        #[arg(long, default_value_t = 0.2)]
        valid_fraction: f64,
        /// Seed for the train/validation shuffle
        #[arg(long, default_value_t = 42)]
        split_seed: u64,
        /// Validation RMSE below which a trial leaves a text artifact
        #[arg(long, default_value_t = oat_model::DEFAULT_RMSE_THRESHOLD)]
        rmse_threshold: f64,
        /// Directory for per-trial text artifacts
        #[arg(long)]
        artifacts_dir: String,
        /// Output path for the best trial CSV
        #[arg(long)]
        best_out: String,
    },
    /// Retrain the baseline (and optionally the best) configuration and
    /// report R²/RMSE/MAE/MAPE on train and test splits
    Evaluate {
        /// Pre-split one-hot-encoded training features CSV
        #[arg(long)]
        x_train: String,
        /// Training target CSV
        #[arg(long)]
        y_train: String,
        /// Pre-split one-hot-encoded test features CSV
        #[arg(long)]
        x_test: String,
        /// Test target CSV
        #[arg(long)]
        y_test: String,
        /// Best-trial CSV from `oat model tune`; baseline only when omitted
        #[arg(long)]
        best_params: Option<String>,
        /// Seed for weight init and dropout
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Fraction of the training split held out for validation
        #[arg(long, default_value_t = 0.2)]
        valid_fraction: f64,
        /// Seed for the train/validation shuffle
        #[arg(long, default_value_t = 42)]
        split_seed: u64,
    },
}
