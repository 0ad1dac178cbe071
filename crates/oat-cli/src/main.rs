use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use oat_cli::cli::{Cli, Commands};

mod commands;
use commands::{model, weather};

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Weather { command } => weather::handle(command),
        Commands::Model { command } => model::handle(command),
    };

    match result {
        Ok(()) => info!("Command successful!"),
        Err(e) => {
            error!("Command failed: {:?}", e);
            std::process::exit(1);
        }
    }
}
