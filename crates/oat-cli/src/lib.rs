//! # oat-cli: Command-Line Interface for PSPS Outage Analysis
//!
//! The `oat` binary wires the weather-join and model-training pipelines to
//! clap subcommands. Argument types live in [`cli`]; each command writes a
//! JSON run manifest ([`manifest`]) next to its primary output.

pub mod cli;
pub mod manifest;
