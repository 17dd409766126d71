//! Outpost CLI - On-demand cloud dev machines over SSH

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

mod application;
mod cli;
mod commands;
mod domain;
mod infra;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
