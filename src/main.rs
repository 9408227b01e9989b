//! Saveguard - watches applications and mirrors their save data to remote storage

use std::process::ExitCode;

use clap::Parser;

use saveguard::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
