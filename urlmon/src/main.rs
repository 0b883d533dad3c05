//! urlmon entry point

use clap::Parser;
use urlmon::cli::Cli;
use urlmon::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = urlmon::app::run(cli.into_config()).await {
        tracing::error!(error = %e, "urlmon failed");
        std::process::exit(1);
    }
}
