use clap::Parser;
use pantry_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_logging_stderr();
    } else {
        logging::init();
    }

    if let Err(err) = cli.run().await {
        eprintln!("pantry error: {:#}", err);
        std::process::exit(1);
    }
}
