use clap::Parser;
use dashboard_stats::Cli;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = dashboard_stats::run(cli).await {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
