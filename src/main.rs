//! webtest - declarative browser test runner
//!
//! Tests are directory trees of YAML/JSON step definitions; the engine
//! resolves a tree into one flat step sequence and drives it against a
//! WebDriver session.

use clap::Parser;
use webtest::{cli, commands::Commands, common};

#[derive(Parser)]
#[command(name = "webtest", about = "Declarative browser test runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
