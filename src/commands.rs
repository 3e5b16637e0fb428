//! CLI command definitions
//!
//! Defines the clap commands for the webtest CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run one or more tests
    Run {
        /// Test locations: a test directory or a single step file
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Browser to drive (chrome, firefox, edge, safari)
        #[arg(long)]
        browser: Option<String>,

        /// Remote WebDriver endpoint, e.g. http://hub:4444
        #[arg(long)]
        remote: Option<String>,

        /// Implicit element-wait in seconds
        #[arg(long)]
        implicit_wait: Option<u64>,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },

    /// Resolve a test's step tree and print the flattened sequence
    Resolve {
        /// Test location: a test directory or a single step file
        path: PathBuf,

        /// Print the resolved sequence as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered keywords by module
    Keywords,
}
