use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "factcheck.yaml";

#[derive(Debug, Parser)]
#[command(name = "factcheck", version, about = "Verify claims against model-assessed sources")]
pub struct Cli {
    /// Configuration file. Without it `factcheck.yaml` is read when present.
    #[arg(long, global = true, env = "FACTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a fact against two or more supporting URLs.
    Verify {
        #[arg(long)]
        fact: String,
        /// Supporting URL; repeat for each source.
        #[arg(long = "source", required = true)]
        sources: Vec<String>,
    },
    /// Fetch a page and print its visible text.
    Fetch { url: String },
}
