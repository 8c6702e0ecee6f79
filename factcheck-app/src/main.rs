use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, DEFAULT_CONFIG_FILE};
use factcheck_common::observability::{LogConfig, init_logging};
use factcheck_config::{FactcheckConfig, FactcheckConfigLoader};
use factcheck_verify::{Fact, FactVerifier, Source};
use factcheck_web::PageFetcher;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let loader = match &cli.config {
        Some(path) => FactcheckConfigLoader::new().with_file(path),
        None => FactcheckConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg: FactcheckConfig = loader.load().context("loading configuration")?;

    // 2) Logging from the `logging:` section
    let log_path = init_logging(LogConfig::from_settings("factcheck", &cfg.logging))?;
    tracing::debug!(log_path = %log_path.display(), "factcheck.start");

    match cli.command {
        Command::Verify { fact, sources } => {
            let client = factcheck_llm::connect(&cfg.gateway)?;
            let verifier = FactVerifier::new(client, cfg.verification.clone());
            let sources: Vec<Source> = sources.into_iter().map(Source::new).collect();

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            let outcome = verifier
                .verify_fact_with_cancel(&Fact::new(fact), &sources, cancel)
                .await;
            print_json(&outcome, cli.pretty)
        }
        Command::Fetch { url } => {
            let fetcher = PageFetcher::new(&cfg.fetch)?;
            let response = fetcher.fetch_response(&url).await;
            print_json(&response, cli.pretty)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
