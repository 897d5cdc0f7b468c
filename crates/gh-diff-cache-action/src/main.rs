//! GitHub Action entry point
//!
//! Reads the action inputs and triggering event from the runner environment,
//! runs the diff cache once and publishes the filtered files as step outputs.
//! Failures are reported as a workflow `::error::` annotation.

use anyhow::{Context, Result};
use gh_client::{create_client, TokenResolver};
use gh_diff_cache::store::CACHE_SECRET_ENV;
use gh_diff_cache::{CacheConfig, DiffCache};
use std::process::ExitCode;
use std::sync::Arc;

mod inputs;
mod logger;
mod outputs;
mod workflow;

use inputs::ActionInputs;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env for local runs
    if std::env::var("INPUT_TOKEN").is_err() && std::env::var("GITHUB_TOKEN").is_err() {
        if let Ok(path) = dotenvy::dotenv() {
            eprintln!("Loaded .env file from: {:?}", path);
        }
    }

    logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Run failed: {:?}", e);
            println!("::error::{}", escape_data(&format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let inputs = ActionInputs::from_env()?;
    let event = inputs.read_event()?;
    let config = CacheConfig::load()?;
    log::debug!("Config: {:?}", config);

    let token = TokenResolver::new().get_token()?;
    let client = create_client(token, Some(config.api_url.as_str()))
        .context("Failed to create GitHub client")?;
    let client = Arc::new(client);

    if let Some(run_id) = inputs.run_id {
        workflow::log_workflow(&*client, &inputs.repository, run_id).await;
    }

    let mut cache = DiffCache::access_with_client(
        client,
        inputs.repository.clone(),
        &event,
        &config,
        std::env::var(CACHE_SECRET_ENV).ok(),
    )
    .await?;

    let outcome = cache.run(&inputs.include, &inputs.exclude).await?;
    log::info!(
        "{} changed files match, {} newly cached",
        outcome.changed.len(),
        outcome.written.len()
    );

    outputs::write_outputs(&outcome)
}

/// Escape a workflow command message so line breaks survive
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
