//! Token resolution and client construction
//!
//! Builds an authenticated `OctocrabClient` for github.com or a GitHub
//! Enterprise API endpoint.

use crate::{OctocrabClient, DEFAULT_API_URL};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves the GitHub token for the run
///
/// Tries multiple sources in order:
/// 1. The explicit action input (`INPUT_TOKEN`)
/// 2. `GITHUB_TOKEN`
/// 3. `GH_TOKEN`
#[derive(Debug, Clone, Default)]
pub struct TokenResolver {
    input_token: Option<String>,
}

impl TokenResolver {
    /// Create a new token resolver reading the action input from the environment
    pub fn new() -> Self {
        Self::with_input(std::env::var("INPUT_TOKEN").ok())
    }

    /// Create a token resolver with an explicit input token
    pub fn with_input(input_token: Option<String>) -> Self {
        Self {
            input_token: input_token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Get the token for this run
    pub fn get_token(&self) -> Result<String> {
        if let Some(ref token) = self.input_token {
            debug!("Using token from action input");
            return Ok(token.trim().to_string());
        }

        for env_key in ["GITHUB_TOKEN", "GH_TOKEN"] {
            if let Ok(token) = std::env::var(env_key) {
                if !token.trim().is_empty() {
                    debug!("Using token from env var {}", env_key);
                    return Ok(token.trim().to_string());
                }
            }
        }

        Err(anyhow::anyhow!(
            "No token found. Set the `token` input, GITHUB_TOKEN or GH_TOKEN"
        ))
    }
}

/// Create an authenticated client
///
/// # Arguments
///
/// * `token` - Personal access token or `GITHUB_TOKEN` of the workflow
/// * `api_url` - API base URL; `None` means public GitHub
pub fn create_client(token: String, api_url: Option<&str>) -> Result<OctocrabClient> {
    let api_url = api_url.unwrap_or(DEFAULT_API_URL);
    info!("Creating GitHub client for {}", api_url);

    let mut builder = Octocrab::builder().personal_token(token);
    if api_url.trim_end_matches('/') != DEFAULT_API_URL {
        builder = builder
            .base_uri(api_url)
            .context("Failed to set base URI")?;
    }

    let octocrab = builder.build().context("Failed to build Octocrab client")?;
    Ok(OctocrabClient::new(Arc::new(octocrab)))
}
