use anyhow::{Context, Result};
use octocrab::Octocrab;
use tracing::info;

/// Create a GitHub client, authenticated when a personal access token is given.
///
/// Without a token the client is anonymous and subject to much tighter rate limits.
pub fn create_client(token: Option<&str>) -> Result<Octocrab> {
    let builder = Octocrab::builder();
    let builder = match token {
        Some(token) => builder.personal_token(token.to_string()),
        None => {
            info!("No GitHub token provided, using anonymous access (stricter rate limits)");
            builder
        }
    };
    builder.build().context("Failed to create GitHub client")
}
