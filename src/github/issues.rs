use anyhow::{Context, Result};
use octocrab::params::State;
use octocrab::Octocrab;
use std::future::Future;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::debug;

use crate::github::types::{Comment, Issue};
use crate::repo::RepoCoordinate;

/// Page size requested from the list endpoints (GitHub maximum)
pub const PER_PAGE: u8 = 100;

/// Anything that can list the issues and comments of a repository
#[allow(async_fn_in_trait)]
pub trait IssueSource {
    /// All issues regardless of state, in server order
    async fn list_issues(&self, repo: &RepoCoordinate) -> Result<Vec<Issue>>;

    /// All comments of one issue, in server order
    async fn list_comments(&self, repo: &RepoCoordinate, number: u64) -> Result<Vec<Comment>>;
}

/// Request pages 1, 2, ... until the server reports no next page.
///
/// `fetch_page` returns the items of one page and whether another page follows.
/// Any page failure aborts the whole collection; nothing partial is returned.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, bool)>>,
{
    let mut all = Vec::new();
    let mut page = 1u32;

    loop {
        let (items, has_next) = fetch_page(page).await?;
        debug!("Fetched page {} ({} items)", page, items.len());
        all.extend(items);

        if !has_next {
            break;
        }
        page += 1;
    }

    Ok(all)
}

/// Live GitHub REST API source
pub struct GitHubSource {
    client: Octocrab,
}

impl GitHubSource {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

// Exponential backoff with 3 attempts per page
fn retry_strategy() -> impl Iterator<Item = std::time::Duration> {
    ExponentialBackoff::from_millis(100)
        .max_delay(std::time::Duration::from_secs(5))
        .take(3)
}

// Client errors (bad repo, bad token) fail the same way on every attempt
fn is_transient(e: &octocrab::Error) -> bool {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let status = source.status_code.as_u16();
            status == 429 || status >= 500
        }
        _ => true,
    }
}

/// Attach a hint the user can act on, keeping the octocrab error as the source
fn describe_api_error(e: octocrab::Error) -> anyhow::Error {
    let hint = match &e {
        octocrab::Error::GitHub { source, .. } => match source.status_code.as_u16() {
            404 => "Repository not found or no access. Check the repo name and token permissions.",
            401 => "Authentication failed. Your GitHub token may be invalid or expired.",
            403 | 429 => "GitHub API rate limit exceeded or access forbidden. Provide a token or wait a few minutes.",
            _ => "GitHub API error",
        },
        _ => "GitHub API request failed",
    };
    anyhow::Error::new(e).context(hint)
}

impl IssueSource for GitHubSource {
    async fn list_issues(&self, repo: &RepoCoordinate) -> Result<Vec<Issue>> {
        collect_pages(|page| async move {
            let result = RetryIf::spawn(
                retry_strategy(),
                || async {
                    self.client
                        .issues(&repo.owner, &repo.name)
                        .list()
                        .state(State::All)
                        .per_page(PER_PAGE)
                        .page(page)
                        .send()
                        .await
                },
                is_transient,
            )
            .await
            .map_err(describe_api_error)
            .with_context(|| format!("Failed to fetch issues page {} of {}", page, repo))?;

            let has_next = result.next.is_some();
            let issues: Vec<Issue> = result.items.into_iter().map(Issue::from).collect();
            Ok::<_, anyhow::Error>((issues, has_next))
        })
        .await
    }

    async fn list_comments(&self, repo: &RepoCoordinate, number: u64) -> Result<Vec<Comment>> {
        collect_pages(|page| async move {
            let result = RetryIf::spawn(
                retry_strategy(),
                || async {
                    self.client
                        .issues(&repo.owner, &repo.name)
                        .list_comments(number)
                        .per_page(PER_PAGE)
                        .page(page)
                        .send()
                        .await
                },
                is_transient,
            )
            .await
            .map_err(describe_api_error)
            .with_context(|| {
                format!("Failed to fetch comments page {} of {}#{}", page, repo, number)
            })?;

            let has_next = result.next.is_some();
            let comments: Vec<Comment> = result.items.into_iter().map(Comment::from).collect();
            Ok::<_, anyhow::Error>((comments, has_next))
        })
        .await
    }
}
