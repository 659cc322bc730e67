mod git_config;
mod url;

pub use git_config::{find_origin_url, repo_from_git_config};
pub use url::parse_repo_url;

use std::fmt;
use std::path::Path;

/// Owner/name pair that addresses a repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinate {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug)]
pub enum ResolutionError {
    /// No local git config, or no `origin` remote in it
    NotFound(String),
    /// The reference matched none of the supported forms
    InvalidFormat(String),
    Io(std::io::Error),
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::NotFound(msg) => write!(f, "Repository not found: {}", msg),
            ResolutionError::InvalidFormat(input) => write!(
                f,
                "Cannot parse repository reference '{}'. Use owner/repo, an https URL or an ssh URL",
                input
            ),
            ResolutionError::Io(e) => write!(f, "Failed to read git config: {}", e),
        }
    }
}

impl std::error::Error for ResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolutionError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Resolve the CLI repository argument.
///
/// `.` reads the `origin` remote from `<cwd>/.git/config`; anything else is
/// parsed as a URL or `owner/repo` shorthand. No network access happens here.
pub fn locate(reference: &str, cwd: &Path) -> Result<RepoCoordinate, ResolutionError> {
    if reference.trim() == "." {
        repo_from_git_config(&cwd.join(".git").join("config"))
    } else {
        parse_repo_url(reference)
    }
}
