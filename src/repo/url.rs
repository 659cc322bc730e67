use super::{RepoCoordinate, ResolutionError};

const HTTPS_PREFIX: &str = "https://github.com/";
const SSH_PREFIX: &str = "git@github.com:";

/// Parse a repository reference in one of three forms, tried in order:
///
/// - `https://github.com/owner/repo[.git][/]`
/// - `git@github.com:owner/repo[.git][/]`
/// - `owner/repo[.git][/]`
pub fn parse_repo_url(input: &str) -> Result<RepoCoordinate, ResolutionError> {
    let input = input.trim();

    let parsed = if let Some(rest) = input.strip_prefix(HTTPS_PREFIX) {
        split_owner_name(rest)
    } else if let Some(rest) = input.strip_prefix(SSH_PREFIX) {
        split_owner_name(rest)
    } else {
        split_owner_name(input).filter(|(owner, name)| is_plain_segment(owner) && is_plain_segment(name))
    };

    parsed
        .map(|(owner, name)| RepoCoordinate::new(owner, name))
        .ok_or_else(|| ResolutionError::InvalidFormat(input.to_string()))
}

/// Split `owner/name` after dropping one trailing slash and a `.git` suffix.
/// Exactly two non-empty segments are accepted.
fn split_owner_name(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let (owner, name) = rest.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

// Shorthand segments must not look like a host or scheme
fn is_plain_segment(segment: &str) -> bool {
    !segment.contains(':') && !segment.chars().any(char::is_whitespace)
}
