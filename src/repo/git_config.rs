use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::{parse_repo_url, RepoCoordinate, ResolutionError};

const ORIGIN_SECTION: &str = r#"[remote "origin"]"#;

/// Read a `.git/config` file and resolve the repository of its `origin` remote
pub fn repo_from_git_config(path: &Path) -> Result<RepoCoordinate, ResolutionError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ResolutionError::NotFound(format!(
                "no git config at {}",
                path.display()
            )));
        }
        Err(e) => return Err(ResolutionError::Io(e)),
    };

    let url = find_origin_url(&contents).ok_or_else(|| {
        ResolutionError::NotFound(format!("no origin remote in {}", path.display()))
    })?;

    parse_repo_url(url)
}

/// Scan git config text for the `url` of `[remote "origin"]`.
///
/// Only lines inside the origin block count; the next section header ends it.
pub fn find_origin_url(contents: &str) -> Option<&str> {
    let mut in_origin = false;

    for line in contents.lines().map(str::trim) {
        if line.starts_with('[') {
            in_origin = line == ORIGIN_SECTION;
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                return Some(value.trim());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[core]
	repositoryformatversion = 0
	filemode = true
[remote "upstream"]
	url = https://github.com/upstream/project.git
	fetch = +refs/heads/*:refs/remotes/upstream/*
[remote "origin"]
	fetch = +refs/heads/*:refs/remotes/origin/*
	url = git@github.com:me/project.git
[branch "main"]
	remote = origin
	merge = refs/heads/main
"#;

    #[test]
    fn test_finds_origin_url_among_other_remotes() {
        assert_eq!(find_origin_url(SAMPLE), Some("git@github.com:me/project.git"));
    }

    #[test]
    fn test_url_after_origin_block_is_ignored() {
        let contents = "[remote \"origin\"]\n\tfetch = x\n[remote \"other\"]\n\turl = https://github.com/o/r\n";
        assert_eq!(find_origin_url(contents), None);
    }

    #[test]
    fn test_no_origin_section() {
        assert_eq!(find_origin_url("[core]\n\tbare = false\n"), None);
    }

    #[test]
    fn test_repo_from_git_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, SAMPLE).unwrap();

        let repo = repo_from_git_config(&path).unwrap();
        assert_eq!(repo, RepoCoordinate::new("me", "project"));
    }

    #[test]
    fn test_origin_with_unparsable_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "[remote \"origin\"]\n\turl = /srv/git/project\n").unwrap();

        let err = repo_from_git_config(&path).unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidFormat(_)));
    }
}
