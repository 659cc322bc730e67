use anyhow::{Context, Result};
use std::path::Path;

/// Open a local HTML file (e.g. the charts index) in the user's default browser
///
/// # Errors
/// Returns error if the path cannot be resolved or no browser can be opened
pub fn open_file(path: &Path) -> Result<()> {
    let absolute = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let target = absolute.to_string_lossy();

    webbrowser::open(&target)
        .with_context(|| format!("Failed to open browser for {}", target))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_file(&dir.path().join("absent.html")).unwrap_err();
        assert!(err.to_string().contains("Failed to resolve"));
    }
}
