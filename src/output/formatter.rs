use std::io::IsTerminal;
use std::path::Path;
use owo_colors::OwoColorize;

use crate::github::types::Issue;
use crate::repo::RepoCoordinate;

/// Longest title shown in a progress line before it is cut with "..."
const MAX_TITLE_WIDTH: usize = 60;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Line printed before fetching starts
pub fn format_fetching(repo: &RepoCoordinate, use_colors: bool) -> String {
    if use_colors {
        format!("Fetching issues of {}...", repo.to_string().cyan())
    } else {
        format!("Fetching issues of {}...", repo)
    }
}

/// Line printed after one issue file was written
pub fn format_saved(issue: &Issue, use_colors: bool) -> String {
    let title = truncate_title(&issue.title, MAX_TITLE_WIDTH);
    if use_colors {
        format!("Saved issue {}: {}", format!("#{}", issue.number).green(), title)
    } else {
        format!("Saved issue #{}: {}", issue.number, title)
    }
}

/// Final line of the export stage
pub fn format_done(saved: usize, failed: usize, output_dir: &Path, use_colors: bool) -> String {
    let dir = output_dir.display().to_string();
    let mut line = if use_colors {
        format!("Done! Saved {} issues to {}", saved.bold(), dir.underline())
    } else {
        format!("Done! Saved {} issues to {}", saved, dir)
    };

    if failed > 0 {
        let failures = format!(" ({} failed)", failed);
        if use_colors {
            line.push_str(&failures.red().to_string());
        } else {
            line.push_str(&failures);
        }
    }
    line
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width <= 3 {
        chars[..max_width].iter().collect()
    } else {
        let truncated: String = chars[..max_width - 3].iter().collect();
        format!("{}...", truncated)
    }
}
