use crate::github::types::Issue;
use crate::repo::RepoCoordinate;

const TABLE_HEADER: &str = "| Number | Title | State | Created | Labels |\n|--------|-------|-------|---------|--------|\n";

/// Escape characters that would break a Markdown table cell
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn table_row(issue: &Issue, linked: bool) -> String {
    let number = if linked {
        format!("[#{}]({})", issue.number, issue.url)
    } else {
        format!("#{}", issue.number)
    };

    format!(
        "| {} | {} | {} | {} | {} |\n",
        number,
        table_cell(&issue.title),
        issue.state,
        issue.created_at.format("%Y-%m-%d"),
        table_cell(&issue.labels.join(", "))
    )
}

/// Markdown table of all issues; `linked` turns the number into a link
pub fn issue_table(issues: &[Issue], linked: bool) -> String {
    let mut table = String::from(TABLE_HEADER);
    for issue in issues {
        table.push_str(&table_row(issue, linked));
    }
    table
}

/// Prompt sent to the model: instruction, issue table, then every non-empty body
pub fn build_prompt(repo: &RepoCoordinate, issues: &[Issue]) -> String {
    let mut prompt = format!(
        "Below are the issues of the GitHub repository {}. Please analyze them and provide a summary:\n\n",
        repo
    );
    prompt.push_str(&issue_table(issues, false));

    for issue in issues.iter().filter(|i| !i.body.is_empty()) {
        prompt.push_str(&format!("\n**Issue #{} description**:\n{}\n", issue.number, issue.body));
    }

    prompt
}

/// Summary document: AI narrative followed by the linked issue table
pub fn build_summary_document(analysis: &str, issues: &[Issue]) -> String {
    let mut doc = String::new();
    doc.push_str("# GitHub Issues Summary\n\n");
    doc.push_str("*Generated by AI*\n\n");
    doc.push_str("## AI Analysis\n\n");
    doc.push_str(analysis.trim_end());
    doc.push_str("\n\n## Issues\n\n");
    doc.push_str(&issue_table(issues, true));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::{fixtures, IssueState};

    fn sample() -> Vec<Issue> {
        let mut first = fixtures::issue(1, IssueState::Open, &["bug"], (2024, 1, 5));
        first.body = "It crashes.".to_string();
        let mut second = fixtures::issue(2, IssueState::Closed, &["bug", "ui"], (2024, 1, 20));
        second.title = "Pipe | in title".to_string();
        vec![first, second]
    }

    #[test]
    fn test_issue_table_plain() {
        let table = issue_table(&sample(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "| #1 | Issue number 1 | open | 2024-01-05 | bug |");
        assert_eq!(lines[3], "| #2 | Pipe \\| in title | closed | 2024-01-20 | bug, ui |");
    }

    #[test]
    fn test_issue_table_linked() {
        let table = issue_table(&sample(), true);
        assert!(table.contains("| [#1](https://github.com/octo/repo/issues/1) | Issue number 1 |"));
    }

    #[test]
    fn test_prompt_includes_only_non_empty_bodies() {
        let prompt = build_prompt(&RepoCoordinate::new("octo", "repo"), &sample());
        assert!(prompt.starts_with("Below are the issues of the GitHub repository octo/repo."));
        assert!(prompt.contains("**Issue #1 description**:\nIt crashes.\n"));
        assert!(!prompt.contains("**Issue #2 description**"));
    }

    #[test]
    fn test_summary_document_layout() {
        let doc = build_summary_document("Two bugs reported.\n", &sample());
        assert!(doc.starts_with("# GitHub Issues Summary\n\n*Generated by AI*\n\n## AI Analysis\n\nTwo bugs reported.\n\n## Issues\n\n| Number |"));
        assert!(doc.contains("[#2](https://github.com/octo/repo/issues/2)"));
    }
}
