use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,           // empty when the issue has no description
    pub state: IssueState,
    pub author: String,         // login handle, without '@'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub milestone: Option<String>,
    pub url: String,            // HTML URL for browser
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<octocrab::models::issues::Issue> for Issue {
    fn from(issue: octocrab::models::issues::Issue) -> Self {
        let state = match issue.state {
            octocrab::models::IssueState::Open => IssueState::Open,
            octocrab::models::IssueState::Closed => IssueState::Closed,
            // Non-exhaustive upstream enum: fall back on the close timestamp
            _ if issue.closed_at.is_some() => IssueState::Closed,
            _ => IssueState::Open,
        };

        Issue {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            state,
            author: issue.user.login,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            closed_at: issue.closed_at,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
            milestone: issue.milestone.map(|m| m.title),
            url: issue.html_url.to_string(),
        }
    }
}

impl From<octocrab::models::issues::Comment> for Comment {
    fn from(comment: octocrab::models::issues::Comment) -> Self {
        Comment {
            author: comment.user.login,
            body: comment.body.unwrap_or_default(),
            created_at: comment.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// Build an issue with sensible defaults for tests
    pub fn issue(number: u64, state: IssueState, labels: &[&str], created: (i32, u32, u32)) -> Issue {
        let created_at = Utc
            .with_ymd_and_hms(created.0, created.1, created.2, 9, 30, 0)
            .unwrap();
        Issue {
            number,
            title: format!("Issue number {}", number),
            body: String::new(),
            state,
            author: "octocat".to_string(),
            created_at,
            updated_at: created_at,
            closed_at: None,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            assignees: Vec::new(),
            milestone: None,
            url: format!("https://github.com/octo/repo/issues/{}", number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(IssueState::Open.to_string(), "open");
        assert_eq!(IssueState::Closed.to_string(), "closed");
    }
}
