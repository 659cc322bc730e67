pub mod client;
pub mod issues;
pub mod types;

pub use client::create_client;
pub use issues::{collect_pages, GitHubSource, IssueSource, PER_PAGE};
pub use types::{Comment, Issue, IssueState};
