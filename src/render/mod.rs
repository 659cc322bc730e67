pub mod files;
pub mod markdown;

pub use files::{save_issues, write_issue_file, SaveReport};
pub use markdown::{format_timestamp, issue_filename, render_issue, sanitize_filename};
