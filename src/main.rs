use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use issue2file::config::{self, Flags};
use issue2file::github::{self, GitHubSource};
use issue2file::pipeline::{self, FatalError};
use issue2file::{browser, output, repo};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_RESOLUTION: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_IO: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "issue2file")]
#[command(about = "Export the issues of a GitHub repository to Markdown files", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:\n  issue2file .                          # issues of the git repository in the current directory\n  issue2file --token=xxx owner/repo     # issues of owner/repo using a GitHub token\n  issue2file --ai-summary --charts owner/repo")]
struct Cli {
    /// Repository: `.` (current git checkout), owner/repo, or a GitHub URL
    repo: String,

    /// GitHub API token (falls back to GITHUB_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// AI API token (falls back to AI_TOKEN)
    #[arg(long)]
    ai_token: Option<String>,

    /// Chat model used for the summary
    #[arg(long)]
    ai_model: Option<String>,

    /// Base URL of the OpenAI-compatible chat API
    #[arg(long)]
    ai_base_url: Option<String>,

    /// Timeout of the AI request, e.g. "60s" or "2m"
    #[arg(long)]
    ai_timeout: Option<String>,

    /// Do not download issue comments
    #[arg(long)]
    no_comments: bool,

    /// Summarize all issues with an AI model
    #[arg(long)]
    ai_summary: bool,

    /// Generate status, label and timeline charts
    #[arg(long)]
    charts: bool,

    /// Output directory (defaults to issues_<owner>_<repo>)
    #[arg(short, long)]
    output: Option<String>,

    /// File name of the AI summary inside the output directory
    #[arg(long)]
    summary_file: Option<String>,

    /// Path to config file (defaults to issue2file/config.toml in the platform config dir, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open the charts index in the browser when done
    #[arg(long)]
    open: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn flags(&self) -> Flags {
        Flags {
            token: self.token.clone(),
            ai_token: self.ai_token.clone(),
            ai_model: self.ai_model.clone(),
            ai_base_url: self.ai_base_url.clone(),
            ai_timeout: self.ai_timeout.clone(),
            comments: !self.no_comments,
            ai_summary: self.ai_summary,
            charts: self.charts,
            output: self.output.clone(),
            summary_file: self.summary_file.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let file_config = match config::load_optional_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let settings = match config::resolve_settings(&cli.flags(), file_config.as_ref(), config::process_env) {
        Ok(s) => s,
        Err(e) => {
            error!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(
        "Settings: comments={} ai_summary={} charts={} model={}",
        settings.with_comments, settings.ai_summary, settings.charts, settings.ai_model
    );

    // Resolve the repository before any network access
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Cannot determine current directory: {}", e);
            std::process::exit(EXIT_RESOLUTION);
        }
    };
    let repo = match repo::locate(&cli.repo, &cwd) {
        Ok(r) => r,
        Err(e) => {
            error!("Cannot resolve repository: {}", e);
            std::process::exit(EXIT_RESOLUTION);
        }
    };

    // Create GitHub client
    let client = match github::create_client(settings.github_token.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create GitHub client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };
    let source = GitHubSource::new(client);

    let chat = pipeline::build_chat_client(&settings);

    let use_colors = output::should_use_colors();
    let outcome = match pipeline::run(&source, chat.as_ref(), &repo, &settings, use_colors).await {
        Ok(o) => o,
        Err(e) => {
            error!("{}", e);
            let code = match e {
                FatalError::Fetch(_) => EXIT_NETWORK,
                FatalError::OutputDir(_) => EXIT_IO,
            };
            std::process::exit(code);
        }
    };

    if cli.open {
        match &outcome.charts_index {
            Some(index) => {
                if let Err(e) = browser::open_file(index) {
                    warn!("{:#}", e);
                }
            }
            None => warn!("--open needs charts; run with --charts"),
        }
    }

    debug!(
        "Total: {} issues ({} saved) in {:?}",
        outcome.total,
        outcome.saved,
        start_time.elapsed()
    );

    std::process::exit(EXIT_SUCCESS);
}
