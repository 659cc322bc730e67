mod schema;

pub use schema::FileConfig;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::repo::RepoCoordinate;

/// Environment variable consulted when no GitHub token is configured
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable consulted when no AI token is configured
pub const ENV_AI_TOKEN: &str = "AI_TOKEN";

pub const DEFAULT_SUMMARY_FILE: &str = "summary.md";
pub const DEFAULT_AI_MODEL: &str = "deepseek-chat";
pub const DEFAULT_AI_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(60);

/// Get the config directory path: `issue2file/` under the platform config dir
/// (`$XDG_CONFIG_HOME` or `~/.config` on Linux, `~/Library/Application Support` on macOS, `%APPDATA%` on Windows)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("issue2file"))
}

/// Get the default config file path (`config.toml` in [`get_config_dir`])
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load a TOML config file.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read, or is not
/// valid TOML for [`FileConfig`].
pub fn load_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid TOML in {}", path.display()))
}

/// Load the explicit config file if given, else the default one if it exists.
pub fn load_optional_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    match explicit {
        Some(path) => load_config(path).map(Some),
        None => match get_config_path() {
            Some(path) if path.exists() => load_config(&path).map(Some),
            _ => Ok(None),
        },
    }
}

/// Values supplied on the command line, before merging
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub token: Option<String>,
    pub ai_token: Option<String>,
    pub ai_model: Option<String>,
    pub ai_base_url: Option<String>,
    pub ai_timeout: Option<String>,
    pub comments: bool,
    pub ai_summary: bool,
    pub charts: bool,
    pub output: Option<String>,
    pub summary_file: Option<String>,
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub github_token: Option<String>,
    pub ai_token: Option<String>,
    pub ai_model: String,
    pub ai_base_url: String,
    pub ai_timeout: Duration,
    pub with_comments: bool,
    pub ai_summary: bool,
    pub charts: bool,
    pub output_dir: Option<PathBuf>, // None: derive from the repository
    pub summary_file: String,
}

impl Settings {
    /// Output directory, defaulting to `issues_<owner>_<repo>`
    pub fn output_dir_for(&self, repo: &RepoCoordinate) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("issues_{}_{}", repo.owner, repo.name)))
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Merge config sources with precedence file > flag > environment > default.
///
/// `env` looks up an environment variable; it is only consulted for tokens.
pub fn resolve_settings(
    flags: &Flags,
    file: Option<&FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let file = file.cloned().unwrap_or_default();
    let pick = |from_file: &Option<String>, from_flag: &Option<String>| {
        non_empty(from_file.as_ref()).or_else(|| non_empty(from_flag.as_ref()))
    };
    let env_var = |name: &str| non_empty(env(name).as_ref());

    let github_token = pick(&file.git_hub_token, &flags.token).or_else(|| env_var(ENV_GITHUB_TOKEN));
    let ai_token = pick(&file.ai_token, &flags.ai_token).or_else(|| env_var(ENV_AI_TOKEN));

    let ai_timeout = match pick(&file.ai_timeout, &flags.ai_timeout) {
        Some(raw) => humantime::parse_duration(&raw)
            .with_context(|| format!("Invalid AI timeout '{}' (expected e.g. \"60s\" or \"2m\")", raw))?,
        None => DEFAULT_AI_TIMEOUT,
    };

    Ok(Settings {
        github_token,
        ai_token,
        ai_model: pick(&file.ai_model, &flags.ai_model).unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
        ai_base_url: pick(&file.ai_base_url, &flags.ai_base_url)
            .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
        ai_timeout,
        with_comments: file.comment_enable.unwrap_or(flags.comments),
        ai_summary: file.ai_enable.unwrap_or(flags.ai_summary),
        charts: file.chart_enable.unwrap_or(flags.charts),
        output_dir: pick(&file.output_dir, &flags.output).map(PathBuf::from),
        summary_file: pick(&file.summary_file, &flags.summary_file)
            .unwrap_or_else(|| DEFAULT_SUMMARY_FILE.to_string()),
    })
}

/// Read process environment variables
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn default_flags() -> Flags {
        Flags { comments: true, ..Flags::default() }
    }

    #[test]
    fn test_config_path_under_platform_config_dir() {
        if let (Some(base), Some(path)) = (dirs::config_dir(), get_config_path()) {
            assert_eq!(path, base.join("issue2file").join("config.toml"));
        }
    }

    #[test]
    fn test_defaults() {
        let settings = resolve_settings(&default_flags(), None, no_env).unwrap();
        assert_eq!(settings.github_token, None);
        assert_eq!(settings.ai_model, DEFAULT_AI_MODEL);
        assert_eq!(settings.ai_base_url, DEFAULT_AI_BASE_URL);
        assert_eq!(settings.ai_timeout, Duration::from_secs(60));
        assert!(settings.with_comments);
        assert!(!settings.ai_summary);
        assert!(!settings.charts);
        assert_eq!(settings.summary_file, "summary.md");
        assert_eq!(
            settings.output_dir_for(&RepoCoordinate::new("octo", "repo")),
            PathBuf::from("issues_octo_repo")
        );
    }

    #[test]
    fn test_file_overrides_flag_overrides_env() {
        let env = |name: &str| match name {
            ENV_GITHUB_TOKEN => Some("env-gh".to_string()),
            ENV_AI_TOKEN => Some("env-ai".to_string()),
            _ => None,
        };
        let flags = Flags {
            token: Some("flag-gh".to_string()),
            ..default_flags()
        };
        let file = FileConfig {
            ai_token: Some("file-ai".to_string()),
            ..FileConfig::default()
        };

        let settings = resolve_settings(&flags, Some(&file), env).unwrap();
        assert_eq!(settings.github_token.as_deref(), Some("flag-gh"));
        assert_eq!(settings.ai_token.as_deref(), Some("file-ai"));

        let settings = resolve_settings(&default_flags(), None, env).unwrap();
        assert_eq!(settings.github_token.as_deref(), Some("env-gh"));
        assert_eq!(settings.ai_token.as_deref(), Some("env-ai"));
    }

    #[test]
    fn test_empty_values_fall_through() {
        let env = |name: &str| (name == ENV_GITHUB_TOKEN).then(|| "  ".to_string());
        let flags = Flags { token: Some(String::new()), ..default_flags() };
        let file = FileConfig { git_hub_token: Some(String::new()), ..FileConfig::default() };

        let settings = resolve_settings(&flags, Some(&file), env).unwrap();
        assert_eq!(settings.github_token, None);
    }

    #[test]
    fn test_absent_file_booleans_keep_flags() {
        let flags = Flags { ai_summary: true, charts: true, ..default_flags() };
        let file: FileConfig = toml::from_str("outputDir = \"out\"").unwrap();

        let settings = resolve_settings(&flags, Some(&file), no_env).unwrap();
        assert!(settings.with_comments);
        assert!(settings.ai_summary);
        assert!(settings.charts);
        assert_eq!(settings.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_present_file_booleans_win() {
        let flags = Flags { ai_summary: true, ..default_flags() };
        let file: FileConfig =
            toml::from_str("commentEnable = false\naiEnable = false\nchartEnable = true").unwrap();

        let settings = resolve_settings(&flags, Some(&file), no_env).unwrap();
        assert!(!settings.with_comments);
        assert!(!settings.ai_summary);
        assert!(settings.charts);
    }

    #[test]
    fn test_ai_timeout_parsing() {
        let flags = Flags { ai_timeout: Some("2m".to_string()), ..default_flags() };
        let settings = resolve_settings(&flags, None, no_env).unwrap();
        assert_eq!(settings.ai_timeout, Duration::from_secs(120));

        let flags = Flags { ai_timeout: Some("soon".to_string()), ..default_flags() };
        assert!(resolve_settings(&flags, None, no_env).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
gitHubToken = "ghp_x"
aiToken = "sk-y"
aiModel = "gpt-4o-mini"
aiBaseUrl = "https://api.openai.com/v1"
commentEnable = true
aiEnable = true
chartEnable = false
outputDir = "exports"
summaryFile = "overview.md"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.git_hub_token.as_deref(), Some("ghp_x"));
        assert_eq!(config.ai_base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(config.chart_enable, Some(false));
        assert_eq!(config.summary_file.as_deref(), Some("overview.md"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "aiEnable = \"yes\"").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_optional_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
