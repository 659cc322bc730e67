use serde::{Deserialize, Serialize};

/// Contents of the TOML config file.
///
/// Every key is optional. A key that is absent leaves the command-line value
/// in place, so `commentEnable` missing from the file does not turn comments off.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub git_hub_token: Option<String>,
    pub ai_token: Option<String>,
    pub ai_model: Option<String>,
    pub ai_base_url: Option<String>,
    pub ai_timeout: Option<String>, // humantime, e.g. "90s"
    pub comment_enable: Option<bool>,
    pub ai_enable: Option<bool>,
    pub chart_enable: Option<bool>,
    pub output_dir: Option<String>,
    pub summary_file: Option<String>,
}
