use crate::domain::RepairMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "rulepatch.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from rulepatch.toml.
/// Every field has a default, so an empty file (or none) is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub tool: ToolConfig,
    pub git: GitConfig,
    pub forge: ForgeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Rule identifiers to repair, in order.
    pub rules: Vec<String>,
    /// Request a pull request after pushing a patch branch.
    pub create_pr: bool,
    pub repair_mode: String,
    /// Working checkout, relative to the workspace.
    pub repo_dir: String,
    pub branch_prefix: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            create_pr: false,
            repair_mode: RepairMode::SNIPER.to_string(),
            repo_dir: "tmp_repo".to_string(),
            branch_prefix: "repair-patch".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Name used in commit messages, PR titles and patch records.
    pub name: String,
    /// Rule id is appended to this to link its documentation.
    pub rule_doc_url: String,
    pub program: String,
    /// `{rule}`, `{dir}` and `{mode}` are substituted.
    pub args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            name: "Sorald".to_string(),
            rule_doc_url: "https://rules.sonarsource.com/java/RSPEC-".to_string(),
            program: "sorald".to_string(),
            args: [
                "repair",
                "--source",
                "{dir}",
                "--rule-key",
                "{rule}",
                "--repair-strategy",
                "{mode}",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub committer_name: String,
    pub committer_email: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            committer_name: "rulepatch".to_string(),
            committer_email: "rulepatch@users.noreply.github.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub base_url: String,
    /// Remote name or URL patch branches are pushed to. Unset disables
    /// branch creation, pushing and PRs.
    pub fork_remote: Option<String>,
    /// PR drafts are written here, relative to the workspace.
    pub outbox_dir: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://github.com".to_string(),
            fork_remote: None,
            outbox_dir: "pr-outbox".to_string(),
        }
    }
}

impl Config {
    /// Load `rulepatch.toml` from the workspace, then from the user config
    /// directory. Returns defaults when neither exists.
    pub fn load(workspace: &Path) -> Result<Config, ConfigError> {
        let local = workspace.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_from(&local);
        }
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rulepatch").join("config.toml"))
    }
}
