use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::deck::VerdictPolicy;
use crate::source::github::{DEFAULT_BRANCHES, DEFAULT_DATA_DIR};

pub const LOCALES: &[&str] = &["en", "pl"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub verdict_policy: VerdictPolicy,
    /// `owner/repo` or a GitHub Pages URL to discover decks from.
    #[serde(default)]
    pub github_repo: Option<String>,
    #[serde(default = "default_branches")]
    pub branches: Vec<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_network_enabled")]
    pub network_enabled: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_branches() -> Vec<String> {
    DEFAULT_BRANCHES.iter().map(|b| b.to_string()).collect()
}
fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}
fn default_network_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            verdict_policy: VerdictPolicy::default(),
            github_repo: None,
            branches: default_branches(),
            data_dir: default_data_dir(),
            network_enabled: default_network_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fiszki")
            .join("config.toml")
    }

    /// Repair values a hand-edited file may have broken.
    pub fn validate(&mut self, available_themes: &[String]) {
        if !LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if !available_themes.is_empty() && !available_themes.contains(&self.theme) {
            self.theme = default_theme();
        }
        self.branches.retain(|b| !b.trim().is_empty());
        if self.branches.is_empty() {
            self.branches = default_branches();
        }
        let data_dir = self.data_dir.trim().trim_matches('/');
        self.data_dir = if data_dir.is_empty() {
            default_data_dir()
        } else {
            data_dir.to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.locale, "en");
        assert_eq!(config.verdict_policy, VerdictPolicy::TwoStep);
        assert_eq!(config.github_repo, None);
        assert_eq!(config.branches, vec!["main", "master", "gh-pages"]);
        assert_eq!(config.data_dir, "data");
        assert!(config.network_enabled);
    }

    #[test]
    fn test_config_reads_partial_file() {
        let toml_str = r#"
locale = "pl"
verdict_policy = "bad-immediate"
github_repo = "ola/slowka"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.locale, "pl");
        assert_eq!(config.verdict_policy, VerdictPolicy::BadImmediate);
        assert_eq!(config.github_repo.as_deref(), Some("ola/slowka"));
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.github_repo = Some("ola/slowka".to_string());
        config.verdict_policy = VerdictPolicy::BadImmediate;
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.github_repo, deserialized.github_repo);
        assert_eq!(config.verdict_policy, deserialized.verdict_policy);
        assert_eq!(config.branches, deserialized.branches);
    }

    #[test]
    fn test_validate_repairs_bad_values() {
        let mut config = Config::default();
        config.locale = "tlh".to_string();
        config.theme = "missing".to_string();
        config.branches = vec!["  ".to_string()];
        config.data_dir = "/decks/".to_string();

        config.validate(&["catppuccin-mocha".to_string(), "gruvbox-dark".to_string()]);

        assert_eq!(config.locale, "en");
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.branches, vec!["main", "master", "gh-pages"]);
        assert_eq!(config.data_dir, "decks");
    }

    #[test]
    fn test_validate_keeps_known_theme() {
        let mut config = Config::default();
        config.theme = "gruvbox-dark".to_string();
        config.validate(&["catppuccin-mocha".to_string(), "gruvbox-dark".to_string()]);
        assert_eq!(config.theme, "gruvbox-dark");
    }
}
