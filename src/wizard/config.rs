use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{Catalog, Profile};
use crate::error::{InstallerError, Result};

pub const CONFIG_FILE_NAME: &str = "installer.toml";

/// Name of the installer's own directory inside the dotfiles repository
pub const DEFAULT_INSTALLER_DIR: &str = "installer";

/// Upper bound for `output_lines` and `log_lines`
pub const MAX_VIEW_LINES: usize = 1000;

const BUILTIN_CONFIG: &str = include_str!("../../config/installer.toml");

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub general: GeneralConfig,
    /// Item ids selected when the wizard opens
    pub default_selections: Vec<String>,
    /// The install catalog, in display and install order
    pub categories: Catalog,
}

impl InstallerConfig {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_CONFIG)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: InstallerConfig = toml::from_str(content)?;
        config.general.validate()?;
        config.categories.validate()?;
        Ok(config)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the first config found next to the repository or in the user
    /// config directory, falling back to the built-in catalog.
    pub fn discover(repo_root: &Path) -> Result<Self> {
        let candidates = std::iter::once(repo_root.join(CONFIG_FILE_NAME)).chain(Self::user_config_path());

        for path in candidates {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        info!("No {} found, using built-in catalog", CONFIG_FILE_NAME);
        Self::builtin()
    }

    /// `~/.config/dotfiles-installer/installer.toml` on Linux
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dotfiles-installer").join(CONFIG_FILE_NAME))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Profile the wizard starts in
    pub default_profile: Profile,
    /// Directory name the installer lives in inside the repository
    pub installer_dir: String,
    /// Lines of live output shown for the running step
    pub output_lines: usize,
    /// Lines of the installation log kept on screen
    pub log_lines: usize,
    /// Where to save the full install log after a run, relative to the repository root
    pub install_log: Option<PathBuf>,
}

impl GeneralConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [("output_lines", self.output_lines), ("log_lines", self.log_lines)] {
            if value == 0 || value > MAX_VIEW_LINES {
                return Err(InstallerError::Config(format!(
                    "general.{key} must be between 1 and {MAX_VIEW_LINES}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Dotfiles Manager".to_string(),
            default_profile: Profile::Work,
            installer_dir: DEFAULT_INSTALLER_DIR.to_string(),
            output_lines: 10,
            log_lines: 20,
            install_log: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProfileTag;

    #[test]
    fn test_builtin_catalog_parses() {
        let config = InstallerConfig::builtin().unwrap();
        assert_eq!(config.general.title, "Dotfiles Manager");
        assert_eq!(config.general.default_profile, Profile::Work);
        assert_eq!(config.categories.categories()[0].name, "Core");

        let ids = config.categories.item_ids();
        for id in &config.default_selections {
            assert!(ids.contains(id), "default selection {id} missing from catalog");
        }
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = InstallerConfig::parse(
            r#"
            [[categories]]
            name = "Shell"

            [[categories.items]]
            id = "zsh"
            name = "Zsh"
            script = "./zsh/install.sh"
            profile = "personal"
            "#,
        )
        .unwrap();

        assert_eq!(config.general.output_lines, 10);
        assert_eq!(config.general.log_lines, 20);
        assert!(config.general.install_log.is_none());
        assert!(config.default_selections.is_empty());

        let item = &config.categories.categories()[0].items[0];
        assert_eq!(item.profile, Some(ProfileTag::Personal));
        assert!(item.details.is_empty());
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let err = InstallerConfig::parse(
            r#"
            [[categories]]
            name = "Shell"

            [[categories.items]]
            id = "zsh"
            name = "Zsh"
            script = "./zsh/install.sh"

            [[categories.items]]
            id = "zsh"
            name = "Zsh again"
            script = "./zsh/install.sh"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, InstallerError::Catalog(_)));
    }

    #[test]
    fn test_view_line_counts_are_range_checked() {
        let huge = InstallerConfig::parse("[general]\nlog_lines = 9223372036854775807\n").unwrap_err();
        assert!(matches!(huge, InstallerError::Config(ref msg) if msg.contains("log_lines")));

        let zero = InstallerConfig::parse("[general]\noutput_lines = 0\n").unwrap_err();
        assert!(matches!(zero, InstallerError::Config(ref msg) if msg.contains("output_lines")));

        let max = format!("[general]\noutput_lines = {MAX_VIEW_LINES}\nlog_lines = 1\n");
        assert!(InstallerConfig::parse(&max).is_ok());
    }

    #[test]
    fn test_bad_profile_is_parse_error() {
        let err = InstallerConfig::parse("[general]\ndefault_profile = \"home\"\n").unwrap_err();
        assert!(matches!(err, InstallerError::TomlParse(_)));
    }

    #[test]
    fn test_discover_prefers_repo_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[general]\ntitle = \"Repo dotfiles\"\ndefault_profile = \"personal\"\n",
        )
        .unwrap();

        let config = InstallerConfig::discover(dir.path()).unwrap();
        assert_eq!(config.general.title, "Repo dotfiles");
        assert_eq!(config.general.default_profile, Profile::Personal);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InstallerConfig::load_from(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, InstallerError::Io(_)));
    }
}
