use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Represents the complete configuration for cut-release.
///
/// Identifies the trunk branch and origin, the manifests a release touches,
/// and the auxiliary repositories (companion package mirror, docs site) the
/// release fans out to.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// npm identity that must be authenticated before a release may start.
    #[serde(default)]
    pub registry_user: String,

    #[serde(default = "default_trunk")]
    pub trunk: String,

    #[serde(default = "default_origin")]
    pub origin: String,

    #[serde(default = "default_manifest")]
    pub manifest: String,

    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// Templated command that regenerates the changelog for this release.
    #[serde(default = "default_changelog_command")]
    pub changelog_command: String,

    /// Commands that build the distributable artifacts (run in the working
    /// directory before they are copied into the companion clone).
    #[serde(default)]
    pub build_commands: Vec<String>,

    #[serde(default)]
    pub companion: Option<CompanionConfig>,

    #[serde(default)]
    pub site: Option<SiteConfig>,
}

fn default_trunk() -> String {
    "master".to_string()
}

fn default_origin() -> String {
    "origin".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_changelog_command() -> String {
    "gulp changelog --sha=$(git merge-base v{{old_version}} HEAD)".to_string()
}

/// Companion package mirror: an auxiliary repository that republishes the
/// build artifacts under its own package manifest.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CompanionConfig {
    /// Directory name the repository is cloned into.
    pub name: String,

    /// Clone URL.
    pub url: String,

    /// Manifests inside the clone whose version fields are rewritten.
    #[serde(default = "default_companion_manifests")]
    pub manifests: Vec<String>,

    #[serde(default = "default_publish_command")]
    pub publish_command: String,
}

fn default_companion_manifests() -> Vec<String> {
    vec!["package.json".to_string()]
}

fn default_publish_command() -> String {
    "npm publish".to_string()
}

/// Documentation site repository that hosts one directory per released
/// version plus a `latest` alias.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub name: String,

    pub url: String,

    /// Version index file inside the clone.
    #[serde(default = "default_site_index")]
    pub index: String,

    /// Commands that build the docs (run in the working directory).
    #[serde(default)]
    pub build_commands: Vec<String>,
}

fn default_site_index() -> String {
    "docs.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry_user: String::new(),
            trunk: default_trunk(),
            origin: default_origin(),
            manifest: default_manifest(),
            changelog: default_changelog(),
            changelog_command: default_changelog_command(),
            build_commands: Vec::new(),
            companion: None,
            site: None,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))
}
