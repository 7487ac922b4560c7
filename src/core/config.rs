//! Site configuration.
//!
//! One explicit `SiteConfig` value is passed to the generator and the deploy
//! pipeline. It is read from JSON or TOML (chosen by file extension), then
//! `SHEETSITE_<FIELD>` environment variables override individual fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, Result};
use crate::paths;
use crate::utils::{io, validation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(default = "defaults::default_sheet_name")]
    pub sheet_name: String,
    /// File holding an OAuth bearer token for the spreadsheet API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    #[serde(default = "defaults::default_api_key_env")]
    pub api_key_env: String,
    /// Local JSON export used instead of the spreadsheet API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    #[serde(default = "defaults::default_branch")]
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
    #[serde(default = "defaults::default_commit_message")]
    pub commit_message: String,
    #[serde(default = "defaults::default_token_env")]
    pub token_env: String,
    #[serde(default = "defaults::default_remote_host")]
    pub remote_host: String,

    #[serde(default = "defaults::default_cta_label")]
    pub cta_label: String,
    #[serde(default = "defaults::default_rating")]
    pub default_rating: String,

    /// File this config was read from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_path: None,
            output_path: None,
            spreadsheet_id: None,
            sheet_name: defaults::default_sheet_name(),
            credentials: None,
            api_key_env: defaults::default_api_key_env(),
            records_path: None,
            site_root: None,
            github_user: None,
            repo_name: None,
            branch: defaults::default_branch(),
            custom_domain: None,
            commit_message: defaults::default_commit_message(),
            token_env: defaults::default_token_env(),
            remote_host: defaults::default_remote_host(),
            cta_label: defaults::default_cta_label(),
            default_rating: defaults::default_rating(),
            source_path: None,
        }
    }
}

/// Field names accepted in config files and as `SHEETSITE_<NAME>` overrides.
pub const FIELDS: &[&str] = &[
    "template_path",
    "output_path",
    "spreadsheet_id",
    "sheet_name",
    "credentials",
    "api_key_env",
    "records_path",
    "site_root",
    "github_user",
    "repo_name",
    "branch",
    "custom_domain",
    "commit_message",
    "token_env",
    "remote_host",
    "cta_label",
    "default_rating",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
        _ => Format::Json,
    }
}

/// Parse config text in the format implied by `path`'s extension.
pub fn parse(content: &str, path: &Path) -> Result<SiteConfig> {
    let display = path.display().to_string();
    let mut config: SiteConfig = match format_for(path) {
        Format::Json => serde_json::from_str(content)
            .map_err(|e| Error::config_invalid_file(&display, e.to_string()))?,
        Format::Toml => {
            toml::from_str(content).map_err(|e| Error::config_invalid_file(&display, e.to_string()))?
        }
    };
    config.source_path = Some(path.to_path_buf());
    Ok(config)
}

/// Read and parse a config file.
pub fn load_file(path: &Path) -> Result<SiteConfig> {
    if !path.is_file() {
        return Err(Error::config_invalid_file(
            path.display().to_string(),
            "file does not exist",
        ));
    }
    let content = io::read_file(path, "read config")?;
    parse(&content, path)
}

/// Discover, load and apply environment overrides.
///
/// With no config file anywhere the built-in defaults are used, so a fully
/// environment-driven setup works.
pub fn load(explicit: Option<&Path>) -> Result<SiteConfig> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("resolve cwd".to_string())))?;

    let config = match paths::discover_config(explicit, &cwd) {
        Some(path) => load_file(&path)?,
        None => SiteConfig::default(),
    };

    config.with_env_overrides(|name| std::env::var(name).ok())
}

impl SiteConfig {
    /// Apply `SHEETSITE_<FIELD>` overrides looked up through `lookup`.
    pub fn with_env_overrides<F>(self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = Map::new();
        for field in FIELDS {
            let var = format!("{}{}", defaults::ENV_PREFIX, field.to_ascii_uppercase());
            if let Some(value) = lookup(&var) {
                overrides.insert(field.to_string(), Value::String(value));
            }
        }
        if overrides.is_empty() {
            return Ok(self);
        }

        let source_path = self.source_path.clone();
        let mut merged = serde_json::to_value(&self)
            .map_err(|e| Error::internal_json(e.to_string(), Some("serialize config".to_string())))?;
        if let Value::Object(map) = &mut merged {
            map.extend(overrides);
        }

        let mut config: SiteConfig = serde_json::from_value(merged).map_err(|e| {
            Error::config_invalid_value("env", None, format!("Invalid override: {}", e))
        })?;
        config.source_path = source_path;
        Ok(config)
    }

    fn source_display(&self) -> Option<String> {
        self.source_path.as_ref().map(|p| p.display().to_string())
    }

    fn require<'a>(&self, value: Option<&'a String>, key: &str) -> Result<&'a str> {
        validation::require_config(value.map(String::as_str), key, self.source_display().as_deref())
    }

    pub fn template_path(&self) -> Result<PathBuf> {
        let path = self.require(self.template_path.as_ref(), "template_path")?;
        Ok(expand(path))
    }

    pub fn output_path(&self) -> Result<PathBuf> {
        let path = self.require(self.output_path.as_ref(), "output_path")?;
        Ok(expand(path))
    }

    /// Directory published by the deploy pipeline; defaults to the output file's parent.
    pub fn site_root(&self) -> Result<PathBuf> {
        if let Some(root) = self.site_root.as_deref().filter(|r| !r.trim().is_empty()) {
            return Ok(expand(root));
        }

        let output = self.output_path()?;
        match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            _ => Ok(PathBuf::from(".")),
        }
    }

    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(expand)
    }

    pub fn records_path(&self) -> Option<PathBuf> {
        self.records_path
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(expand)
    }

    /// Keys required by `sheetsite generate`.
    pub fn validate_for_generate(&self) -> Result<()> {
        self.template_path()?;
        self.output_path()?;
        if self.records_path().is_none() {
            self.require(self.spreadsheet_id.as_ref(), "spreadsheet_id")?;
        }
        if self.sheet_name.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "sheet_name",
                Some(self.sheet_name.clone()),
                "sheet_name cannot be empty",
            ));
        }
        Ok(())
    }

    /// Keys required by `sheetsite deploy`.
    pub fn validate_for_deploy(&self) -> Result<()> {
        self.site_root()?;
        self.require(self.github_user.as_ref(), "github_user")?;
        self.require(self.repo_name.as_ref(), "repo_name")?;
        if self.branch.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "branch",
                Some(self.branch.clone()),
                "branch cannot be empty",
            ));
        }
        if self.token_env.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "token_env",
                None,
                "token_env must name an environment variable",
            ));
        }
        Ok(())
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}
