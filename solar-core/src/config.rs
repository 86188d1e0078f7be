use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{model::Revision, provider::nrel::DEFAULT_BASE_URL};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "NREL_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_revision = "dni-ghi"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// NREL API key used by the revisions that do not ask for one.
    pub api_key: Option<String>,

    /// Override for the provider base URL, e.g. a local mock.
    pub base_url: Option<String>,

    /// Optional default revision, e.g. "dni-only" or "user-credential".
    pub default_revision: Option<String>,
}

impl Config {
    /// Default revision as a strongly-typed [`Revision`], falling back to
    /// [`Revision::default`] when unset.
    pub fn default_revision(&self) -> Result<Revision> {
        match self.default_revision.as_deref() {
            Some(s) => Revision::try_from(s),
            None => Ok(Revision::default()),
        }
    }

    pub fn set_default_revision(&mut self, revision: Revision) {
        self.default_revision = Some(revision.as_str().to_string());
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// API key from the environment, else from the file.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    /// Like [`Config::resolve_api_key`], with the environment value passed in.
    pub fn resolve_api_key_with(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `solar configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.default_revision.is_some() {
            cfg.default_revision()?;
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "solar-resource", "solar-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_revision_falls_back_when_unset() {
        let cfg = Config::default();
        assert_eq!(cfg.default_revision().unwrap(), Revision::UserCredential);
    }

    #[test]
    fn set_default_revision_overrides_default() {
        let mut cfg = Config::default();
        cfg.set_default_revision(Revision::DniOnly);
        assert_eq!(cfg.default_revision().unwrap(), Revision::DniOnly);
    }

    #[test]
    fn missing_key_has_hint() {
        let cfg = Config::default();
        let msg = cfg.resolve_api_key_with(None).unwrap_err().to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `solar configure`"));
    }

    #[test]
    fn env_key_wins_over_file() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.resolve_api_key_with(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
        assert_eq!(cfg.resolve_api_key_with(None).unwrap(), "FILE_KEY");
        assert_eq!(cfg.resolve_api_key_with(Some("  ".into())).unwrap(), "FILE_KEY");
    }

    #[test]
    fn base_url_defaults_to_nrel() {
        let mut cfg = Config::default();
        assert_eq!(cfg.base_url(), "https://developer.nrel.gov/api");

        cfg.base_url = Some("http://localhost:9000".into());
        assert_eq!(cfg.base_url(), "http://localhost:9000");
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_revision(Revision::DniGhi);

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn bad_revision_in_file_is_rejected() {
        let err = Config::from_toml("default_revision = \"v9\"\n").unwrap_err();
        assert!(err.to_string().contains("Unknown revision"));
    }
}
