//! `aiscout.json` configuration files.
//!
//! A [`ConfigLoader`] looks for `aiscout.json` in a custom directory
//! (default `~/.config/aiscout`) and a standard directory (default
//! `/etc/aiscout`). Both are optional. Sections found in the custom file win
//! over the same sections in the standard file; sections missing from both
//! keep their built-in defaults.
//!
//! ```json
//! {
//!   "content_analysis": true,
//!   "fetch": { "timeout": 10 },
//!   "classifier": { "ideal_sentence_length": 15.0 },
//!   "scoring": { "penalties": { "missing_faq": 5 } }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerConfig;
use crate::classify::ClassifierConfig;
use crate::scoring::ScoringConfig;
use crate::{AiscoutError, Result};

pub const CONFIG_FILE_NAME: &str = "aiscout.json";

/// Network settings that can be overridden from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOverrides {
    /// Page fetch timeout in seconds.
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    /// Per-probe timeout in seconds.
    pub probe_timeout: Option<u64>,
}

impl FetchOverrides {
    fn merge(&mut self, other: &FetchOverrides) {
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.user_agent.is_some() {
            self.user_agent.clone_from(&other.user_agent);
        }
        if other.probe_timeout.is_some() {
            self.probe_timeout = other.probe_timeout;
        }
    }
}

/// Contents of one `aiscout.json`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub content_analysis: Option<bool>,
    pub probe_site_files: Option<bool>,
    pub fetch: FetchOverrides,
    pub classifier: Option<ClassifierConfig>,
    pub scoring: Option<ScoringConfig>,
}

impl ConfigFile {
    /// Parses a config file body.
    ///
    /// # Errors
    ///
    /// Returns [`AiscoutError::ConfigError`] if the JSON is malformed or names
    /// an unknown section.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AiscoutError::ConfigError(e.to_string()))
    }

    /// Overlays `other` on `self`. Sections present in `other` replace ours.
    pub fn merge(&mut self, other: &ConfigFile) {
        if other.content_analysis.is_some() {
            self.content_analysis = other.content_analysis;
        }
        if other.probe_site_files.is_some() {
            self.probe_site_files = other.probe_site_files;
        }
        self.fetch.merge(&other.fetch);
        if other.classifier.is_some() {
            self.classifier.clone_from(&other.classifier);
        }
        if other.scoring.is_some() {
            self.scoring.clone_from(&other.scoring);
        }
    }

    /// Writes every section this file sets into `config`.
    pub fn apply(&self, config: &mut AnalyzerConfig) {
        if let Some(enabled) = self.content_analysis {
            config.content_analysis = enabled;
        }
        if let Some(enabled) = self.probe_site_files {
            config.probe_site_files = enabled;
        }
        if let Some(timeout) = self.fetch.timeout {
            config.fetch.timeout = timeout;
        }
        if let Some(user_agent) = &self.fetch.user_agent {
            config.fetch.user_agent.clone_from(user_agent);
        }
        if let Some(timeout) = self.fetch.probe_timeout {
            config.probe_timeout = timeout;
        }
        if let Some(classifier) = &self.classifier {
            config.classifier = classifier.clone();
        }
        if let Some(scoring) = &self.scoring {
            config.scoring = scoring.clone();
        }
    }
}

/// Finds and merges `aiscout.json` files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
    cache: Option<ConfigFile>,
}

impl ConfigLoader {
    /// A loader with no directories; [`ConfigLoader::load`] yields defaults.
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None, cache: None }
    }

    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Loads and merges the standard and custom files, once.
    ///
    /// A file that exists but fails to parse is logged and skipped.
    pub fn load(&mut self) -> ConfigFile {
        if let Some(config) = &self.cache {
            return config.clone();
        }

        let mut merged = ConfigFile::default();
        for path in self.config_files().iter().rev() {
            match Self::load_from_path(path) {
                Ok(file) => {
                    tracing::debug!(path = %path.display(), "loaded config file");
                    merged.merge(&file);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to load config file"),
            }
        }

        self.cache = Some(merged.clone());
        merged
    }

    /// Reads a single config file.
    ///
    /// # Errors
    ///
    /// Returns [`AiscoutError::FileNotFound`] if the file is missing, or
    /// [`AiscoutError::ConfigError`] if it does not parse.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AiscoutError::FileNotFound(path.to_path_buf()));
        }
        let body = fs::read_to_string(path)?;
        ConfigFile::parse(&body).map_err(|e| AiscoutError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Loads the merged config and applies it on top of `config`.
    pub fn apply(&mut self, config: &mut AnalyzerConfig) {
        self.load().apply(config);
    }

    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    /// Existing config files, custom first.
    fn config_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for dir in [&self.custom_dir, &self.standard_dir].into_iter().flatten() {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.exists() && !files.contains(&path) {
                files.push(path);
            }
        }
        files
    }

    /// `~/.config/aiscout`
    fn default_custom_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("aiscout"))
    }

    fn default_standard_dir() -> Option<PathBuf> {
        let dir = PathBuf::from("/etc/aiscout");
        if dir.exists() { Some(dir) } else { None }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        let mut builder = ConfigLoaderBuilder::new();
        if let Some(dir) = Self::default_custom_dir() {
            builder = builder.custom_dir(dir);
        }
        if let Some(dir) = Self::default_standard_dir() {
            builder = builder.standard_dir(dir);
        }
        builder.build()
    }
}

/// Builder for [`ConfigLoader`].
#[derive(Debug, Default)]
pub struct ConfigLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl ConfigLoaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory whose `aiscout.json` takes precedence.
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> ConfigLoader {
        ConfigLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir, cache: None }
    }
}
