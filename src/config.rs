// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const CONFIG_ENV: &str = "PORTALSCRAPER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "portalscraper.yaml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Primary store, keyed by USN, in the extraction shape.
    pub store_path: PathBuf,
    /// Secondary store rebuilt from the primary in the unified shape.
    pub normalized_path: PathBuf,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("all_students_report.json"),
            normalized_path: PathBuf::from("normalized_data.json"),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1/".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.6,
            max_tokens: 200,
            api_key: None,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `PORTALSCRAPER_CONFIG` (or
    /// `portalscraper.yaml` when it exists), then environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(p) => Self::from_file(Path::new(&p))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg = Self::from_yaml_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply `PORTALSCRAPER_*` / `GROQ_*` variables as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PORTALSCRAPER_STORE") {
            self.store_path = PathBuf::from(v);
        }
        if let Some(v) = get("PORTALSCRAPER_NORMALIZED") {
            self.normalized_path = PathBuf::from(v);
        }
        if let Some(v) = get("GROQ_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("GROQ_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("GROQ_API_KEY") {
            self.llm.api_key = Some(v);
        }
    }
}
