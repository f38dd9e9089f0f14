use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dataset::Attribute;
use crate::i18n::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_language")]
    pub language: Language,
    #[serde(default)]
    pub translations_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    #[serde(default = "default_max_years")]
    pub max_years: u32,
    #[serde(default = "default_other_option_attributes")]
    pub other_option_attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dataset_path: Option<String>,
    pub language: Option<Language>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/ceo-predictor/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.dataset_path {
            self.dataset.path = path;
        }
        if let Some(language) = overrides.language {
            self.display.language = language;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_dataset_path(&self) -> PathBuf {
        expand_tilde(&self.dataset.path)
    }

    pub fn resolved_translations_dir(&self) -> Option<PathBuf> {
        let dir = self.display.translations_dir.trim();
        if dir.is_empty() {
            None
        } else {
            Some(expand_tilde(dir))
        }
    }

    pub fn offers_other_option(&self, attribute: &Attribute) -> bool {
        self.predictor.other_option_attributes.contains(attribute)
    }

    pub fn default_template() -> String {
        let template = r#"[dataset]
# .csv or .json; headers may be slugs, English labels or the original sheet headers
path = "data/ceos.csv"

[display]
language = "english"
# directory holding en.json / ar.json overrides; empty uses the built-in labels
translations_dir = ""

[predictor]
max_years = 50
other_option_attributes = ["sector", "first_organization"]

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            display: DisplayConfig::default(),
            predictor: PredictorConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            translations_dir: String::new(),
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_years: default_max_years(),
            other_option_attributes: default_other_option_attributes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_dataset_path() -> String {
    "data/ceos.csv".to_string()
}

fn default_language() -> Language {
    Language::English
}

fn default_max_years() -> u32 {
    50
}

fn default_other_option_attributes() -> Vec<Attribute> {
    vec![Attribute::Sector, Attribute::FirstOrganization]
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
