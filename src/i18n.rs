use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const BUILTIN_EN: &str = include_str!("../locales/en.json");
const BUILTIN_AR: &str = include_str!("../locales/ar.json");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    fn builtin(&self) -> &'static str {
        match self {
            Self::English => BUILTIN_EN,
            Self::Arabic => BUILTIN_AR,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::English => "English",
            Self::Arabic => "العربية",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown language: {0}")]
pub struct LanguageParseError(pub String);

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "العربية" {
            return Ok(Self::Arabic);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ar" | "arabic" => Ok(Self::Arabic),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Key to label lookup; missing keys translate to themselves.
#[derive(Debug, Clone)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    pub fn builtin(language: Language) -> Result<Self> {
        Self::from_json(language.builtin())
            .with_context(|| format!("invalid built-in translations for {}", language.code()))
    }

    pub fn load(language: Language, dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = dir {
            let path = dir.join(format!("{}.json", language.code()));
            if path.exists() {
                debug!("loading translations from {}", path.display());
                let data = fs::read_to_string(&path)
                    .with_context(|| format!("failed reading translations: {}", path.display()))?;
                return Self::from_json(&data)
                    .with_context(|| format!("failed parsing translations: {}", path.display()));
            }
        }
        Self::builtin(language)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }
}
