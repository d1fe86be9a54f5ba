//! Targets file loading and validation.
//!
//! A target is one athletic program to scrape, identified by the base URL of
//! its athletics site. The file also carries the known-difficult list: name
//! substrings of programs whose sites historically resist plain HTTP
//! extraction and should go straight to the stealth browser.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Programs that have historically blocked or starved remote extraction.
/// Used only when the targets file does not supply its own `difficult` list.
const DEFAULT_DIFFICULT: &[&str] = &[
    "alabama",
    "auburn",
    "clemson",
    "florida state",
    "georgia",
    "lsu",
    "michigan",
    "ohio state",
    "penn state",
    "texas a&m",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub base_url: String,
    pub notes: Option<String>,
}

impl TargetConfig {
    /// Generate a URL-safe slug from the target name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    pub targets: Vec<TargetConfig>,
    /// Overrides [`DEFAULT_DIFFICULT`] when present.
    pub difficult: Option<Vec<String>>,
}

/// The known-difficult target set, matched by lowercase substring against
/// target names.
#[derive(Debug, Clone)]
pub struct DifficultTargets {
    needles: Vec<String>,
}

impl Default for DifficultTargets {
    fn default() -> Self {
        Self {
            needles: DEFAULT_DIFFICULT.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl DifficultTargets {
    #[must_use]
    pub fn new(needles: Vec<String>) -> Self {
        Self {
            needles: needles.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// From a targets file: its `difficult` list when present, the built-in
    /// default otherwise.
    #[must_use]
    pub fn from_file(file: &TargetsFile) -> Self {
        file.difficult
            .clone()
            .map_or_else(Self::default, Self::new)
    }

    #[must_use]
    pub fn is_difficult(&self, target_name: &str) -> bool {
        let lowered = target_name.to_lowercase();
        self.needles.iter().any(|n| lowered.contains(n))
    }
}

/// Load and validate the targets configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let targets_file: TargetsFile = serde_yaml::from_str(&content)?;

    validate_targets(&targets_file)?;

    Ok(targets_file)
}

fn validate_targets(file: &TargetsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for target in &file.targets {
        if target.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target name must be non-empty".to_string(),
            ));
        }

        if !target.base_url.starts_with("http://") && !target.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "target '{}' has invalid base_url '{}'; must start with http:// or https://",
                target.name, target.base_url
            )));
        }

        let lower_name = target.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate target name: '{}'",
                target.name
            )));
        }

        let slug = target.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate target slug: '{}' (from target '{}')",
                slug, target.name
            )));
        }
    }

    Ok(())
}
