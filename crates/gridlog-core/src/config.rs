//! Configuration loading and typed config structures for gridlog.
//!
//! The configuration lives in `gridlog-config.yaml` next to the binary's
//! working directory. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates the
//! file. Every section is optional; an empty file yields the defaults.

use std::path::Path;

use serde::Deserialize;

use gridlog_changelog::{Changelog, ClassificationRule, Classifier};
use gridlog_types::{Classification, VariantId};

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "GRIDLOG_LOG_LEVEL";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level gridlog configuration.
///
/// Mirrors the structure of `gridlog-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GridlogConfig {
    /// Variant registry settings.
    #[serde(default)]
    pub variants: VariantsConfig,

    /// Attribute classification table.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GridlogConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `GRIDLOG_LOG_LEVEL` overrides `logging.level` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Build an empty changelog with the configured classifier and initial
    /// variant.
    pub fn build_changelog(&self) -> Changelog {
        Changelog::with_initial_variant(
            self.classification.build_classifier(),
            self.variants.initial_variant_id.clone(),
        )
    }
}

/// Variant registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariantsConfig {
    /// Id of the variant registered and working at startup.
    #[serde(default = "default_initial_variant_id")]
    pub initial_variant_id: VariantId,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        Self {
            initial_variant_id: default_initial_variant_id(),
        }
    }
}

/// Attribute classification table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassificationConfig {
    /// Classification of attributes absent from the table.
    #[serde(default = "default_fallback")]
    pub fallback: Classification,

    /// Start from the standard IIDM table before applying `rules`.
    #[serde(default = "default_true")]
    pub use_standard_table: bool,

    /// Extra entries, applied in order; later entries win.
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl ClassificationConfig {
    /// Build the classifier this section describes.
    pub fn build_classifier(&self) -> Classifier {
        let mut classifier = if self.use_standard_table {
            Classifier::standard().with_fallback(self.fallback)
        } else {
            Classifier::new(self.fallback)
        };
        for rule in &self.rules {
            classifier.apply(rule);
        }
        classifier
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            use_standard_table: default_true(),
            rules: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `GRIDLOG_LOG_LEVEL` when it is set.
    pub fn apply_env_overrides(&mut self) {
        self.override_level(std::env::var(LOG_LEVEL_ENV).ok());
    }

    /// Replace the level when `level` holds a non-empty value.
    pub fn override_level(&mut self, level: Option<String>) {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_initial_variant_id() -> VariantId {
    VariantId::initial()
}

const fn default_fallback() -> Classification {
    Classification::Shared
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}
