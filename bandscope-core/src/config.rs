//! Application configuration, stored as TOML.
//!
//! Every section is optional; missing keys take their defaults, so an empty
//! file is a valid config.

use crate::schema::{default_specs, ColumnSpec, Field};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Validator thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// A null warning is raised when the null percentage of a column is
    /// strictly greater than this.
    pub null_warning_pct: f64,
    /// An all-null required column is an error rather than a warning.
    pub fail_on_empty_column: bool,
    /// Maximum rows or keys listed in one issue message.
    pub display_limit: usize,
    /// Warn about rows whose band is not cheap <= fair <= expensive.
    pub check_valuation_order: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            null_warning_pct: 0.0,
            fail_on_empty_column: true,
            display_limit: 5,
            check_valuation_order: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Category used when the column is absent or the cell is empty.
    pub uncategorized_label: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            uncategorized_label: "Uncategorized".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub validation: ValidationConfig,
    pub processing: ProcessorConfig,
    /// Extra header aliases keyed by canonical field name.
    pub aliases: BTreeMap<String, Vec<String>>,
}

impl AppConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges and alias keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.validation;
        if v.display_limit == 0 {
            return Err(ConfigError::Invalid(
                "validation.display_limit must be at least 1".into(),
            ));
        }
        if !(0.0..100.0).contains(&v.null_warning_pct) {
            return Err(ConfigError::Invalid(format!(
                "validation.null_warning_pct must be in [0, 100), got {}",
                v.null_warning_pct
            )));
        }
        if self.processing.uncategorized_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "processing.uncategorized_label must not be empty".into(),
            ));
        }
        for name in self.aliases.keys() {
            if Field::from_name(name).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "aliases: unknown field '{name}' (expected one of: {})",
                    Field::ALL.map(Field::name).join(", ")
                )));
            }
        }
        Ok(())
    }

    /// The built-in column specs with configured aliases appended.
    ///
    /// Unknown field names are skipped here; [`AppConfig::validate`] reports
    /// them.
    pub fn column_specs(&self) -> Vec<ColumnSpec> {
        let mut specs = default_specs();
        for (name, extra) in &self.aliases {
            let Some(field) = Field::from_name(name) else {
                continue;
            };
            for spec in specs.iter_mut().filter(|s| s.field == field) {
                for alias in extra {
                    spec.add_alias(alias);
                }
            }
        }
        specs
    }
}
