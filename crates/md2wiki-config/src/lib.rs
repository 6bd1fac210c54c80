//! Configuration management for md2wiki.
//!
//! Conversion works without any configuration. A TOML file can be supplied
//! explicitly to change the defaults; it is never discovered implicitly.
//!
//! ```toml
//! [converter]
//! fallback_language = "bash"
//! unlabeled_language = "none"
//! prefer_declared_language = false
//! segment_separator = "\n\n"
//!
//! [languages]
//! rs = "rust"
//! ".toml" = "toml"
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use md2wiki_core::normalize_extension;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override fallback language for labeled code blocks.
    pub fallback_language: Option<String>,
    /// Override language precedence.
    pub prefer_declared_language: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Converter configuration.
    pub converter: ConverterConfig,
    /// Extra extension to language mappings.
    ///
    /// Keys are normalized after loading: lower-cased, without leading dot.
    pub languages: BTreeMap<String, String>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Converter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Language for labeled blocks whose language cannot be determined.
    pub fallback_language: String,
    /// Language written for fences without a language token.
    pub unlabeled_language: String,
    /// Whether a fence's declared language beats the file extension.
    pub prefer_declared_language: bool,
    /// Separator between labeled code blocks and surrounding text.
    pub segment_separator: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            fallback_language: "bash".to_owned(),
            unlabeled_language: "none".to_owned(),
            prefer_declared_language: false,
            segment_separator: "\n\n".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a language tag that can be embedded in `{code:...}` parameters.
fn require_language_tag(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '|' | '{' | '}'))
    {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain whitespace, '|', '{{' or '}}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise starts
    /// from defaults; no file is searched for.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(fallback) = &settings.fallback_language {
            self.converter.fallback_language.clone_from(fallback);
        }
        if let Some(prefer) = settings.prefer_declared_language {
            self.converter.prefer_declared_language = prefer;
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.normalize_languages();
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Normalize `[languages]` keys.
    fn normalize_languages(&mut self) {
        self.languages = std::mem::take(&mut self.languages)
            .into_iter()
            .map(|(ext, lang)| (normalize_extension(&ext), lang))
            .collect();
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_converter()?;
        self.validate_languages()?;
        Ok(())
    }

    fn validate_converter(&self) -> Result<(), ConfigError> {
        require_language_tag(
            &self.converter.fallback_language,
            "converter.fallback_language",
        )?;
        require_language_tag(
            &self.converter.unlabeled_language,
            "converter.unlabeled_language",
        )?;
        Ok(())
    }

    fn validate_languages(&self) -> Result<(), ConfigError> {
        for (ext, lang) in &self.languages {
            if ext.is_empty() || ext.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "languages key '{ext}' must be a single file extension"
                )));
            }
            require_language_tag(lang, &format!("languages.{ext}"))?;
        }
        Ok(())
    }
}
