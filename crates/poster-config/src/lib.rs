//! Configuration management for poster.
//!
//! Parses `poster.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! URL values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `document.stylesheets`
//! - `document.preconnect[].href`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "poster.toml";

/// Noto font families used by the poster stylesheet.
pub const DEFAULT_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Noto+Color+Emoji&family=Noto+Sans+JP:wght@100..900&family=Noto+Sans+Math&family=Noto+Sans+Mono:wght@100..900&family=Noto+Sans:ital,wght@0,100..900;1,100..900&display=swap";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document language.
    pub language: Option<String>,
    /// Override syntax highlighting flag.
    pub highlight: Option<bool>,
    /// Override math rendering flag.
    pub math: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTML document configuration.
    pub document: DocumentConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// HTML document configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// `lang` attribute of the document.
    pub language: String,
    /// External stylesheet URLs.
    pub stylesheets: Vec<String>,
    /// Origins to preconnect to.
    pub preconnect: Vec<PreconnectConfig>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            language: "ja".to_owned(),
            stylesheets: vec![DEFAULT_STYLESHEET.to_owned()],
            preconnect: vec![
                PreconnectConfig {
                    href: "https://fonts.googleapis.com".to_owned(),
                    crossorigin: false,
                },
                PreconnectConfig {
                    href: "https://fonts.gstatic.com".to_owned(),
                    crossorigin: true,
                },
            ],
        }
    }
}

/// A preconnect origin.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PreconnectConfig {
    /// Origin URL.
    pub href: String,
    /// Whether to add the `crossorigin` attribute.
    #[serde(default)]
    pub crossorigin: bool,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Heading of the footnote section.
    pub footnote_label: String,
    /// Whether code blocks are syntax highlighted.
    pub highlight: bool,
    /// Syntax highlighting theme name.
    pub highlight_theme: String,
    /// Whether math is rendered to MathML.
    pub math: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            footnote_label: "脚注".to_owned(),
            highlight: true,
            highlight_theme: "InspiredGitHub".to_owned(),
            math: true,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`document.stylesheets`").
        field: String,
        /// Error message (e.g., "${`FONT_CDN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `poster.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(language) = &settings.language {
            self.document.language.clone_from(language);
        }
        if let Some(highlight) = settings.highlight {
            self.render.highlight = highlight;
        }
        if let Some(math) = settings.math {
            self.render.math = math;
        }
    }

    /// Search for config file in `start` and its parents.
    #[must_use]
    pub fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_document()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_document(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.document.language, "document.language")?;
        for url in &self.document.stylesheets {
            require_http_url(url, "document.stylesheets")?;
        }
        for preconnect in &self.document.preconnect {
            require_http_url(&preconnect.href, "document.preconnect.href")?;
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.footnote_label, "render.footnote_label")?;
        if self.render.highlight {
            require_non_empty(&self.render.highlight_theme, "render.highlight_theme")?;
        }
        Ok(())
    }

    /// Expand environment variable references in URL values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for url in &mut self.document.stylesheets {
            *url = expand::expand_env(url, "document.stylesheets")?;
        }
        for preconnect in &mut self.document.preconnect {
            preconnect.href = expand::expand_env(&preconnect.href, "document.preconnect.href")?;
        }
        Ok(())
    }
}
