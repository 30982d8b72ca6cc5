//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `ORGTREE_*` prefix, `__` between sections

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::HierarchyOptions;
use crate::application::ApplicationError;
use crate::domain::{DisplayMode, RenderOptions};

/// Output produced by the `hierarchy` command.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Hierarchy object as JSON
    #[default]
    Json,
    /// Tab separated table
    Text,
    /// HTML table
    Html,
    /// Indented tree outline
    Tree,
}

impl OutputFormat {
    /// Rendering mode, `None` for the object form.
    pub fn display_mode(self) -> Option<DisplayMode> {
        match self {
            OutputFormat::Json => None,
            OutputFormat::Text => Some(DisplayMode::Text),
            OutputFormat::Html => Some(DisplayMode::Html),
            OutputFormat::Tree => Some(DisplayMode::Tree),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_mode() {
            Some(mode) => write!(f, "{mode}"),
            None => f.write_str("json"),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when `--format` is not given
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty_json: true,
        }
    }
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit the inline style block in HTML output
    pub include_style: bool,
    /// Log the text rendering of every built hierarchy
    pub echo_text: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_style: true,
            echo_text: true,
        }
    }
}

/// Raw output config for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub format: Option<OutputFormat>,
    pub pretty_json: Option<bool>,
}

/// Raw render config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub include_style: Option<bool>,
    pub echo_text: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub output: RawOutputConfig,
    pub render: RawRenderConfig,
}

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub output: OutputConfig,
    pub render: RenderConfig,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Falls back to the input when a variable is undefined.
pub fn expand_path(path: &str) -> PathBuf {
    shellexpand::full(path)
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| PathBuf::from(path))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            output: OutputConfig {
                format: overlay.output.format.unwrap_or(self.output.format),
                pretty_json: overlay
                    .output
                    .pretty_json
                    .unwrap_or(self.output.pretty_json),
            },
            render: RenderConfig {
                include_style: overlay
                    .render
                    .include_style
                    .unwrap_or(self.render.include_style),
                echo_text: overlay.render.echo_text.unwrap_or(self.render.echo_text),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file; unlike the global file it must exist
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), local)
    }

    /// Same as [`Settings::load`] with an explicit global file.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            let raw = load_raw_settings(global_path)?;
            current = current.merge_with(&raw);
        }

        // 3. Local config
        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ORGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<String>(&config, "output.format")? {
            settings.output.format =
                <OutputFormat as clap::ValueEnum>::from_str(&val, true).map_err(|e| {
                    ApplicationError::Config {
                        message: format!("ORGTREE_OUTPUT__FORMAT: {e}"),
                    }
                })?;
        }
        if let Some(val) = env_value(&config, "output.pretty_json")? {
            settings.output.pretty_json = val;
        }
        if let Some(val) = env_value(&config, "render.include_style")? {
            settings.render.include_style = val;
        }
        if let Some(val) = env_value(&config, "render.echo_text")? {
            settings.render.echo_text = val;
        }

        Ok(settings)
    }

    /// Options for the hierarchy service.
    pub fn hierarchy_options(&self) -> HierarchyOptions {
        HierarchyOptions {
            render: RenderOptions {
                include_style: self.render.include_style,
            },
            echo_text: self.render.echo_text,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Local:  file passed with --config
#   Env:    ORGTREE_* environment variables, e.g. ORGTREE_OUTPUT__FORMAT=html

[output]
# Format of `orgtree hierarchy` when --format is not given: json, text, html, tree
# format = "json"

# Pretty-print JSON output
# pretty_json = true

[render]
# Prepend an inline <style> block to HTML tables
# include_style = true

# Log the text table of every hierarchy (visible with -d)
# echo_text = true
"#
        .to_string()
    }
}

/// Read one environment key, `None` when it is not set.
fn env_value<'de, T: Deserialize<'de>>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
