//! Application configuration for notepress.
//!
//! User config lives at `~/.notepress/notepress.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NotepressError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "notepress.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".notepress";

// ---------------------------------------------------------------------------
// Config structs (matching notepress.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// External exporter settings.
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Notebook rewriting settings.
    #[serde(default)]
    pub notebook: NotebookConfig,

    /// Values used when a post has no front matter yet.
    #[serde(default)]
    pub front_matter: FrontMatterDefaults,
}

/// `[converter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program and leading arguments of the exporter.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Value passed to `--to`.
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            format: default_format(),
        }
    }
}

fn default_command() -> Vec<String> {
    vec!["jupyter".into(), "nbconvert".into()]
}
fn default_format() -> String {
    "markdown".into()
}

/// `[notebook]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotebookConfig {
    /// Written to `metadata.language_info.name` and used as the form fence language.
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "python".into()
}

/// `[front_matter]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatterDefaults {
    /// Placeholder post title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Placeholder post summary.
    #[serde(default = "default_summary")]
    pub summary: String,

    /// Whether new posts start as drafts.
    #[serde(default = "default_true")]
    pub draft: bool,
}

impl Default for FrontMatterDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            summary: default_summary(),
            draft: true,
        }
    }
}

fn default_title() -> String {
    "New post".into()
}
fn default_summary() -> String {
    "Post summary.".into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.notepress/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| NotepressError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.notepress/notepress.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| NotepressError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        NotepressError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| NotepressError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| NotepressError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| NotepressError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject configs that cannot drive a conversion.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.converter.command.is_empty() {
        return Err(NotepressError::config(
            "converter.command must name at least the exporter program",
        ));
    }
    if config.notebook.language.trim().is_empty() {
        return Err(NotepressError::config("notebook.language must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("nbconvert"));
        assert!(toml_str.contains("language = \"python\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.converter.command, vec!["jupyter", "nbconvert"]);
        assert_eq!(parsed.converter.format, "markdown");
        assert_eq!(parsed.front_matter, FrontMatterDefaults::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[notebook]
language = "julia"

[front_matter]
draft = false
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.notebook.language, "julia");
        assert!(!config.front_matter.draft);
        assert_eq!(config.front_matter.title, "New post");
        assert_eq!(config.converter.command, vec!["jupyter", "nbconvert"]);
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut config = AppConfig::default();
        config.converter.command.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("converter.command"));
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!(
            "notepress-config-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[converter]\ncommand = [\"nbconvert-wrapper\"]\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.converter.command, vec!["nbconvert-wrapper"]);
        assert_eq!(config.notebook.language, "python");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
