//! TOML configuration file loading
//!
//! Supports `~/.config/inner-voice/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct InnerVoiceConfigFile {
    /// Persona used when a request names none
    #[serde(default)]
    pub persona: Option<String>,

    /// Generation call configuration
    #[serde(default)]
    pub generation: GenerationFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Generation-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct GenerationFileConfig {
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Word ceiling for answers
    pub max_words: Option<u32>,

    /// Answer language (e.g. "English")
    pub language: Option<String>,

    /// Override for the Gemini API base URL
    pub base_url: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub gemini: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,

    /// Directory holding the browser client
    pub static_dir: Option<PathBuf>,

    /// Longest transcript accepted
    pub max_text_chars: Option<usize>,
}

/// Load the TOML config file from the standard path
///
/// Returns `InnerVoiceConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> InnerVoiceConfigFile {
    config_file_path().map_or_else(InnerVoiceConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from an explicit path
pub fn load_from(path: &Path) -> InnerVoiceConfigFile {
    if !path.exists() {
        return InnerVoiceConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                InnerVoiceConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            InnerVoiceConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/inner-voice/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("inner-voice").join("config.toml"))
}
