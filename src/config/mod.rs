//! Configuration management for the Inner Voice gateway
//!
//! Precedence is env > TOML file > defaults.

pub mod file;

use std::path::PathBuf;

use secrecy::SecretString;

use crate::gateway::{DEFAULT_MAX_TEXT_CHARS, GatewaySettings};
use crate::llm::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GEMINI_BASE_URL};
use crate::persona::{DEFAULT_PERSONA, MAX_PERSONA_CHARS};
use crate::prompt::PromptOptions;
use crate::{Error, Result};

/// Port used when neither `PORT` nor the config file sets one
pub const DEFAULT_PORT: u16 = 3000;

/// Temperature range accepted by the Gemini API
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

/// Inner Voice configuration
#[derive(Debug)]
pub struct Config {
    /// Gemini API key
    pub api_key: SecretString,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Generation call configuration
    pub generation: GenerationConfig,

    /// Persona used when a request names none
    pub default_persona: String,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory holding the browser client
    pub static_dir: PathBuf,

    /// Longest transcript accepted
    pub max_text_chars: usize,
}

/// Generation call configuration
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Word ceiling for answers
    pub max_words: u32,

    /// Answer language
    pub language: String,

    /// Gemini API base URL
    pub base_url: String,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if `GEMINI_API_KEY` is missing or a numeric setting is malformed
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::resolve(fc, |key| std::env::var(key).ok())
    }

    /// Merge an environment lookup over a parsed config file
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing, a numeric setting is
    /// malformed or out of range, or the default persona is too long
    pub fn resolve<F>(fc: file::InnerVoiceConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env("GEMINI_API_KEY")
            .or(fc.api_keys.gemini)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "GEMINI_API_KEY is not set (export it or add api_keys.gemini to the config file)"
                        .to_string(),
                )
            })?;

        let server = ServerConfig {
            port: parse_env(&env, "PORT")?
                .or(fc.server.port)
                .unwrap_or(DEFAULT_PORT),
            static_dir: env("INNER_VOICE_STATIC_DIR")
                .map(PathBuf::from)
                .or(fc.server.static_dir)
                .unwrap_or_else(|| PathBuf::from("public")),
            max_text_chars: parse_env(&env, "INNER_VOICE_MAX_TEXT_CHARS")?
                .or(fc.server.max_text_chars)
                .unwrap_or(DEFAULT_MAX_TEXT_CHARS),
        };

        let generation = GenerationConfig {
            model: env("INNER_VOICE_MODEL")
                .or(fc.generation.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parse_env(&env, "INNER_VOICE_TEMPERATURE")?
                .or(fc.generation.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_words: parse_env(&env, "INNER_VOICE_MAX_WORDS")?
                .or(fc.generation.max_words)
                .unwrap_or(30),
            language: env("INNER_VOICE_LANGUAGE")
                .or(fc.generation.language)
                .unwrap_or_else(|| "English".to_string()),
            base_url: env("GEMINI_BASE_URL")
                .or(fc.generation.base_url)
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
        };

        // NaN would serialize as null and fail every upstream call
        if !TEMPERATURE_RANGE.contains(&generation.temperature) {
            return Err(Error::Config(format!(
                "temperature {} is outside {}..={}",
                generation.temperature,
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            )));
        }

        let default_persona = env("INNER_VOICE_PERSONA")
            .or(fc.persona)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        // Requests without a persona would otherwise all be rejected
        if default_persona.chars().count() > MAX_PERSONA_CHARS {
            return Err(Error::Config(format!(
                "default persona is longer than {MAX_PERSONA_CHARS} characters"
            )));
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            server,
            generation,
            default_persona,
        })
    }

    /// Settings for the gateway service
    #[must_use]
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            prompt: PromptOptions {
                max_words: self.generation.max_words,
                language: self.generation.language.clone(),
            },
            default_persona: self.default_persona.clone(),
            max_text_chars: self.server.max_text_chars,
        }
    }
}

/// Parse an optional numeric env var, rejecting malformed values
fn parse_env<F, T>(env: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {key} value {raw:?}: {e}")))
        })
        .transpose()
}
