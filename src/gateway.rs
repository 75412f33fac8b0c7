//! The text-processing service behind `POST /api/process-text`
//!
//! Validates the transcript, builds the persona prompt and makes exactly one
//! upstream generation call. Constructed once at startup and shared with the
//! HTTP handlers.

use std::sync::Arc;

use crate::Error;
use crate::llm::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationRequest, Generator};
use crate::persona::{DEFAULT_PERSONA, KnownPersona, MAX_PERSONA_CHARS};
use crate::prompt::{PromptOptions, build_system_prompt};

/// Longest transcript accepted by default
pub const DEFAULT_MAX_TEXT_CHARS: usize = 2000;

/// Tunables for the generation call
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub model: String,
    pub temperature: f32,
    pub prompt: PromptOptions,
    pub default_persona: String,
    pub max_text_chars: usize,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            prompt: PromptOptions::default(),
            default_persona: DEFAULT_PERSONA.to_string(),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

/// Reasons a request cannot be answered
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Transcript missing or blank
    #[error("Text not found for processing.")]
    EmptyText,

    /// Transcript above the configured ceiling
    #[error("Text is too long ({len} characters, maximum {max}).")]
    TextTooLong { len: usize, max: usize },

    /// Persona string above the ceiling
    #[error("Persona name is too long (maximum {max} characters).")]
    PersonaTooLong { max: usize },

    /// The generation call failed
    #[error("AI Error: Could not generate response. Check your Gemini API key.")]
    Upstream(#[source] Error),
}

impl ProcessError {
    /// Whether the caller sent something unusable
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::Upstream(_))
    }
}

/// Persona-aware gateway to the generation API
#[derive(Clone)]
pub struct InnerVoice {
    generator: Arc<dyn Generator>,
    settings: GatewaySettings,
}

impl InnerVoice {
    /// Create the service around a generator
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, settings: GatewaySettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// Settings this service was built with
    #[must_use]
    pub const fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Resolve the persona, falling back to the default when blank
    fn resolve_persona<'a>(&'a self, persona: Option<&'a str>) -> Result<&'a str, ProcessError> {
        let persona = match persona {
            Some(p) if !p.trim().is_empty() => p,
            _ => self.settings.default_persona.as_str(),
        };

        if persona.chars().count() > MAX_PERSONA_CHARS {
            return Err(ProcessError::PersonaTooLong {
                max: MAX_PERSONA_CHARS,
            });
        }

        Ok(persona)
    }

    /// Build the exact upstream request for a transcript and persona
    ///
    /// # Errors
    ///
    /// Returns an input error if the text or persona is unusable
    pub fn prepare(
        &self,
        text: Option<&str>,
        persona: Option<&str>,
    ) -> Result<GenerationRequest, ProcessError> {
        let text = text.unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ProcessError::EmptyText);
        }

        let len = text.chars().count();
        if len > self.settings.max_text_chars {
            return Err(ProcessError::TextTooLong {
                len,
                max: self.settings.max_text_chars,
            });
        }

        let persona = self.resolve_persona(persona)?;

        Ok(GenerationRequest {
            model: self.settings.model.clone(),
            system_instruction: build_system_prompt(persona, &self.settings.prompt),
            user_text: text.to_string(),
            temperature: self.settings.temperature,
        })
    }

    /// Answer a transcript in the voice of a persona
    ///
    /// Makes at most one upstream call and never retries.
    ///
    /// # Errors
    ///
    /// Returns an input error without calling upstream, or
    /// [`ProcessError::Upstream`] if the generation call fails
    pub async fn process_text(
        &self,
        text: Option<&str>,
        persona: Option<&str>,
    ) -> Result<String, ProcessError> {
        let request = self.prepare(text, persona)?;

        tracing::debug!(
            model = %request.model,
            persona = persona.unwrap_or_default(),
            known_persona = persona.and_then(KnownPersona::from_id).is_some(),
            text_len = request.user_text.len(),
            "generating response"
        );

        self.generator
            .generate(&request)
            .await
            .map_err(ProcessError::Upstream)
    }
}
