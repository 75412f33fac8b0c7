//! Upstream text generation
//!
//! The gateway talks to the hosted model through the [`Generator`] trait so
//! the HTTP layer can be exercised with an in-process stand-in.

mod gemini;

pub use gemini::{GEMINI_BASE_URL, GeminiClient};

use async_trait::async_trait;

use crate::Result;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature used when none is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Exact input of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier
    pub model: String,
    /// System instruction built from the persona template
    pub system_instruction: String,
    /// Raw user text, sent as the only user turn
    pub user_text: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Produces a completion for a prompt
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation call and return the response text
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or yields no text
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
