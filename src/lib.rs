//! Inner Voice - speak a thought, hear it answered by a persona
//!
//! This library provides both halves of the Inner Voice system:
//! - The gateway: an HTTP service that turns a transcript and a persona into
//!   a prompt, calls the Gemini API once and returns the answer
//! - The client controller: the state machine a front end runs to record a
//!   thought, submit it and speak the answer back
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Front end (browser / console)          │
//! │   Recognizer  │  Controller  │  Synthesizer         │
//! └────────────────────┬────────────────────────────────┘
//!                      │  POST /api/process-text
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Inner Voice gateway                 │
//! │   Validation  │  Persona prompt  │  Static files    │
//! └────────────────────┬────────────────────────────────┘
//!                      │  generateContent
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Gemini API                       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod persona;
pub mod prompt;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{GatewaySettings, InnerVoice, ProcessError};
pub use llm::{GeminiClient, GenerationRequest, Generator};
pub use persona::KnownPersona;
