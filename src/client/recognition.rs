//! Speech recognition seam and failure classification

use crate::Result;

/// Platform speech recognizer
///
/// Starting, stopping and aborting return immediately; the outcome of a
/// session arrives later as controller events (`Recognized`,
/// `RecognitionFailed`, `RecognitionEnded`).
pub trait Recognizer: Send {
    /// Begin a recognition session
    ///
    /// # Errors
    ///
    /// Returns error if the platform refuses to start a session
    fn start(&mut self) -> Result<()>;

    /// Finish the session and deliver whatever was heard
    fn stop(&mut self);

    /// Drop the session without delivering a transcript
    fn abort(&mut self);
}

/// Why a recognition session failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionFailure {
    /// Microphone access refused
    PermissionDenied,
    /// Session ended without any speech
    NoSpeech,
    /// Anything else the platform reports
    Other(String),
}

impl RecognitionFailure {
    /// Classify a platform error code
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "permission-denied" => Self::PermissionDenied,
            "no-speech" => Self::NoSpeech,
            other => Self::Other(other.to_string()),
        }
    }

    /// Status line shown to the user
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Error: Microphone access denied. Allow access in browser settings.".to_string()
            }
            Self::NoSpeech => "Error: No speech recognized. Try again.".to_string(),
            Self::Other(code) => format!("Recognition error: {code}"),
        }
    }
}
