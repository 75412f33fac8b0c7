//! Speech output: voice selection and one-at-a-time playback

use async_trait::async_trait;
use tokio::sync::OnceCell;

/// A voice offered by the platform synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag (e.g. "en-GB")
    pub lang: String,
}

/// One piece of text to vocalize
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Explicit voice, or `None` for the platform default for `lang`
    pub voice: Option<Voice>,
    pub lang: String,
    pub rate: f32,
}

/// Platform speech synthesizer
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Available voices, resolving once the platform has loaded its list
    async fn voices(&self) -> Vec<Voice>;

    /// Drop anything queued or playing
    fn cancel(&self);

    /// Queue an utterance
    fn speak(&self, utterance: Utterance);
}

/// Pick the first voice whose language tag matches `prefix`
#[must_use]
pub fn select_voice<'a>(voices: &'a [Voice], prefix: &str) -> Option<&'a Voice> {
    let prefix = prefix.to_ascii_lowercase();
    voices
        .iter()
        .find(|v| v.lang.to_ascii_lowercase().starts_with(&prefix))
}

/// Speaks responses, at most one at a time
pub struct SpeechOutput<S> {
    synth: S,
    voices: OnceCell<Vec<Voice>>,
    lang_prefix: String,
    default_lang: String,
}

impl<S: Synthesizer> SpeechOutput<S> {
    /// Speak English, preferring any `en*` voice and falling back to `en-US`
    #[must_use]
    pub fn new(synth: S) -> Self {
        Self::with_language(synth, "en", "en-US")
    }

    /// Speak with a custom language preference
    #[must_use]
    pub fn with_language(synth: S, lang_prefix: &str, default_lang: &str) -> Self {
        Self {
            synth,
            voices: OnceCell::new(),
            lang_prefix: lang_prefix.to_string(),
            default_lang: default_lang.to_string(),
        }
    }

    /// The wrapped synthesizer
    #[must_use]
    pub const fn synthesizer(&self) -> &S {
        &self.synth
    }

    /// Silence any current output
    pub fn cancel(&self) {
        self.synth.cancel();
    }

    /// Vocalize `text`, replacing whatever is playing
    ///
    /// Waits for the voice list on first use; the list is fetched once and
    /// shared by every caller waiting on it.
    pub async fn speak(&self, text: &str) {
        let voices = self
            .voices
            .get_or_init(|| async {
                let voices = self.synth.voices().await;
                tracing::debug!(count = voices.len(), "voice list loaded");
                voices
            })
            .await;

        let utterance = match select_voice(voices, &self.lang_prefix) {
            Some(voice) => Utterance {
                text: text.to_string(),
                lang: voice.lang.clone(),
                voice: Some(voice.clone()),
                rate: 1.0,
            },
            None => {
                tracing::warn!(lang = %self.default_lang, "no matching voice, using platform default");
                Utterance {
                    text: text.to_string(),
                    voice: None,
                    lang: self.default_lang.clone(),
                    rate: 1.0,
                }
            }
        };

        self.synth.cancel();
        self.synth.speak(utterance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    #[test]
    fn selects_first_matching_language() {
        let voices = [voice("Anna", "de-DE"), voice("Daniel", "en-GB"), voice("Samantha", "en-US")];
        assert_eq!(select_voice(&voices, "en").map(|v| v.name.as_str()), Some("Daniel"));
    }

    #[test]
    fn selection_ignores_case() {
        let voices = [voice("Lower", "EN-au")];
        assert!(select_voice(&voices, "en").is_some());
    }

    #[test]
    fn no_match_yields_none() {
        let voices = [voice("Anna", "de-DE")];
        assert!(select_voice(&voices, "en").is_none());
        assert!(select_voice(&[], "en").is_none());
    }
}
