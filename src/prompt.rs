//! System prompt construction
//!
//! Prompt layout:
//! 1. Identity (the persona the model speaks as)
//! 2. Style hints for every known persona
//! 3. Answer length ceiling and output language

use crate::persona::KnownPersona;

/// Knobs that shape the system instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    /// Word-count ceiling for the answer
    pub max_words: u32,
    /// Language the model must answer in
    pub language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            max_words: 30,
            language: "English".to_string(),
        }
    }
}

/// Build the system instruction for a persona
///
/// The persona is embedded as given, so values outside the known set still
/// produce a usable prompt.
#[must_use]
pub fn build_system_prompt(persona: &str, options: &PromptOptions) -> String {
    let mut sections = Vec::with_capacity(3);

    sections.push(format!(
        "You are \"{persona}\". Your task is to analyze the user's thought and provide a short, accurate answer in your style."
    ));

    let hints: Vec<String> = KnownPersona::ALL
        .iter()
        .map(|p| format!("- {}: {}", p.id(), p.hint()))
        .collect();
    sections.push(hints.join("\n"));

    sections.push(format!(
        "Maximum answer length: {} words. Answer in {}.",
        options.max_words, options.language
    ));

    sections.join("\n")
}
