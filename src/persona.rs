//! Personas a user can pick to color the answer
//!
//! The known set ships with a short behavioral hint each. Persona values are
//! plain strings on the wire, and anything outside the known set is still
//! accepted and embedded verbatim in the prompt.

use serde::Serialize;

/// Persona used when a request does not name one
pub const DEFAULT_PERSONA: &str = "Motivator";

/// Longest persona string the gateway accepts
pub const MAX_PERSONA_CHARS: usize = 64;

/// A persona the front ends offer out of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownPersona {
    Motivator,
    Philosopher,
    SarcasticSelf,
}

impl KnownPersona {
    /// Every known persona, in selector order
    pub const ALL: [Self; 3] = [Self::Motivator, Self::Philosopher, Self::SarcasticSelf];

    /// Identifier used on the wire and in the prompt
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Motivator => "Motivator",
            Self::Philosopher => "Philosopher",
            Self::SarcasticSelf => "Sarcastic Self",
        }
    }

    /// One-line behavioral hint for the model
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Motivator => "Motivate and support.",
            Self::Philosopher => "Encourage deep thought.",
            Self::SarcasticSelf => "Use irony and sharp humor.",
        }
    }

    /// Look up a known persona by identifier (case-insensitive)
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(id))
    }
}

/// Persona summary served to front ends
#[derive(Debug, Clone, Serialize)]
pub struct PersonaInfo {
    pub id: &'static str,
    pub hint: &'static str,
}

impl From<KnownPersona> for PersonaInfo {
    fn from(persona: KnownPersona) -> Self {
        Self {
            id: persona.id(),
            hint: persona.hint(),
        }
    }
}

/// List the known personas for selectors
#[must_use]
pub fn known_personas() -> Vec<PersonaInfo> {
    KnownPersona::ALL.into_iter().map(PersonaInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_matches_case_insensitively() {
        assert_eq!(KnownPersona::from_id("philosopher"), Some(KnownPersona::Philosopher));
        assert_eq!(
            KnownPersona::from_id("  Sarcastic Self "),
            Some(KnownPersona::SarcasticSelf)
        );
        assert_eq!(KnownPersona::from_id("Pirate"), None);
    }

    #[test]
    fn default_persona_is_known() {
        assert!(KnownPersona::from_id(DEFAULT_PERSONA).is_some());
    }

    #[test]
    fn persona_info_serializes_id_and_hint() {
        let json = serde_json::to_value(known_personas()).unwrap();
        assert_eq!(json[2]["id"], "Sarcastic Self");
        assert_eq!(json[1]["hint"], "Encourage deep thought.");
    }
}
