//! Voice and utterance value types

use std::fmt;

/// Language tag stamped on every utterance
pub const LANGUAGE_TAG: &str = "en-US";

/// A synthesis voice as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub language: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

// Used as the pick list label.
impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.language)
    }
}

/// Identifies one speak request so engine notifications can be traced back to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One text-to-speech request. Built fresh for every speak intent.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub language: &'static str,
    /// Voice override; `None` lets the engine use its default voice
    pub voice: Option<Voice>,
}

impl Utterance {
    pub fn new(id: UtteranceId, text: impl Into<String>, voice: Option<Voice>) -> Self {
        Self {
            id,
            text: text.into(),
            language: LANGUAGE_TAG,
            voice,
        }
    }

    /// Name of the voice override, if any
    pub fn voice_ref(&self) -> Option<&str> {
        self.voice.as_ref().map(|v| v.name.as_str())
    }
}
