//! Voice catalog
//!
//! Mirrors the engine's voice list and tracks the user's selection.

use crate::tts::SpeechEngine;
use crate::voice::Voice;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct VoiceCatalog {
    voices: Vec<Voice>,
    selected: Option<String>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot with the engine's current voice list.
    ///
    /// Selects the first voice only if nothing is selected yet.
    pub fn refresh(&mut self, engine: &dyn SpeechEngine) {
        self.replace(engine.list_voices());
    }

    /// Replace the snapshot wholesale. Safe to call any number of times.
    pub fn replace(&mut self, voices: Vec<Voice>) {
        self.voices = voices;
        if self.selected.is_none() {
            self.selected = self.voices.first().map(|v| v.name.clone());
        }
        debug!(
            "Voice catalog refreshed: {} voices, selected {:?}",
            self.voices.len(),
            self.selected
        );
    }

    /// Record the chosen voice name. Not checked against the catalog.
    pub fn select(&mut self, name: impl Into<String>) {
        self.selected = Some(name.into());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Look up a voice by name in the current snapshot
    pub fn resolve(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// The selected voice, if it is present in the current snapshot
    pub fn selected_voice(&self) -> Option<&Voice> {
        self.selected().and_then(|name| self.resolve(name))
    }
}
