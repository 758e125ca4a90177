//! Session: everything the view reads, and the single entry point for
//! changing it.
//!
//! User intents and engine notifications both go through [`Session::handle`],
//! one event at a time.

use crate::catalog::VoiceCatalog;
use crate::error::SpeakpadResult;
use crate::playback::{Actions, PlaybackController, PlaybackState};
use crate::tts::{EngineEvent, SpeechEngine};
use tracing::debug;

/// User-originated requests from the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    EditText(String),
    SelectVoice(String),
    Speak,
    Pause,
    Resume,
    Stop,
}

/// Anything that can change the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Intent(Intent),
    Engine(EngineEvent),
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        Event::Intent(intent)
    }
}

impl From<EngineEvent> for Event {
    fn from(event: EngineEvent) -> Self {
        Event::Engine(event)
    }
}

#[derive(Debug)]
pub struct Session {
    text: String,
    catalog: VoiceCatalog,
    controller: PlaybackController,
}

impl Session {
    /// Build a session and take a first look at the engine's voices
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        let mut session = Self {
            text: String::new(),
            catalog: VoiceCatalog::new(),
            controller: PlaybackController::new(engine),
        };
        session.catalog.refresh(session.controller.engine());
        session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn selected_voice_name(&self) -> Option<&str> {
        self.catalog.selected()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn actions(&self) -> Actions {
        self.controller.actions()
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Apply one event.
    ///
    /// The only error is [`crate::error::SpeakpadError::EmptyText`], which
    /// leaves the session unchanged.
    pub fn handle(&mut self, event: impl Into<Event>) -> SpeakpadResult<()> {
        let event = event.into();
        debug!("Session event: {:?}", event);

        match event {
            Event::Intent(Intent::EditText(text)) => self.text = text,
            Event::Intent(Intent::SelectVoice(name)) => self.catalog.select(name),
            Event::Intent(Intent::Speak) => {
                let voice = self.catalog.selected();
                self.controller.speak(&self.text, voice, &self.catalog)?;
            }
            Event::Intent(Intent::Pause) => {
                self.controller.pause();
            }
            Event::Intent(Intent::Resume) => {
                self.controller.resume();
            }
            Event::Intent(Intent::Stop) => {
                self.controller.stop();
            }
            Event::Engine(EngineEvent::VoicesChanged) => {
                self.catalog.refresh(self.controller.engine());
            }
            Event::Engine(event) => {
                self.controller.on_engine_event(event);
            }
        }
        Ok(())
    }
}
