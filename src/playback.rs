//! Playback controller
//!
//! State machine over Idle / Speaking / Paused. It is the only writer of
//! engine commands: optimistic on speak, authoritative on the engine's end
//! notification.

use crate::catalog::VoiceCatalog;
use crate::error::{SpeakpadError, SpeakpadResult};
use crate::tts::{EngineEvent, SpeechEngine};
use crate::voice::{Utterance, UtteranceId};
use tracing::{debug, info, warn};

/// Playback status of the single session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

impl PlaybackState {
    /// Speaking or paused
    pub fn is_active(self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }

    pub fn actions(self) -> Actions {
        Actions {
            speak: self == PlaybackState::Idle,
            pause: self == PlaybackState::Speaking,
            resume: self == PlaybackState::Paused,
            stop: self.is_active(),
        }
    }
}

/// Which controls the view should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    pub speak: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
}

#[derive(Debug)]
pub struct PlaybackController {
    engine: Box<dyn SpeechEngine>,
    state: PlaybackState,
    current: Option<UtteranceId>,
    next_id: u64,
}

impl PlaybackController {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            state: PlaybackState::Idle,
            current: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn actions(&self) -> Actions {
        self.state.actions()
    }

    /// Utterance most recently submitted, until playback returns to idle
    pub fn current_utterance(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Read-only access for voice discovery
    pub fn engine(&self) -> &dyn SpeechEngine {
        self.engine.as_ref()
    }

    /// Submit `text` for playback.
    ///
    /// Returns `Ok(None)` when a playback is already in flight (the request is
    /// dropped, not queued) and [`SpeakpadError::EmptyText`] for blank text.
    /// An unknown voice name falls back to the engine default.
    pub fn speak(
        &mut self,
        text: &str,
        voice: Option<&str>,
        catalog: &VoiceCatalog,
    ) -> SpeakpadResult<Option<UtteranceId>> {
        if self.state != PlaybackState::Idle {
            debug!("Ignoring speak while {:?}", self.state);
            return Ok(None);
        }
        if text.trim().is_empty() {
            info!("Speak rejected: no text entered");
            return Err(SpeakpadError::EmptyText);
        }

        let resolved = voice.and_then(|name| catalog.resolve(name)).cloned();
        if let (Some(name), None) = (voice, &resolved) {
            warn!("Voice '{}' not in catalog, using engine default", name);
        }

        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        let utterance = Utterance::new(id, text, resolved);

        if let Err(e) = self.engine.speak(&utterance) {
            warn!("Engine '{}' failed to speak {}: {}", self.engine.name(), id, e);
        }
        self.current = Some(id);
        self.transition(PlaybackState::Speaking, "speak");
        Ok(Some(id))
    }

    /// Speaking -> Paused. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Speaking {
            debug!("Ignoring pause while {:?}", self.state);
            return false;
        }
        if let Err(e) = self.engine.pause() {
            warn!("Engine pause failed: {}", e);
        }
        self.transition(PlaybackState::Paused, "pause");
        true
    }

    /// Paused -> Speaking. Returns whether the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            debug!("Ignoring resume while {:?}", self.state);
            return false;
        }
        if let Err(e) = self.engine.resume() {
            warn!("Engine resume failed: {}", e);
        }
        self.transition(PlaybackState::Speaking, "resume");
        true
    }

    /// Speaking or Paused -> Idle without waiting for the engine.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            debug!("Ignoring stop while idle");
            return false;
        }
        if let Err(e) = self.engine.cancel() {
            warn!("Engine cancel failed: {}", e);
        }
        self.current = None;
        self.transition(PlaybackState::Idle, "stop");
        true
    }

    /// Apply an engine notification. Returns whether the state changed.
    pub fn on_engine_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::VoicesChanged => false,
            EngineEvent::Started(id) => {
                // Confirms the optimistic Speaking; never revives an idle session.
                debug!("Engine started {} while {:?}", id, self.state);
                false
            }
            EngineEvent::Ended(id) => {
                if !self.state.is_active() {
                    debug!("Late end for {} ignored", id);
                    return false;
                }
                self.current = None;
                self.transition(PlaybackState::Idle, "engine end");
                true
            }
        }
    }

    fn transition(&mut self, next: PlaybackState, cause: &str) {
        debug!("Playback {:?} -> {:?} ({})", self.state, next, cause);
        self.state = next;
    }
}
