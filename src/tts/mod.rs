//! TTS (Text-to-Speech) Module
//!
//! The speech engine capability the playback controller drives, and the
//! notifications engines feed back into the session.

use crate::config::Config;
use crate::voice::{Utterance, UtteranceId, Voice};
use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

pub mod system;

/// Asynchronous notifications emitted by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The voice list became available or changed
    VoicesChanged,
    /// Audio for the utterance started
    Started(UtteranceId),
    /// The utterance finished on its own
    Ended(UtteranceId),
}

/// Sender half engines use to report notifications
pub type EventSender = UnboundedSender<EngineEvent>;

/// Trait for speech engines.
///
/// Commands are fire-and-forget directives; outcomes arrive later as
/// [`EngineEvent`]s.
pub trait SpeechEngine: Send + std::fmt::Debug {
    /// Current snapshot of available voices. May be empty before the engine is ready.
    fn list_voices(&self) -> Vec<Voice>;

    /// Start speaking the utterance
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn resume(&mut self) -> Result<()>;

    /// Abandon the current utterance
    fn cancel(&mut self) -> Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Factory to create the configured speech engine
pub fn create_engine(config: &Config, events: EventSender) -> Result<Box<dyn SpeechEngine>> {
    info!("🛠️ Creating speech engine: {}", config.engine);

    let mut candidates = vec![config.engine.clone()];
    for fallback in system::KNOWN_COMMANDS {
        if !candidates.iter().any(|c| c == fallback) {
            candidates.push(fallback.to_string());
        }
    }

    for command in &candidates {
        if system::SystemEngine::is_available(command) {
            if command != &config.engine {
                warn!(
                    "  - '{}' not found, falling back to '{}'",
                    config.engine, command
                );
            }
            let engine = system::SystemEngine::new(command, config.speech_rate, events);
            info!("✅ Speech engine '{}' initialized", engine.name());
            return Ok(Box::new(engine));
        }
    }

    Err(crate::error::SpeakpadError::EngineUnavailable(format!(
        "no speech command found (tried {})",
        candidates.join(", ")
    ))
    .into())
}
