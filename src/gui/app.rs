//! Main application state for the Speakpad GUI
//!
//! Contains the SpeakpadApp struct and initialization logic.

use futures::stream;
use iced::widget::text_editor;
use iced::Task;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::config::Config;
use crate::session::Session;
use crate::tts::EngineEvent;

use super::messages::Message;

/// Main application state
pub struct SpeakpadApp {
    /// Playback session (text, voices, state)
    pub(crate) session: Session,
    /// Text area contents
    pub(crate) editor: text_editor::Content,
    /// User-visible notice, e.g. a rejected speak
    pub(crate) notice: Option<String>,
    /// Configuration
    pub(crate) config: Config,
}

impl SpeakpadApp {
    /// Create the app around a session whose engine reports into `events`
    pub fn new(
        session: Session,
        events: UnboundedReceiver<EngineEvent>,
        config: Config,
    ) -> (Self, Task<Message>) {
        info!(
            "🚀 Speakpad app initialized ({} voices known)",
            session.catalog().voices().len()
        );

        let app = Self {
            editor: text_editor::Content::with_text(session.text()),
            session,
            notice: None,
            config,
        };

        (app, Task::run(engine_events(events), Message::Engine))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

/// Turn the engine's notification channel into a stream for the update loop
fn engine_events(
    events: UnboundedReceiver<EngineEvent>,
) -> impl futures::Stream<Item = EngineEvent> {
    stream::unfold(events, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    })
}
