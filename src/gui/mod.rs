//! GUI module using iced
//!
//! Renders the session and turns button presses into session intents. Engine
//! notifications arrive through the same update loop.

use iced::{Element, Task};
use tracing::{debug, info, warn};

use crate::session::Intent;

// Sub-modules
pub mod app;
pub mod messages;
mod view;

// Re-exports for convenience
pub use app::SpeakpadApp;
pub use messages::Message;

impl SpeakpadApp {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::EditText(action) => {
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    self.notice = None;
                    self.dispatch(Intent::EditText(self.editor.text()));
                }
            }
            Message::VoiceSelected(voice) => {
                info!("🗣️ Voice selected: {}", voice);
                self.dispatch(Intent::SelectVoice(voice.name));
            }
            Message::SpeakPressed => self.dispatch(Intent::Speak),
            Message::PausePressed => self.dispatch(Intent::Pause),
            Message::ResumePressed => self.dispatch(Intent::Resume),
            Message::StopPressed => self.dispatch(Intent::Stop),
            Message::Engine(event) => {
                debug!("Engine event: {:?}", event);
                if let Err(e) = self.session.handle(event) {
                    self.notice = Some(e.to_string());
                }
            }
            Message::DismissNotice => self.notice = None,
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    fn dispatch(&mut self, intent: Intent) {
        match self.session.handle(intent) {
            Ok(()) => {}
            Err(e) if e.is_notice() => self.notice = Some(e.to_string()),
            Err(e) => {
                warn!("Intent failed: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }
}
