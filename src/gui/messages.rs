//! Message types for the Speakpad GUI
//!
//! All messages that can be sent to update the application state.

use crate::tts::EngineEvent;
use crate::voice::Voice;
use iced::widget::text_editor;

/// Messages that drive the application
#[derive(Debug, Clone)]
pub enum Message {
    // Input
    EditText(text_editor::Action),
    VoiceSelected(Voice),

    // Playback controls
    SpeakPressed,
    PausePressed,
    ResumePressed,
    StopPressed,

    // Engine notifications
    Engine(EngineEvent),

    DismissNotice,
}
