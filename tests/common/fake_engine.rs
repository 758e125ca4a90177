//! Fake Speech Engine for Testing
//!
//! Records every command and serves a voice list the test controls.
//! Notifications are injected by the test, never emitted on their own.

use anyhow::Result;
use speakpad::tts::SpeechEngine;
use speakpad::voice::{Utterance, Voice};
use std::sync::{Arc, Mutex};

/// Command received by the fake engine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Speak(Utterance),
    Pause,
    Resume,
    Cancel,
}

/// Shared view into the fake engine, kept by the test after the engine is boxed
#[derive(Debug, Clone, Default)]
pub struct FakeHandle {
    pub voices: Arc<Mutex<Vec<Voice>>>,
    pub commands: Arc<Mutex<Vec<Command>>>,
    /// Make every command fail
    pub should_fail: Arc<Mutex<bool>>,
}

impl FakeHandle {
    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Speak(u) => Some(u),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct FakeEngine {
    handle: FakeHandle,
}

impl FakeEngine {
    pub fn new() -> (Self, FakeHandle) {
        Self::with_voices(Vec::new())
    }

    pub fn with_voices(voices: Vec<Voice>) -> (Self, FakeHandle) {
        let handle = FakeHandle::default();
        handle.set_voices(voices);
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }

    fn record(&self, command: Command) -> Result<()> {
        self.handle.commands.lock().unwrap().push(command);
        if *self.handle.should_fail.lock().unwrap() {
            return Err(anyhow::anyhow!("Fake engine failure"));
        }
        Ok(())
    }
}

impl SpeechEngine for FakeEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.handle.voices.lock().unwrap().clone()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.record(Command::Speak(utterance.clone()))
    }

    fn pause(&mut self) -> Result<()> {
        self.record(Command::Pause)
    }

    fn resume(&mut self) -> Result<()> {
        self.record(Command::Resume)
    }

    fn cancel(&mut self) -> Result<()> {
        self.record(Command::Cancel)
    }

    fn name(&self) -> &str {
        "fake"
    }
}
