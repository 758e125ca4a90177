pub mod fake_engine;

use fake_engine::{FakeEngine, FakeHandle};
use speakpad::session::{Intent, Session};
use speakpad::voice::Voice;

pub fn alice_and_bob() -> Vec<Voice> {
    vec![Voice::new("Alice", "en-US"), Voice::new("Bob", "en-GB")]
}

/// Session over a fake engine that already reports `voices`
pub fn session_with(voices: Vec<Voice>) -> (Session, FakeHandle) {
    let (engine, handle) = FakeEngine::with_voices(voices);
    (Session::new(Box::new(engine)), handle)
}

/// Session with text entered and ready to speak
pub fn session_with_text(text: &str) -> (Session, FakeHandle) {
    let (mut session, handle) = session_with(alice_and_bob());
    session
        .handle(Intent::EditText(text.to_string()))
        .expect("editing text never fails");
    (session, handle)
}
