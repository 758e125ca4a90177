//! System TTS engine backed by an espeak-style command
//!
//! Each utterance runs as a child process reading its text from stdin. Pause
//! and resume stop and continue the process; a waiter thread feeds the text
//! and reports natural completion.

use super::{EngineEvent, EventSender, SpeechEngine};
use crate::voice::{Utterance, UtteranceId, Voice};
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use tracing::{debug, info, warn};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Commands tried in order when the configured one is missing
pub const KNOWN_COMMANDS: [&str; 2] = ["espeak-ng", "espeak"];

#[derive(Debug, Clone, Copy)]
struct Playing {
    id: UtteranceId,
    pid: u32,
}

/// A discovered voice and the identifier the command accepts for `-v`
#[derive(Debug, Clone, PartialEq)]
struct VoiceEntry {
    voice: Voice,
    file: String,
}

#[derive(Debug)]
pub struct SystemEngine {
    command: String,
    /// Arguments placed before the engine's own, e.g. a wrapper script
    leading_args: Vec<String>,
    rate: u32,
    events: EventSender,
    voices: Arc<Mutex<Vec<VoiceEntry>>>,
    current: Arc<Mutex<Option<Playing>>>,
}

impl SystemEngine {
    /// Create the engine and start voice discovery in the background.
    ///
    /// The voice list stays empty until discovery finishes and
    /// [`EngineEvent::VoicesChanged`] is sent.
    pub fn new(command: &str, rate: u32, events: EventSender) -> Self {
        Self::with_args(command, Vec::new(), rate, events)
    }

    /// Like [`SystemEngine::new`], running `command leading_args.. <engine args>`
    pub fn with_args(
        command: &str,
        leading_args: Vec<String>,
        rate: u32,
        events: EventSender,
    ) -> Self {
        let engine = Self {
            command: command.to_string(),
            leading_args,
            rate,
            events,
            voices: Arc::new(Mutex::new(Vec::new())),
            current: Arc::new(Mutex::new(None)),
        };
        engine.discover_voices();
        engine
    }

    /// Check whether the command can be spawned at all
    pub fn is_available(command: &str) -> bool {
        Command::new(command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.command);
        command.args(&self.leading_args);
        command
    }

    fn discover_voices(&self) {
        let mut command = self.command();
        command.arg("--voices");
        let name = self.command.clone();
        let voices = Arc::clone(&self.voices);
        let events = self.events.clone();

        thread::spawn(move || {
            let output = match command.output() {
                Ok(output) => output,
                Err(e) => {
                    warn!("⚠️ Voice discovery via '{}' failed: {}", name, e);
                    return;
                }
            };
            let found = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
            info!("🗣️ Discovered {} voices", found.len());

            match voices.lock() {
                Ok(mut guard) => *guard = found,
                Err(e) => {
                    warn!("Voice list lock poisoned: {}", e);
                    return;
                }
            }
            let _ = events.send(EngineEvent::VoicesChanged);
        });
    }

    fn playing(&self) -> Option<Playing> {
        *lock_current(&self.current)
    }

    /// `-v` argument for a catalog voice name
    fn voice_arg(&self, name: &str) -> String {
        let voices = match self.voices.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Voice list lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        voices
            .iter()
            .find(|entry| entry.voice.name == name)
            .map(|entry| entry.file.clone())
            .unwrap_or_else(|| name.to_string())
    }

    fn signal_playing(&self, sig: Signal) -> Result<()> {
        let Some(playing) = self.playing() else {
            debug!("No utterance playing, ignoring {:?}", sig);
            return Ok(());
        };
        send_signal(playing.pid, sig)
    }
}

impl SpeechEngine for SystemEngine {
    fn list_voices(&self) -> Vec<Voice> {
        self.voices
            .lock()
            .map(|guard| guard.iter().map(|entry| entry.voice.clone()).collect())
            .unwrap_or_default()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        if self.playing().is_some() {
            self.cancel()?;
        }

        let voice = utterance
            .voice
            .as_ref()
            .map(|v| self.voice_arg(&v.name))
            .unwrap_or_else(|| utterance.language.to_lowercase());
        debug!(
            "System speaking {} with voice '{}': {}",
            utterance.id, voice, utterance.text
        );

        let mut child = self
            .command()
            .arg("-v")
            .arg(&voice)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.command))?;

        let playing = Playing {
            id: utterance.id,
            pid: child.id(),
        };
        *lock_current(&self.current) = Some(playing);
        let _ = self.events.send(EngineEvent::Started(utterance.id));

        let text = utterance.text.clone();
        let current = Arc::clone(&self.current);
        let events = self.events.clone();
        thread::spawn(move || feed_and_wait(child, text, playing.id, current, events));

        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.signal_playing(Signal::SIGSTOP)
    }

    fn resume(&mut self) -> Result<()> {
        self.signal_playing(Signal::SIGCONT)
    }

    fn cancel(&mut self) -> Result<()> {
        // SIGKILL also reaches a stopped process.
        let result = self.signal_playing(Signal::SIGKILL);
        *lock_current(&self.current) = None;
        result
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Write the text to the child, then report its exit if it is still current.
fn feed_and_wait(
    mut child: Child,
    text: String,
    id: UtteranceId,
    current: Arc<Mutex<Option<Playing>>>,
    events: EventSender,
) {
    let is_current =
        |current: &Mutex<Option<Playing>>| lock_current(current).map(|p| p.id) == Some(id);

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            if is_current(&current) {
                warn!("Feeding text to speech process {} failed: {}", id, e);
                let _ = child.kill();
            } else {
                debug!("Speech process {} gone before reading its text: {}", id, e);
            }
        }
    }

    if let Err(e) = child.wait() {
        warn!("Waiting on speech process failed: {}", e);
    }

    let finished = {
        let mut guard = lock_current(&current);
        if guard.map(|p| p.id) == Some(id) {
            *guard = None;
            true
        } else {
            false
        }
    };
    // Cancelled or superseded children stay silent.
    if finished {
        let _ = events.send(EngineEvent::Ended(id));
    }
}

fn lock_current(current: &Mutex<Option<Playing>>) -> MutexGuard<'_, Option<Playing>> {
    current.lock().unwrap_or_else(|poisoned| {
        warn!("Playback lock poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Send `sig` to `pid`. A process that already exited counts as success.
#[cfg(unix)]
fn send_signal(pid: u32, sig: Signal) -> Result<()> {
    match signal::kill(Pid::from_raw(pid as i32), sig) {
        Ok(()) => Ok(()),
        Err(nix::errno::Errno::ESRCH) => {
            debug!("Speech process {} already exited, skipping {:?}", pid, sig);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to send {:?} to {}", sig, pid)),
    }
}

#[cfg(not(unix))]
#[derive(Debug, Clone, Copy)]
enum Signal {
    SIGSTOP,
    SIGCONT,
    SIGKILL,
}

#[cfg(not(unix))]
fn send_signal(pid: u32, sig: Signal) -> Result<()> {
    anyhow::bail!("cannot send {:?} to {}: signals need a Unix host", sig, pid)
}

/// Parse `--voices` output: `Pty Language Age/Gender VoiceName File [Other Languages]`
fn parse_voice_list(output: &str) -> Vec<VoiceEntry> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return None;
            }
            Some(VoiceEntry {
                voice: Voice::new(cols[3], cols[1]),
                file: cols[4].to_string(),
            })
        })
        .collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::timeout;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  en-us           --/F      Amy                mb/mb-us1
";

    /// Fake engine command: answers `--voices`, otherwise runs `body`.
    /// Run through `sh` so the test never execs a freshly written file.
    fn fake_engine(dir: &TempDir, body: &str) -> (SystemEngine, UnboundedReceiver<EngineEvent>) {
        let script = dir.path().join("fake-espeak.sh");
        let content = format!(
            "case \"$1\" in\n  --voices) printf '%s' '{}'; exit 0 ;;\nesac\n{}\n",
            VOICES, body
        );
        std::fs::write(&script, content).unwrap();
        engine_for(&script)
    }

    fn engine_for(script: &Path) -> (SystemEngine, UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = SystemEngine::with_args(
            "sh",
            vec![script.to_string_lossy().to_string()],
            175,
            tx,
        );
        (engine, rx)
    }

    /// Next Started/Ended notification, skipping voice discovery
    async fn next_playback_event(rx: &mut UnboundedReceiver<EngineEvent>) -> EngineEvent {
        loop {
            match rx.recv().await {
                Some(EngineEvent::VoicesChanged) => continue,
                Some(event) => return event,
                None => panic!("engine dropped its event sender"),
            }
        }
    }

    async fn expect_event(rx: &mut UnboundedReceiver<EngineEvent>) -> EngineEvent {
        timeout(Duration::from_secs(5), next_playback_event(rx))
            .await
            .expect("timed out waiting for engine event")
    }

    async fn expect_silence(rx: &mut UnboundedReceiver<EngineEvent>) {
        let result = timeout(Duration::from_millis(500), next_playback_event(rx)).await;
        assert!(result.is_err(), "unexpected engine event: {:?}", result);
    }

    fn utterance(id: u64, text: &str) -> Utterance {
        Utterance::new(UtteranceId(id), text, None)
    }

    #[test]
    fn test_parse_voice_list() {
        let output = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en         (en 2)
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";
        let voices = parse_voice_list(output);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].voice, Voice::new("Afrikaans", "af"));
        assert_eq!(voices[0].file, "gmw/af");
        assert_eq!(voices[2].voice.name, "English_(America)");
        assert_eq!(voices[2].voice.language, "en-us");
    }

    #[test]
    fn test_parse_voice_list_skips_short_lines() {
        let output = "Pty Language Age/Gender VoiceName File\n\n 5 xx\n";
        assert!(parse_voice_list(output).is_empty());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_voice_list("").is_empty());
    }

    #[test]
    fn test_missing_command_is_unavailable() {
        assert!(!SystemEngine::is_available("speakpad-no-such-binary"));
    }

    #[test]
    fn test_signal_to_exited_process_is_ok() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(send_signal(pid, Signal::SIGCONT).is_ok());
    }

    #[tokio::test]
    async fn test_voices_discovered_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, mut rx) = fake_engine(&dir, "cat > /dev/null");
        let event = timeout(Duration::from_secs(5), rx.recv()).await.unwrap();
        assert_eq!(event, Some(EngineEvent::VoicesChanged));

        let voices = engine.list_voices();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[1], Voice::new("Amy", "en-us"));
        // Same language, told apart by voice file.
        assert_eq!(engine.voice_arg("Amy"), "mb/mb-us1");
        assert_eq!(engine.voice_arg("English_(America)"), "gmw/en-US");
        assert_eq!(engine.voice_arg("Unknown"), "Unknown");
    }

    #[tokio::test]
    async fn test_started_then_ended_on_natural_exit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, mut rx) = fake_engine(&dir, "cat > /dev/null");

        engine.speak(&utterance(1, "hello")).unwrap();
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(1)));
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Ended(UtteranceId(1)));
        assert!(engine.playing().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_child_sends_no_end() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, mut rx) = fake_engine(&dir, "cat > /dev/null\nexec sleep 5");

        engine.speak(&utterance(1, "hello")).unwrap();
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(1)));
        engine.cancel().unwrap();
        expect_silence(&mut rx).await;
    }

    #[tokio::test]
    async fn test_superseded_child_sends_no_end() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, mut rx) = fake_engine(&dir, "cat > /dev/null\nexec sleep 5");

        engine.speak(&utterance(1, "first")).unwrap();
        engine.speak(&utterance(2, "second")).unwrap();
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(1)));
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(2)));

        engine.cancel().unwrap();
        expect_silence(&mut rx).await;
    }

    #[tokio::test]
    async fn test_pause_resume_running_child() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, mut rx) = fake_engine(&dir, "cat > /dev/null\nexec sleep 5");

        engine.speak(&utterance(1, "hello")).unwrap();
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(1)));
        engine.pause().unwrap();
        engine.resume().unwrap();
        engine.pause().unwrap();
        engine.cancel().unwrap();
        expect_silence(&mut rx).await;
    }

    #[tokio::test]
    async fn test_commands_without_playback_are_noops() {
        let dir = tempfile::tempdir().unwrap();
        let (mut engine, mut rx) = fake_engine(&dir, "cat > /dev/null");

        assert!(engine.pause().is_ok());
        assert!(engine.resume().is_ok());
        assert!(engine.cancel().is_ok());
        expect_silence(&mut rx).await;
    }

    #[tokio::test]
    async fn test_large_text_does_not_block_caller() {
        let dir = tempfile::tempdir().unwrap();
        // Never reads stdin.
        let (mut engine, mut rx) = fake_engine(&dir, "exec sleep 3");
        let text = "word ".repeat(100_000);

        let started = Instant::now();
        engine.speak(&utterance(1, &text)).unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(expect_event(&mut rx).await, EngineEvent::Started(UtteranceId(1)));

        // The child is tracked, so cancel reaches it.
        assert!(engine.playing().is_some());
        engine.cancel().unwrap();
        expect_silence(&mut rx).await;
    }
}
