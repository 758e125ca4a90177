//! Speakpad - Text-to-Speech Control Surface
//!
//! Type text, pick a voice, and drive playback from a desktop window.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use speakpad::config::Config;
use speakpad::gui::SpeakpadApp;
use speakpad::session::Session;
use speakpad::tts::{self, EngineEvent};

/// How long `--list-voices` waits for voice discovery
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Speech command to use (espeak-ng, espeak)
    #[arg(long)]
    engine: Option<String>,

    /// Print the available voices and exit
    #[arg(long)]
    list_voices: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load()?;

    // Setup logging
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_filter()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🔊 Speakpad v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(engine) = args.engine {
        config.engine = engine;
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let engine = tts::create_engine(&config, tx)?;

    if args.list_voices {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let ready = tokio::time::timeout(DISCOVERY_TIMEOUT, async {
                while let Some(event) = rx.recv().await {
                    if event == EngineEvent::VoicesChanged {
                        break;
                    }
                }
            })
            .await;
            if ready.is_err() {
                tracing::warn!("Voice discovery did not finish in time");
            }
        });

        let session = Session::new(engine);
        for voice in session.catalog().voices() {
            println!("{}", voice);
        }
        return Ok(());
    }

    let session = Session::new(engine);
    let window_size = iced::Size::new(config.window_width, config.window_height);

    iced::application("Speakpad", SpeakpadApp::update, SpeakpadApp::view)
        .window_size(window_size)
        .run_with(move || SpeakpadApp::new(session, rx, config))?;

    Ok(())
}
