//! Speakpad Library
//!
//! Core modules for the Speakpad text-to-speech control surface.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gui;
pub mod playback;
pub mod session;
pub mod tts;
pub mod voice;
