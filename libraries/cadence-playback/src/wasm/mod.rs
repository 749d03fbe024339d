//! WASM bindings for cadence-playback
//!
//! Provides an [`AudioEngine`](crate::AudioEngine) backed by an HTML audio
//! element and a JavaScript-friendly player session around the controller.

pub mod engine;
pub mod player;

pub use engine::WebAudioEngine;
pub use player::WasmPlayer;
