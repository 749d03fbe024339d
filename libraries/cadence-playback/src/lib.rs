//! Cadence - Playback Control
//!
//! Platform-agnostic playback controller for Cadence.
//!
//! This crate provides:
//! - A playback controller that owns exactly one audio engine
//! - Track sequencing over the library or a playlist (cyclic next/previous)
//! - Shuffle orders that visit every song once per cycle
//! - Repeat via the engine's native loop flag
//! - Seek (relative nudge, absolute, fraction of the song)
//! - Volume with lossless mute
//! - Change notifications for presentation layers
//!
//! # Architecture
//!
//! `cadence-playback` never touches audio itself. The platform supplies an
//! [`AudioEngine`] (an HTML media element, the in-memory [`MemoryEngine`],
//! ...) and feeds the engine's [`EngineEvent`]s back into the controller.
//! Every event carries the identity of the source or play attempt it belongs
//! to, so completions for a superseded track are dropped.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use cadence_library::Library;
//! use cadence_playback::{
//!     ListContext, MemoryEngine, PlaybackConfig, PlaybackController, PlayerStatus,
//! };
//! use cadence_core::SongId;
//!
//! let library = Library::with_defaults();
//! let engine = MemoryEngine::new();
//! let mut controller = PlaybackController::new(engine.clone(), PlaybackConfig::default());
//!
//! controller.select_song(&library, &SongId::new("song2")).unwrap();
//! assert_eq!(controller.status(), PlayerStatus::Playing);
//!
//! // Feed engine completions back in arrival order
//! for event in engine.take_events() {
//!     controller
//!         .handle_engine_event(&library, &ListContext::Library, event)
//!         .unwrap();
//! }
//! assert_eq!(controller.duration(), 180.0);
//!
//! controller.next(&library, &ListContext::Library).unwrap();
//! assert_eq!(controller.state().current_song_id, Some(SongId::new("song3")));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use cadence_playback::{MemoryEngine, PlaybackConfig, PlaybackController};
//!
//! let engine = MemoryEngine::new();
//! let mut controller = PlaybackController::new(engine.clone(), PlaybackConfig::default());
//!
//! controller.toggle_shuffle();
//! controller.toggle_repeat();
//! assert!(engine.is_looping());
//! ```

mod controller;
mod engine;
mod error;
mod events;
pub mod navigation;
mod shuffle;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use controller::PlaybackController;
pub use engine::{
    AudioEngine, EngineCommand, EngineEvent, LoadToken, MemoryEngine, PlayPolicy, PlayRequestId,
    DEFAULT_SOURCE_DURATION,
};
pub use error::{PlaybackError, Result};
pub use events::{PlayerEvent, SubscriptionId};
pub use navigation::{Direction, Domain};
pub use shuffle::ShuffleOrder;
pub use types::{
    ListContext, PlaybackConfig, PlaybackState, PlayerStatus, DEFAULT_VOLUME, SEEK_STEP_SECS,
};
pub use volume::{clamp_volume, percent_to_level, Volume};
