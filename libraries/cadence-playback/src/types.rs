//! Core types for playback control

use cadence_core::{PlaylistId, SongId};
use serde::{Deserialize, Serialize};

/// Volume a fresh session starts with
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Seconds moved by the nudge buttons
pub const SEEK_STEP_SECS: f64 = 5.0;

/// Which list drives next/previous
///
/// This is a view over the library, not state owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ListContext {
    /// The whole library in insertion order
    #[default]
    Library,

    /// A single playlist, dangling entries skipped
    Playlist(PlaylistId),
}

/// Player status derived from [`PlaybackState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// No song has been selected yet
    Idle,

    /// A song is loaded and playback is paused
    Paused,

    /// A song is loaded and playback is intended
    Playing,

    /// A seek was commanded and no position update has confirmed it yet
    Seeking,
}

/// Controller state shared with the presentation layer
///
/// `current_time` and `duration` are only ever written from engine events
/// (plus the zero reset on track change). `is_playing` is intent: the engine
/// may still reject the play request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Selected song, `None` until the first selection
    pub current_song_id: Option<SongId>,

    /// Whether playback is intended
    pub is_playing: bool,

    /// Position in seconds, as last reported by the engine
    pub current_time: f64,

    /// Duration in seconds, as last reported by the engine
    pub duration: f64,

    /// Output volume in `[0, 1]`
    pub volume: f32,

    /// Last non-zero volume, restored on unmute
    pub previous_volume: f32,

    /// Mute flag
    pub is_muted: bool,

    /// Repeat the current song
    pub is_repeat: bool,

    /// Shuffle the sequencing order
    pub is_shuffle: bool,
}

impl PlaybackState {
    pub(crate) fn new(config: &PlaybackConfig) -> Self {
        let volume = crate::volume::clamp_volume(config.initial_volume);
        Self {
            current_song_id: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume,
            previous_volume: if volume > 0.0 { volume } else { DEFAULT_VOLUME },
            is_muted: volume == 0.0,
            is_repeat: config.repeat,
            is_shuffle: config.shuffle,
        }
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume in `[0, 1]` (default: 0.7)
    pub initial_volume: f32,

    /// Seconds moved by `seek_forward`/`seek_backward` (default: 5)
    pub seek_step_secs: f64,

    /// Initial repeat flag (default: off)
    pub repeat: bool,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Fixed seed for shuffle orders, random when `None`
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            seek_step_secs: SEEK_STEP_SECS,
            repeat: false,
            shuffle: false,
            shuffle_seed: None,
        }
    }
}
