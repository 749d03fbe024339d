//! Player notifications
//!
//! The controller publishes a [`PlayerEvent`] after every observable change.
//! Presentation layers subscribe and re-render; nothing polls.

use crate::types::PlayerStatus;
use cadence_core::SongId;
use serde::{Deserialize, Serialize};

/// Events published by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Play/pause intent or derived status changed
    StateChanged {
        status: PlayerStatus,
        is_playing: bool,
    },

    /// A different song became current
    TrackChanged {
        song_id: SongId,
        previous_song_id: Option<SongId>,
    },

    /// Engine reported a new position (seconds)
    PositionChanged { position: f64 },

    /// Engine reported the duration of the current source (seconds)
    DurationChanged { duration: f64 },

    /// Volume or mute changed
    VolumeChanged { volume: f32, is_muted: bool },

    /// Repeat toggled
    RepeatChanged { enabled: bool },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// The engine refused to start playback
    PlaybackFailed { song_id: SongId, message: String },
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&PlayerEvent)>;

/// Registry of event listeners, notified in subscription order
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn publish(&mut self, event: &PlayerEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}
