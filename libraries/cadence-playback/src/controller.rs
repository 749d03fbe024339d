//! Playback controller - core orchestration
//!
//! Owns the audio engine and is the single source of truth for what is
//! playing and how. User intent goes through the transport methods; engine
//! completions come back through [`PlaybackController::handle_engine_event`].

use crate::{
    engine::{AudioEngine, EngineEvent, LoadToken, PlayRequestId},
    error::{PlaybackError, Result},
    events::{PlayerEvent, SubscriptionId, Subscribers},
    navigation::{Direction, Domain},
    shuffle::ShuffleOrder,
    types::{ListContext, PlaybackConfig, PlaybackState, PlayerStatus},
    volume::{percent_to_level, Volume},
};
use cadence_core::{time::progress_fraction, Song, SongId};
use cadence_library::Library;
use tracing::{debug, info, warn};

/// Playback controller
///
/// Generic over the engine so the same sequencing logic drives a browser
/// media element, the in-memory engine used by tests and the console.
#[derive(Debug)]
pub struct PlaybackController<E: AudioEngine> {
    engine: E,
    config: PlaybackConfig,
    state: PlaybackState,
    volume: Volume,

    // Source identity of the current load, `None` before the first one
    load_token: Option<LoadToken>,
    issued_loads: u64,

    // Latest outstanding play attempt
    pending_play: Option<PlayRequestId>,
    issued_requests: u64,

    // A seek was commanded and no time update confirmed it yet
    seeking: bool,

    // Domain position the current song was reached from (duplicates)
    cursor: Option<usize>,

    shuffle: ShuffleOrder,
    subscribers: Subscribers,

    // Engine already stopped, teardown must not run again
    stopped: bool,
}

impl<E: AudioEngine> PlaybackController<E> {
    /// Take ownership of `engine` and push the initial volume and loop flag
    pub fn new(mut engine: E, config: PlaybackConfig) -> Self {
        let state = PlaybackState::new(&config);
        let volume = Volume::new(config.initial_volume);

        engine.set_volume(volume.level());
        engine.set_loop(state.is_repeat);

        debug!(
            volume = volume.level(),
            repeat = state.is_repeat,
            shuffle = state.is_shuffle,
            "Playback controller created"
        );

        Self {
            engine,
            shuffle: ShuffleOrder::new(config.shuffle_seed),
            config,
            state,
            volume,
            load_token: None,
            issued_loads: 0,
            pending_play: None,
            issued_requests: 0,
            seeking: false,
            cursor: None,
            subscribers: Subscribers::default(),
            stopped: false,
        }
    }

    // ===== Selection =====

    /// Select a song
    ///
    /// Selecting the current song toggles play/pause without reloading.
    /// Any other song is loaded and played from the start. An id that is not
    /// in the library leaves the controller untouched.
    pub fn select_song(&mut self, library: &Library, song_id: &SongId) -> Result<()> {
        if self.state.current_song_id.as_ref() == Some(song_id) {
            self.toggle_play_pause();
            return Ok(());
        }

        let song = library
            .song(song_id)
            .ok_or_else(|| PlaybackError::SongNotFound(song_id.clone()))?;
        self.start_song(song, None);
        Ok(())
    }

    /// Toggle between playing and paused
    ///
    /// No-op while idle.
    pub fn toggle_play_pause(&mut self) {
        if self.state.current_song_id.is_none() {
            debug!("Toggle ignored, nothing selected");
            return;
        }

        if self.state.is_playing {
            self.state.is_playing = false;
            self.pending_play = None;
            self.engine.pause();
            debug!("Paused");
        } else {
            self.state.is_playing = true;
            let request = self.request_play();
            debug!(%request, "Resuming");
        }
        self.publish_state();
    }

    /// Advance to the next song in the active list
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, library: &Library, context: &ListContext) -> Result<()> {
        self.step(library, context, Direction::Next).map(|_| ())
    }

    /// Go back to the previous song in the active list
    pub fn previous(&mut self, library: &Library, context: &ListContext) -> Result<()> {
        self.step(library, context, Direction::Previous).map(|_| ())
    }

    /// Move through the domain, returning whether a song was started
    fn step(
        &mut self,
        library: &Library,
        context: &ListContext,
        direction: Direction,
    ) -> Result<bool> {
        let domain = Domain::resolve(library, context);
        if domain.is_empty() {
            debug!(?context, "Nothing to play in the active list");
            return Ok(false);
        }

        let Some(current) = self.state.current_song_id.clone() else {
            let first = if self.state.is_shuffle {
                self.shuffle.first(&domain).unwrap_or(0)
            } else {
                0
            };
            return self.play_index(library, &domain, first);
        };

        let Some(index) = domain.locate(&current, self.cursor) else {
            debug!(song_id = %current, ?context, "Current song is not in the active list");
            return Ok(false);
        };

        let target = if self.state.is_shuffle {
            self.shuffle.step(&domain, index, direction)
        } else {
            domain.step(index, direction)
        };

        match target {
            Some(target) => self.play_index(library, &domain, target),
            None => Ok(false),
        }
    }

    fn play_index(&mut self, library: &Library, domain: &Domain, index: usize) -> Result<bool> {
        let Some(song_id) = domain.get(index) else {
            return Ok(false);
        };
        let song = library
            .song(song_id)
            .ok_or_else(|| PlaybackError::SongNotFound(song_id.clone()))?;

        if self.state.current_song_id.as_ref() == Some(&song.id) {
            self.cursor = Some(index);
            self.restart_current();
        } else {
            self.start_song(song, Some(index));
        }
        Ok(true)
    }

    /// Load `song` and start playing it from zero
    fn start_song(&mut self, song: &Song, cursor: Option<usize>) {
        let previous_song_id = self.state.current_song_id.replace(song.id.clone());

        self.issued_loads += 1;
        let token = LoadToken(self.issued_loads);
        self.load_token = Some(token);
        self.cursor = cursor;
        self.seeking = false;
        self.stopped = false;

        self.state.is_playing = true;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;

        info!(
            song_id = %song.id,
            title = %song.title,
            artist = %song.artist,
            %token,
            "Loading song"
        );

        self.engine.load(token, &song.audio_url);
        self.request_play();

        self.publish(PlayerEvent::TrackChanged {
            song_id: song.id.clone(),
            previous_song_id,
        });
        self.publish(PlayerEvent::PositionChanged { position: 0.0 });
        self.publish(PlayerEvent::DurationChanged { duration: 0.0 });
        self.publish_state();
    }

    /// Restart the loaded song from zero and keep playing
    fn restart_current(&mut self) {
        self.seeking = false;
        self.state.current_time = 0.0;
        self.state.is_playing = true;
        self.engine.set_position(0.0);
        let request = self.request_play();

        debug!(song_id = ?self.state.current_song_id, %request, "Restarting song");

        self.publish(PlayerEvent::PositionChanged { position: 0.0 });
        self.publish_state();
    }

    fn request_play(&mut self) -> PlayRequestId {
        self.issued_requests += 1;
        let request = PlayRequestId(self.issued_requests);
        self.pending_play = Some(request);
        self.engine.play(request);
        request
    }

    // ===== Engine Events =====

    /// Apply an engine event
    ///
    /// Events are applied in arrival order. Events for a superseded source
    /// or play attempt are discarded.
    pub fn handle_engine_event(
        &mut self,
        library: &Library,
        context: &ListContext,
        event: EngineEvent,
    ) -> Result<()> {
        match event {
            EngineEvent::TimeUpdate { token, position } => {
                if !self.is_current(token) {
                    debug!(%token, "Discarding stale time update");
                    return Ok(());
                }
                if !position.is_finite() {
                    return Ok(());
                }
                self.state.current_time = position.max(0.0);
                let confirmed_seek = std::mem::take(&mut self.seeking);
                self.publish(PlayerEvent::PositionChanged {
                    position: self.state.current_time,
                });
                if confirmed_seek {
                    self.publish_state();
                }
            }

            EngineEvent::DurationAvailable { token, duration } => {
                if !self.is_current(token) {
                    debug!(%token, "Discarding stale duration");
                    return Ok(());
                }
                if !duration.is_finite() || duration < 0.0 {
                    debug!(%token, duration, "Ignoring unusable duration");
                    return Ok(());
                }
                self.state.duration = duration;
                self.publish(PlayerEvent::DurationChanged { duration });
            }

            EngineEvent::Ended { token } => {
                if !self.is_current(token) {
                    debug!(%token, "Discarding stale end of track");
                    return Ok(());
                }
                if self.state.is_repeat {
                    // Native looping should have suppressed this
                    info!(song_id = ?self.state.current_song_id, "Repeating song");
                    self.restart_current();
                    return Ok(());
                }

                let advanced = self.step(library, context, Direction::Next)?;
                if !advanced {
                    info!(song_id = ?self.state.current_song_id, "Reached the end, nothing to advance to");
                    self.state.is_playing = false;
                    self.pending_play = None;
                    self.publish_state();
                }
            }

            EngineEvent::PlayResolved { request } => {
                if self.pending_play == Some(request) {
                    self.pending_play = None;
                    debug!(%request, "Playback started");
                } else if !self.state.is_playing && self.state.current_song_id.is_some() {
                    // A superseded play started the engine after a pause
                    debug!(%request, "Late play resolved while paused, pausing engine");
                    self.engine.pause();
                } else {
                    debug!(%request, "Discarding stale play resolution");
                }
            }

            EngineEvent::PlayRejected { request, reason } => {
                if self.pending_play != Some(request) {
                    debug!(%request, %reason, "Discarding stale play rejection");
                    return Ok(());
                }
                self.pending_play = None;
                self.state.is_playing = false;

                let Some(song_id) = self.state.current_song_id.clone() else {
                    return Ok(());
                };
                warn!(song_id = %song_id, %reason, "Playback failed to start");

                self.publish(PlayerEvent::PlaybackFailed {
                    song_id,
                    message: reason,
                });
                self.publish_state();
            }
        }
        Ok(())
    }

    fn is_current(&self, token: LoadToken) -> bool {
        self.load_token == Some(token)
    }

    // ===== Seek =====

    /// Move the position by `delta_secs`, clamped into the song
    pub fn seek_by(&mut self, delta_secs: f64) {
        if self.state.current_song_id.is_none() || delta_secs.is_nan() {
            return;
        }
        let target = self.engine.position() + delta_secs;
        self.seek_to(target);
    }

    /// Nudge forward by the configured step
    pub fn seek_forward(&mut self) {
        self.seek_by(self.config.seek_step_secs);
    }

    /// Nudge backward by the configured step
    pub fn seek_backward(&mut self) {
        self.seek_by(-self.config.seek_step_secs);
    }

    /// Jump to a fraction of the song (progress bar click)
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        self.seek_to(fraction.clamp(0.0, 1.0) * self.state.duration);
    }

    /// Jump to an absolute position in seconds
    ///
    /// The position itself is confirmed by the next time update.
    pub fn seek_to(&mut self, seconds: f64) {
        if self.state.current_song_id.is_none() || seconds.is_nan() {
            return;
        }
        let target = seconds.clamp(0.0, self.state.duration.max(0.0));
        self.engine.set_position(target);
        self.seeking = true;
        debug!(target, "Seeking");
        self.publish_state();
    }

    // ===== Volume =====

    /// Set volume (0.0-1.0)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Set volume from the UI's 0-100 scale
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.set_volume(percent_to_level(percent));
    }

    /// Toggle mute, restoring the previous level on unmute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.state.volume = self.volume.level();
        self.state.previous_volume = self.volume.previous();
        self.state.is_muted = self.volume.is_muted();
        self.engine.set_volume(self.state.volume);

        self.publish(PlayerEvent::VolumeChanged {
            volume: self.state.volume,
            is_muted: self.state.is_muted,
        });
    }

    // ===== Shuffle & Repeat =====

    /// Toggle repeat of the current song
    ///
    /// The engine loop flag changes immediately.
    pub fn toggle_repeat(&mut self) {
        self.state.is_repeat = !self.state.is_repeat;
        self.engine.set_loop(self.state.is_repeat);
        info!(enabled = self.state.is_repeat, "Repeat toggled");
        self.publish(PlayerEvent::RepeatChanged {
            enabled: self.state.is_repeat,
        });
    }

    /// Toggle shuffled sequencing
    ///
    /// Turning shuffle on starts a fresh order from the current song.
    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffle = !self.state.is_shuffle;
        if self.state.is_shuffle {
            self.shuffle.invalidate();
        }
        info!(enabled = self.state.is_shuffle, "Shuffle toggled");
        self.publish(PlayerEvent::ShuffleChanged {
            enabled: self.state.is_shuffle,
        });
    }

    // ===== State Queries =====

    /// Full controller state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Derived player status
    pub fn status(&self) -> PlayerStatus {
        if self.state.current_song_id.is_none() {
            PlayerStatus::Idle
        } else if self.seeking {
            PlayerStatus::Seeking
        } else if self.state.is_playing {
            PlayerStatus::Playing
        } else {
            PlayerStatus::Paused
        }
    }

    /// The current song, if it is still in the library
    pub fn current_song<'a>(&self, library: &'a Library) -> Option<&'a Song> {
        self.state
            .current_song_id
            .as_ref()
            .and_then(|id| library.song(id))
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn duration(&self) -> f64 {
        self.state.duration
    }

    /// Position as a fraction of the duration (0.0-1.0)
    pub fn progress(&self) -> f64 {
        progress_fraction(self.state.current_time, self.state.duration)
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Read access to the engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ===== Notifications =====

    /// Register a listener for player events
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PlayerEvent) + 'static,
    {
        self.subscribers.subscribe(Box::new(listener))
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn publish(&mut self, event: PlayerEvent) {
        self.subscribers.publish(&event);
    }

    fn publish_state(&mut self) {
        let event = PlayerEvent::StateChanged {
            status: self.status(),
            is_playing: self.state.is_playing,
        };
        self.publish(event);
    }

    // ===== Lifecycle =====

    /// Stop the engine and return to idle
    ///
    /// Runs once; later calls (and the drop) do nothing until another song
    /// is selected.
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.engine.stop();

        self.state.current_song_id = None;
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
        self.load_token = None;
        self.pending_play = None;
        self.seeking = false;
        self.cursor = None;

        info!("Playback stopped");
        self.publish_state();
    }
}

impl<E: AudioEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
