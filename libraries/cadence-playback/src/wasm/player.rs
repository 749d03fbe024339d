//! JavaScript-facing player session

use super::engine::WebAudioEngine;
use crate::{
    EngineEvent, ListContext, PlaybackConfig, PlaybackController, PlaybackError, PlayerEvent,
};
use cadence_core::{NewSong, PlaylistId, SongId};
use cadence_library::Library;
use js_sys::Function;
use std::cell::{OnceCell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

struct Session {
    library: Library,
    context: ListContext,
    controller: PlaybackController<WebAudioEngine>,
}

#[derive(Default)]
struct Callbacks {
    on_state_change: Option<Function>,
    on_track_change: Option<Function>,
    on_error: Option<Function>,
}

/// Player session for the browser
///
/// Owns the library, the active list and a controller driving one audio
/// element. Engine events and controller notifications are queued and
/// delivered once the session is no longer borrowed, so JavaScript callbacks
/// may call back into the player.
#[wasm_bindgen]
pub struct WasmPlayer {
    session: Rc<RefCell<Session>>,
    engine_events: Rc<RefCell<VecDeque<EngineEvent>>>,
    notifications: Rc<RefCell<VecDeque<PlayerEvent>>>,
    callbacks: Rc<RefCell<Callbacks>>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player
    ///
    /// `library` is an optional library snapshot; the demo library is used
    /// when it is `undefined` or `null`.
    #[wasm_bindgen(constructor)]
    pub fn new(library: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let library = if library.is_undefined() || library.is_null() {
            Library::with_defaults()
        } else {
            serde_wasm_bindgen::from_value(library)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse library: {}", e)))?
        };

        let engine_events = Rc::new(RefCell::new(VecDeque::new()));
        let slot: Rc<OnceCell<Weak<RefCell<Session>>>> = Rc::new(OnceCell::new());
        let notifications = Rc::new(RefCell::new(VecDeque::new()));
        let callbacks = Rc::new(RefCell::new(Callbacks::default()));

        let sink = {
            let engine_events = Rc::clone(&engine_events);
            let notifications = Rc::clone(&notifications);
            let callbacks = Rc::clone(&callbacks);
            let slot = Rc::clone(&slot);
            move |event: EngineEvent| {
                engine_events.borrow_mut().push_back(event);
                if let Some(session) = slot.get().and_then(Weak::upgrade) {
                    drain_engine_events(&session, &engine_events);
                    flush_notifications(&session, &notifications, &callbacks);
                }
            }
        };

        let engine = WebAudioEngine::new(sink)?;
        let mut controller = PlaybackController::new(engine, PlaybackConfig::default());

        let outbox = Rc::clone(&notifications);
        controller.subscribe(move |event| outbox.borrow_mut().push_back(event.clone()));

        let session = Rc::new(RefCell::new(Session {
            library,
            context: ListContext::Library,
            controller,
        }));
        let _ = slot.set(Rc::downgrade(&session));

        Ok(Self {
            session,
            engine_events,
            notifications,
            callbacks,
        })
    }

    // ===== Playback Control =====

    /// Select a song by id (toggles when it is already current)
    #[wasm_bindgen(js_name = selectSong)]
    pub fn select_song(&self, song_id: &str) -> Result<(), JsValue> {
        let result = self.with_session(|session| {
            session
                .controller
                .select_song(&session.library, &SongId::new(song_id))
        });
        result.map_err(|e| self.handle_error(e))
    }

    /// Toggle play/pause
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) {
        self.with_session(|session| session.controller.toggle_play_pause());
    }

    /// Skip to the next song in the active list
    pub fn next(&self) -> Result<(), JsValue> {
        let result = self.with_session(|session| {
            session.controller.next(&session.library, &session.context)
        });
        result.map_err(|e| self.handle_error(e))
    }

    /// Go to the previous song in the active list
    pub fn previous(&self) -> Result<(), JsValue> {
        let result = self.with_session(|session| {
            session
                .controller
                .previous(&session.library, &session.context)
        });
        result.map_err(|e| self.handle_error(e))
    }

    // ===== Seeking =====

    /// Move by `delta` seconds
    #[wasm_bindgen(js_name = seekBy)]
    pub fn seek_by(&self, delta: f64) {
        self.with_session(|session| session.controller.seek_by(delta));
    }

    /// Nudge forward by the configured step
    #[wasm_bindgen(js_name = seekForward)]
    pub fn seek_forward(&self) {
        self.with_session(|session| session.controller.seek_forward());
    }

    /// Nudge backward by the configured step
    #[wasm_bindgen(js_name = seekBackward)]
    pub fn seek_backward(&self) {
        self.with_session(|session| session.controller.seek_backward());
    }

    /// Seek to a fraction of the song (0.0 - 1.0)
    #[wasm_bindgen(js_name = seekToFraction)]
    pub fn seek_to_fraction(&self, fraction: f64) {
        self.with_session(|session| session.controller.seek_to_fraction(fraction));
    }

    // ===== Volume Control =====

    /// Set volume (0-100)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, percent: u8) {
        self.with_session(|session| session.controller.set_volume_percent(percent));
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.with_session(|session| session.controller.toggle_mute());
    }

    // ===== Shuffle & Repeat =====

    /// Toggle repeat of the current song
    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&self) {
        self.with_session(|session| session.controller.toggle_repeat());
    }

    /// Toggle shuffle
    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) {
        self.with_session(|session| session.controller.toggle_shuffle());
    }

    // ===== Library =====

    /// Make a playlist the active list, or the whole library when `None`
    #[wasm_bindgen(js_name = openPlaylist)]
    pub fn open_playlist(&self, playlist_id: Option<String>) {
        self.with_session(|session| {
            session.context = match playlist_id {
                Some(id) => ListContext::Playlist(PlaylistId::new(id)),
                None => ListContext::Library,
            };
        });
    }

    /// Add a song, returning its id
    #[wasm_bindgen(js_name = addSong)]
    pub fn add_song(&self, song: JsValue) -> Result<String, JsValue> {
        let song: NewSong = serde_wasm_bindgen::from_value(song)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse song: {}", e)))?;
        let result = self.with_session(|session| session.library.add_song(song));
        result
            .map(|id| id.to_string())
            .map_err(|e| self.handle_error(e.into()))
    }

    /// Create a playlist, returning its id
    #[wasm_bindgen(js_name = createPlaylist)]
    pub fn create_playlist(&self, name: &str) -> Result<String, JsValue> {
        let result = self.with_session(|session| session.library.create_playlist(name));
        result
            .map(|id| id.to_string())
            .map_err(|e| self.handle_error(e.into()))
    }

    /// Add a song to a playlist
    #[wasm_bindgen(js_name = addToPlaylist)]
    pub fn add_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<(), JsValue> {
        let result = self.with_session(|session| {
            session
                .library
                .add_to_playlist(&PlaylistId::new(playlist_id), &SongId::new(song_id))
        });
        result.map_err(|e| self.handle_error(e.into()))
    }

    // ===== State Queries =====

    /// Full playback state
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        let session = self.session.borrow();
        serde_wasm_bindgen::to_value(session.controller.state()).unwrap_or(JsValue::NULL)
    }

    /// Player status ("Idle" | "Paused" | "Playing" | "Seeking")
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        format!("{:?}", self.session.borrow().controller.status())
    }

    /// The current song, or `null`
    #[wasm_bindgen(js_name = currentSong)]
    pub fn current_song(&self) -> JsValue {
        let session = self.session.borrow();
        session
            .controller
            .current_song(&session.library)
            .and_then(|song| serde_wasm_bindgen::to_value(song).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// Library snapshot
    #[wasm_bindgen(js_name = getLibrary)]
    pub fn get_library(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.session.borrow().library).unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    /// Register state change callback (receives the full state)
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        self.callbacks.borrow_mut().on_state_change = Some(callback);
    }

    /// Register track change callback (receives the song or `null`)
    #[wasm_bindgen(js_name = onTrackChange)]
    pub fn on_track_change(&self, callback: Function) {
        self.callbacks.borrow_mut().on_track_change = Some(callback);
    }

    /// Register error callback (receives a message)
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Function) {
        self.callbacks.borrow_mut().on_error = Some(callback);
    }
}

impl WasmPlayer {
    /// Run `f` against the session, then deliver whatever it queued
    fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> T {
        let output = f(&mut self.session.borrow_mut());
        drain_engine_events(&self.session, &self.engine_events);
        flush_notifications(&self.session, &self.notifications, &self.callbacks);
        output
    }

    fn handle_error(&self, error: PlaybackError) -> JsValue {
        let message = error.to_string();
        let callback = self.callbacks.borrow().on_error.clone();
        if let Some(callback) = callback {
            callback
                .call1(&JsValue::NULL, &JsValue::from_str(&message))
                .ok();
        }
        JsValue::from_str(&message)
    }
}

/// Feed queued engine events into the controller
///
/// Does nothing while the session is borrowed; the borrower drains on exit.
fn drain_engine_events(session: &RefCell<Session>, events: &RefCell<VecDeque<EngineEvent>>) {
    let Ok(mut session) = session.try_borrow_mut() else {
        return;
    };
    let Session {
        library,
        context,
        controller,
    } = &mut *session;

    loop {
        let next = events.borrow_mut().pop_front();
        let Some(event) = next else {
            break;
        };
        if let Err(error) = controller.handle_engine_event(library, context, event) {
            tracing::warn!(%error, "Engine event could not be applied");
        }
    }
}

/// Deliver queued notifications to the JavaScript callbacks
fn flush_notifications(
    session: &RefCell<Session>,
    notifications: &RefCell<VecDeque<PlayerEvent>>,
    callbacks: &RefCell<Callbacks>,
) {
    loop {
        let next = notifications.borrow_mut().pop_front();
        let Some(event) = next else {
            break;
        };

        let (callback, payload) = {
            let Ok(session) = session.try_borrow() else {
                notifications.borrow_mut().push_front(event);
                return;
            };
            let callbacks = callbacks.borrow();
            match &event {
                PlayerEvent::TrackChanged { song_id, .. } => (
                    callbacks.on_track_change.clone(),
                    session
                        .library
                        .song(song_id)
                        .and_then(|song| serde_wasm_bindgen::to_value(song).ok())
                        .unwrap_or(JsValue::NULL),
                ),
                PlayerEvent::PlaybackFailed { message, .. } => (
                    callbacks.on_error.clone(),
                    JsValue::from_str(message),
                ),
                _ => (
                    callbacks.on_state_change.clone(),
                    serde_wasm_bindgen::to_value(session.controller.state())
                        .unwrap_or(JsValue::NULL),
                ),
            }
        };

        if let Some(callback) = callback {
            callback.call1(&JsValue::NULL, &payload).ok();
        }
    }
}
