//! Audio engine contract
//!
//! The controller owns exactly one engine and is the only component allowed
//! to command it. Completions (media events, `play()` outcomes) are reported
//! back as [`EngineEvent`]s that the host feeds into
//! [`PlaybackController::handle_engine_event`](crate::PlaybackController::handle_engine_event).
//!
//! Every media event carries the [`LoadToken`] of the source it belongs to,
//! and every play outcome carries its [`PlayRequestId`], so the controller
//! can drop completions for superseded tracks.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

/// Identity of a loaded source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoadToken(pub u64);

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Identity of a single `play()` attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayRequestId(pub u64);

impl fmt::Display for PlayRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "play#{}", self.0)
    }
}

/// Events reported by an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Playback position moved
    TimeUpdate { token: LoadToken, position: f64 },

    /// Source metadata loaded, duration is now valid
    DurationAvailable { token: LoadToken, duration: f64 },

    /// Source played to its end
    Ended { token: LoadToken },

    /// A `play()` attempt started playback
    PlayResolved { request: PlayRequestId },

    /// A `play()` attempt failed (autoplay policy, broken source, ...)
    PlayRejected {
        request: PlayRequestId,
        reason: String,
    },
}

/// Commands the controller issues to its engine
///
/// Implementations must not block. `play` completes later through
/// [`EngineEvent::PlayResolved`] or [`EngineEvent::PlayRejected`].
pub trait AudioEngine {
    /// Point the engine at a new source
    fn load(&mut self, token: LoadToken, source_uri: &str);

    /// Start or resume playback of the current source
    fn play(&mut self, request: PlayRequestId);

    /// Pause playback (synchronous, always succeeds)
    fn pause(&mut self);

    /// Current position in seconds
    fn position(&self) -> f64;

    /// Jump to a position in seconds
    fn set_position(&mut self, seconds: f64);

    /// Set output volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32);

    /// Enable or disable native looping of the current source
    fn set_loop(&mut self, looping: bool);

    /// Pause and detach the source
    fn stop(&mut self);
}

/// A command recorded by [`MemoryEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load { token: LoadToken, source: String },
    Play(PlayRequestId),
    Pause,
    SetPosition(f64),
    SetVolume(f32),
    SetLoop(bool),
    Stop,
}

/// How [`MemoryEngine`] answers `play()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayPolicy {
    /// Queue `PlayResolved` (or `PlayRejected` for failing sources) at once
    #[default]
    AutoResolve,

    /// Leave the request pending until [`MemoryEngine::resolve`] or
    /// [`MemoryEngine::reject`] is called
    Manual,
}

/// Duration reported for sources without an explicit one
pub const DEFAULT_SOURCE_DURATION: f64 = 180.0;

#[derive(Debug, Default)]
struct MemoryState {
    commands: Vec<EngineCommand>,
    events: VecDeque<EngineEvent>,
    durations: HashMap<String, f64>,
    failing: HashSet<String>,
    policy: PlayPolicy,
    pending: Vec<PlayRequestId>,
    token: Option<LoadToken>,
    source: Option<String>,
    duration: f64,
    position: f64,
    volume: f32,
    looping: bool,
    playing: bool,
}

/// In-process engine with a simulated clock
///
/// Clones share state, so a host can keep a handle for driving the clock
/// and draining events after moving the engine into a controller.
///
/// ```rust
/// use cadence_playback::{AudioEngine, EngineEvent, LoadToken, MemoryEngine, PlayRequestId};
///
/// let probe = MemoryEngine::new().with_duration("/a.mp3", 10.0);
/// let mut engine = probe.clone();
/// engine.load(LoadToken(1), "/a.mp3");
/// engine.play(PlayRequestId(1));
/// probe.advance(2.0);
///
/// let events = probe.take_events();
/// assert!(events.contains(&EngineEvent::TimeUpdate { token: LoadToken(1), position: 2.0 }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryEngine {
    /// Create an engine that resolves plays immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `duration` seconds for `source`
    pub fn with_duration(self, source: impl Into<String>, duration: f64) -> Self {
        self.set_duration(source, duration);
        self
    }

    /// Report `duration` seconds for `source` on future loads
    pub fn set_duration(&self, source: impl Into<String>, duration: f64) {
        self.state
            .borrow_mut()
            .durations
            .insert(source.into(), duration);
    }

    /// Reject every `play()` of `source`
    pub fn with_failing_source(self, source: impl Into<String>) -> Self {
        self.state.borrow_mut().failing.insert(source.into());
        self
    }

    /// Choose how `play()` is answered
    pub fn with_policy(self, policy: PlayPolicy) -> Self {
        self.state.borrow_mut().policy = policy;
        self
    }

    /// Drain queued events in arrival order
    pub fn take_events(&self) -> Vec<EngineEvent> {
        self.state.borrow_mut().events.drain(..).collect()
    }

    /// Commands received so far
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.state.borrow().commands.clone()
    }

    /// Number of `load` commands received
    pub fn load_count(&self) -> usize {
        self.state
            .borrow()
            .commands
            .iter()
            .filter(|command| matches!(command, EngineCommand::Load { .. }))
            .count()
    }

    /// Play requests still waiting for an outcome
    pub fn pending_requests(&self) -> Vec<PlayRequestId> {
        self.state.borrow().pending.clone()
    }

    /// Resolve a pending play request
    pub fn resolve(&self, request: PlayRequestId) {
        let mut state = self.state.borrow_mut();
        state.pending.retain(|pending| *pending != request);
        state.playing = true;
        state.events.push_back(EngineEvent::PlayResolved { request });
    }

    /// Reject a pending play request
    pub fn reject(&self, request: PlayRequestId, reason: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        state.pending.retain(|pending| *pending != request);
        state.playing = false;
        state.events.push_back(EngineEvent::PlayRejected {
            request,
            reason: reason.into(),
        });
    }

    /// Advance the clock by `seconds` of playback
    ///
    /// Does nothing unless a source is playing. Reaching the end queues
    /// `Ended`, or wraps to zero when looping.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        let Some(token) = state.token else {
            return;
        };
        if !state.playing || seconds <= 0.0 {
            return;
        }

        let end = state.duration;
        let mut position = state.position + seconds;
        if end > 0.0 && position >= end {
            if state.looping {
                position %= end;
            } else {
                state.position = end;
                state.playing = false;
                state.events.push_back(EngineEvent::TimeUpdate {
                    token,
                    position: end,
                });
                state.events.push_back(EngineEvent::Ended { token });
                return;
            }
        }
        state.position = position;
        state
            .events
            .push_back(EngineEvent::TimeUpdate { token, position });
    }

    /// Currently loaded source
    pub fn source(&self) -> Option<String> {
        self.state.borrow().source.clone()
    }

    /// Whether the engine is producing sound
    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    /// Volume last set
    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    /// Loop flag last set
    pub fn is_looping(&self) -> bool {
        self.state.borrow().looping
    }
}

impl AudioEngine for MemoryEngine {
    fn load(&mut self, token: LoadToken, source_uri: &str) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::Load {
            token,
            source: source_uri.to_string(),
        });

        let duration = state
            .durations
            .get(source_uri)
            .copied()
            .unwrap_or(DEFAULT_SOURCE_DURATION);
        state.token = Some(token);
        state.source = Some(source_uri.to_string());
        state.duration = duration;
        state.position = 0.0;
        state.playing = false;
        state
            .events
            .push_back(EngineEvent::DurationAvailable { token, duration });
    }

    fn play(&mut self, request: PlayRequestId) {
        let policy = {
            let mut state = self.state.borrow_mut();
            state.commands.push(EngineCommand::Play(request));
            state.policy
        };

        match policy {
            PlayPolicy::Manual => self.state.borrow_mut().pending.push(request),
            PlayPolicy::AutoResolve => {
                let failing = {
                    let state = self.state.borrow();
                    state
                        .source
                        .as_ref()
                        .map_or(true, |source| state.failing.contains(source))
                };
                if failing {
                    self.reject(request, "source cannot be played");
                } else {
                    self.resolve(request);
                }
            }
        }
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::Pause);
        state.playing = false;
    }

    fn position(&self) -> f64 {
        self.state.borrow().position
    }

    fn set_position(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::SetPosition(seconds));
        state.position = seconds;
        if let Some(token) = state.token {
            state.events.push_back(EngineEvent::TimeUpdate {
                token,
                position: seconds,
            });
        }
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::SetVolume(volume));
        state.volume = volume;
    }

    fn set_loop(&mut self, looping: bool) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::SetLoop(looping));
        state.looping = looping;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.commands.push(EngineCommand::Stop);
        state.playing = false;
        state.token = None;
        state.source = None;
        state.position = 0.0;
        state.duration = 0.0;
        state.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reports_duration() {
        let mut engine = MemoryEngine::new().with_duration("/a.mp3", 42.0);
        engine.load(LoadToken(3), "/a.mp3");

        assert_eq!(
            engine.take_events(),
            vec![EngineEvent::DurationAvailable {
                token: LoadToken(3),
                duration: 42.0
            }]
        );
        assert_eq!(engine.source().as_deref(), Some("/a.mp3"));
    }

    #[test]
    fn unknown_source_uses_default_duration() {
        let mut engine = MemoryEngine::new();
        engine.load(LoadToken(1), "/x.mp3");
        assert!(matches!(
            engine.take_events()[0],
            EngineEvent::DurationAvailable { duration, .. } if duration == DEFAULT_SOURCE_DURATION
        ));
    }

    #[test]
    fn auto_policy_resolves_and_rejects() {
        let mut engine = MemoryEngine::new().with_failing_source("/bad.mp3");
        engine.load(LoadToken(1), "/good.mp3");
        engine.play(PlayRequestId(1));
        engine.load(LoadToken(2), "/bad.mp3");
        engine.play(PlayRequestId(2));

        let events = engine.take_events();
        assert!(events.contains(&EngineEvent::PlayResolved {
            request: PlayRequestId(1)
        }));
        assert!(events.iter().any(|event| matches!(
            event,
            EngineEvent::PlayRejected { request, .. } if *request == PlayRequestId(2)
        )));
        assert!(!engine.is_playing());
    }

    #[test]
    fn manual_policy_holds_requests() {
        let mut engine = MemoryEngine::new().with_policy(PlayPolicy::Manual);
        engine.load(LoadToken(1), "/a.mp3");
        engine.take_events();
        engine.play(PlayRequestId(1));

        assert!(engine.take_events().is_empty());
        assert_eq!(engine.pending_requests(), vec![PlayRequestId(1)]);

        engine.resolve(PlayRequestId(1));
        assert!(engine.pending_requests().is_empty());
        assert!(engine.is_playing());
    }

    #[test]
    fn advance_reaches_end() {
        let mut engine = MemoryEngine::new().with_duration("/a.mp3", 3.0);
        engine.load(LoadToken(1), "/a.mp3");
        engine.play(PlayRequestId(1));
        engine.take_events();

        engine.advance(2.0);
        engine.advance(2.0);

        let events = engine.take_events();
        assert_eq!(
            events.last(),
            Some(&EngineEvent::Ended {
                token: LoadToken(1)
            })
        );
        assert!(!engine.is_playing());
    }

    #[test]
    fn advance_wraps_when_looping() {
        let mut engine = MemoryEngine::new().with_duration("/a.mp3", 3.0);
        engine.set_loop(true);
        engine.load(LoadToken(1), "/a.mp3");
        engine.play(PlayRequestId(1));
        engine.take_events();

        engine.advance(4.0);

        let events = engine.take_events();
        assert_eq!(
            events,
            vec![EngineEvent::TimeUpdate {
                token: LoadToken(1),
                position: 1.0
            }]
        );
        assert!(engine.is_playing());
    }

    #[test]
    fn paused_engine_does_not_advance() {
        let mut engine = MemoryEngine::new();
        engine.load(LoadToken(1), "/a.mp3");
        engine.play(PlayRequestId(1));
        engine.pause();
        engine.take_events();

        engine.advance(1.0);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn stop_detaches_source() {
        let mut engine = MemoryEngine::new();
        engine.load(LoadToken(1), "/a.mp3");
        engine.play(PlayRequestId(1));
        engine.stop();

        assert!(engine.source().is_none());
        assert!(!engine.is_playing());
        assert_eq!(engine.commands().last(), Some(&EngineCommand::Stop));
    }

    #[test]
    fn set_position_reports_time() {
        let mut engine = MemoryEngine::new();
        engine.set_position(4.0);
        assert!(engine.take_events().is_empty());

        engine.load(LoadToken(2), "/a.mp3");
        engine.take_events();
        engine.set_position(12.5);
        assert_eq!(
            engine.take_events(),
            vec![EngineEvent::TimeUpdate {
                token: LoadToken(2),
                position: 12.5
            }]
        );
    }

    #[test]
    fn clones_share_state() {
        let probe = MemoryEngine::new();
        let mut engine = probe.clone();
        engine.set_volume(0.3);
        assert_eq!(probe.volume(), 0.3);
    }
}
