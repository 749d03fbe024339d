//! Audio engine backed by an HTML audio element

use crate::engine::{AudioEngine, EngineEvent, LoadToken, PlayRequestId};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAudioElement};

type Listener = Closure<dyn FnMut(Event)>;

/// Media event mapped to an engine event, `None` to drop it
type EventMapper = fn(&HtmlAudioElement, LoadToken) -> Option<EngineEvent>;

/// Source handed to the element by the last `load`
#[derive(Debug, Clone, PartialEq)]
struct LoadedSource {
    token: LoadToken,

    /// `src` as resolved by the element
    src: String,
}

impl LoadedSource {
    /// Token for an event fired while the element plays `current_src`
    ///
    /// Events whose element source is not the loaded one belong to an
    /// earlier load and get no token.
    fn token_for(&self, current_src: &str) -> Option<LoadToken> {
        (self.src == current_src).then_some(self.token)
    }
}

/// [`AudioEngine`] over a detached `<audio>` element
///
/// Media events carry the token of the load whose source the element is
/// actually playing when they fire. Events raised for any other source are
/// dropped. Play promises are awaited on the local executor and reported as
/// `PlayResolved`/`PlayRejected`.
pub struct WebAudioEngine {
    element: HtmlAudioElement,
    loaded: Rc<RefCell<Option<LoadedSource>>>,
    sink: Rc<dyn Fn(EngineEvent)>,
    listeners: Vec<(&'static str, Listener)>,
}

impl WebAudioEngine {
    /// Create the element and wire its media events into `sink`
    pub fn new(sink: impl Fn(EngineEvent) + 'static) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new()?;
        element.set_preload("metadata");

        let mut engine = Self {
            element,
            loaded: Rc::new(RefCell::new(None)),
            sink: Rc::new(sink),
            listeners: Vec::new(),
        };

        engine.listen("timeupdate", |element, token| {
            Some(EngineEvent::TimeUpdate {
                token,
                position: element.current_time(),
            })
        })?;
        engine.listen("loadedmetadata", |element, token| {
            let duration = element.duration();
            duration.is_finite().then_some(EngineEvent::DurationAvailable { token, duration })
        })?;
        engine.listen("ended", |element, token| {
            element.ended().then_some(EngineEvent::Ended { token })
        })?;

        Ok(engine)
    }

    fn listen(&mut self, name: &'static str, map: EventMapper) -> Result<(), JsValue> {
        let element = self.element.clone();
        let loaded = Rc::clone(&self.loaded);
        let sink = Rc::clone(&self.sink);

        let listener = Closure::wrap(Box::new(move |_event: Event| {
            let token = loaded
                .borrow()
                .as_ref()
                .and_then(|source| source.token_for(&element.current_src()));
            let Some(token) = token else {
                tracing::trace!(event = name, "Dropping media event for a stale source");
                return;
            };
            if let Some(event) = map(&element, token) {
                sink(event);
            }
        }) as Box<dyn FnMut(Event)>);

        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((name, listener));
        Ok(())
    }

    fn reject(&self, request: PlayRequestId, error: &JsValue) {
        (self.sink)(EngineEvent::PlayRejected {
            request,
            reason: describe(error),
        });
    }
}

impl AudioEngine for WebAudioEngine {
    fn load(&mut self, token: LoadToken, source_uri: &str) {
        self.element.set_src(source_uri);
        *self.loaded.borrow_mut() = Some(LoadedSource {
            token,
            src: self.element.src(),
        });
        self.element.load();
    }

    fn play(&mut self, request: PlayRequestId) {
        let promise = match self.element.play() {
            Ok(promise) => promise,
            Err(error) => {
                self.reject(request, &error);
                return;
            }
        };

        let sink = Rc::clone(&self.sink);
        wasm_bindgen_futures::spawn_local(async move {
            let event = match JsFuture::from(promise).await {
                Ok(_) => EngineEvent::PlayResolved { request },
                Err(error) => EngineEvent::PlayRejected {
                    request,
                    reason: describe(&error),
                },
            };
            sink(event);
        });
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn position(&self) -> f64 {
        self.element.current_time()
    }

    fn set_position(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume));
    }

    fn set_loop(&mut self, looping: bool) {
        self.element.set_loop(looping);
    }

    fn stop(&mut self) {
        self.loaded.borrow_mut().take();
        let _ = self.element.pause();
        self.element.set_src("");
        let _ = self.element.remove_attribute("src");
        self.element.load();
    }
}

impl Drop for WebAudioEngine {
    fn drop(&mut self) {
        for (name, listener) in self.listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}

impl std::fmt::Debug for WebAudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAudioEngine")
            .field("src", &self.element.src())
            .field("loaded", &self.loaded.borrow())
            .finish_non_exhaustive()
    }
}

/// Human-readable reason for a rejected play promise
fn describe(error: &JsValue) -> String {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    error
        .as_string()
        .unwrap_or_else(|| "playback was rejected".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(token: LoadToken, src: &str) -> LoadedSource {
        LoadedSource {
            token,
            src: src.to_string(),
        }
    }

    #[test]
    fn events_from_the_loaded_source_are_stamped() {
        let token = LoadToken(1);
        let source = loaded(token, "https://example.com/music/a.mp3");
        assert_eq!(source.token_for("https://example.com/music/a.mp3"), Some(token));
    }

    #[test]
    fn events_from_an_earlier_source_are_dropped() {
        let source = loaded(LoadToken(2), "https://example.com/music/b.mp3");
        assert_eq!(source.token_for("https://example.com/music/a.mp3"), None);
        assert_eq!(source.token_for(""), None);
    }
}
