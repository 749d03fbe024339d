#![allow(dead_code)]

use cadence_core::{NewSong, SongId};
use cadence_library::Library;
use cadence_playback::{
    ListContext, MemoryEngine, PlaybackConfig, PlaybackController, PlayerEvent,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Library with songs `s0..s{n}` at `/music/s{i}.mp3`
pub fn library_of(count: usize) -> (Library, Vec<SongId>) {
    let mut library = Library::new();
    let ids = (0..count)
        .map(|i| {
            library
                .add_song(
                    NewSong::new(format!("Song {}", i), "Artist", format!("/music/s{}.mp3", i))
                        .with_id(format!("s{}", i).as_str()),
                )
                .unwrap()
        })
        .collect();
    (library, ids)
}

/// Controller, engine probe and recorded notifications
pub struct Harness {
    pub library: Library,
    pub context: ListContext,
    pub probe: MemoryEngine,
    pub controller: PlaybackController<MemoryEngine>,
    pub events: Rc<RefCell<Vec<PlayerEvent>>>,
}

impl Harness {
    pub fn new(library: Library) -> Self {
        Self::with_engine(library, MemoryEngine::new(), PlaybackConfig::default())
    }

    pub fn with_engine(library: Library, probe: MemoryEngine, config: PlaybackConfig) -> Self {
        init_tracing();
        let mut controller = PlaybackController::new(probe.clone(), config);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        controller.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self {
            library,
            context: ListContext::Library,
            probe,
            controller,
            events,
        }
    }

    /// Feed queued engine events into the controller
    pub fn drain(&mut self) {
        for event in self.probe.take_events() {
            self.controller
                .handle_engine_event(&self.library, &self.context, event)
                .unwrap();
        }
    }

    pub fn select(&mut self, id: &SongId) {
        self.controller.select_song(&self.library, id).unwrap();
    }

    pub fn next(&mut self) {
        self.controller.next(&self.library, &self.context).unwrap();
    }

    pub fn previous(&mut self) {
        self.controller.previous(&self.library, &self.context).unwrap();
    }

    pub fn current(&self) -> Option<SongId> {
        self.controller.state().current_song_id.clone()
    }
}
