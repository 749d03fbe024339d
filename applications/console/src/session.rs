//! Console session
//!
//! Owns the library, the active list and the playback controller driving a
//! simulated engine. Commands and clock ticks are applied one at a time;
//! engine events queued by either are drained before control returns.

use crate::commands::{Command, SeekTarget, HELP};
use crate::config::{ConsoleConfig, LibrarySettings};
use anyhow::Context;
use cadence_core::time::format_time;
use cadence_core::{PlaylistId, Song, SongId};
use cadence_importer::{
    AudioFile, CoverImage, FilenameExtractor, ImportForm, MetadataExtractor, SongImporter,
};
use cadence_library::Library;
use cadence_playback::{
    ListContext, MemoryEngine, PlayPolicy, PlaybackController, PlayerEvent, PlayerStatus,
};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// Reason given for plays refused while autoplay is disabled
pub const AUTOPLAY_BLOCKED: &str = "play() blocked by autoplay policy";

/// Build the starting library
///
/// An explicit `override_path` wins over the configured seed file. Without
/// either, the demo content is used unless disabled.
pub fn load_library(settings: &LibrarySettings, override_path: Option<&Path>) -> anyhow::Result<Library> {
    if let Some(path) = override_path.or(settings.seed_file.as_deref()) {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read library snapshot {}", path.display()))?;
        let library = Library::from_json(&json)
            .with_context(|| format!("Invalid library snapshot {}", path.display()))?;
        info!(path = %path.display(), songs = library.len(), "Library loaded from snapshot");
        return Ok(library);
    }

    if settings.seed_defaults {
        Ok(Library::with_defaults())
    } else {
        Ok(Library::new())
    }
}

/// Interactive player session
pub struct Session {
    library: Library,
    context: ListContext,
    controller: PlaybackController<MemoryEngine>,
    probe: MemoryEngine,
    extractor: Box<dyn MetadataExtractor>,
    importer: SongImporter,
    autoplay: bool,
    events: Rc<RefCell<Vec<PlayerEvent>>>,
}

impl Session {
    pub fn new(library: Library, config: &ConsoleConfig) -> Self {
        let policy = if config.engine.autoplay {
            PlayPolicy::AutoResolve
        } else {
            PlayPolicy::Manual
        };
        let probe = MemoryEngine::new().with_policy(policy);
        for song in library.songs() {
            register_duration(&probe, song);
        }

        let mut controller = PlaybackController::new(probe.clone(), config.playback.clone());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        controller.subscribe(move |event: &PlayerEvent| sink.borrow_mut().push(event.clone()));

        Self {
            library,
            context: ListContext::Library,
            controller,
            probe,
            extractor: Box::new(FilenameExtractor::new()),
            importer: SongImporter::new(),
            autoplay: config.engine.autoplay,
            events,
        }
    }

    /// Replace the import pipeline
    pub fn with_importer(
        mut self,
        extractor: impl MetadataExtractor + 'static,
        importer: SongImporter,
    ) -> Self {
        self.extractor = Box::new(extractor);
        self.importer = importer;
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn context(&self) -> &ListContext {
        &self.context
    }

    pub fn controller(&self) -> &PlaybackController<MemoryEngine> {
        &self.controller
    }

    /// Run one command, returning the lines to show
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<Vec<String>> {
        let mut output = self.dispatch(command).await?;
        self.drain()?;
        output.extend(self.take_notifications());
        Ok(output)
    }

    /// Advance the simulated clock
    pub fn tick(&mut self, elapsed: Duration) -> anyhow::Result<Vec<String>> {
        self.probe.advance(elapsed.as_secs_f64());
        self.drain()?;
        Ok(self.take_notifications())
    }

    /// Stop playback and release the engine
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    async fn dispatch(&mut self, command: Command) -> anyhow::Result<Vec<String>> {
        let mut output = Vec::new();

        match command {
            Command::List => {
                output.extend(self.library.songs().iter().map(|song| self.song_line(song)));
                if output.is_empty() {
                    output.push("library is empty, add songs with `add <file>`".to_string());
                }
            }
            Command::Playlists => {
                for playlist in self.library.playlists() {
                    output.push(format!(
                        "{:<12} {} ({} songs)",
                        playlist.id.as_str(),
                        playlist.name,
                        playlist.len()
                    ));
                }
                if output.is_empty() {
                    output.push("no playlists, create one with `create <name>`".to_string());
                }
            }
            Command::Open(context) => {
                if let ListContext::Playlist(id) = &context {
                    self.require_playlist(id)?;
                }
                self.context = context;
                output.extend(self.context_lines());
            }
            Command::Play(song_id) => self.controller.select_song(&self.library, &song_id)?,
            Command::Toggle => self.controller.toggle_play_pause(),
            Command::Next => self.controller.next(&self.library, &self.context)?,
            Command::Previous => self.controller.previous(&self.library, &self.context)?,
            Command::Seek(target) => {
                match target {
                    SeekTarget::Forward => self.controller.seek_forward(),
                    SeekTarget::Backward => self.controller.seek_backward(),
                    SeekTarget::By(secs) => self.controller.seek_by(secs),
                    SeekTarget::Fraction(fraction) => self.controller.seek_to_fraction(fraction),
                }
                // Apply the engine's position report before showing status
                self.drain()?;
                output.push(self.status_line());
            }
            Command::Volume(percent) => self.controller.set_volume_percent(percent),
            Command::Mute => self.controller.toggle_mute(),
            Command::Repeat => self.controller.toggle_repeat(),
            Command::Shuffle => self.controller.toggle_shuffle(),
            Command::Add {
                file,
                title,
                artist,
                cover,
            } => output.push(self.import(&file, title, artist, cover.as_deref()).await?),
            Command::Create(name) => {
                let id = self.library.create_playlist(&name)?;
                output.push(format!("created playlist {id}"));
            }
            Command::AddTo { playlist, song } => {
                self.library.add_to_playlist(&playlist, &song)?;
                output.push(format!("added {song} to {playlist}"));
            }
            Command::Edit { song, update } => {
                self.library.edit_song(&song, update)?;
                if let Some(song) = self.library.song(&song) {
                    output.push(self.song_line(song));
                }
            }
            Command::Status => output.push(self.status_line()),
            Command::Help => output.push(HELP.to_string()),
            Command::Quit => {}
        }

        Ok(output)
    }

    async fn import(
        &mut self,
        path: &Path,
        title: String,
        artist: String,
        cover: Option<&Path>,
    ) -> anyhow::Result<String> {
        let mut form = ImportForm::new();
        form.set_title(title);
        form.set_artist(artist);
        if let Some(cover) = cover {
            let bytes = tokio::fs::read(cover)
                .await
                .with_context(|| format!("Failed to read cover {}", cover.display()))?;
            form.set_cover(CoverImage::new(file_name(cover)?, String::new(), bytes));
        }

        form.load_file(self.extractor.as_ref(), read_audio_file(path).await?)
            .await;
        let request = form.submit()?;
        let id = self.importer.import_into(&mut self.library, request).await?;

        let song = self
            .library
            .song(&id)
            .context("Imported song missing from library")?;
        register_duration(&self.probe, song);
        Ok(format!("added {}", self.song_line(song)))
    }

    /// Feed queued engine events to the controller until none are left
    fn drain(&mut self) -> anyhow::Result<()> {
        loop {
            if !self.autoplay {
                for request in self.probe.pending_requests() {
                    self.probe.reject(request, AUTOPLAY_BLOCKED);
                }
            }

            let events = self.probe.take_events();
            if events.is_empty() {
                return Ok(());
            }
            for event in events {
                self.controller
                    .handle_engine_event(&self.library, &self.context, event)?;
            }
        }
    }

    fn take_notifications(&self) -> Vec<String> {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        events
            .iter()
            .filter_map(|event| self.describe(event))
            .collect()
    }

    fn describe(&self, event: &PlayerEvent) -> Option<String> {
        let line = match event {
            PlayerEvent::StateChanged { status, .. } => format!("[{}]", status_label(*status)),
            PlayerEvent::TrackChanged { song_id, .. } => {
                format!("now playing: {}", self.song_label(song_id))
            }
            PlayerEvent::VolumeChanged { volume, is_muted } => {
                if *is_muted {
                    "volume: muted".to_string()
                } else {
                    format!("volume: {:.0}%", volume * 100.0)
                }
            }
            PlayerEvent::RepeatChanged { enabled } => format!("repeat: {}", on_off(*enabled)),
            PlayerEvent::ShuffleChanged { enabled } => format!("shuffle: {}", on_off(*enabled)),
            PlayerEvent::PlaybackFailed { song_id, message } => {
                format!("playback failed for {}: {message}", self.song_label(song_id))
            }
            PlayerEvent::PositionChanged { .. } | PlayerEvent::DurationChanged { .. } => {
                return None;
            }
        };
        Some(line)
    }

    /// One-line summary of the player
    pub fn status_line(&self) -> String {
        let state = self.controller.state();
        let Some(song) = self.controller.current_song(&self.library) else {
            return "[idle] select a song with `play <song>`".to_string();
        };

        let volume = if state.is_muted {
            "muted".to_string()
        } else {
            format!("{:.0}%", state.volume * 100.0)
        };

        format!(
            "[{}] {} - {}  {} / {}  vol {}  repeat:{} shuffle:{}  list:{}",
            status_label(self.controller.status()),
            song.title,
            song.artist,
            format_time(state.current_time),
            format_time(state.duration),
            volume,
            on_off(state.is_repeat),
            on_off(state.is_shuffle),
            context_label(&self.context),
        )
    }

    fn context_lines(&self) -> Vec<String> {
        let songs: Vec<&Song> = match &self.context {
            ListContext::Library => self.library.songs().iter().collect(),
            ListContext::Playlist(id) => self.library.playlist_songs(id),
        };

        let mut lines = vec![format!("list: {}", context_label(&self.context))];
        lines.extend(songs.into_iter().map(|song| self.song_line(song)));
        lines
    }

    fn song_line(&self, song: &Song) -> String {
        let marker = if self.controller.state().current_song_id.as_ref() == Some(&song.id) {
            '*'
        } else {
            ' '
        };
        format!(
            "{marker} {:<10} {} - {} ({})",
            song.id.as_str(),
            song.title,
            song.artist,
            format_time(song.duration_secs)
        )
    }

    fn song_label(&self, id: &SongId) -> String {
        self.library
            .song(id)
            .map_or_else(|| id.to_string(), |song| format!("{} by {}", song.title, song.artist))
    }

    fn require_playlist(&self, id: &PlaylistId) -> anyhow::Result<()> {
        if self.library.playlist(id).is_none() {
            anyhow::bail!("No playlist with id {id}");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("songs", &self.library.len())
            .field("context", &self.context)
            .field("status", &self.controller.status())
            .finish_non_exhaustive()
    }
}

/// Read the picked file; a path that does not exist imports as empty content
async fn read_audio_file(path: &Path) -> anyhow::Result<AudioFile> {
    let name = file_name(path)?;
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Audio file not on disk, importing name only");
            Vec::new()
        }
        Err(error) => {
            return Err(error).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    Ok(AudioFile::new(name, bytes))
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))
}

fn register_duration(probe: &MemoryEngine, song: &Song) {
    if song.duration_secs > 0.0 {
        probe.set_duration(song.audio_url.clone(), song.duration_secs);
    }
}

fn status_label(status: PlayerStatus) -> &'static str {
    match status {
        PlayerStatus::Idle => "idle",
        PlayerStatus::Paused => "paused",
        PlayerStatus::Playing => "playing",
        PlayerStatus::Seeking => "seeking",
    }
}

fn context_label(context: &ListContext) -> String {
    match context {
        ListContext::Library => "library".to_string(),
        ListContext::Playlist(id) => id.to_string(),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
