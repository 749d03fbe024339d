//! Console session tests
//!
//! Drive the session the way `main` does: parsed commands and clock ticks.

use cadence_console::{load_library, Command, ConsoleConfig, LibrarySettings, Session};
use cadence_core::SongId;
use cadence_importer::{FilenameExtractor, SongImporter};
use cadence_library::Library;
use cadence_playback::PlayerStatus;
use std::io::Write;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

fn session() -> Session {
    session_with(ConsoleConfig::default())
}

fn session_with(config: ConsoleConfig) -> Session {
    init_tracing();
    Session::new(Library::with_defaults(), &config).with_importer(
        FilenameExtractor::with_delay(Duration::ZERO),
        SongImporter::with_upload_delay(Duration::ZERO),
    )
}

async fn run(session: &mut Session, line: &str) -> anyhow::Result<Vec<String>> {
    let command: Command = line.parse()?;
    session.execute(command).await
}

fn current(session: &Session) -> Option<String> {
    session
        .controller()
        .state()
        .current_song_id
        .as_ref()
        .map(|id| id.as_str().to_string())
}

#[tokio::test]
async fn test_play_reports_track_and_status() {
    let mut session = session();

    let output = run(&mut session, "play song1").await.unwrap();
    assert!(output.iter().any(|line| line == "now playing: Synthwave Memories by Neon Dreams"));

    let status = run(&mut session, "status").await.unwrap();
    assert_eq!(status.len(), 1);
    assert!(status[0].starts_with("[playing] Synthwave Memories - Neon Dreams"));
    assert!(status[0].contains("0:00 / 4:07"));
}

#[tokio::test]
async fn test_playlist_navigation_wraps() {
    let mut session = session();

    run(&mut session, "open playlist1").await.unwrap();
    run(&mut session, "play song5").await.unwrap();
    run(&mut session, "next").await.unwrap();
    assert_eq!(current(&session).as_deref(), Some("song1"));

    run(&mut session, "prev").await.unwrap();
    assert_eq!(current(&session).as_deref(), Some("song5"));
}

#[tokio::test]
async fn test_unknown_playlist_keeps_context() {
    let mut session = session();

    assert!(run(&mut session, "open nowhere").await.is_err());
    assert_eq!(session.context(), &cadence_playback::ListContext::Library);
}

#[tokio::test]
async fn test_ticks_advance_to_next_song() {
    let mut session = session();
    run(&mut session, "play song6").await.unwrap();

    session.tick(Duration::from_secs(100)).unwrap();
    assert_eq!(session.controller().current_time(), 100.0);

    let output = session.tick(Duration::from_secs(100)).unwrap();
    assert_eq!(current(&session).as_deref(), Some("song1"));
    assert!(output.iter().any(|line| line.starts_with("now playing: Synthwave Memories")));
    assert!(session.controller().is_playing());
}

#[tokio::test]
async fn test_seek_fraction_updates_status() {
    let mut session = session();
    run(&mut session, "play song2").await.unwrap();

    let output = run(&mut session, "seek 0.5").await.unwrap();
    assert!(output[0].contains("1:32 / 3:04"));
    assert_eq!(session.controller().status(), PlayerStatus::Playing);
}

#[tokio::test]
async fn test_volume_and_toggles() {
    let mut session = session();

    let output = run(&mut session, "vol 40").await.unwrap();
    assert_eq!(output, vec!["volume: 40%".to_string()]);

    let output = run(&mut session, "mute").await.unwrap();
    assert_eq!(output, vec!["volume: muted".to_string()]);

    let output = run(&mut session, "mute").await.unwrap();
    assert_eq!(output, vec!["volume: 40%".to_string()]);

    assert_eq!(run(&mut session, "repeat").await.unwrap(), vec!["repeat: on".to_string()]);
    assert_eq!(run(&mut session, "shuffle").await.unwrap(), vec!["shuffle: on".to_string()]);
}

#[tokio::test]
async fn test_blocked_autoplay_reports_failure() {
    let mut config = ConsoleConfig::default();
    config.engine.autoplay = false;
    let mut session = session_with(config);

    let output = run(&mut session, "play song3").await.unwrap();

    assert!(output
        .iter()
        .any(|line| line.starts_with("playback failed for Summer Breeze by Coastal Waves")));
    assert!(!session.controller().is_playing());
    assert_eq!(current(&session).as_deref(), Some("song3"));
}

#[tokio::test]
async fn test_add_imports_and_plays() {
    let mut session = session();
    let before = session.library().len();

    let output = run(&mut session, "add Night Owls - City Lights.mp3")
        .await
        .unwrap();
    assert_eq!(session.library().len(), before + 1);
    assert!(output[0].starts_with("added"));
    assert!(output[0].contains("City Lights - Night Owls"));

    let added = session.library().songs().last().unwrap().id.clone();
    run(&mut session, &format!("play {added}")).await.unwrap();
    assert_eq!(current(&session), Some(added.as_str().to_string()));

    let expected = session.library().song(&added).unwrap().duration_secs;
    assert_eq!(session.controller().duration(), expected);
}

#[tokio::test]
async fn test_add_keeps_typed_fields() {
    let mut session = session();

    run(&mut session, "add Someone - Something.mp3 | My Title | |")
        .await
        .unwrap();

    let song = session.library().songs().last().unwrap();
    assert_eq!(song.title, "My Title");
    assert_eq!(song.artist, "Someone");
}

#[tokio::test]
async fn test_playlist_editing() {
    let mut session = session();

    let output = run(&mut session, "create Road Trip").await.unwrap();
    let id = output[0].trim_start_matches("created playlist ").to_string();

    run(&mut session, &format!("addto {id} song4")).await.unwrap();
    assert!(run(&mut session, &format!("addto {id} ghost")).await.is_err());

    let listing = run(&mut session, &format!("open {id}")).await.unwrap();
    assert_eq!(listing.len(), 2);
    assert!(listing[1].contains("Chill Lo-Fi"));
}

#[tokio::test]
async fn test_edit_song() {
    let mut session = session();

    run(&mut session, "edit song2 title=Late Night Jazz | lyrics=la la")
        .await
        .unwrap();

    let song = session.library().song(&SongId::new("song2")).unwrap();
    assert_eq!(song.title, "Late Night Jazz");
    assert_eq!(song.lyrics.as_deref(), Some("la la"));
}

#[tokio::test]
async fn test_shutdown_stops_playback() {
    let mut session = session();
    run(&mut session, "play song1").await.unwrap();

    session.shutdown();
    assert!(!session.controller().is_playing());
    assert_eq!(session.controller().status(), PlayerStatus::Idle);
}

#[test]
fn test_load_library_from_snapshot() {
    let library = Library::with_defaults();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&library).unwrap().as_bytes())
        .unwrap();

    let settings = LibrarySettings {
        seed_defaults: false,
        seed_file: None,
    };
    let loaded = load_library(&settings, Some(file.path())).unwrap();
    assert_eq!(loaded.len(), 6);

    let empty = load_library(&settings, None).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_load_library_bad_snapshot() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let settings = LibrarySettings {
        seed_defaults: true,
        seed_file: Some(file.path().to_path_buf()),
    };
    assert!(load_library(&settings, None).is_err());
}
