//! Library store integration tests

use cadence_core::{CadenceError, NewSong, PlaylistId, SongId};
use cadence_library::Library;
use proptest::prelude::*;

#[test]
fn defaults_match_demo_session() {
    let library = Library::with_defaults();

    assert_eq!(library.len(), 6);
    assert_eq!(library.playlists().len(), 2);

    let chill = library.playlist(&PlaylistId::new("playlist1")).unwrap();
    assert_eq!(chill.name, "Chill Vibes");
    let titles: Vec<_> = library
        .playlist_songs(&chill.id)
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, ["Synthwave Memories", "Summer Breeze", "Ambient Dreams"]);
}

#[test]
fn created_playlist_starts_empty_and_accepts_songs() {
    let mut library = Library::with_defaults();
    let id = library.create_playlist("Late Night").unwrap();

    library.add_to_playlist(&id, &SongId::new("song2")).unwrap();
    library.add_to_playlist(&id, &SongId::new("song2")).unwrap();

    assert_eq!(library.playlist(&id).unwrap().songs.len(), 2);
}

#[test]
fn snapshot_json_seeds_a_library() {
    let json = r#"{
        "songs": [
            {"id": "a", "title": "Alpha", "artist": "X", "cover_url": "",
             "audio_url": "/a.mp3", "duration_secs": 120.0}
        ],
        "playlists": [{"id": "p", "name": "Only", "songs": ["a", "missing"]}]
    }"#;

    let library = Library::from_json(json).unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library.playlist_songs(&PlaylistId::new("p")).len(), 1);
}

#[test]
fn malformed_snapshot_is_a_serialization_error() {
    let err = Library::from_json("{\"songs\": 3}").unwrap_err();
    assert!(matches!(err, CadenceError::Serialization(_)));
}

proptest! {
    /// Property: blank names never create playlists, anything else is trimmed
    #[test]
    fn playlist_names_are_trimmed_or_rejected(name in "[ \\t]{0,4}[A-Za-z ]{0,12}[ \\t]{0,4}") {
        let mut library = Library::new();
        match library.create_playlist(&name) {
            Ok(id) => {
                let stored = &library.playlist(&id).unwrap().name;
                prop_assert_eq!(stored.as_str(), name.trim());
                prop_assert!(!stored.is_empty());
            }
            Err(_) => {
                prop_assert!(name.trim().is_empty());
                prop_assert!(library.playlists().is_empty());
            }
        }
    }

    /// Property: generated ids are unique across many inserts
    #[test]
    fn generated_song_ids_are_unique(count in 1usize..40) {
        let mut library = Library::new();
        for i in 0..count {
            library
                .add_song(NewSong::new(format!("Song {i}"), "Artist", "/s.mp3"))
                .unwrap();
        }

        let mut ids: Vec<_> = library.songs().iter().map(|s| s.id.clone()).collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }
}
