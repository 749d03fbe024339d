//! Built-in demo library

use cadence_core::{Playlist, PlaylistId, Song, SongId};
use chrono::Utc;

/// (id, title, artist, cover, audio, duration)
const DEMO_SONGS: [(&str, &str, &str, &str, &str, f64); 6] = [
    (
        "song1",
        "Synthwave Memories",
        "Neon Dreams",
        "https://images.unsplash.com/photo-1614149162883-504ce4d13909?w=500&q=80",
        "/music/synthwave.mp3",
        247.0,
    ),
    (
        "song2",
        "Midnight Jazz",
        "The Blue Notes",
        "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?w=500&q=80",
        "/music/jazz.mp3",
        184.0,
    ),
    (
        "song3",
        "Summer Breeze",
        "Coastal Waves",
        "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=500&q=80",
        "/music/summer.mp3",
        215.0,
    ),
    (
        "song4",
        "Chill Lo-Fi",
        "Beatmaker",
        "https://images.unsplash.com/photo-1519681393784-d120267933ba?w=500&q=80",
        "/music/lofi.mp3",
        203.0,
    ),
    (
        "song5",
        "Ambient Dreams",
        "Soundscapes",
        "https://images.unsplash.com/photo-1500462918059-b1a0cb512f1d?w=500&q=80",
        "/music/ambient.mp3",
        276.0,
    ),
    (
        "song6",
        "Electric Groove",
        "Digital Beats",
        "https://images.unsplash.com/photo-1550684376-efcbd6e3f031?w=500&q=80",
        "/music/electric.mp3",
        192.0,
    ),
];

/// Demo songs shipped with a fresh session
pub fn default_songs() -> Vec<Song> {
    DEMO_SONGS
        .iter()
        .map(|&(id, title, artist, cover_url, audio_url, duration_secs)| Song {
            id: SongId::new(id),
            title: title.to_string(),
            artist: artist.to_string(),
            cover_url: cover_url.to_string(),
            audio_url: audio_url.to_string(),
            duration_secs,
            lyrics: None,
            added_at: Utc::now(),
        })
        .collect()
}

/// Demo playlists referencing [`default_songs`]
pub fn default_playlists() -> Vec<Playlist> {
    let playlist = |id: &str, name: &str, songs: &[&str]| {
        let mut playlist = Playlist::with_id(PlaylistId::new(id), name);
        playlist.songs = songs.iter().map(|&s| SongId::new(s)).collect();
        playlist
    };

    vec![
        playlist("playlist1", "Chill Vibes", &["song1", "song3", "song5"]),
        playlist("playlist2", "Focus & Study", &["song2", "song4"]),
    ]
}
