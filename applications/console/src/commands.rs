//! Console command parsing
//!
//! One command per input line. Multi-field arguments are separated with `|`
//! so titles may contain spaces.

use cadence_core::{PlaylistId, SongId, SongUpdate};
use cadence_playback::ListContext;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  list                                  songs in the library
  playlists                             all playlists
  open <playlist>|library               set the active list
  play <song>                           select a song (current song toggles)
  toggle                                play/pause
  next | prev                           move through the active list
  seek +|-                              seek by the configured step
  seek +<secs>|-<secs>|<fraction>       relative seek or jump to a fraction
  vol <0-100>                           set the volume
  mute | repeat | shuffle               toggles
  add <file> [| title | artist | cover] import an audio file
  create <name>                         new playlist
  addto <playlist> <song>               append a song to a playlist
  edit <song> key=value [| key=value]   title, artist, cover, lyrics
  status                                what is playing
  help | quit";

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// How far to seek
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    /// Configured step forward
    Forward,
    /// Configured step backward
    Backward,
    /// Relative seconds
    By(f64),
    /// Fraction of the duration
    Fraction(f64),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Playlists,
    Open(ListContext),
    Play(SongId),
    Toggle,
    Next,
    Previous,
    Seek(SeekTarget),
    Volume(u8),
    Mute,
    Repeat,
    Shuffle,
    Add {
        file: PathBuf,
        title: String,
        artist: String,
        cover: Option<PathBuf>,
    },
    Create(String),
    AddTo {
        playlist: PlaylistId,
        song: SongId,
    },
    Edit {
        song: SongId,
        update: SongUpdate,
    },
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        let command = match name.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "playlists" => Command::Playlists,
            "open" => Command::Open(parse_context(rest)?),
            "play" => Command::Play(SongId::new(required(rest, "song id")?)),
            "toggle" | "pause" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "p" => Command::Previous,
            "seek" => Command::Seek(parse_seek(rest)?),
            "vol" | "volume" => Command::Volume(parse_volume(rest)?),
            "mute" => Command::Mute,
            "repeat" => Command::Repeat,
            "shuffle" => Command::Shuffle,
            "add" => parse_add(rest)?,
            "create" => Command::Create(required(rest, "playlist name")?.to_string()),
            "addto" => {
                let (playlist, song) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("song id"))?;
                Command::AddTo {
                    playlist: PlaylistId::new(required(playlist, "playlist id")?),
                    song: SongId::new(required(song.trim(), "song id")?),
                }
            }
            "edit" => parse_edit(rest)?,
            "status" | "s" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => return Err(CommandError::MissingArgument("command")),
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

fn required<'a>(value: &'a str, what: &'static str) -> Result<&'a str, CommandError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(value)
    }
}

fn parse_context(rest: &str) -> Result<ListContext, CommandError> {
    let target = required(rest, "playlist id or `library`")?;
    if target.eq_ignore_ascii_case("library") {
        Ok(ListContext::Library)
    } else {
        Ok(ListContext::Playlist(PlaylistId::new(target)))
    }
}

fn parse_seek(rest: &str) -> Result<SeekTarget, CommandError> {
    let value = required(rest, "seek target")?;
    let invalid = || CommandError::InvalidArgument(format!("seek target `{value}`"));

    match value {
        "+" => Ok(SeekTarget::Forward),
        "-" => Ok(SeekTarget::Backward),
        _ if value.starts_with('+') || value.starts_with('-') => {
            let secs: f64 = value.parse().map_err(|_| invalid())?;
            if secs.is_finite() {
                Ok(SeekTarget::By(secs))
            } else {
                Err(invalid())
            }
        }
        _ => {
            let fraction: f64 = value.parse().map_err(|_| invalid())?;
            if (0.0..=1.0).contains(&fraction) {
                Ok(SeekTarget::Fraction(fraction))
            } else {
                Err(invalid())
            }
        }
    }
}

fn parse_volume(rest: &str) -> Result<u8, CommandError> {
    let value = required(rest, "volume")?;
    value
        .trim_end_matches('%')
        .parse::<u8>()
        .ok()
        .filter(|percent| *percent <= 100)
        .ok_or_else(|| CommandError::InvalidArgument(format!("volume `{value}` (0-100)")))
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let mut fields = rest.split('|').map(str::trim);
    let file = required(fields.next().unwrap_or_default(), "file")?;
    let title = fields.next().unwrap_or_default().to_string();
    let artist = fields.next().unwrap_or_default().to_string();
    let cover = fields
        .next()
        .filter(|cover| !cover.is_empty())
        .map(PathBuf::from);

    Ok(Command::Add {
        file: PathBuf::from(file),
        title,
        artist,
        cover,
    })
}

fn parse_edit(rest: &str) -> Result<Command, CommandError> {
    let rest = required(rest, "song id")?;
    let (song, fields) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::MissingArgument("field to edit"))?;

    let mut update = SongUpdate::default();
    for field in fields.split('|').map(str::trim).filter(|f| !f.is_empty()) {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidArgument(format!("`{field}`, expected key=value")))?;
        let value = value.trim().to_string();

        match key.trim().to_ascii_lowercase().as_str() {
            "title" => update.title = Some(value),
            "artist" => update.artist = Some(value),
            "cover" => update.cover_url = Some(value),
            "lyrics" => update.lyrics = Some((!value.is_empty()).then_some(value)),
            other => {
                return Err(CommandError::InvalidArgument(format!("unknown field `{other}`")));
            }
        }
    }

    if update.is_empty() {
        return Err(CommandError::MissingArgument("field to edit"));
    }

    Ok(Command::Edit {
        song: SongId::new(song),
        update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CommandError> {
        line.parse()
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("list").unwrap(), Command::List);
        assert_eq!(parse("  NEXT ").unwrap(), Command::Next);
        assert_eq!(parse("prev").unwrap(), Command::Previous);
        assert_eq!(parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn open_context() {
        assert_eq!(parse("open library").unwrap(), Command::Open(ListContext::Library));
        assert_eq!(
            parse("open playlist1").unwrap(),
            Command::Open(ListContext::Playlist(PlaylistId::new("playlist1")))
        );
        assert_eq!(
            parse("open").unwrap_err(),
            CommandError::MissingArgument("playlist id or `library`")
        );
    }

    #[test]
    fn seek_targets() {
        assert_eq!(parse("seek +").unwrap(), Command::Seek(SeekTarget::Forward));
        assert_eq!(parse("seek -").unwrap(), Command::Seek(SeekTarget::Backward));
        assert_eq!(parse("seek +5").unwrap(), Command::Seek(SeekTarget::By(5.0)));
        assert_eq!(parse("seek -5").unwrap(), Command::Seek(SeekTarget::By(-5.0)));
        assert_eq!(parse("seek 0.5").unwrap(), Command::Seek(SeekTarget::Fraction(0.5)));
        assert!(parse("seek 2").is_err());
        assert!(parse("seek soon").is_err());
    }

    #[test]
    fn volume_range() {
        assert_eq!(parse("vol 40").unwrap(), Command::Volume(40));
        assert_eq!(parse("vol 100%").unwrap(), Command::Volume(100));
        assert!(parse("vol 101").is_err());
        assert!(parse("vol -1").is_err());
    }

    #[test]
    fn add_with_optional_fields() {
        assert_eq!(
            parse("add song.mp3").unwrap(),
            Command::Add {
                file: PathBuf::from("song.mp3"),
                title: String::new(),
                artist: String::new(),
                cover: None,
            }
        );
        assert_eq!(
            parse("add Band - Tune.mp3 | My Tune | Band | art.png").unwrap(),
            Command::Add {
                file: PathBuf::from("Band - Tune.mp3"),
                title: "My Tune".to_string(),
                artist: "Band".to_string(),
                cover: Some(PathBuf::from("art.png")),
            }
        );
    }

    #[test]
    fn addto_needs_both_ids() {
        assert_eq!(
            parse("addto playlist1 song3").unwrap(),
            Command::AddTo {
                playlist: PlaylistId::new("playlist1"),
                song: SongId::new("song3"),
            }
        );
        assert!(parse("addto playlist1").is_err());
    }

    #[test]
    fn edit_fields() {
        let Command::Edit { song, update } =
            parse("edit song2 title=Jazz at Midnight | lyrics=").unwrap()
        else {
            panic!("expected edit");
        };
        assert_eq!(song, SongId::new("song2"));
        assert_eq!(update.title.as_deref(), Some("Jazz at Midnight"));
        assert_eq!(update.lyrics, Some(None));

        assert!(parse("edit song2").is_err());
        assert!(parse("edit song2 tempo=120").is_err());
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("dance").unwrap_err(),
            CommandError::Unknown("dance".to_string())
        );
    }
}
