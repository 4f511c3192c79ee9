//! Domain types shared between the backend client and the core.
//!
//! The media server is loose about its payloads: ids and years show up as
//! strings or numbers, status strings drift, fields go missing. Decoding here
//! is lenient on purpose so a sloppy payload never takes the view down.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Endpoints
// ============================================================================

pub const CURRENT_TRACK_PATH: &str = "/mediaplayer/current_track";
pub const ARTISTS_PATH: &str = "/subsonic/artists";

/// Volume shown when the backend does not report one.
pub const DEFAULT_VOLUME: u8 = 50;

// ============================================================================
// Playback State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
    #[default]
    Unknown,
}

impl PlaybackStatus {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "playing" | "play" => PlaybackStatus::Playing,
            "paused" | "pause" => PlaybackStatus::Paused,
            "stopped" | "stop" => PlaybackStatus::Stopped,
            _ => PlaybackStatus::Unknown,
        }
    }
}

/// Snapshot of what the player is doing. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackState {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub status: PlaybackStatus,
    pub volume: Option<u8>,
}

impl PlaybackState {
    /// Decodes a `{current_track: {...}}` poll response.
    ///
    /// A missing or non-object `current_track` yields an empty state.
    pub fn from_response(payload: &Value) -> Self {
        payload
            .get("current_track")
            .filter(|track| track.is_object())
            .map(Self::from_track)
            .unwrap_or_default()
    }

    fn from_track(track: &Value) -> Self {
        let volume = track.get("volume").and_then(|v| {
            v.as_u64()
                .map(|n| n.min(100) as u8)
                .or_else(|| v.as_f64().map(|f| f.clamp(0.0, 100.0).round() as u8))
        });

        Self {
            title: text_field(track, "title"),
            artist: text_field(track, "artist"),
            album: text_field(track, "album"),
            year: text_field(track, "year"),
            status: track
                .get("status")
                .and_then(Value::as_str)
                .map(PlaybackStatus::parse)
                .unwrap_or_default(),
            volume,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("No track")
    }

    /// The toggle shows "pause" while playing and "play" otherwise.
    pub fn shows_pause(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn volume_level(&self) -> u8 {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }
}

/// Reads a string-ish field; numbers are stringified, empty/other shapes are None.
fn text_field(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// Library Items
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Artist {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Album {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub year: Option<String>,
}

impl Album {
    /// `"OK Computer (1997)"`, or just the name when the year is unknown.
    pub fn label(&self) -> String {
        match self.year.as_deref() {
            Some(year) if !year.is_empty() => format!("{} ({})", self.name, year),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Song {
    #[serde(deserialize_with = "scalar_string")]
    pub id: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,
    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub artist: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
        }
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

// ============================================================================
// Queries and Commands
// ============================================================================

/// Characters that would end or split a path segment, plus `%` itself.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Encodes an id so it lands in the URL as exactly one path segment.
fn segment(id: &str) -> String {
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// A library fetch. Doubles as the query cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LibraryQuery {
    Artists,
    Albums { artist_id: String },
    Songs { album_id: String },
}

impl LibraryQuery {
    pub fn path(&self) -> String {
        match self {
            LibraryQuery::Artists => ARTISTS_PATH.to_string(),
            LibraryQuery::Albums { artist_id } => {
                format!("/subsonic/artist/{}", segment(artist_id))
            }
            LibraryQuery::Songs { album_id } => format!("/subsonic/album/{}", segment(album_id)),
        }
    }

    /// Field name the payload is expected to carry its list under.
    pub fn collection(&self) -> &'static str {
        match self {
            LibraryQuery::Artists => "artists",
            LibraryQuery::Albums { .. } => "albums",
            LibraryQuery::Songs { .. } => "songs",
        }
    }
}

/// The group of buttons a command belongs to. A control accepts one
/// command at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Transport,
    Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    PlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    PlayAlbum(String),
    PlaySong(String),
}

impl Command {
    pub fn path(&self) -> String {
        match self {
            Command::PlayPause => "/mediaplayer/play_pause".to_string(),
            Command::NextTrack => "/mediaplayer/next_track".to_string(),
            Command::PreviousTrack => "/mediaplayer/previous_track".to_string(),
            Command::VolumeUp => "/mediaplayer/volume_up".to_string(),
            Command::VolumeDown => "/mediaplayer/volume_down".to_string(),
            Command::PlayAlbum(id) => {
                format!("/mediaplayer/play_album_from_albumid/{}", segment(id))
            }
            Command::PlaySong(id) => format!("/mediaplayer/play_song/{}", segment(id)),
        }
    }

    pub fn control(&self) -> Control {
        match self {
            Command::PlayAlbum(_) | Command::PlaySong(_) => Control::Library,
            _ => Control::Transport,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::PlayPause => "play/pause",
            Command::NextTrack => "next track",
            Command::PreviousTrack => "previous track",
            Command::VolumeUp => "volume up",
            Command::VolumeDown => "volume down",
            Command::PlayAlbum(_) => "play album",
            Command::PlaySong(_) => "play song",
        }
    }
}
