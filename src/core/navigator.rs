//! # Library Navigator
//!
//! Three-level drill-down over the music library:
//!
//! ```text
//!            select_artist            select_album
//!   Root ──────────────────► AtArtist ─────────────► AtAlbum
//!    ▲  ◄──────────────────     ▲    ◄─────────────    │
//!    │         back             │         back         │ play_* / close
//!    │ back at Root closes      └──────────────────────┘
//!    └───────────────────────────────────────────────────┘
//! ```
//!
//! Each level has exactly one query that is allowed to run: artists at
//! Root, the artist's albums at AtArtist, the album's songs at AtAlbum, and
//! nothing while the navigator is closed. Responses are applied only if
//! their query is still the active one; anything else is a stale response
//! from a cursor the user already left.

use log::debug;
use serde_json::Value;

use crate::backend::{Album, Artist, LibraryQuery, Song};
use crate::core::normalize::decode_items;

/// Position in the artist → album → song hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Root,
    AtArtist(Artist),
    /// Keeps the artist so `back` returns to its album list.
    AtAlbum(Artist, Album),
}

impl Cursor {
    /// The fetch that populates the list shown at this position.
    pub fn query(&self) -> LibraryQuery {
        match self {
            Cursor::Root => LibraryQuery::Artists,
            Cursor::AtArtist(artist) => LibraryQuery::Albums {
                artist_id: artist.id.clone(),
            },
            Cursor::AtAlbum(_, album) => LibraryQuery::Songs {
                album_id: album.id.clone(),
            },
        }
    }

    pub fn artist(&self) -> Option<&Artist> {
        match self {
            Cursor::Root => None,
            Cursor::AtArtist(artist) | Cursor::AtAlbum(artist, _) => Some(artist),
        }
    }
}

/// Load state of one list.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

// Manual impl: the derive would demand `T: Default`.
impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::Idle
    }
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Listing::Loading)
    }
}

#[derive(Debug, Default)]
pub struct Navigator {
    visible: bool,
    cursor: Cursor,
    artists: Listing<Artist>,
    albums: Listing<Album>,
    songs: Listing<Song>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn artists(&self) -> &Listing<Artist> {
        &self.artists
    }

    pub fn albums(&self) -> &Listing<Album> {
        &self.albums
    }

    pub fn songs(&self) -> &Listing<Song> {
        &self.songs
    }

    /// Heading for the current list.
    pub fn title(&self) -> &str {
        match &self.cursor {
            Cursor::Root => "Artists",
            Cursor::AtArtist(artist) => &artist.name,
            Cursor::AtAlbum(_, album) => &album.name,
        }
    }

    /// The only query allowed to run right now. None while closed.
    pub fn active_query(&self) -> Option<LibraryQuery> {
        self.visible.then(|| self.cursor.query())
    }

    /// Shows the navigator at Root. Returns the query to load.
    pub fn open(&mut self) -> Option<LibraryQuery> {
        self.visible = true;
        self.cursor = Cursor::Root;
        self.active_query()
    }

    /// Hides the navigator and drops everything it was showing.
    pub fn close(&mut self) {
        self.visible = false;
        self.cursor = Cursor::Root;
        self.artists = Listing::Idle;
        self.albums = Listing::Idle;
        self.songs = Listing::Idle;
    }

    /// Moves to `artist`'s album list. Not available from the song list.
    pub fn select_artist(&mut self, artist: Artist) -> Option<LibraryQuery> {
        if !self.visible || matches!(self.cursor, Cursor::AtAlbum(..)) {
            return None;
        }
        debug!("Navigator: artist {} ({})", artist.name, artist.id);
        self.cursor = Cursor::AtArtist(artist);
        self.albums = Listing::Idle;
        self.songs = Listing::Idle;
        self.active_query()
    }

    /// Moves to `album`'s song list. `artist` must be the artist being browsed.
    pub fn select_album(&mut self, artist: Artist, album: Album) -> Option<LibraryQuery> {
        if !self.visible || self.cursor.artist().map(|a| &a.id) != Some(&artist.id) {
            return None;
        }
        debug!("Navigator: album {} ({})", album.name, album.id);
        self.cursor = Cursor::AtAlbum(artist, album);
        self.songs = Listing::Idle;
        self.active_query()
    }

    /// Unwinds one level. Returns the query of the level returned to, if any.
    pub fn back(&mut self) -> Option<LibraryQuery> {
        match std::mem::take(&mut self.cursor) {
            Cursor::AtAlbum(artist, _) => {
                self.cursor = Cursor::AtArtist(artist);
                self.songs = Listing::Idle;
            }
            Cursor::AtArtist(_) => {
                self.cursor = Cursor::Root;
                self.albums = Listing::Idle;
            }
            Cursor::Root => self.close(),
        }
        self.active_query()
    }

    /// Album playback is offered from the album list and the song list.
    pub fn can_play_album(&self) -> bool {
        self.visible && !matches!(self.cursor, Cursor::Root)
    }

    pub fn can_play_song(&self) -> bool {
        self.visible && matches!(self.cursor, Cursor::AtAlbum(..))
    }

    /// Marks the active level as loading. Ignored for inactive queries.
    pub fn mark_loading(&mut self, query: &LibraryQuery) {
        if self.active_query().as_ref() != Some(query) {
            return;
        }
        match query {
            LibraryQuery::Artists => self.artists = Listing::Loading,
            LibraryQuery::Albums { .. } => self.albums = Listing::Loading,
            LibraryQuery::Songs { .. } => self.songs = Listing::Loading,
        }
    }

    /// Applies a payload for `query`. Returns false if the response is stale.
    pub fn apply(&mut self, query: &LibraryQuery, payload: &Value) -> bool {
        if self.active_query().as_ref() != Some(query) {
            debug!("Discarding stale {} response", query.collection());
            return false;
        }
        let collection = query.collection();
        match query {
            LibraryQuery::Artists => {
                self.artists = Listing::Ready(decode_items(payload, collection));
            }
            LibraryQuery::Albums { .. } => {
                self.albums = Listing::Ready(decode_items(payload, collection));
            }
            LibraryQuery::Songs { .. } => {
                self.songs = Listing::Ready(decode_items(payload, collection));
            }
        }
        true
    }

    /// Records a failed fetch. Keeps previously shown items if there are any.
    pub fn fail(&mut self, query: &LibraryQuery, message: &str) -> bool {
        if self.active_query().as_ref() != Some(query) {
            debug!("Discarding stale {} failure", query.collection());
            return false;
        }
        match query {
            LibraryQuery::Artists => fail_listing(&mut self.artists, message),
            LibraryQuery::Albums { .. } => fail_listing(&mut self.albums, message),
            LibraryQuery::Songs { .. } => fail_listing(&mut self.songs, message),
        }
        true
    }
}

fn fail_listing<T>(listing: &mut Listing<T>, message: &str) {
    if !matches!(listing, Listing::Ready(_)) {
        *listing = Listing::Failed(message.to_string());
    }
}
