//! # Actions
//!
//! Everything that can happen in Jukebox becomes an `Action`.
//! User presses Space? That's `Action::SendCommand(Command::PlayPause)`.
//! A poll comes back? That's `Action::PollCompleted(result)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state, and returns an `Effect` describing the I/O to start.
//! No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: feed actions, assert on state and effects.

use std::time::Instant;

use log::{debug, info};
use serde_json::Value;

use crate::backend::{Album, Artist, BackendError, Command, LibraryQuery, PlaybackState};
use crate::core::state::App;

#[derive(Debug, Clone)]
pub enum Action {
    // Now playing
    PollCompleted(Result<PlaybackState, BackendError>),
    SendCommand(Command),
    CommandFinished {
        command: Command,
        result: Result<(), BackendError>,
    },
    DismissCommandFailure,

    // Library
    OpenLibrary,
    CloseLibrary,
    SelectArtist(Artist),
    SelectAlbum { artist: Artist, album: Album },
    Back,
    /// Refetch the list currently showing, keeping it visible meanwhile.
    ReloadLibrary,
    PlayAlbum(String),
    PlaySong(String),
    LibraryLoaded {
        query: LibraryQuery,
        result: Result<Value, BackendError>,
    },

    Quit,
}

/// I/O the event loop should start after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    Fetch(LibraryQuery),
    Dispatch(Command),
    /// Poll now-playing immediately instead of waiting for the timer.
    RefreshNowPlaying,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::PollCompleted(Ok(playback)) => {
            app.monitor.poll_succeeded(playback);
            Effect::None
        }
        Action::PollCompleted(Err(e)) => {
            app.monitor.poll_failed(&e);
            Effect::None
        }
        Action::SendCommand(command) => dispatch(app, command),
        Action::CommandFinished { command, result } => {
            if app.monitor.finish_command(&command, &result) {
                app.status_message = format!("Sent {}", command.label());
                Effect::RefreshNowPlaying
            } else {
                app.status_message = format!("Failed: {}", command.label());
                Effect::None
            }
        }
        Action::DismissCommandFailure => {
            app.monitor.dismiss_command_failure();
            Effect::None
        }

        Action::OpenLibrary => {
            let query = app.navigator.open();
            load_level(app, query)
        }
        Action::CloseLibrary => {
            app.navigator.close();
            Effect::None
        }
        Action::SelectArtist(artist) => {
            let query = app.navigator.select_artist(artist);
            load_level(app, query)
        }
        Action::SelectAlbum { artist, album } => {
            let query = app.navigator.select_album(artist, album);
            load_level(app, query)
        }
        Action::Back => {
            let query = app.navigator.back();
            load_level(app, query)
        }
        Action::ReloadLibrary => {
            let query = app.navigator.active_query();
            if let Some(query) = &query {
                app.cache.invalidate(query);
            }
            load_level(app, query)
        }
        Action::PlayAlbum(album_id) => {
            if !app.navigator.can_play_album() {
                debug!("Ignoring play album {}: no album list showing", album_id);
                return Effect::None;
            }
            play_from_library(app, Command::PlayAlbum(album_id))
        }
        Action::PlaySong(song_id) => {
            if !app.navigator.can_play_song() {
                debug!("Ignoring play song {}: no song list showing", song_id);
                return Effect::None;
            }
            play_from_library(app, Command::PlaySong(song_id))
        }
        Action::LibraryLoaded { query, result } => {
            match result {
                Ok(payload) => {
                    // Cached even when the view has moved on
                    let applied = app.navigator.apply(&query, &payload);
                    app.cache.insert(query, payload);
                    if applied {
                        app.status_message.clear();
                    }
                }
                Err(e) => {
                    if app.navigator.fail(&query, &e.to_string()) {
                        app.status_message = format!("Could not load {}", query.collection());
                    }
                }
            }
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

/// Starts a command unless its control is still busy with the previous one.
fn dispatch(app: &mut App, command: Command) -> Effect {
    if !app.monitor.begin_command(&command) {
        info!("Rejected {}: previous command still pending", command.label());
        app.status_message = "Busy, wait for the last command".to_string();
        return Effect::None;
    }
    Effect::Dispatch(command)
}

fn play_from_library(app: &mut App, command: Command) -> Effect {
    let effect = dispatch(app, command);
    if matches!(effect, Effect::Dispatch(_)) {
        app.navigator.close();
    }
    effect
}

/// Fills the level the navigator just entered, from cache or by fetching.
fn load_level(app: &mut App, query: Option<LibraryQuery>) -> Effect {
    let Some(query) = query else {
        return Effect::None;
    };

    if let Some(cached) = app.cache.get(&query) {
        app.navigator.apply(&query, cached);
        if app.cache.is_fresh(&query, Instant::now()) {
            debug!("Serving {} from cache", query.path());
            return Effect::None;
        }
        debug!("Cached {} is stale, refetching", query.path());
    } else {
        app.navigator.mark_loading(&query);
    }
    Effect::Fetch(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Control, PlaybackStatus};
    use crate::core::monitor::MonitorView;
    use crate::core::navigator::{Cursor, Listing};
    use crate::test_support::{test_app, test_app_with_ttl};
    use serde_json::json;
    use std::time::Duration;

    fn radiohead() -> Artist {
        Artist {
            id: "1".into(),
            name: "Radiohead".into(),
        }
    }

    fn ok_computer() -> Album {
        Album {
            id: "10".into(),
            name: "OK Computer".into(),
            year: Some("1997".into()),
        }
    }

    fn song_a() -> PlaybackState {
        PlaybackState {
            title: Some("Song A".into()),
            artist: Some("Artist X".into()),
            status: PlaybackStatus::Playing,
            volume: Some(40),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Now playing
    // ------------------------------------------------------------------

    #[test]
    fn test_poll_result_replaces_state() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::PollCompleted(Ok(song_a()))), Effect::None);
        match app.monitor.view() {
            MonitorView::Showing { playback, .. } => {
                assert_eq!(playback.display_title(), "Song A");
                assert_eq!(playback.artist.as_deref(), Some("Artist X"));
                assert!(playback.shows_pause());
                assert_eq!(playback.volume_level(), 40);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_poll_failure_keeps_last_good() {
        let mut app = test_app();
        update(&mut app, Action::PollCompleted(Ok(song_a())));
        update(
            &mut app,
            Action::PollCompleted(Err(BackendError::Network("timeout".into()))),
        );
        assert_eq!(app.monitor.playback(), Some(&song_a()));
    }

    #[test]
    fn test_command_dispatch_and_refresh() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::SendCommand(Command::NextTrack)),
            Effect::Dispatch(Command::NextTrack)
        );
        assert!(app.monitor.is_busy(Control::Transport));

        let effect = update(
            &mut app,
            Action::CommandFinished {
                command: Command::NextTrack,
                result: Ok(()),
            },
        );
        assert_eq!(effect, Effect::RefreshNowPlaying);
        assert!(app.monitor.is_stale());
        assert!(!app.monitor.is_busy(Control::Transport));
    }

    #[test]
    fn test_second_transport_command_is_rejected_while_pending() {
        let mut app = test_app();
        update(&mut app, Action::SendCommand(Command::PlayPause));
        assert_eq!(
            update(&mut app, Action::SendCommand(Command::NextTrack)),
            Effect::None
        );
        assert_eq!(
            update(&mut app, Action::SendCommand(Command::VolumeUp)),
            Effect::None
        );
        assert!(app.status_message.contains("Busy"));
    }

    #[test]
    fn test_failed_volume_up_keeps_state_and_unlocks() {
        let mut app = test_app();
        update(&mut app, Action::PollCompleted(Ok(song_a())));
        update(&mut app, Action::SendCommand(Command::VolumeUp));

        let effect = update(
            &mut app,
            Action::CommandFinished {
                command: Command::VolumeUp,
                result: Err(BackendError::Server {
                    status: 503,
                    message: "unavailable".into(),
                }),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(app.monitor.playback(), Some(&song_a()));
        assert!(app.monitor.command_failure().is_some());

        update(&mut app, Action::DismissCommandFailure);
        assert!(app.monitor.command_failure().is_none());
        assert_eq!(
            update(&mut app, Action::SendCommand(Command::VolumeUp)),
            Effect::Dispatch(Command::VolumeUp)
        );
    }

    // ------------------------------------------------------------------
    // Library
    // ------------------------------------------------------------------

    #[test]
    fn test_open_library_fetches_artists() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::OpenLibrary),
            Effect::Fetch(LibraryQuery::Artists)
        );
        assert!(app.navigator.artists().is_loading());
    }

    #[test]
    fn test_drill_down_and_play_album() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Ok(json!([{"id": "1", "name": "Radiohead"}])),
            },
        );
        assert_eq!(app.navigator.artists().items(), &[radiohead()]);

        let albums = LibraryQuery::Albums { artist_id: "1".into() };
        assert_eq!(
            update(&mut app, Action::SelectArtist(radiohead())),
            Effect::Fetch(albums.clone())
        );
        update(
            &mut app,
            Action::LibraryLoaded {
                query: albums,
                result: Ok(json!({"albums": [{"id": "10", "name": "OK Computer", "year": "1997"}]})),
            },
        );
        assert_eq!(app.navigator.albums().items()[0].label(), "OK Computer (1997)");

        assert_eq!(
            update(&mut app, Action::PlayAlbum("10".into())),
            Effect::Dispatch(Command::PlayAlbum("10".into()))
        );
        assert!(!app.navigator.is_open());
        assert_eq!(app.navigator.cursor(), &Cursor::Root);

        let effect = update(
            &mut app,
            Action::CommandFinished {
                command: Command::PlayAlbum("10".into()),
                result: Ok(()),
            },
        );
        assert_eq!(effect, Effect::RefreshNowPlaying);
    }

    #[test]
    fn test_play_song_closes_navigator() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(&mut app, Action::SelectArtist(radiohead()));
        update(
            &mut app,
            Action::SelectAlbum {
                artist: radiohead(),
                album: ok_computer(),
            },
        );
        assert_eq!(
            update(&mut app, Action::PlaySong("s1".into())),
            Effect::Dispatch(Command::PlaySong("s1".into()))
        );
        assert!(!app.navigator.is_open());
    }

    #[test]
    fn test_play_ignored_when_not_offered() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::PlayAlbum("10".into())), Effect::None);
        update(&mut app, Action::OpenLibrary);
        assert_eq!(update(&mut app, Action::PlaySong("s1".into())), Effect::None);
        assert!(app.navigator.is_open());
        assert!(!app.monitor.is_busy(Control::Library));
    }

    #[test]
    fn test_busy_library_control_keeps_navigator_open() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(&mut app, Action::SelectArtist(radiohead()));
        app.monitor.begin_command(&Command::PlayAlbum("9".into()));

        assert_eq!(update(&mut app, Action::PlayAlbum("10".into())), Effect::None);
        assert!(app.navigator.is_open());
    }

    #[test]
    fn test_late_albums_after_close_are_cached_not_shown() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        let albums = LibraryQuery::Albums { artist_id: "1".into() };
        update(&mut app, Action::SelectArtist(radiohead()));
        update(&mut app, Action::CloseLibrary);

        update(
            &mut app,
            Action::LibraryLoaded {
                query: albums.clone(),
                result: Ok(json!([{"id": "10", "name": "OK Computer"}])),
            },
        );
        assert_eq!(app.navigator.cursor(), &Cursor::Root);
        assert_eq!(app.navigator.albums(), &Listing::Idle);
        assert!(app.cache.get(&albums).is_some());
    }

    #[test]
    fn test_fresh_cache_skips_fetch() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Ok(json!([{"id": "1", "name": "Radiohead"}])),
            },
        );
        update(&mut app, Action::SelectArtist(radiohead()));

        // Back to Root: artists come straight from the cache
        assert_eq!(update(&mut app, Action::Back), Effect::None);
        assert_eq!(app.navigator.artists().items(), &[radiohead()]);
    }

    #[test]
    fn test_stale_cache_is_shown_and_refetched() {
        let mut app = test_app_with_ttl(Duration::ZERO);
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Ok(json!([{"id": "1", "name": "Radiohead"}])),
            },
        );
        update(&mut app, Action::CloseLibrary);

        assert_eq!(
            update(&mut app, Action::OpenLibrary),
            Effect::Fetch(LibraryQuery::Artists)
        );
        assert_eq!(app.navigator.artists().items(), &[radiohead()]);
    }

    #[test]
    fn test_reload_refetches_fresh_list() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Ok(json!([{"id": "1", "name": "Radiohead"}])),
            },
        );
        assert!(app.cache.is_fresh(&LibraryQuery::Artists, Instant::now()));

        assert_eq!(
            update(&mut app, Action::ReloadLibrary),
            Effect::Fetch(LibraryQuery::Artists)
        );
        // Old list stays up until the new one lands
        assert_eq!(app.navigator.artists().items(), &[radiohead()]);
        assert!(!app.cache.is_fresh(&LibraryQuery::Artists, Instant::now()));
    }

    #[test]
    fn test_reload_while_closed_does_nothing() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::ReloadLibrary), Effect::None);
    }

    #[test]
    fn test_library_fetch_failure_is_not_fatal() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Err(BackendError::Network("refused".into())),
            },
        );
        assert!(matches!(app.navigator.artists(), Listing::Failed(_)));
        assert!(app.navigator.is_open());
        assert_eq!(app.status_message, "Could not load artists");
    }

    #[test]
    fn test_back_at_root_closes() {
        let mut app = test_app();
        update(&mut app, Action::OpenLibrary);
        assert_eq!(update(&mut app, Action::Back), Effect::None);
        assert!(!app.navigator.is_open());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
