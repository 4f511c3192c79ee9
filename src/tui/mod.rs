//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Three sources feed `update()`:
//!
//! - **Keys**, polled every 100ms. The library overlay gets first pick while
//!   it is open; whatever it ignores falls through to the global key map.
//! - **The poller**, a tokio task that sends `Action::PollCompleted`.
//! - **One-shot tasks** for library fetches and commands, which send
//!   `Action::LibraryLoaded` / `Action::CommandFinished` when they resolve.
//!
//! Background tasks talk to the loop over a std mpsc channel; the loop is
//! the only place `App` is mutated.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crate::backend::{Command, HttpBackend, LibraryQuery, MediaBackend, Poller};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::LibraryListState;
use crate::tui::components::library;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub library: LibraryListState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            library: LibraryListState::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn MediaBackend> = Arc::new(HttpBackend::new(
        config.base_url.clone(),
        config.request_timeout,
    ));
    let mut app = App::from_config(backend.clone(), &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let poll_tx = tx.clone();
    let poller = Poller::spawn(backend, config.poll_interval, move |result| {
        poll_tx.send(Action::PollCompleted(result)).is_ok()
    });

    let result = (|| -> std::io::Result<()> {
        let mut needs_redraw = true; // Force first frame
        loop {
            if needs_redraw {
                terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
                needs_redraw = false;
            }

            let first_event = poll_event_timeout(EVENT_POLL_TIMEOUT);
            if first_event.is_some() {
                needs_redraw = true;
            }

            // Process first event + drain ALL pending events before next draw
            let mut should_quit = false;
            for event in first_event
                .into_iter()
                .chain(std::iter::from_fn(poll_event_immediate))
            {
                if matches!(event, TuiEvent::Resize) {
                    continue;
                }
                let Some(action) = route_event(&app, &mut tui, &event) else {
                    continue;
                };
                let effect = update(&mut app, action);
                if handle_effect(effect, &app, &poller, &tx) {
                    should_quit = true;
                    break;
                }
            }

            if should_quit {
                break;
            }

            // Handle background task actions (polls, fetches, commands)
            while let Ok(action) = rx.try_recv() {
                needs_redraw = true;
                debug!("Event loop received: {:?}", action);
                let effect = update(&mut app, action);
                if handle_effect(effect, &app, &poller, &tx) {
                    should_quit = true;
                }
            }

            if should_quit {
                break;
            }
        }
        Ok(())
    })();

    poller.cancel();
    ratatui::restore();
    info!("Jukebox shutting down");
    result
}

/// Turns a key into an action: the open library overlay first, then global keys.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if app.navigator.is_open() {
        tui.library.sync(&app.navigator);
        if let Some(library_event) = tui.library.handle_event(event) {
            return library::resolve(library_event, &app.navigator);
        }
        if matches!(event, TuiEvent::CursorUp | TuiEvent::CursorDown) {
            return None;
        }
    }
    global_action(event, app.navigator.is_open())
}

fn global_action(event: &TuiEvent, library_open: bool) -> Option<Action> {
    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::InputChar(' ') => Some(Action::SendCommand(Command::PlayPause)),
        TuiEvent::InputChar('>') => Some(Action::SendCommand(Command::NextTrack)),
        TuiEvent::InputChar('<') => Some(Action::SendCommand(Command::PreviousTrack)),
        TuiEvent::InputChar('+' | '=') => Some(Action::SendCommand(Command::VolumeUp)),
        TuiEvent::InputChar('-') => Some(Action::SendCommand(Command::VolumeDown)),
        TuiEvent::InputChar('d') => Some(Action::DismissCommandFailure),
        TuiEvent::InputChar('m') if library_open => Some(Action::CloseLibrary),
        TuiEvent::InputChar('m') => Some(Action::OpenLibrary),
        _ => None,
    }
}

/// Starts the I/O an effect asks for. Returns true when the loop should exit.
fn handle_effect(effect: Effect, app: &App, poller: &Poller, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::Fetch(query) => spawn_fetch(app.backend.clone(), query, tx.clone()),
        Effect::Dispatch(command) => spawn_command(app.backend.clone(), command, tx.clone()),
        Effect::RefreshNowPlaying => poller.refresh(),
    }
    false
}

fn spawn_fetch(backend: Arc<dyn MediaBackend>, query: LibraryQuery, tx: mpsc::Sender<Action>) {
    info!("Fetching {}", query.path());
    tokio::spawn(async move {
        let result = backend.library(&query).await;
        if tx.send(Action::LibraryLoaded { query, result }).is_err() {
            warn!("Failed to send library result: receiver dropped");
        }
    });
}

fn spawn_command(backend: Arc<dyn MediaBackend>, command: Command, tx: mpsc::Sender<Action>) {
    info!("Sending {}", command.path());
    tokio::spawn(async move {
        let result = backend.send_command(&command).await;
        if tx.send(Action::CommandFinished { command, result }).is_err() {
            warn!("Failed to send command result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use serde_json::json;

    #[test]
    fn test_global_keys() {
        assert!(matches!(
            global_action(&TuiEvent::InputChar(' '), false),
            Some(Action::SendCommand(Command::PlayPause))
        ));
        assert!(matches!(
            global_action(&TuiEvent::InputChar('+'), false),
            Some(Action::SendCommand(Command::VolumeUp))
        ));
        assert!(matches!(
            global_action(&TuiEvent::InputChar('m'), false),
            Some(Action::OpenLibrary)
        ));
        assert!(matches!(
            global_action(&TuiEvent::InputChar('m'), true),
            Some(Action::CloseLibrary)
        ));
        assert!(matches!(global_action(&TuiEvent::Quit, true), Some(Action::Quit)));
        assert!(global_action(&TuiEvent::Submit, false).is_none());
    }

    #[test]
    fn test_route_event_prefers_open_library() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        update(&mut app, Action::OpenLibrary);
        update(
            &mut app,
            Action::LibraryLoaded {
                query: LibraryQuery::Artists,
                result: Ok(json!([{"id": "1", "name": "Radiohead"}])),
            },
        );

        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::Submit),
            Some(Action::SelectArtist(a)) if a.id == "1"
        ));
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::Escape),
            Some(Action::Back)
        ));
        // Transport keys still work over the overlay
        assert!(matches!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('>')),
            Some(Action::SendCommand(Command::NextTrack))
        ));
    }

    #[test]
    fn test_route_event_with_library_closed() {
        let app = test_app();
        let mut tui = TuiState::new();
        assert!(route_event(&app, &mut tui, &TuiEvent::Escape).is_none());
        assert!(route_event(&app, &mut tui, &TuiEvent::CursorDown).is_none());
    }
}
