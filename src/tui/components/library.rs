//! # Library Overlay
//!
//! Centered overlay for browsing artists → albums → songs. Opened with `m`,
//! unwound one level at a time with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `LibraryListState` lives in `TuiState` and only tracks the highlight
//! - `LibraryOverlay` is created each frame with the navigator borrowed from `App`
//!
//! Which list is showing, and what is in it, belongs to the core
//! `Navigator`. This module turns a highlighted row into an `Action`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::LibraryQuery;
use crate::core::action::Action;
use crate::core::navigator::{Cursor, Listing, Navigator};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Persistent highlight state for the library overlay.
#[derive(Debug, Default)]
pub struct LibraryListState {
    pub selected: usize,
    pub list_state: ListState,
    len: usize,
    synced_query: Option<LibraryQuery>,
}

impl LibraryListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the navigator: a different list resets the highlight to the top.
    pub fn sync(&mut self, navigator: &Navigator) {
        let query = navigator.active_query();
        if query != self.synced_query {
            self.selected = 0;
            self.synced_query = query;
        }
        self.len = visible_len(navigator);
        if self.len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(self.len - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

/// Events emitted by the library overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryEvent {
    /// Enter on a row: drill in, or play when it is a song.
    Open(usize),
    /// `p` on a row.
    Play(usize),
    /// `a` in the song list: play the whole album.
    PlayAll,
    Reload,
    Back,
}

impl EventHandler for LibraryListState {
    type Event = LibraryEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<LibraryEvent> {
        match event {
            TuiEvent::Escape => Some(LibraryEvent::Back),
            TuiEvent::CursorUp => {
                if self.len > 0 {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown => {
                if self.len > 0 {
                    self.selected = (self.selected + 1).min(self.len - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit if self.len > 0 => Some(LibraryEvent::Open(self.selected)),
            TuiEvent::InputChar('p') if self.len > 0 => Some(LibraryEvent::Play(self.selected)),
            TuiEvent::InputChar('a') => Some(LibraryEvent::PlayAll),
            TuiEvent::InputChar('r') => Some(LibraryEvent::Reload),
            _ => None,
        }
    }
}

/// Maps an overlay event onto the navigator's current list.
///
/// Returns None when the event has no meaning at this level or the row no
/// longer exists.
pub fn resolve(event: LibraryEvent, navigator: &Navigator) -> Option<Action> {
    match (event, navigator.cursor()) {
        (LibraryEvent::Back, _) => Some(Action::Back),
        (LibraryEvent::Reload, _) => Some(Action::ReloadLibrary),
        (LibraryEvent::Open(i), Cursor::Root) => navigator
            .artists()
            .items()
            .get(i)
            .map(|artist| Action::SelectArtist(artist.clone())),
        (LibraryEvent::Open(i), Cursor::AtArtist(artist)) => {
            navigator
                .albums()
                .items()
                .get(i)
                .map(|album| Action::SelectAlbum {
                    artist: artist.clone(),
                    album: album.clone(),
                })
        }
        (LibraryEvent::Play(i), Cursor::AtArtist(_)) => navigator
            .albums()
            .items()
            .get(i)
            .map(|album| Action::PlayAlbum(album.id.clone())),
        (LibraryEvent::Open(i) | LibraryEvent::Play(i), Cursor::AtAlbum(..)) => navigator
            .songs()
            .items()
            .get(i)
            .map(|song| Action::PlaySong(song.id.clone())),
        (LibraryEvent::PlayAll, Cursor::AtAlbum(_, album)) => {
            Some(Action::PlayAlbum(album.id.clone()))
        }
        _ => None,
    }
}

fn visible_len(navigator: &Navigator) -> usize {
    match navigator.cursor() {
        Cursor::Root => navigator.artists().items().len(),
        Cursor::AtArtist(_) => navigator.albums().items().len(),
        Cursor::AtAlbum(..) => navigator.songs().items().len(),
    }
}

/// Row labels for the list currently showing, plus its load state.
fn visible_rows(navigator: &Navigator) -> (Vec<String>, ListingStatus) {
    fn rows<T>(listing: &Listing<T>, label: impl Fn(&T) -> String) -> (Vec<String>, ListingStatus) {
        let status = match listing {
            Listing::Idle | Listing::Loading => ListingStatus::Loading,
            Listing::Failed(message) => ListingStatus::Failed(message.clone()),
            Listing::Ready(_) => ListingStatus::Ready,
        };
        (listing.items().iter().map(label).collect(), status)
    }

    match navigator.cursor() {
        Cursor::Root => rows(navigator.artists(), |a| a.name.clone()),
        Cursor::AtArtist(_) => rows(navigator.albums(), |a| a.label()),
        Cursor::AtAlbum(..) => rows(navigator.songs(), |s| match &s.artist {
            Some(artist) if !artist.is_empty() => format!("{} · {}", s.title, artist),
            _ => s.title.clone(),
        }),
    }
}

enum ListingStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Transient render wrapper for the library overlay.
pub struct LibraryOverlay<'a> {
    navigator: &'a Navigator,
    state: &'a mut LibraryListState,
}

impl<'a> LibraryOverlay<'a> {
    pub fn new(navigator: &'a Navigator, state: &'a mut LibraryListState) -> Self {
        Self { navigator, state }
    }
}

impl Component for LibraryOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 70, area);
        frame.render_widget(Clear, overlay);

        let help_text = match self.navigator.cursor() {
            Cursor::Root => " Enter Open  r Reload  Esc Close ",
            Cursor::AtArtist(_) => " Enter Open  p Play album  r Reload  Esc Back ",
            Cursor::AtAlbum(..) => " Enter/p Play song  a Play album  r Reload  Esc Back ",
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.navigator.title()))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        let (labels, status) = visible_rows(self.navigator);

        if labels.is_empty() {
            let (text, style) = match status {
                ListingStatus::Loading => ("Loading...".to_string(), Style::default().fg(Color::DarkGray)),
                ListingStatus::Failed(message) => (
                    format!("Could not load: {message}"),
                    Style::default().fg(Color::Red),
                ),
                ListingStatus::Ready => ("Nothing here.".to_string(), Style::default().fg(Color::DarkGray)),
            };
            let empty = Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, overlay);
            return;
        }

        let inner_width = overlay.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(
                    truncate_to_width(label, inner_width),
                    style,
                )))
            })
            .collect();

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
    }
}

/// Truncate to `max_width` terminal columns, ending in "..." when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
