//! # Now Playing Panel
//!
//! Stateless. Renders whatever `MonitorView` it is handed plus the command
//! gate: transport hints are dimmed while a transport command is in flight,
//! and the last failed command is shown until dismissed. After a command
//! lands, the timestamp line is marked as refreshing until the forced poll
//! replaces the state.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::backend::PlaybackState;
use crate::core::monitor::{CommandFailure, MonitorView};
use crate::tui::component::Component;

const PAUSE_GLYPH: &str = "⏸";
const PLAY_GLYPH: &str = "▶";
const VOLUME_BAR_WIDTH: usize = 20;

pub struct NowPlaying<'a> {
    pub view: MonitorView<'a>,
    pub updated_at: Option<DateTime<Local>>,
    pub transport_busy: bool,
    /// A command changed the player and the next poll has not landed yet.
    pub refreshing: bool,
    pub command_failure: Option<&'a CommandFailure>,
}

impl<'a> NowPlaying<'a> {
    fn playback_lines(&self, playback: &PlaybackState, degraded: bool) -> Vec<Line<'static>> {
        let secondary = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::from(Span::styled(
                playback.display_title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                playback.artist.clone().unwrap_or_default(),
                secondary,
            )),
            Line::from(Span::styled(
                playback.album.clone().unwrap_or_default(),
                secondary,
            )),
            Line::from(Span::styled(
                playback.year.clone().unwrap_or_default(),
                secondary,
            )),
            Line::default(),
        ];

        let controls_style = if self.transport_busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let toggle = if playback.shows_pause() {
            PAUSE_GLYPH
        } else {
            PLAY_GLYPH
        };
        lines.push(Line::from(Span::styled(
            format!("<  ⏮    {toggle}    ⏭  >"),
            controls_style,
        )));
        lines.push(Line::default());

        let volume = playback.volume_level();
        lines.push(Line::from(vec![
            Span::styled("🔈 - ", controls_style),
            Span::styled(volume_bar(volume), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" + {volume:>3}"), controls_style),
        ]));

        if let Some(updated_at) = self.updated_at {
            let mut text = format!("updated {}", updated_at.format("%H:%M:%S"));
            if degraded {
                text.push_str(" (server not responding)");
            } else if self.refreshing {
                text.push_str(" (refreshing…)");
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines
    }
}

impl Component for NowPlaying<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Now Playing ")
            .title_bottom(Line::from(" Space Play/Pause  </> Skip  +/- Volume  m Music  q Quit ").centered())
            .padding(Padding::horizontal(1));

        let mut lines = match &self.view {
            MonitorView::Loading => vec![Line::from("Loading...")],
            MonitorView::Unavailable { error } => vec![
                Line::from(Span::styled(
                    "Unable to load player info",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            MonitorView::Showing { playback, degraded } => {
                self.playback_lines(playback, *degraded)
            }
        };

        if let Some(failure) = self.command_failure {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(
                    "✗ {} failed: {} (d to dismiss)",
                    failure.command.label(),
                    failure.message
                ),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

fn volume_bar(volume: u8) -> String {
    let filled = (volume.min(100) as usize * VOLUME_BAR_WIDTH).div_ceil(100);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(VOLUME_BAR_WIDTH - filled)
    )
}
