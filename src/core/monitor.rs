//! # Now-Playing Monitor
//!
//! Holds the last known-good `PlaybackState` and the bookkeeping around it:
//!
//! ```text
//! Monitor
//! ├── playback: Option<PlaybackState>   // last successful poll
//! ├── updated_at: Option<DateTime>      // when it arrived
//! ├── consecutive_failures: u32         // reset by any successful poll
//! ├── failure_threshold: u32            // failures before "unable to load"
//! ├── stale: bool                       // invalidated by a successful command
//! ├── pending: HashSet<Control>         // controls with a command in flight
//! └── command_failure: Option<...>      // last failed command, until dismissed
//! ```
//!
//! A failed poll never blanks the view on its own. The last good state stays
//! up, marked degraded, until `failure_threshold` polls in a row have failed.

use std::collections::HashSet;

use chrono::{DateTime, Local};
use log::{info, warn};

use crate::backend::{BackendError, Command, Control, PlaybackState};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// A command that the server rejected or never received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: Command,
    pub message: String,
}

/// What the now-playing panel should show.
#[derive(Debug, PartialEq)]
pub enum MonitorView<'a> {
    /// No poll has succeeded yet.
    Loading,
    Showing {
        playback: &'a PlaybackState,
        /// The latest poll failed; `playback` may be out of date.
        degraded: bool,
    },
    Unavailable {
        error: &'a str,
    },
}

#[derive(Debug)]
pub struct Monitor {
    playback: Option<PlaybackState>,
    updated_at: Option<DateTime<Local>>,
    consecutive_failures: u32,
    last_error: Option<String>,
    failure_threshold: u32,
    stale: bool,
    pending: HashSet<Control>,
    command_failure: Option<CommandFailure>,
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD)
    }
}

impl Monitor {
    pub fn new(failure_threshold: u32) -> Self {
        Self {
            playback: None,
            updated_at: None,
            consecutive_failures: 0,
            last_error: None,
            failure_threshold: failure_threshold.max(1),
            stale: false,
            pending: HashSet::new(),
            command_failure: None,
        }
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.playback.as_ref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn view(&self) -> MonitorView<'_> {
        if self.consecutive_failures >= self.failure_threshold {
            return MonitorView::Unavailable {
                error: self.last_error.as_deref().unwrap_or("unknown error"),
            };
        }
        match &self.playback {
            Some(playback) => MonitorView::Showing {
                playback,
                degraded: self.consecutive_failures > 0,
            },
            None => MonitorView::Loading,
        }
    }

    // ------------------------------------------------------------------
    // Polling
    // ------------------------------------------------------------------

    /// Replaces the playback state wholesale.
    pub fn poll_succeeded(&mut self, playback: PlaybackState) {
        if self.consecutive_failures > 0 {
            info!(
                "Now-playing recovered after {} failed poll(s)",
                self.consecutive_failures
            );
        }
        self.playback = Some(playback);
        self.updated_at = Some(Local::now());
        self.consecutive_failures = 0;
        self.last_error = None;
        self.stale = false;
    }

    /// Counts a failure; the last good state is left in place.
    pub fn poll_failed(&mut self, error: &BackendError) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.to_string());
        if self.consecutive_failures == self.failure_threshold {
            warn!(
                "Now-playing unavailable after {} consecutive failures: {}",
                self.consecutive_failures, error
            );
        }
    }

    /// Marks the current state as outdated so it gets refetched right away.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    pub fn is_busy(&self, control: Control) -> bool {
        self.pending.contains(&control)
    }

    /// Claims the command's control. False if a command is already in flight there.
    pub fn begin_command(&mut self, command: &Command) -> bool {
        self.pending.insert(command.control())
    }

    /// Releases the control. Returns true when the command succeeded.
    pub fn finish_command(&mut self, command: &Command, result: &Result<(), BackendError>) -> bool {
        self.pending.remove(&command.control());
        match result {
            Ok(()) => {
                self.command_failure = None;
                self.invalidate();
                true
            }
            Err(e) => {
                warn!("Command '{}' failed: {}", command.label(), e);
                self.command_failure = Some(CommandFailure {
                    command: command.clone(),
                    message: e.to_string(),
                });
                false
            }
        }
    }

    pub fn command_failure(&self) -> Option<&CommandFailure> {
        self.command_failure.as_ref()
    }

    pub fn dismiss_command_failure(&mut self) {
        self.command_failure = None;
    }
}
