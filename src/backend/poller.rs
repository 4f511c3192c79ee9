//! # Now-Playing Poller
//!
//! A single repeating task that polls the current track and hands every
//! outcome to a sink. One task means one poll at a time:
//!
//! ```text
//!   interval tick ──┐
//!                   ├─► select (refresh first) ─► poll().await ─► sink(result)
//!   refresh() ──────┘                                   │
//!        ▲                                              │
//!        └──────────── loop ◄───────────────────────────┘
//! ```
//!
//! A `refresh()` that lands while a poll is in flight leaves a permit on the
//! `Notify`, so the forced poll runs as soon as the current one resolves. A
//! forced poll resets the interval, replacing the scheduled tick instead of
//! stacking another poll right behind it.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::client::{BackendError, MediaBackend};
use super::types::PlaybackState;

pub type PollResult = Result<PlaybackState, BackendError>;

/// Handle to the polling task. Dropping it cancels the task.
pub struct Poller {
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl Poller {
    /// Spawns the polling task. The first poll runs immediately.
    ///
    /// `sink` returns `false` once nobody is listening, which ends the task.
    pub fn spawn<F>(backend: Arc<dyn MediaBackend>, period: Duration, mut sink: F) -> Self
    where
        F: FnMut(PollResult) -> bool + Send + 'static,
    {
        let refresh = Arc::new(Notify::new());
        let signal = refresh.clone();

        info!("Starting now-playing poller every {}ms", period.as_millis());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = signal.notified() => {
                        debug!("Forced now-playing poll");
                        ticker.reset();
                    }
                    _ = ticker.tick() => {}
                }

                let result = backend.current_track().await;
                if let Err(e) = &result {
                    debug!("Now-playing poll failed: {}", e);
                }
                if !sink(result) {
                    info!("Poll sink closed, stopping poller");
                    return;
                }
            }
        });

        Self { refresh, task }
    }

    /// Requests an immediate poll, bypassing the timer.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
