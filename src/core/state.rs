//! # Application State
//!
//! Core business state for Jukebox. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn MediaBackend>  // media server client
//! ├── monitor: Monitor                // now-playing slot + command gate
//! ├── navigator: Navigator            // library cursor + listings
//! ├── cache: QueryCache               // library payloads by query
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::backend::MediaBackend;
use crate::core::cache::QueryCache;
use crate::core::config::ResolvedConfig;
use crate::core::monitor::Monitor;
use crate::core::navigator::Navigator;

pub struct App {
    pub backend: Arc<dyn MediaBackend>,
    pub monitor: Monitor,
    pub navigator: Navigator,
    pub cache: QueryCache,
    pub status_message: String,
}

impl App {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self::from_config(backend, &ResolvedConfig::default())
    }

    pub fn from_config(backend: Arc<dyn MediaBackend>, config: &ResolvedConfig) -> Self {
        Self {
            backend,
            monitor: Monitor::new(config.failure_threshold),
            navigator: Navigator::new(),
            cache: QueryCache::new(config.cache_ttl),
            status_message: String::from("Connecting..."),
        }
    }
}
