//! # Core Application Logic
//!
//! This module contains Jukebox's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │ ── spawns fetches ─────► │  Backend   │
//!     │  Adapter   │ ◄── Action::*Loaded ──── │ (reqwest)  │
//!     │ (ratatui)  │                          │  + Poller  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`navigator`]: Artist → album → song cursor with the stale-response guard
//! - [`monitor`]: Last known-good playback state and the command gate
//! - [`normalize`]: Turns loosely shaped library payloads into lists
//! - [`cache`]: Library payloads keyed by query
//! - [`config`]: Settings resolution

pub mod action;
pub mod cache;
pub mod config;
pub mod monitor;
pub mod navigator;
pub mod normalize;
pub mod state;
