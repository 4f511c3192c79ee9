//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status bar showing server and status
//! - `NowPlaying`: Track info, transport hints and volume
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local presentation state and emit events:
//! - `LibraryOverlay`: artist/album/song browser, highlight kept in `LibraryListState`
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`. This keeps dependencies explicit and components
//! testable with a `TestBackend`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── now_playing.rs   (Now-playing panel)
//! └── library.rs       (Library overlay)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod now_playing;
pub use now_playing::NowPlaying;

pub mod library;
pub use library::{LibraryListState, LibraryOverlay};
