pub mod client;
pub mod http;
pub mod poller;
pub mod types;

pub use client::{BackendError, MediaBackend};
pub use http::HttpBackend;
pub use poller::{PollResult, Poller};
pub use types::{
    Album, Artist, Command, Control, LibraryQuery, PlaybackState, PlaybackStatus, Song,
};
