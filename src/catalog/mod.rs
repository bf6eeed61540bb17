//! Third-party music catalog integration

pub mod spotify;

pub use spotify::{AlbumInfo, SpotifyClient};
