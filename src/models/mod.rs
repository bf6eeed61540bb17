//! Data models for CoverdUp

pub mod album;
pub mod game;
pub mod guess;
pub mod user;

pub use album::Album;
pub use game::{Game, GameRef};
pub use guess::Guess;
pub use user::User;
