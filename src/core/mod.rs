//! Core game logic

pub mod error;
pub mod evaluator;
pub mod game;
pub mod seed;

pub use error::GameError;
