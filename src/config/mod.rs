//! Configuration for CoverdUp

pub mod paths;
pub mod user_config;

pub use paths::Paths;
pub use user_config::UserConfig;
