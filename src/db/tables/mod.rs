//! Table operation modules

pub mod album_table;
pub mod game_table;
pub mod guess_table;
pub mod user_table;

pub use album_table::AlbumTable;
pub use game_table::GameTable;
pub use guess_table::GuessTable;
pub use user_table::UserTable;
