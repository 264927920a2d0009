pub mod player;
pub mod types;
