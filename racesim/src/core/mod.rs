pub mod handle_race;
pub mod horse;
pub mod race;
pub mod random;
pub mod state_handler;
pub mod tick_source;
