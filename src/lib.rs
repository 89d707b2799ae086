pub mod agents;
pub mod game;
pub mod game_interface;
mod game_interface_traits;
pub mod navigator;
