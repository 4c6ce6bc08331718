pub mod components;
pub mod driver;
pub mod shortcuts;
pub mod state;
pub mod tui;
