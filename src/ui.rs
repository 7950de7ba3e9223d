//! Ratatui front-end: the numbered main menu, the dialogs that collect book
//! details, and the list/progress views. All state lives in [`App`]; the
//! terminal loop in `terminal` only draws it and forwards key presses.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
