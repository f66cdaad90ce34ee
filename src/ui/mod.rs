//! Ratatui front-end: a lyric editor with per-word alternatives menus and a
//! library browser, drawn over whatever song the store says is current.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
