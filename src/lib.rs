//! Core library surface for the Lyric Binder TUI and CLI.
//!
//! Lyrics come in as plain text, are parsed into songs whose words can carry
//! alternative wordings, and are kept in a SQLite-backed library. The `bin`
//! target wires these pieces together; tests and other tooling can use them
//! directly.
pub mod config;
pub mod db;
pub mod export;
pub mod ids;
pub mod import;
pub mod logging;
pub mod models;
pub mod parser;
pub mod ui;

pub use config::Config;
pub use db::{Library, StoreError};
pub use export::{render_plain, render_with_alternatives, write_exports, ExportFormat};
pub use import::{import_file, ImportError};
pub use models::{starter_song, Line, Section, SectionKind, Song, SongMetadata, TextSegment};
pub use parser::parse_song;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
