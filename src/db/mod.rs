//! Persistence for the song library, split into the raw key-value layer and
//! the library store built on top of it.

mod connection;
mod library;
mod records;

pub use connection::{ensure_schema, open_database};
pub use library::Library;
pub use records::StoreError;
