use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Key holding the library index record.
pub(crate) const LIBRARY_KEY: &str = "songbook-library";
/// Prefix for the per-song document keys.
const SONG_PREFIX: &str = "songbook-song-";

/// Failures on the store's write path. These never reach callers of
/// [`crate::db::Library`]; they are logged and swallowed there.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage query failed: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

pub(crate) fn song_key(id: &str) -> String {
    format!("{SONG_PREFIX}{id}")
}

/// Fetch the raw value stored under `key`, `None` when the key is absent.
pub(crate) fn get_record(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = conn
        .query_row(
            "SELECT value FROM records WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Insert or overwrite the value under `key`.
pub(crate) fn put_record(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO records (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Delete the value under `key`; absent keys are fine.
pub(crate) fn remove_record(conn: &Connection, key: &str) -> Result<(), StoreError> {
    conn.execute("DELETE FROM records WHERE key = ?1", params![key])?;
    Ok(())
}
