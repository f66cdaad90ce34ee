//! The multi-song library: full song documents keyed by id, a metadata index
//! that summarises them for listing, and a pointer to the song being edited.
//!
//! The public operations never return errors. Reads that hit a missing or
//! undecodable record come back as `None`; writes that fail are logged and
//! dropped, leaving the caller's in-memory song as it was.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use log::{error, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::connection::{ensure_schema, open_database};
use super::records::{get_record, put_record, remove_record, song_key, StoreError, LIBRARY_KEY};
use crate::models::{starter_song, Song, SongMetadata};

/// Stored shape of the index record.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibraryRecord {
    #[serde(default)]
    songs: Vec<SongMetadata>,
    #[serde(default)]
    current_song_id: Option<String>,
}

/// Library store owning its SQLite connection.
pub struct Library {
    conn: Connection,
}

impl Library {
    /// Open the library database at `path`, creating it on first use.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_database(path)?,
        })
    }

    /// Throwaway library, handy for tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Upsert `song` and its index entry. `date_created` is kept from an
    /// existing entry, otherwise stamped now.
    pub fn save(&mut self, song: &Song) {
        if let Err(err) = self.try_save(song) {
            error!("Error saving song {} to library: {err}", song.id);
        }
    }

    /// Fetch the song stored under `id`. Corrupt records read as absent.
    pub fn load(&self, id: &str) -> Option<Song> {
        let raw = match get_record(&self.conn, &song_key(id)) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("Error loading song {id} from library: {err}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(song) => Some(song),
            Err(err) => {
                warn!("Stored song {id} is unreadable, treating it as missing: {err}");
                None
            }
        }
    }

    /// Remove the song and its index entry, clearing the current pointer if
    /// it referenced `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) {
        if let Err(err) = self.try_delete(id) {
            error!("Error deleting song {id} from library: {err}");
        }
    }

    /// Index entries, most recently modified first. Equal timestamps fall back
    /// to ascending id so the order is stable between calls.
    pub fn list(&self) -> Vec<SongMetadata> {
        let mut songs = read_index(&self.conn).songs;
        songs.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| a.id.cmp(&b.id))
        });
        songs
    }

    pub fn set_current(&mut self, id: &str) {
        if let Err(err) = self.try_set_current(id) {
            error!("Error saving library: {err}");
        }
    }

    pub fn current_id(&self) -> Option<String> {
        read_index(&self.conn).current_song_id
    }

    /// Whether anything is stored under `id`, readable or not.
    pub fn contains(&self, id: &str) -> bool {
        read_index(&self.conn).songs.iter().any(|entry| entry.id == id)
            || matches!(get_record(&self.conn, &song_key(id)), Ok(Some(_)))
    }

    /// The song the pointer references, `None` if unset or dangling.
    pub fn current(&self) -> Option<Song> {
        self.current_id().and_then(|id| self.load(&id))
    }

    /// The current song, or the demo song when there is nothing to resume.
    pub fn open_or_starter(&self) -> Song {
        self.current().unwrap_or_else(starter_song)
    }

    fn try_save(&mut self, song: &Song) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(song)?;
        let tx = self.conn.transaction()?;

        put_record(&tx, &song_key(&song.id), &encoded)?;

        let mut index = load_index(&tx)?;
        let date_created = index
            .songs
            .iter()
            .find(|entry| entry.id == song.id)
            .map(|entry| entry.date_created)
            .unwrap_or_else(Utc::now);
        let entry = SongMetadata {
            id: song.id.clone(),
            title: song.title.clone(),
            last_modified: song.last_modified,
            date_created,
        };
        match index.songs.iter_mut().find(|existing| existing.id == song.id) {
            Some(existing) => *existing = entry,
            None => index.songs.push(entry),
        }
        write_index(&tx, &index)?;

        tx.commit()?;
        Ok(())
    }

    fn try_set_current(&self, id: &str) -> Result<(), StoreError> {
        let mut index = load_index(&self.conn)?;
        index.current_song_id = Some(id.to_string());
        write_index(&self.conn, &index)
    }

    fn try_delete(&mut self, id: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        remove_record(&tx, &song_key(id))?;

        let mut index = load_index(&tx)?;
        index.songs.retain(|entry| entry.id != id);
        if index.current_song_id.as_deref() == Some(id) {
            index.current_song_id = None;
        }
        write_index(&tx, &index)?;

        tx.commit()?;
        Ok(())
    }
}

/// Read the index, starting over with an empty one if it is missing or
/// cannot be decoded. A failed query is an error so writers can roll back
/// instead of replacing the index.
fn load_index(conn: &Connection) -> Result<LibraryRecord, StoreError> {
    let Some(raw) = get_record(conn, LIBRARY_KEY)? else {
        return Ok(LibraryRecord::default());
    };

    Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
        error!("Error loading library: {err}");
        LibraryRecord::default()
    }))
}

fn read_index(conn: &Connection) -> LibraryRecord {
    load_index(conn).unwrap_or_else(|err| {
        error!("Error loading library: {err}");
        LibraryRecord::default()
    })
}

fn write_index(conn: &Connection, index: &LibraryRecord) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(index)?;
    put_record(conn, LIBRARY_KEY, &encoded)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_song;

    fn library() -> Library {
        Library::open_in_memory().unwrap()
    }

    fn sample(title: &str) -> Song {
        parse_song(&format!("{title}\nVERSE 1\nla la la"), None)
    }

    #[test]
    fn save_then_list_has_one_matching_entry() {
        let mut library = library();
        let song = sample("First");

        library.save(&song);
        library.save(&song);

        let listed = library.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, song.id);
        assert_eq!(listed[0].title, "First");
        assert_eq!(listed[0].last_modified, song.last_modified);
        assert_eq!(library.load(&song.id), Some(song));
    }

    #[test]
    fn delete_removes_document_and_index_entry() {
        let mut library = library();
        let keep = sample("Keep");
        let gone = sample("Gone");
        library.save(&keep);
        library.save(&gone);

        library.delete(&gone.id);

        let ids: Vec<String> = library.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![keep.id.clone()]);
        assert_eq!(library.load(&gone.id), None);
        assert!(library.load(&keep.id).is_some());
    }

    #[test]
    fn deleting_unknown_id_is_a_no_op() {
        let mut library = library();
        let song = sample("Only");
        library.save(&song);
        library.set_current(&song.id);

        library.delete("missing");

        assert_eq!(library.list().len(), 1);
        assert_eq!(library.current_id().as_deref(), Some(song.id.as_str()));
    }

    #[test]
    fn deleting_current_song_clears_pointer() {
        let mut library = library();
        let song = sample("Current");
        library.save(&song);
        library.set_current(&song.id);
        assert_eq!(library.current(), Some(song.clone()));

        library.delete(&song.id);

        assert_eq!(library.current_id(), None);
        assert_eq!(library.current(), None);
    }

    #[test]
    fn dangling_current_pointer_reads_as_none() {
        let mut library = library();
        library.set_current("ghost");
        assert_eq!(library.current(), None);
    }

    #[test]
    fn date_created_survives_later_saves() {
        let mut library = library();
        let original = sample("Draft");
        library.save(&original);
        let created = library.list()[0].date_created;

        let mut renamed = original.with_title("Final");
        renamed.last_modified = original.last_modified + Duration::seconds(30);
        library.save(&renamed);

        let entry = &library.list()[0];
        assert_eq!(entry.date_created, created);
        assert_eq!(entry.title, "Final");
        assert_eq!(entry.last_modified, renamed.last_modified);
    }

    #[test]
    fn list_orders_by_last_modified_then_id() {
        let mut library = library();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut old = sample("Old");
        old.last_modified = base - Duration::hours(1);
        let mut new = sample("New");
        new.last_modified = base + Duration::hours(1);
        let mut tie_a = sample("Tie A");
        tie_a.id = "aaa".to_string();
        tie_a.last_modified = base;
        let mut tie_b = sample("Tie B");
        tie_b.id = "bbb".to_string();
        tie_b.last_modified = base;

        for song in [&tie_b, &old, &new, &tie_a] {
            library.save(song);
        }

        let titles: Vec<String> = library.list().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["New", "Tie A", "Tie B", "Old"]);
    }

    #[test]
    fn corrupt_song_record_reads_as_missing() {
        let mut library = library();
        let song = sample("Broken");
        library.save(&song);
        put_record(&library.conn, &song_key(&song.id), "{not json").unwrap();

        assert_eq!(library.load(&song.id), None);
        assert_eq!(library.list().len(), 1);
    }

    #[test]
    fn corrupt_index_starts_over_empty() {
        let mut library = library();
        library.save(&sample("Lost"));
        put_record(&library.conn, LIBRARY_KEY, "[]garbage").unwrap();

        assert!(library.list().is_empty());
        assert_eq!(library.current_id(), None);
    }

    #[test]
    fn failed_write_is_swallowed_and_leaves_nothing_behind() {
        let mut library = library();
        library.conn.execute("DROP TABLE records", []).unwrap();

        let song = sample("Doomed");
        library.save(&song);
        library.delete(&song.id);
        library.set_current(&song.id);

        assert_eq!(library.load(&song.id), None);
        assert!(library.list().is_empty());
    }

    #[test]
    fn open_or_starter_prefers_the_current_song() {
        let mut library = library();
        assert_eq!(library.open_or_starter().sections.len(), 3);

        let song = sample("Mine");
        library.save(&song);
        library.set_current(&song.id);
        assert_eq!(library.open_or_starter().id, song.id);
    }

    #[test]
    fn corrupt_song_record_can_still_be_deleted() {
        let mut library = library();
        let song = sample("Broken");
        library.save(&song);
        library.set_current(&song.id);
        put_record(&library.conn, &song_key(&song.id), "{not json").unwrap();
        assert!(library.contains(&song.id));

        library.delete(&song.id);

        assert!(!library.contains(&song.id));
        assert!(library.list().is_empty());
        assert_eq!(library.current_id(), None);
        assert_eq!(get_record(&library.conn, &song_key(&song.id)).unwrap(), None);
    }

    #[test]
    fn contains_sees_records_missing_from_the_index() {
        let mut library = library();
        assert!(!library.contains("ghost"));
        put_record(&library.conn, &song_key("ghost"), "{}").unwrap();
        assert!(library.contains("ghost"));
        library.delete("ghost");
        assert!(!library.contains("ghost"));
    }

    #[test]
    fn unreadable_index_is_not_overwritten_by_writes() {
        let mut library = library();
        let first = sample("First");
        library.save(&first);
        library
            .conn
            .execute(
                "UPDATE records SET value = x'00ff' WHERE key = ?1",
                rusqlite::params![LIBRARY_KEY],
            )
            .unwrap();

        let second = sample("Second");
        library.save(&second);
        library.set_current(&second.id);
        library.delete(&first.id);

        assert_eq!(library.load(&second.id), None);
        assert_eq!(library.load(&first.id), Some(first));
        let kind: String = library
            .conn
            .query_row(
                "SELECT typeof(value) FROM records WHERE key = ?1",
                rusqlite::params![LIBRARY_KEY],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(kind, "blob");
    }
}
