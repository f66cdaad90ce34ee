//! Reading lyric files from disk and handing them to the parser.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::models::Song;
use crate::parser::parse_song;

/// Anything that stops a file from being imported. Both variants render as
/// the same "could not read file" notice; the source carries the detail.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read file {}: it is not UTF-8 text", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Import the lyric file at `path`, using its name (minus the extension) as
/// the fallback title.
pub fn import_file(path: &Path) -> Result<Song, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| ImportError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    let hint = title_hint(path);
    let song = parse_song(&text, hint.as_deref());
    info!(
        "imported {} as \"{}\" ({} sections)",
        path.display(),
        song.title,
        song.sections.len()
    );
    Ok(song)
}

/// File name with its last extension removed: `songs/rain.v2.txt` gives
/// `rain.v2`.
pub fn title_hint(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}
