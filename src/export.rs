//! Plain-text renderings of a song for sharing outside the app.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::models::{Song, TextSegment};

/// The two export flavours offered to the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Current wording only.
    Plain,
    /// Current wording followed by `[alt1|alt2]` wherever alternatives exist.
    WithAlternatives,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Plain, ExportFormat::WithAlternatives];

    pub fn render(&self, song: &Song) -> String {
        match self {
            ExportFormat::Plain => render_plain(song),
            ExportFormat::WithAlternatives => render_with_alternatives(song),
        }
    }

    /// `{slug}.txt` or `{slug}_with_alternatives.txt`.
    pub fn file_name(&self, song: &Song) -> String {
        match self {
            ExportFormat::Plain => format!("{}.txt", slug(&song.title)),
            ExportFormat::WithAlternatives => {
                format!("{}_with_alternatives.txt", slug(&song.title))
            }
        }
    }
}

pub fn render_plain(song: &Song) -> String {
    render(song, |segment| segment.text.clone())
}

pub fn render_with_alternatives(song: &Song) -> String {
    render(song, |segment| {
        if segment.has_alternatives() {
            format!("{}[{}]", segment.text, segment.alternatives.join("|"))
        } else {
            segment.text.clone()
        }
    })
}

/// Title, an `=` underline, then each section's title and lines with a blank
/// line between sections.
fn render(song: &Song, word: impl Fn(&TextSegment) -> String) -> String {
    let mut output = format!(
        "{}\n{}\n\n",
        song.title,
        "=".repeat(song.title.chars().count())
    );

    for (index, section) in song.sections.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }
        output.push_str(&section.title);
        output.push('\n');

        for line in &section.lines {
            let text = line.segments.iter().map(&word).collect::<Vec<_>>().join(" ");
            output.push_str(&text);
            output.push('\n');
        }
    }

    output
}

/// Lower-case `title` and swap every non-alphanumeric character for `_`.
pub fn slug(title: &str) -> String {
    title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Write every export flavour of `song` into `dir`, returning the paths.
pub fn write_exports(song: &Song, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).context("failed to create export directory")?;

    ExportFormat::ALL
        .iter()
        .map(|format| {
            let path = dir.join(format.file_name(song));
            fs::write(&path, format.render(song))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("exported \"{}\" to {}", song.title, path.display());
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::parse_song;

    fn sample() -> Song {
        let song = parse_song("Road Song\nVERSE 1\nTake me home\n\nCHORUS\nSing it loud", None);
        let section = &song.sections[0];
        let line = &section.lines[0];
        let home = line.segments[2]
            .with_alternative("away")
            .with_alternative("there");
        song.with_segment(&section.id, &line.id, home)
    }

    #[test]
    fn plain_export_lists_current_words() {
        assert_eq!(
            render_plain(&sample()),
            "Road Song\n=========\n\nVERSE 1\nTake me home\n\n\nCHORUS\nSing it loud\n"
        );
    }

    #[test]
    fn alternatives_export_appends_bracket_groups() {
        assert_eq!(
            render_with_alternatives(&sample()),
            "Road Song\n=========\n\nVERSE 1\nTake me home[away|there]\n\n\nCHORUS\nSing it loud\n"
        );
    }

    #[test]
    fn slug_replaces_everything_but_ascii_alphanumerics() {
        assert_eq!(slug("My Song: Take 2!"), "my_song__take_2_");
        assert_eq!(slug("Café"), "caf_");
    }

    #[test]
    fn file_names_follow_the_title() {
        let song = sample();
        assert_eq!(ExportFormat::Plain.file_name(&song), "road_song.txt");
        assert_eq!(
            ExportFormat::WithAlternatives.file_name(&song),
            "road_song_with_alternatives.txt"
        );
    }

    #[test]
    fn write_exports_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let song = sample();

        let paths = write_exports(&song, &target).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(
            std::fs::read_to_string(&paths[1]).unwrap(),
            render_with_alternatives(&song)
        );
    }
}
