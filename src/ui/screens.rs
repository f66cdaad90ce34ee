use crate::models::{Song, SongMetadata, TextSegment};

/// Segment cursor for the lyric view. Rows index the song's non-blank lines
/// in reading order; blank lines are skipped while navigating.
#[derive(Default, Clone, Debug)]
pub(crate) struct EditorScreen {
    pub(crate) row: usize,
    pub(crate) col: usize,
}

/// Where a navigable row lives inside the song.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RowRef {
    pub(crate) section: usize,
    pub(crate) line: usize,
}

/// Ids of the segment under the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SegmentRef<'a> {
    pub(crate) section_id: &'a str,
    pub(crate) line_id: &'a str,
    pub(crate) segment: &'a TextSegment,
}

impl EditorScreen {
    pub(crate) fn rows(song: &Song) -> Vec<RowRef> {
        song.sections
            .iter()
            .enumerate()
            .flat_map(|(section_idx, section)| {
                section
                    .lines
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| !line.is_blank())
                    .map(move |(line_idx, _)| RowRef {
                        section: section_idx,
                        line: line_idx,
                    })
            })
            .collect()
    }

    pub(crate) fn current_row(&self, song: &Song) -> Option<RowRef> {
        Self::rows(song).get(self.row).copied()
    }

    pub(crate) fn current<'a>(&self, song: &'a Song) -> Option<SegmentRef<'a>> {
        let row = self.current_row(song)?;
        let section = &song.sections[row.section];
        let line = &section.lines[row.line];
        let segment = line.segments.get(self.col)?;
        Some(SegmentRef {
            section_id: &section.id,
            line_id: &line.id,
            segment,
        })
    }

    pub(crate) fn move_vertical(&mut self, song: &Song, delta: isize) {
        let rows = Self::rows(song);
        if rows.is_empty() {
            *self = Self::default();
            return;
        }
        let max = rows.len() as isize - 1;
        self.row = (self.row as isize + delta).clamp(0, max) as usize;
        self.clamp_col(song, &rows);
    }

    pub(crate) fn move_horizontal(&mut self, song: &Song, delta: isize) {
        let rows = Self::rows(song);
        let Some(row) = rows.get(self.row) else {
            return;
        };
        let len = song.sections[row.section].lines[row.line].segments.len();
        if len == 0 {
            return;
        }
        let max = len as isize - 1;
        self.col = (self.col as isize + delta).clamp(0, max) as usize;
    }

    /// Pull the cursor back inside the song after it changed shape.
    pub(crate) fn ensure_in_bounds(&mut self, song: &Song) {
        let rows = Self::rows(song);
        if rows.is_empty() {
            *self = Self::default();
            return;
        }
        if self.row >= rows.len() {
            self.row = rows.len() - 1;
        }
        self.clamp_col(song, &rows);
    }

    fn clamp_col(&mut self, song: &Song, rows: &[RowRef]) {
        if let Some(row) = rows.get(self.row) {
            let len = song.sections[row.section].lines[row.line].segments.len();
            self.col = self.col.min(len.saturating_sub(1));
        }
    }
}

/// The library browser: every saved song, most recent first.
#[derive(Clone, Debug)]
pub(crate) struct LibraryScreen {
    pub(crate) entries: Vec<SongMetadata>,
    pub(crate) selected: usize,
    pub(crate) current_id: Option<String>,
}

impl LibraryScreen {
    pub(crate) fn new(entries: Vec<SongMetadata>, current_id: Option<String>) -> Self {
        let selected = current_id
            .as_deref()
            .and_then(|id| entries.iter().position(|entry| entry.id == id))
            .unwrap_or(0);
        Self {
            entries,
            selected,
            current_id,
        }
    }

    pub(crate) fn current_entry(&self) -> Option<&SongMetadata> {
        self.entries.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            self.selected = 0;
            return;
        }
        let max = self.entries.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<SongMetadata>, current_id: Option<String>) {
        self.entries = entries;
        self.current_id = current_id;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_song;

    fn song() -> Song {
        parse_song("Song\nVERSE 1\none two three\n\nfour\nCHORUS\nfive six", None)
    }

    #[test]
    fn rows_skip_blank_lines() {
        let rows = EditorScreen::rows(&song());
        assert_eq!(
            rows,
            vec![
                RowRef { section: 0, line: 0 },
                RowRef { section: 0, line: 2 },
                RowRef { section: 1, line: 0 },
            ]
        );
    }

    #[test]
    fn cursor_clamps_column_when_moving_to_a_shorter_line() {
        let song = song();
        let mut editor = EditorScreen::default();
        editor.move_horizontal(&song, 2);
        assert_eq!(editor.current(&song).unwrap().segment.text, "three");

        editor.move_vertical(&song, 1);
        assert_eq!(editor.current(&song).unwrap().segment.text, "four");

        editor.move_vertical(&song, 10);
        editor.move_horizontal(&song, 1);
        assert_eq!(editor.current(&song).unwrap().segment.text, "six");
    }

    #[test]
    fn empty_song_has_no_cursor_target() {
        let song = Song::new("Empty");
        let mut editor = EditorScreen { row: 3, col: 4 };
        editor.ensure_in_bounds(&song);
        assert!(editor.current(&song).is_none());
        assert_eq!((editor.row, editor.col), (0, 0));
    }
}
