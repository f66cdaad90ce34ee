//! Domain models for a lyric sheet: a song is a list of sections, each section
//! a list of lines, each line a list of word segments that may carry
//! alternative wordings. The same types double as the persisted record shape,
//! so the serde attributes here define the JSON stored by the library.
//!
//! Nothing in this module mutates a value in place once it has been handed
//! out. Edits go through the `with_*` helpers, which return a fresh copy with
//! one field replaced at the relevant nesting level.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::generate_id;

/// Title given to songs created from scratch.
pub const NEW_SONG_TITLE: &str = "My New Song";

/// The flavour of a section. Drives nothing but display today, yet it is kept
/// typed so the importer's classification stays testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Verse,
    Chorus,
    Bridge,
    /// Catch-all, also used for any unknown tag found in stored records.
    #[serde(other)]
    Other,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Verse => "verse",
            SectionKind::Chorus => "chorus",
            SectionKind::Bridge => "bridge",
            SectionKind::Other => "other",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One editable word together with the wordings the writer is weighing
/// against it.
pub struct TextSegment {
    pub id: String,
    /// The wording currently shown in the lyric.
    pub text: String,
    /// Candidate wordings in insertion order. Never holds the same string
    /// twice; see [`TextSegment::with_alternative`].
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Index within the line at creation time. Advisory only.
    pub position: usize,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, position: usize) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            alternatives: Vec::new(),
            position,
        }
    }

    /// Build a segment and run every candidate through the usual dedup rule.
    pub fn with_candidates<I, S>(text: impl Into<String>, position: usize, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segment = Self::new(text, position);
        for candidate in candidates {
            segment.insert_alternative(candidate.as_ref());
        }
        segment
    }

    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }

    /// Copy with the displayed wording replaced.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Copy with `candidate` appended to the alternatives. Blank candidates and
    /// candidates already present (after trimming, case-sensitive) are ignored
    /// and an unchanged copy comes back.
    pub fn with_alternative(&self, candidate: &str) -> Self {
        let mut next = self.clone();
        next.insert_alternative(candidate);
        next
    }

    /// Copy with every entry equal to `alternative` removed.
    pub fn without_alternative(&self, alternative: &str) -> Self {
        Self {
            alternatives: self
                .alternatives
                .iter()
                .filter(|alt| alt.as_str() != alternative)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    /// Copy whose displayed text is the alternative at `index`. The list of
    /// alternatives is left untouched. `None` when the index is out of range.
    pub fn choose_alternative(&self, index: usize) -> Option<Self> {
        self.alternatives
            .get(index)
            .map(|alternative| self.with_text(alternative.clone()))
    }

    /// The single place alternatives get added.
    fn insert_alternative(&mut self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() || self.alternatives.iter().any(|alt| alt == candidate) {
            return false;
        }
        self.alternatives.push(candidate.to_string());
        true
    }
}

/// Split `text` on whitespace into segments numbered from zero.
pub fn segments_from_text(text: &str) -> Vec<TextSegment> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, word)| TextSegment::new(word, position))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A lyric line. An empty segment list stands for a deliberate blank line.
pub struct Line {
    pub id: String,
    #[serde(default)]
    pub segments: Vec<TextSegment>,
}

impl Line {
    pub fn new(segments: Vec<TextSegment>) -> Self {
        Self {
            id: generate_id(),
            segments,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(segments_from_text(text))
    }

    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }

    /// Current wording of the line, space-joined.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copy with the segment sharing `segment.id` swapped out.
    pub fn with_segment(&self, segment: TextSegment) -> Self {
        Self {
            id: self.id.clone(),
            segments: replace_by_id(&self.segments, segment, |s| &s.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Display title, e.g. `VERSE 1`.
    pub title: String,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(kind: SectionKind, title: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            kind,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Builder used while assembling a fresh section.
    pub fn with_lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = lines;
        self
    }

    /// Copy with the line sharing `line.id` swapped out.
    pub fn with_line(&self, line: Line) -> Self {
        Self {
            lines: replace_by_id(&self.lines, line, |l| &l.id),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Root aggregate: one song with every section in display order.
pub struct Song {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Bumped by every edit helper; serialized as an RFC 3339 timestamp.
    pub last_modified: DateTime<Utc>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            sections: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    /// Builder used while assembling a fresh song.
    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            last_modified: Utc::now(),
            ..self.clone()
        }
    }

    /// Copy with the section sharing `section.id` swapped out.
    pub fn with_section(&self, section: Section) -> Self {
        Self {
            sections: replace_by_id(&self.sections, section, |s| &s.id),
            last_modified: Utc::now(),
            ..self.clone()
        }
    }

    /// Copy with one segment replaced, rebuilding the enclosing line and
    /// section along the way. Unknown ids leave the structure as it was (the
    /// timestamp still moves, matching every other edit).
    pub fn with_segment(&self, section_id: &str, line_id: &str, segment: TextSegment) -> Self {
        let Some(section) = self.sections.iter().find(|s| s.id == section_id) else {
            return self.touched();
        };
        let Some(line) = section.lines.iter().find(|l| l.id == line_id) else {
            return self.touched();
        };
        self.with_section(section.with_line(line.with_segment(segment)))
    }

    pub fn segment(&self, section_id: &str, line_id: &str, segment_id: &str) -> Option<&TextSegment> {
        self.sections
            .iter()
            .find(|s| s.id == section_id)?
            .lines
            .iter()
            .find(|l| l.id == line_id)?
            .segments
            .iter()
            .find(|s| s.id == segment_id)
    }

    /// Every current wording in reading order.
    pub fn words(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.lines.iter())
            .flat_map(|line| line.segments.iter())
            .map(|segment| segment.text.as_str())
            .collect()
    }

    fn touched(&self) -> Self {
        Self {
            last_modified: Utc::now(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Library index entry. `title` and `last_modified` mirror the song at its
/// last save; `date_created` is fixed by the first save.
pub struct SongMetadata {
    pub id: String,
    pub title: String,
    pub last_modified: DateTime<Utc>,
    pub date_created: DateTime<Utc>,
}

/// The demo song a fresh library opens with.
pub fn starter_song() -> Song {
    let verse_one = Section::new(SectionKind::Verse, "VERSE 1").with_lines(vec![
        seeded_line("Take me out to the field", 5, &["meadow", "garden", "park"]),
        seeded_line(
            "Where the wildflowers grow slowly",
            4,
            &["quietly", "peacefully", "gently"],
        ),
        seeded_line("And my heart can finally rest", 2, &["soul", "mind", "spirit"]),
    ]);

    let chorus = Section::new(SectionKind::Chorus, "CHORUS").with_lines(vec![
        seeded_line("Take me back tonight", 2, &["home", "away", "there"]),
        Line::from_text("Where the stars shine bright"),
        Line::from_text("And everything feels right"),
    ]);

    let verse_two = Section::new(SectionKind::Verse, "VERSE 2").with_lines(vec![
        seeded_line(
            "Walking through the moonlight",
            3,
            &["darkness", "shadows", "starlight"],
        ),
        Line::from_text("Of another sleepless night"),
    ]);

    Song::new(NEW_SONG_TITLE).with_sections(vec![verse_one, chorus, verse_two])
}

/// A line whose word at `index` starts out with `alternatives`.
fn seeded_line(text: &str, index: usize, alternatives: &[&str]) -> Line {
    let segments = text
        .split_whitespace()
        .enumerate()
        .map(|(position, word)| {
            if position == index {
                TextSegment::with_candidates(word, position, alternatives)
            } else {
                TextSegment::new(word, position)
            }
        })
        .collect();
    Line::new(segments)
}

fn replace_by_id<T: Clone>(items: &[T], replacement: T, id_of: impl Fn(&T) -> &String) -> Vec<T> {
    items
        .iter()
        .map(|item| {
            if id_of(item) == id_of(&replacement) {
                replacement.clone()
            } else {
                item.clone()
            }
        })
        .collect()
}
