use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{SongMetadata, TextSegment};

/// What a single-line text prompt is collecting.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum PromptKind {
    /// New alternative for the segment the menu was opened on.
    Alternative,
    /// Path of a lyric file to import.
    ImportPath,
    /// New title for the open song.
    Title,
}

impl PromptKind {
    pub(crate) fn title(&self) -> &'static str {
        match self {
            PromptKind::Alternative => "Add Alternative",
            PromptKind::ImportPath => "Import Text File",
            PromptKind::Title => "Rename Song",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            PromptKind::Alternative => "Alternative",
            PromptKind::ImportPath => "Path",
            PromptKind::Title => "Title",
        }
    }
}

/// Single-line prompt shared by the add-alternative, import and rename flows.
#[derive(Clone, Debug)]
pub(crate) struct TextPrompt {
    pub(crate) kind: PromptKind,
    pub(crate) value: String,
    pub(crate) error: Option<String>,
}

impl TextPrompt {
    pub(crate) fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            value: String::new(),
            error: None,
        }
    }

    pub(crate) fn with_value(kind: PromptKind, value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Self::new(kind)
        }
    }

    /// Append a character, rejecting control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    /// Trimmed value, or `None` when only whitespace was typed.
    pub(crate) fn submitted(&self) -> Option<&str> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.value.is_empty() {
            Span::styled("<required>", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.value.clone(), Style::default().fg(Color::Yellow))
        };
        Line::from(vec![Span::raw(self.prefix()), display])
    }

    pub(crate) fn prefix(&self) -> String {
        format!("{}: ", self.kind.label())
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

/// The click-to-reveal menu for one segment: the current wording plus every
/// alternative, with a cursor over the alternatives.
#[derive(Clone, Debug)]
pub(crate) struct AlternativesMenu {
    pub(crate) section_id: String,
    pub(crate) line_id: String,
    pub(crate) segment_id: String,
    pub(crate) selected: usize,
}

impl AlternativesMenu {
    pub(crate) fn new(section_id: &str, line_id: &str, segment: &TextSegment) -> Self {
        Self {
            section_id: section_id.to_string(),
            line_id: line_id.to_string(),
            segment_id: segment.id.clone(),
            selected: 0,
        }
    }

    pub(crate) fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }
}

/// Delete confirmation for a library entry.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmSongDelete {
    pub(crate) id: String,
    pub(crate) title: String,
}

impl From<&SongMetadata> for ConfirmSongDelete {
    fn from(entry: &SongMetadata) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
        }
    }
}
