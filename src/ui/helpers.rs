use anyhow::Error;
use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Song;

use super::screens::RowRef;

/// Render the song as styled lines. Words that carry alternatives are
/// underlined; the word under the cursor is reversed. Also returns the index
/// of the rendered line holding the cursor so the caller can scroll to it.
pub(crate) fn build_song_lines(song: &Song, cursor: Option<(RowRef, usize)>) -> (Vec<Line<'static>>, usize) {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let kind_style = Style::default().fg(Color::DarkGray);
    let alt_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);

    let mut lines = Vec::new();
    let mut cursor_line = 0;

    for (section_idx, section) in song.sections.iter().enumerate() {
        if section_idx > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(section.title.clone(), title_style),
            Span::styled(format!("  ({})", section.kind), kind_style),
        ]));

        for (line_idx, line) in section.lines.iter().enumerate() {
            let here = RowRef {
                section: section_idx,
                line: line_idx,
            };
            let mut spans = Vec::with_capacity(line.segments.len() * 2);
            for (segment_idx, segment) in line.segments.iter().enumerate() {
                if segment_idx > 0 {
                    spans.push(Span::raw(" "));
                }
                let mut style = if segment.has_alternatives() {
                    alt_style
                } else {
                    Style::default()
                };
                if cursor == Some((here, segment_idx)) {
                    style = style.patch(cursor_style);
                    cursor_line = lines.len();
                }
                spans.push(Span::styled(segment.text.clone(), style));
            }
            lines.push(Line::from(spans));
        }
    }

    (lines, cursor_line)
}

/// `2024-05-01 14:03` in local time.
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::parser::parse_song;

    #[test]
    fn cursor_line_points_at_the_rendered_row() {
        let song = parse_song("Song\nVERSE 1\none two\nCHORUS\nthree", None);
        let cursor = RowRef {
            section: 1,
            line: 0,
        };

        let (lines, cursor_line) = build_song_lines(&song, Some((cursor, 0)));

        // VERSE 1, "one two", blank spacer, CHORUS, "three"
        assert_eq!(lines.len(), 5);
        assert_eq!(cursor_line, 4);
    }

    #[test]
    fn surface_error_prefers_the_root_cause() {
        let err = anyhow!("disk full").context("failed to write export");
        assert_eq!(surface_error(&err), "disk full");
    }
}
