//! Heuristic importer that turns freeform lyric text into a [`Song`].
//!
//! Parsing is total: any input, the empty string included, produces a song.
//! The rules below are guesses about how people lay out lyrics, so a short
//! unpunctuated first line will always be read as a title even when it was
//! meant as a lyric.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Line, Section, SectionKind, Song, TextSegment};

/// Title used when neither the text nor the caller supplies one.
pub const UNTITLED_SONG: &str = "Untitled Song";
/// Title of the section opened for lyrics that precede any header.
const DEFAULT_SECTION_TITLE: &str = "VERSE 1";
/// First lines at least this long are never taken as a title.
const MAX_TITLE_CHARS: usize = 50;
/// All-caps header lines must be shorter than this.
const MAX_CAPS_HEADER_CHARS: usize = 30;

static CAPS_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z\s0-9]+$").unwrap());

static KEYWORD_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(verse|chorus|bridge|intro|outro|pre-chorus|refrain)").unwrap()
});

/// Ordered classification rules for section titles; first match wins.
static SECTION_RULES: Lazy<Vec<(Regex, SectionKind)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)verse|^v\d+").unwrap(), SectionKind::Verse),
        (Regex::new(r"(?i)chorus|refrain").unwrap(), SectionKind::Chorus),
        (
            Regex::new(r"(?i)bridge|middle|c-part").unwrap(),
            SectionKind::Bridge,
        ),
    ]
});

/// `word[alt1|alt2]`, as written by the alternatives exporter.
static ANNOTATED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\[\]]+)\[([^\[\]]*)\]$").unwrap());

/// A section as found in the text, before ids are handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub title: String,
    pub kind: SectionKind,
    /// Trimmed raw lines, blanks included.
    pub lines: Vec<String>,
}

/// Parse `text` into a song. `title_hint` (usually the file stem) is used when
/// the first line does not look like a title.
pub fn parse_song(text: &str, title_hint: Option<&str>) -> Song {
    let lines: Vec<&str> = text.split('\n').collect();
    let (title, body_start) = extract_title(&lines, title_hint);

    let sections: Vec<Section> = split_sections(&lines[body_start..])
        .into_iter()
        .map(|raw| {
            let lines = raw.lines.iter().map(|line| parse_line(line)).collect();
            Section::new(raw.kind, raw.title).with_lines(lines)
        })
        .collect();

    debug!(
        "parsed \"{}\" into {} section(s), {} input line(s)",
        title,
        sections.len(),
        lines.len()
    );

    Song::new(title).with_sections(sections)
}

/// Decide the song title and the index of the first body line.
fn extract_title(lines: &[&str], title_hint: Option<&str>) -> (String, usize) {
    let first = lines.first().map(|line| line.trim()).unwrap_or_default();

    if looks_like_title(first) {
        let underlined = lines
            .get(1)
            .map(|line| line.trim())
            .is_some_and(|next| !next.is_empty() && next.chars().all(|ch| ch == '='));
        let body_start = if underlined { 2 } else { 1 };
        return (first.to_string(), body_start);
    }

    let title = title_hint
        .filter(|hint| !hint.is_empty())
        .unwrap_or(UNTITLED_SONG);
    (title.to_string(), 0)
}

fn looks_like_title(line: &str) -> bool {
    !line.is_empty()
        && line.chars().count() < MAX_TITLE_CHARS
        && !line.contains('.')
        && !line.contains(',')
}

/// Group body lines under section headers. Lyrics before the first header go
/// into a default `VERSE 1` section; blank lines before that are dropped.
pub fn split_sections(lines: &[&str]) -> Vec<RawSection> {
    let mut sections = Vec::new();
    let mut open: Option<RawSection> = None;

    for line in lines.iter().map(|line| line.trim()) {
        if line.is_empty() && open.is_none() {
            continue;
        }

        if is_section_header(line) {
            if let Some(done) = open.take() {
                sections.push(done);
            }
            open = Some(RawSection {
                title: line.to_uppercase(),
                kind: detect_section_kind(line),
                lines: Vec::new(),
            });
        } else if let Some(section) = open.as_mut() {
            section.lines.push(line.to_string());
        } else {
            open = Some(RawSection {
                title: DEFAULT_SECTION_TITLE.to_string(),
                kind: SectionKind::Verse,
                lines: vec![line.to_string()],
            });
        }
    }

    if let Some(done) = open {
        sections.push(done);
    }
    sections
}

/// A header is either a short all-caps line or a line that starts with a
/// well-known section word.
pub fn is_section_header(line: &str) -> bool {
    let len = line.chars().count();
    (len > 0 && len < MAX_CAPS_HEADER_CHARS && CAPS_HEADER.is_match(line))
        || KEYWORD_HEADER.is_match(line)
}

pub fn detect_section_kind(title: &str) -> SectionKind {
    SECTION_RULES
        .iter()
        .find(|(rule, _)| rule.is_match(title))
        .map(|(_, kind)| *kind)
        .unwrap_or(SectionKind::Other)
}

/// Split one raw line into segments. A blank line gives a line without
/// segments so the spacing survives.
pub fn parse_line(raw: &str) -> Line {
    let segments = tokens(raw)
        .iter()
        .enumerate()
        .map(|(position, token)| parse_token(token, position))
        .collect();
    Line::new(segments)
}

/// `word[a|b]` becomes `word` with alternatives `a` and `b`. A group with no
/// usable alternative (`word[]`, `word[ | ]`) is left as written.
fn parse_token(token: &str, position: usize) -> TextSegment {
    match ANNOTATED_WORD.captures(token) {
        Some(caps) if has_alternative(&caps[2]) => {
            TextSegment::with_candidates(&caps[1], position, caps[2].split('|'))
        }
        _ => TextSegment::new(token, position),
    }
}

fn is_annotation(token: &str) -> bool {
    ANNOTATED_WORD
        .captures(token)
        .is_some_and(|caps| has_alternative(&caps[2]))
}

fn has_alternative(group: &str) -> bool {
    group.split('|').any(|alt| !alt.trim().is_empty())
}

/// Whitespace split that keeps a bracketed alternatives group in one token,
/// so `night[dark sky|dusk]` is not torn apart. Groups that do not form a
/// whole `word[...]` token (`[Verse 1]`, `a[b c]d`) and unclosed groups fall
/// back to plain words.
fn tokens(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut group: Vec<&str> = Vec::new();

    for word in raw.split_whitespace() {
        if group.is_empty() {
            if opens_group(word) {
                group.push(word);
            } else {
                tokens.push(word.to_string());
            }
        } else {
            group.push(word);
            if word.contains(']') {
                let joined = group.join(" ");
                if is_annotation(&joined) {
                    tokens.push(joined);
                } else {
                    tokens.extend(group.iter().map(|word| word.to_string()));
                }
                group.clear();
            }
        }
    }

    tokens.extend(group.into_iter().map(String::from));
    tokens
}

fn opens_group(word: &str) -> bool {
    matches!(word.rfind('['), Some(open) if !word[open..].contains(']'))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn section_summary(song: &Song) -> Vec<(SectionKind, String, Vec<String>)> {
        song.sections
            .iter()
            .map(|section| {
                (
                    section.kind,
                    section.title.clone(),
                    section.lines.iter().map(Line::text).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn parses_title_and_two_sections() {
        let song = parse_song("My Song\n\nVERSE 1\nHello world\n\nCHORUS\nSing loud", None);

        assert_eq!(song.title, "My Song");
        assert_eq!(
            section_summary(&song),
            vec![
                (
                    SectionKind::Verse,
                    "VERSE 1".to_string(),
                    vec!["Hello world".to_string(), String::new()],
                ),
                (
                    SectionKind::Chorus,
                    "CHORUS".to_string(),
                    vec!["Sing loud".to_string()],
                ),
            ]
        );
        assert_eq!(song.sections[0].lines[0].segments.len(), 2);
        assert!(song.sections[0].lines[1].is_blank());
        assert_eq!(song.sections[1].lines[0].segments.len(), 2);
    }

    #[test]
    fn empty_input_still_yields_a_song() {
        let song = parse_song("", None);
        assert_eq!(song.title, UNTITLED_SONG);
        assert!(song.sections.is_empty());
        assert!(!song.id.is_empty());
    }

    #[test]
    fn punctuated_first_line_falls_back_to_hint() {
        let song = parse_song("Hello, darkness my old friend\nI've come to talk", Some("sound"));
        assert_eq!(song.title, "sound");
        assert_eq!(song.sections.len(), 1);
        assert_eq!(song.sections[0].title, "VERSE 1");
        assert_eq!(song.sections[0].lines.len(), 2);
    }

    #[test]
    fn empty_hint_counts_as_missing() {
        let long_line = "a".repeat(60);
        let song = parse_song(&long_line, Some(""));
        assert_eq!(song.title, UNTITLED_SONG);
    }

    #[test]
    fn title_underline_is_consumed() {
        let song = parse_song("Night Drive\n===========\n\nVERSE 1\nRoad hum", None);
        assert_eq!(song.title, "Night Drive");
        assert_eq!(song.words(), vec!["Road", "hum"]);
    }

    #[test]
    fn header_classification_follows_rule_order() {
        assert!(is_section_header("CHORUS"));
        assert!(is_section_header("Chorus: repeat"));
        assert!(is_section_header("V1"));
        assert!(!is_section_header("Random Notes About Mix"));
        assert!(!is_section_header("THIS HEADER IS FAR TOO LONG TO COUNT"));

        assert_eq!(detect_section_kind("CHORUS"), SectionKind::Chorus);
        assert_eq!(detect_section_kind("Chorus: repeat"), SectionKind::Chorus);
        assert_eq!(detect_section_kind("V1"), SectionKind::Verse);
        assert_eq!(detect_section_kind("PRE-CHORUS"), SectionKind::Chorus);
        assert_eq!(detect_section_kind("Refrain"), SectionKind::Chorus);
        assert_eq!(detect_section_kind("MIDDLE 8"), SectionKind::Bridge);
        assert_eq!(detect_section_kind("C-PART"), SectionKind::Bridge);
        assert_eq!(detect_section_kind("INTRO"), SectionKind::Other);
        assert_eq!(detect_section_kind("Verse chorus"), SectionKind::Verse);
    }

    #[test]
    fn mixed_case_notes_stay_inside_the_open_section() {
        let song = parse_song(
            "Demo\nINTRO\nRandom Notes About Mix\nBRIDGE\nla la",
            None,
        );
        assert_eq!(
            section_summary(&song),
            vec![
                (
                    SectionKind::Other,
                    "INTRO".to_string(),
                    vec!["Random Notes About Mix".to_string()],
                ),
                (
                    SectionKind::Bridge,
                    "BRIDGE".to_string(),
                    vec!["la la".to_string()],
                ),
            ]
        );
    }

    #[test]
    fn keyword_headers_are_upper_cased() {
        let song = parse_song("Song\nchorus: repeat x2\nsing", None);
        assert_eq!(song.sections[0].title, "CHORUS: REPEAT X2");
        assert_eq!(song.sections[0].kind, SectionKind::Chorus);
    }

    #[test]
    fn blank_lines_before_first_section_are_skipped() {
        let sections = split_sections(&["", "   ", "first words", "", "more"]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].lines, vec!["first words", "", "more"]);
    }

    #[test]
    fn whitespace_runs_collapse_and_positions_follow() {
        let line = parse_line("  take\tme   home ");
        let words: Vec<(&str, usize)> = line
            .segments
            .iter()
            .map(|s| (s.text.as_str(), s.position))
            .collect();
        assert_eq!(words, vec![("take", 0), ("me", 1), ("home", 2)]);
    }

    #[test]
    fn annotated_words_restore_alternatives() {
        let line = parse_line("the field[meadow|park|meadow] night[dark sky|dusk]");
        assert_eq!(line.text(), "the field night");
        assert_eq!(line.segments[1].alternatives, vec!["meadow", "park"]);
        assert_eq!(line.segments[2].alternatives, vec!["dark sky", "dusk"]);
    }

    #[test]
    fn unclosed_brackets_are_kept_verbatim() {
        let line = parse_line("odd [token here");
        assert_eq!(line.text(), "odd [token here");
        assert!(line.segments.iter().all(|s| s.alternatives.is_empty()));
    }

    fn texts(line: &Line) -> Vec<&str> {
        line.segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn bracketed_notes_split_on_whitespace() {
        let line = parse_line("oh [spoken softly] yeah");
        assert_eq!(texts(&line), vec!["oh", "[spoken", "softly]", "yeah"]);
        assert!(line.segments.iter().all(|s| s.alternatives.is_empty()));

        let line = parse_line("[Verse 1]");
        assert_eq!(texts(&line), vec!["[Verse", "1]"]);
    }

    #[test]
    fn group_without_leading_word_is_not_annotation() {
        let line = parse_line("[softly] sing");
        assert_eq!(texts(&line), vec!["[softly]", "sing"]);
        assert!(line.segments.iter().all(|s| s.alternatives.is_empty()));
    }

    #[test]
    fn group_with_trailing_text_splits_into_words() {
        let line = parse_line("a[b c]d e");
        assert_eq!(texts(&line), vec!["a[b", "c]d", "e"]);
        assert_eq!(
            line.segments.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn empty_group_is_kept_verbatim() {
        let line = parse_line("word[] other[ | ]");
        assert_eq!(texts(&line), vec!["word[]", "other[", "|", "]"]);
        assert!(line.segments.iter().all(|s| s.alternatives.is_empty()));
    }
}
