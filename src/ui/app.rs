use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::info;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::Config;
use crate::db::Library;
use crate::export::write_exports;
use crate::import::import_file;
use crate::models::{starter_song, Song, NEW_SONG_TITLE};

use super::forms::{AlternativesMenu, ConfirmSongDelete, PromptKind, TextPrompt};
use super::helpers::{build_song_lines, centered_rect, format_timestamp, surface_error};
use super::screens::{EditorScreen, LibraryScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states.
enum Screen {
    Editor,
    Library(LibraryScreen),
}

/// Modal overlays drawn on top of the current screen.
enum Mode {
    Normal,
    Alternatives(AlternativesMenu),
    Prompt {
        prompt: TextPrompt,
        /// Menu to return to once an alternative has been typed.
        menu: Option<AlternativesMenu>,
    },
    ConfirmSongDelete(ConfirmSongDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the library, the song open in the editor, and
/// whatever screen or overlay is active.
pub struct App {
    library: Library,
    export_dir: PathBuf,
    song: Song,
    editor: EditorScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Resume the current song (or start from the demo song) and record it as
    /// current straight away.
    pub fn new(library: Library, config: &Config) -> Self {
        let song = library.open_or_starter();
        let mut app = Self {
            library,
            export_dir: config.export_dir.clone(),
            song: song.clone(),
            editor: EditorScreen::default(),
            screen: Screen::Editor,
            mode: Mode::Normal,
            status: None,
        };
        app.commit(song);
        app
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Alternatives(menu) => self.handle_alternatives(code, menu),
            Mode::Prompt { prompt, menu } => self.handle_prompt(code, prompt, menu),
            Mode::ConfirmSongDelete(confirm) => self.handle_confirm_song_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Editor => self.handle_editor_key(code, exit),
            Screen::Library(_) => self.handle_library_key(code, exit),
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.editor.move_vertical(&self.song, -1),
            KeyCode::Down => self.editor.move_vertical(&self.song, 1),
            KeyCode::Left => self.editor.move_horizontal(&self.song, -1),
            KeyCode::Right => self.editor.move_horizontal(&self.song, 1),
            KeyCode::Enter => {
                if let Some(menu) = self.menu_for_cursor() {
                    self.clear_status();
                    return Ok(Mode::Alternatives(menu));
                }
                self.set_status("No word selected.", StatusKind::Error);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                if let Some(menu) = self.menu_for_cursor() {
                    self.clear_status();
                    return Ok(Mode::Prompt {
                        prompt: TextPrompt::new(PromptKind::Alternative),
                        menu: Some(menu),
                    });
                }
                self.set_status("No word selected.", StatusKind::Error);
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.clear_status();
                return Ok(Mode::Prompt {
                    prompt: TextPrompt::with_value(PromptKind::Title, &self.song.title),
                    menu: None,
                });
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                self.clear_status();
                return Ok(Mode::Prompt {
                    prompt: TextPrompt::new(PromptKind::ImportPath),
                    menu: None,
                });
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.clear_status();
                self.open_library();
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.new_song(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_song(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_export_dir(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_library_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let Screen::Library(library) = &mut self.screen else {
            return Ok(Mode::Normal);
        };

        match code {
            KeyCode::Up => library.move_selection(-1),
            KeyCode::Down => library.move_selection(1),
            KeyCode::PageUp => library.move_selection(-5),
            KeyCode::PageDown => library.move_selection(5),
            _ => {}
        }
        let selected = library.current_entry().cloned();

        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                self.clear_status();
                self.screen = Screen::Editor;
            }
            KeyCode::Enter => match selected {
                Some(entry) => match self.library.load(&entry.id) {
                    Some(song) => {
                        self.switch_to(song);
                        self.set_status(format!("Opened \"{}\".", entry.title), StatusKind::Info);
                    }
                    None => self.set_status(
                        format!("\"{}\" could not be loaded.", entry.title),
                        StatusKind::Error,
                    ),
                },
                None => self.set_status("No song selected.", StatusKind::Error),
            },
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(entry) = &selected {
                    self.clear_status();
                    return Ok(Mode::ConfirmSongDelete(ConfirmSongDelete::from(entry)));
                }
                self.set_status("No song selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => self.new_song(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_alternatives(&mut self, code: KeyCode, mut menu: AlternativesMenu) -> Mode {
        let Some(segment) = self
            .song
            .segment(&menu.section_id, &menu.line_id, &menu.segment_id)
            .cloned()
        else {
            return Mode::Normal;
        };

        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Up => menu.move_selection(-1, segment.alternatives.len()),
            KeyCode::Down => menu.move_selection(1, segment.alternatives.len()),
            KeyCode::Enter => {
                if let Some(chosen) = segment.choose_alternative(menu.selected) {
                    let text = chosen.text.clone();
                    self.commit(self.song.with_segment(&menu.section_id, &menu.line_id, chosen));
                    self.set_status(format!("Now using \"{text}\"."), StatusKind::Info);
                    return Mode::Normal;
                }
                self.set_status("No alternatives yet. Press 'a' to add one.", StatusKind::Error);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                return Mode::Prompt {
                    prompt: TextPrompt::new(PromptKind::Alternative),
                    menu: Some(menu),
                };
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(alternative) = segment.alternatives.get(menu.selected) {
                    let trimmed = segment.without_alternative(alternative);
                    self.set_status(format!("Removed \"{alternative}\"."), StatusKind::Info);
                    self.commit(self.song.with_segment(&menu.section_id, &menu.line_id, trimmed));
                    menu.move_selection(0, segment.alternatives.len() - 1);
                }
            }
            _ => {}
        }
        Mode::Alternatives(menu)
    }

    fn handle_prompt(
        &mut self,
        code: KeyCode,
        mut prompt: TextPrompt,
        menu: Option<AlternativesMenu>,
    ) -> Mode {
        let back = |menu: Option<AlternativesMenu>| match menu {
            Some(menu) => Mode::Alternatives(menu),
            None => Mode::Normal,
        };

        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                return back(menu);
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            KeyCode::Enter => {
                let Some(value) = prompt.submitted().map(str::to_string) else {
                    prompt.error = Some(format!("{} is required.", prompt.kind.label()));
                    return Mode::Prompt { prompt, menu };
                };
                match prompt.kind {
                    PromptKind::Alternative => {
                        if let Some(menu) = &menu {
                            self.add_alternative(menu, &value);
                        }
                        return back(menu);
                    }
                    PromptKind::Title => {
                        self.commit(self.song.with_title(value.as_str()));
                        self.set_status(format!("Renamed to \"{value}\"."), StatusKind::Info);
                        return Mode::Normal;
                    }
                    PromptKind::ImportPath => match import_file(&PathBuf::from(&value)) {
                        Ok(song) => {
                            let title = song.title.clone();
                            self.switch_to(song);
                            self.set_status(format!("Imported \"{title}\"."), StatusKind::Info);
                            return Mode::Normal;
                        }
                        Err(err) => {
                            let message = err.to_string();
                            prompt.error = Some(message.clone());
                            self.set_status(message, StatusKind::Error);
                        }
                    },
                }
            }
            _ => {}
        }
        Mode::Prompt { prompt, menu }
    }

    fn handle_confirm_song_delete(&mut self, code: KeyCode, confirm: ConfirmSongDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Mode::Normal
            }
            _ => Mode::ConfirmSongDelete(confirm),
        }
    }

    /// Adopt `song` as the open song and persist it. Every edit funnels through
    /// here so the library always mirrors what is on screen.
    fn commit(&mut self, song: Song) {
        self.song = song;
        self.library.save(&self.song);
        self.library.set_current(&self.song.id);
        self.editor.ensure_in_bounds(&self.song);
        self.refresh_library_screen();
    }

    /// Open another song in the editor.
    fn switch_to(&mut self, song: Song) {
        self.editor = EditorScreen::default();
        self.commit(song);
        self.screen = Screen::Editor;
    }

    fn new_song(&mut self) {
        self.switch_to(Song::new(NEW_SONG_TITLE));
        self.set_status(
            "Started a new song. Press 'i' to import lyrics or 't' to rename.",
            StatusKind::Info,
        );
    }

    fn add_alternative(&mut self, menu: &AlternativesMenu, candidate: &str) {
        let Some(segment) = self
            .song
            .segment(&menu.section_id, &menu.line_id, &menu.segment_id)
        else {
            return;
        };
        let updated = segment.with_alternative(candidate);
        if updated.alternatives.len() == segment.alternatives.len() {
            self.set_status(format!("\"{candidate}\" is already listed."), StatusKind::Info);
            return;
        }
        self.commit(self.song.with_segment(&menu.section_id, &menu.line_id, updated));
        self.set_status(format!("Added \"{candidate}\"."), StatusKind::Info);
    }

    fn perform_delete(&mut self, confirm: &ConfirmSongDelete) {
        self.library.delete(&confirm.id);
        info!("deleted song {} from the library", confirm.id);

        if confirm.id == self.song.id {
            let next = self
                .library
                .list()
                .first()
                .and_then(|entry| self.library.load(&entry.id))
                .unwrap_or_else(starter_song);
            self.editor = EditorScreen::default();
            self.commit(next);
        } else {
            self.refresh_library_screen();
        }
        self.set_status(format!("Deleted \"{}\".", confirm.title), StatusKind::Info);
    }

    fn export_song(&mut self) {
        match write_exports(&self.song, &self.export_dir) {
            Ok(paths) => {
                let names: Vec<String> = paths
                    .iter()
                    .filter_map(|path| path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .collect();
                self.set_status(
                    format!("Exported {} to {}.", names.join(", "), self.export_dir.display()),
                    StatusKind::Info,
                );
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn open_export_dir(&mut self) {
        if !self.export_dir.is_dir() {
            self.set_status("Nothing exported yet. Press 'x' first.", StatusKind::Error);
            return;
        }
        if let Err(err) = open_path(&self.export_dir) {
            self.set_status(format!("Could not open folder: {err}"), StatusKind::Error);
        }
    }

    fn open_library(&mut self) {
        let screen = LibraryScreen::new(self.library.list(), self.library.current_id());
        self.screen = Screen::Library(screen);
    }

    fn refresh_library_screen(&mut self) {
        if let Screen::Library(ref mut screen) = self.screen {
            screen.set_entries(self.library.list(), self.library.current_id());
        }
    }

    fn menu_for_cursor(&self) -> Option<AlternativesMenu> {
        self.editor
            .current(&self.song)
            .map(|target| AlternativesMenu::new(target.section_id, target.line_id, target.segment))
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Editor => self.draw_editor(frame, content_area),
            Screen::Library(library) => self.draw_library(frame, content_area, library),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Alternatives(menu) => self.draw_alternatives(frame, area, menu),
            Mode::Prompt { prompt, .. } => self.draw_prompt(frame, area, prompt),
            Mode::ConfirmSongDelete(confirm) => self.draw_confirm_song_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.song.title));

        if self.song.sections.is_empty() {
            let message = Paragraph::new("This song is empty. Press 'i' to import a text file.")
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let cursor = self
            .editor
            .current_row(&self.song)
            .map(|row| (row, self.editor.col));
        let (lines, cursor_line) = build_song_lines(&self.song, cursor);

        let visible = block.inner(area).height as usize;
        let scroll = cursor_line.saturating_sub(visible.saturating_sub(1));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect, library: &LibraryScreen) {
        let block = Block::default().borders(Borders::ALL).title(" Song Library ");

        if library.entries.is_empty() {
            let message = Paragraph::new("No songs yet. Press 'n' to start one.")
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = library
            .entries
            .iter()
            .map(|entry| {
                let mut spans = vec![
                    Span::styled(
                        entry.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("   modified {}", format_timestamp(&entry.last_modified)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if library.current_id.as_deref() == Some(entry.id.as_str()) {
                    spans.push(Span::styled("  (current)", Style::default().fg(Color::Green)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(library.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_alternatives(&self, frame: &mut Frame, area: Rect, menu: &AlternativesMenu) {
        let Some(segment) = self
            .song
            .segment(&menu.section_id, &menu.line_id, &menu.segment_id)
        else {
            return;
        };

        let popup = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} (current) ", segment.text));

        if segment.alternatives.is_empty() {
            let message = Paragraph::new("No alternatives yet.\nPress 'a' to add one.")
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, popup);
            return;
        }

        let items: Vec<ListItem> = segment
            .alternatives
            .iter()
            .map(|alternative| ListItem::new(alternative.clone()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(menu.selected));
        frame.render_stateful_widget(list, popup, &mut state);
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &TextPrompt) {
        let popup = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", prompt.kind.title()));

        let mut lines = vec![prompt.build_line()];
        if let Some(error) = &prompt.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block.clone())
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);

        let inner = block.inner(popup);
        let cursor_x = inner.x + (prompt.prefix().chars().count() + prompt.value_len()) as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }

    fn draw_confirm_song_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSongDelete) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let block = Block::default().borders(Borders::ALL).title(" Delete Song ");
        let text = vec![
            Line::from(format!("Delete \"{}\" from the library?", confirm.title)),
            Line::from(""),
            Line::from("This cannot be undone. [y] Yes   [n] No"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Alternatives(_)) => &[
                ("[↑↓]", "Navigate"),
                ("[Enter]", "Use"),
                ("[a]", "Add"),
                ("[d]", "Delete"),
                ("[Esc]", "Close"),
            ],
            (_, Mode::Prompt { .. }) => &[("[Enter]", "Save"), ("[Esc]", "Cancel")],
            (_, Mode::ConfirmSongDelete(_)) => &[("[y]", "Delete"), ("[n]", "Keep")],
            (Screen::Editor, Mode::Normal) => &[
                ("[←↑↓→]", "Move"),
                ("[Enter]", "Alternatives"),
                ("[a]", "Add alt"),
                ("[t]", "Title"),
                ("[l]", "Library"),
                ("[i]", "Import"),
                ("[x]", "Export"),
                ("[o]", "Open exports"),
                ("[q]", "Quit"),
            ],
            (Screen::Library(_), Mode::Normal) => &[
                ("[↑↓]", "Navigate"),
                ("[Enter]", "Open"),
                ("[n]", "New"),
                ("[d]", "Delete"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ],
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, action) in keys {
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::raw(format!(" {action}   ")));
        }
        Line::from(spans)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let dir = std::env::temp_dir().join("lyric-binder-ui-tests");
        let config = Config {
            data_dir: dir.clone(),
            export_dir: dir.join("exports"),
            log_level: "info".to_string(),
        };
        App::new(Library::open_in_memory().unwrap(), &config)
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn startup_saves_the_starter_song_as_current() {
        let app = app();
        assert_eq!(app.library.current_id().as_deref(), Some(app.song.id.as_str()));
        assert_eq!(app.library.list().len(), 1);
    }

    #[test]
    fn choosing_an_alternative_updates_and_persists_the_word() {
        let mut app = app();
        // "field" is the sixth word of the first line.
        press(&mut app, &[KeyCode::Right; 5]);
        press(&mut app, &[KeyCode::Enter, KeyCode::Down, KeyCode::Enter]);

        assert_eq!(app.song.sections[0].lines[0].text(), "Take me out to the garden");
        let stored = app.library.load(&app.song.id).unwrap();
        assert_eq!(stored, app.song);
    }

    #[test]
    fn typed_alternative_is_added_once() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('a')]);
        type_text(&mut app, " Bring ");
        press(&mut app, &[KeyCode::Enter, KeyCode::Esc, KeyCode::Char('a')]);
        type_text(&mut app, "Bring");
        press(&mut app, &[KeyCode::Enter]);

        let segment = &app.song.sections[0].lines[0].segments[0];
        assert_eq!(segment.alternatives, vec!["Bring"]);
    }

    #[test]
    fn renaming_updates_the_library_index() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('t')]);
        for _ in 0..app.song.title.chars().count() {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        type_text(&mut app, "Field Song");
        press(&mut app, &[KeyCode::Enter]);

        assert_eq!(app.library.list()[0].title, "Field Song");
    }

    #[test]
    fn deleting_the_open_song_falls_back_to_another_one() {
        let mut app = app();
        let first = app.song.id.clone();
        press(&mut app, &[KeyCode::Char('n')]);
        let second = app.song.id.clone();
        assert_ne!(first, second);

        press(&mut app, &[KeyCode::Char('l')]);
        // the new song is current and listed first
        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);

        assert_eq!(app.song.id, first);
        let ids: Vec<String> = app.library.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first]);
    }
}
