use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::info;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::ReadingStats;
use crate::store::BookCollection;

use super::forms::{BookField, BookForm, SearchField, SearchForm, TitlePrompt};
use super::helpers::{book_line, centered_rect, cursor_column};
use super::screens::{BookListScreen, MenuItem, MenuScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the greeting banner above the menu.
const HEADER_HEIGHT: u16 = 3;
const GREETING: &str = "📚 Welcome to Your Book Collection Manager! 📚";

/// What fills the main area behind any open dialog.
enum Screen {
    Menu,
    Books(BookListScreen),
    Progress(ReadingStats),
}

/// Dialog or prompt currently capturing keystrokes.
enum Mode {
    Normal,
    AddingBook(BookForm),
    RemovingBook(TitlePrompt),
    Searching(SearchForm),
    FindingBookToUpdate(TitlePrompt),
    EditingBook { title: String, form: BookForm },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
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

/// Central application state: the collection plus everything the menu loop
/// needs to render and route input.
pub struct App {
    collection: BookCollection,
    menu: MenuScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(collection: BookCollection) -> Self {
        Self {
            collection,
            menu: MenuScreen::default(),
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn collection(&self) -> &BookCollection {
        &self.collection
    }

    /// Text of the footer status line, if any.
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Route a key press. Returns `true` once the user has chosen to exit and
    /// the collection has been saved. Store failures propagate.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::RemovingBook(prompt) => self.handle_remove_book(code, prompt)?,
            Mode::Searching(form) => self.handle_search(code, form),
            Mode::FindingBookToUpdate(prompt) => self.handle_find_for_update(code, prompt),
            Mode::EditingBook { title, form } => self.handle_edit_book(code, title, form)?,
        };

        Ok(exit)
    }

    /// Save and leave, the same as choosing Exit from the menu.
    pub fn quit(&mut self) -> Result<()> {
        self.collection
            .save()
            .context("failed to save collection on exit")?;
        info!("exiting with {} books saved", self.collection.len());
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Menu => match code {
                KeyCode::Up => self.menu.move_selection(-1),
                KeyCode::Down => self.menu.move_selection(1),
                KeyCode::Home => self.menu.move_selection(-(MenuItem::ALL.len() as isize)),
                KeyCode::End => self.menu.move_selection(MenuItem::ALL.len() as isize),
                KeyCode::Enter => {
                    let item = self.menu.current();
                    return self.choose(item, exit);
                }
                KeyCode::Char(ch) => match MenuItem::from_choice(ch) {
                    Some(item) => {
                        self.menu.select(item);
                        return self.choose(item, exit);
                    }
                    None => self.set_status("Invalid choice. Please try again.", StatusKind::Error),
                },
                _ => {}
            },
            Screen::Books(_) | Screen::Progress(_)
                if matches!(code, KeyCode::Esc | KeyCode::Enter) =>
            {
                self.back_to_menu()
            }
            Screen::Books(ref mut list) => match code {
                KeyCode::Up => list.move_selection(-1),
                KeyCode::Down => list.move_selection(1),
                KeyCode::PageUp => list.move_selection(-10),
                KeyCode::PageDown => list.move_selection(10),
                KeyCode::Home => list.select_first(),
                KeyCode::End => list.select_last(),
                _ => {}
            },
            Screen::Progress(_) => {}
        }
        Ok(Mode::Normal)
    }

    fn choose(&mut self, item: MenuItem, exit: &mut bool) -> Result<Mode> {
        self.clear_status();
        let mode = match item {
            MenuItem::AddBook => Mode::AddingBook(BookForm::default()),
            MenuItem::RemoveBook => Mode::RemovingBook(TitlePrompt::default()),
            MenuItem::SearchBooks => Mode::Searching(SearchForm::default()),
            MenuItem::UpdateBook => Mode::FindingBookToUpdate(TitlePrompt::default()),
            MenuItem::ViewAll => {
                if self.collection.is_empty() {
                    self.set_status("Your collection is empty.", StatusKind::Info);
                } else {
                    let books = self.collection.list_all().to_vec();
                    self.screen = Screen::Books(BookListScreen::new("Your Book Collection:", books));
                }
                Mode::Normal
            }
            MenuItem::ReadingProgress => {
                self.screen = Screen::Progress(self.collection.stats());
                Mode::Normal
            }
            MenuItem::Exit => {
                self.quit()?;
                *exit = true;
                Mode::Normal
            }
        };
        Ok(mode)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.on_last_field() => {
                self.collection
                    .add(form.to_book())
                    .context("failed to add book")?;
                self.set_status("Book added successfully!", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::AddingBook(form))
    }

    fn handle_remove_book(&mut self, code: KeyCode, mut prompt: TitlePrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Remove cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                let removed = self
                    .collection
                    .remove(&prompt.title)
                    .context("failed to remove book")?;
                match removed {
                    Some(_) => self.set_status("Book removed successfully!", StatusKind::Info),
                    None => self.set_status("Book not found!", StatusKind::Error),
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Char(ch) => prompt.push_char(ch),
            _ => {}
        }
        Ok(Mode::RemovingBook(prompt))
    }

    fn handle_search(&mut self, code: KeyCode, mut form: SearchForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Left => form.cycle_scope(false),
            KeyCode::Right => form.cycle_scope(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.active == SearchField::Scope => form.toggle_field(),
            KeyCode::Enter => {
                let found = self.collection.find(&form.query, form.scope);
                if found.is_empty() {
                    self.set_status("No matching books found.", StatusKind::Info);
                } else {
                    self.set_status(
                        format!("{} matching book(s).", found.len()),
                        StatusKind::Info,
                    );
                    self.screen = Screen::Books(BookListScreen::new("Matching Books:", found));
                }
                return Mode::Normal;
            }
            KeyCode::Char(ch) => form.push_char(ch),
            _ => {}
        }
        Mode::Searching(form)
    }

    fn handle_find_for_update(&mut self, code: KeyCode, mut prompt: TitlePrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Update cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                let Some(book) = self.collection.get(&prompt.title) else {
                    self.set_status("Book not found!", StatusKind::Error);
                    return Mode::Normal;
                };
                let mut form = BookForm::for_update(book);
                form.focus(BookField::Title);
                self.set_status("Leave blank to keep existing value.", StatusKind::Info);
                return Mode::EditingBook {
                    title: prompt.title,
                    form,
                };
            }
            KeyCode::Char(ch) => prompt.push_char(ch),
            _ => {}
        }
        Mode::FindingBookToUpdate(prompt)
    }

    fn handle_edit_book(&mut self, code: KeyCode, title: String, mut form: BookForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Update cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.on_last_field() => {
                let updated = self
                    .collection
                    .update(&title, form.to_update())
                    .context("failed to update book")?
                    .is_some();
                if updated {
                    self.set_status("Book updated successfully!", StatusKind::Info);
                } else {
                    self.set_status("Book not found!", StatusKind::Error);
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => form.next_field(),
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::EditingBook { title, form })
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
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Books(list) => self.draw_book_list(frame, content_area, list),
            Screen::Progress(stats) => self.draw_progress(frame, content_area, stats),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add a New Book", form),
            Mode::EditingBook { form, .. } => {
                self.draw_book_form(frame, area, "Update Book Details", form)
            }
            Mode::RemovingBook(prompt) => self.draw_title_prompt(
                frame,
                area,
                "Remove a Book",
                "Enter the title of the book to remove",
                prompt,
            ),
            Mode::FindingBookToUpdate(prompt) => self.draw_title_prompt(
                frame,
                area,
                "Update Book Details",
                "Enter the title of the book you want to edit",
                prompt,
            ),
            Mode::Searching(form) => self.draw_search_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Line::from(Span::styled(
            GREETING,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = MenuItem::ALL
            .iter()
            .map(|item| ListItem::new(format!("{}. {}", item.number(), item.label())))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Please choose an option (1-7)"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(Some(self.menu.selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, list: &BookListScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let position = match list.current_book() {
            Some(_) => format!("  •  {} of {}", list.selected + 1, list.books.len()),
            None => String::new(),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                list.heading.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(position),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = list
            .books
            .iter()
            .enumerate()
            .map(|(idx, book)| ListItem::new(book_line(idx + 1, book)))
            .collect();
        let books = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(books, chunks[1], &mut state);
    }

    fn draw_progress(&self, frame: &mut Frame, area: Rect, stats: &ReadingStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let lines = vec![
            Line::from(format!("Total books in collection: {}", stats.total)),
            Line::from(format!("Books read: {}", stats.read)),
            Line::from(format!("Reading progress: {:.2}%", stats.percentage_read)),
        ];
        let summary = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Reading Progress"),
        );
        frame.render_widget(summary, chunks[0]);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio((stats.percentage_read / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.2}%", stats.percentage_read));
        frame.render_widget(gauge, chunks[1]);
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
        match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) | (_, Mode::EditingBook { .. }) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Next / Save   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::RemovingBook(_)) | (_, Mode::FindingBookToUpdate(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::Searching(_)) => Line::from(vec![
                Span::styled("[←→/1-3]", key_style),
                Span::raw(" Scope   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Books(_), Mode::Normal) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to menu"),
            ]),
            (Screen::Progress(_), Mode::Normal) => Line::from(vec![
                Span::styled("[Esc]", key_style),
                Span::raw(" Back to menu"),
            ]),
            (Screen::Menu, Mode::Normal) => Line::from(vec![
                Span::styled("[1-7]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        let hint = if form.is_update() {
            "Leave blank to keep existing value."
        } else {
            "Enter for next field • Enter on the last field saves • Esc to cancel"
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let prefix = format!("{}: ", form.active.label());
        let cursor_x = cursor_column(inner, &prefix, form.value_len(form.active));
        let cursor_y = inner.y + form.active.index() as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_title_prompt(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        question: &str,
        prompt: &TitlePrompt,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let prefix = "Title: ";
        let lines = vec![
            Line::from(format!("{question}:")),
            Line::from(vec![
                Span::raw(prefix),
                Span::styled(prompt.title.clone(), Style::default().fg(Color::Yellow)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = cursor_column(inner, prefix, prompt.title.chars().count());
        frame.set_cursor_position((cursor_x, inner.y + 1));
    }

    fn draw_search_form(&self, frame: &mut Frame, area: Rect, form: &SearchForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Search for Books")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let active_style = Style::default().fg(Color::Yellow);
        let field_style = |field: SearchField| {
            if form.active == field {
                active_style
            } else {
                Style::default()
            }
        };

        let scope_prefix = "Search by: ";
        let query_prefix = "Search term: ";
        let lines = vec![
            Line::from(vec![
                Span::styled(scope_prefix, field_style(SearchField::Scope)),
                Span::styled(
                    format!("< {} >", form.scope.label()),
                    field_style(SearchField::Scope),
                ),
            ]),
            Line::from(vec![
                Span::styled(query_prefix, field_style(SearchField::Query)),
                Span::styled(form.query.clone(), field_style(SearchField::Query)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        if form.active == SearchField::Query {
            let cursor_x = cursor_column(inner, query_prefix, form.query.chars().count());
            frame.set_cursor_position((cursor_x, inner.y + 1));
        }
    }

    fn back_to_menu(&mut self) {
        self.screen = Screen::Menu;
        self.clear_status();
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
