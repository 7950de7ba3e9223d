use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, BookUpdate, SearchScope};

/// Interpret a yes/no answer. Only "yes" (any case, surrounding whitespace
/// ignored) counts as read.
pub(crate) fn parse_read_answer(answer: &str) -> bool {
    answer.trim().to_lowercase() == "yes"
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Fields available within the book form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Read,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Publication year",
            BookField::Genre => "Genre",
            BookField::Read => "Have you read this book? (yes/no)",
        }
    }

    /// Row offset of the field inside the form.
    pub(crate) fn index(self) -> usize {
        match self {
            BookField::Title => 0,
            BookField::Author => 1,
            BookField::Year => 2,
            BookField::Genre => 3,
            BookField::Read => 4,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Form state shared by the add and update flows. When `current` is set the
/// form edits an existing book and blank inputs keep the stored values.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) read: String,
    pub(crate) active: BookField,
    current: Option<Book>,
}

impl BookForm {
    /// Start an edit form whose placeholders show the book's current values.
    pub(crate) fn for_update(book: &Book) -> Self {
        Self {
            current: Some(book.clone()),
            ..Self::default()
        }
    }

    pub(crate) fn is_update(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn focus(&mut self, field: BookField) {
        self.active = field;
    }

    /// Advance focus, wrapping from the last field to the first.
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    pub(crate) fn on_last_field(&self) -> bool {
        self.active == BookField::Read
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Read => &self.read,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Genre => &mut self.genre,
            BookField::Read => &mut self.read,
        }
    }

    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.value(field).chars().count()
    }

    /// Build a new book from the inputs. Text is stored exactly as typed.
    pub(crate) fn to_book(&self) -> Book {
        Book::new(
            self.title.clone(),
            self.author.clone(),
            self.year.clone(),
            self.genre.clone(),
            parse_read_answer(&self.read),
        )
    }

    /// Collect the replacement values for an update. A blank read answer keeps
    /// the current flag; any other answer sets it.
    pub(crate) fn to_update(&self) -> BookUpdate {
        let read = if self.read.trim().is_empty() {
            None
        } else {
            Some(parse_read_answer(&self.read))
        };

        BookUpdate {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year.clone(),
            genre: self.genre.clone(),
            read,
        }
    }

    /// Ghost text shown while a field is empty.
    fn placeholder(&self, field: BookField) -> String {
        match (&self.current, field) {
            (Some(book), BookField::Title) => book.title.clone(),
            (Some(book), BookField::Author) => book.author.clone(),
            (Some(book), BookField::Year) => book.year.clone(),
            (Some(book), BookField::Genre) => book.genre.clone(),
            (Some(book), BookField::Read) => yes_no(book.read).to_string(),
            (None, BookField::Read) => "no".to_string(),
            (None, _) => String::new(),
        }
    }

    /// Render a single `Label: value` line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let (display, style) = if value.is_empty() {
            (self.placeholder(field), Style::default().fg(Color::DarkGray))
        } else if is_active {
            (value.to_string(), Style::default().fg(Color::Yellow))
        } else {
            (value.to_string(), Style::default())
        };

        let label_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(format!("{}: ", field.label()), label_style),
            Span::styled(display, style),
        ])
    }
}

/// Single-line title entry used to pick the book to remove or update.
#[derive(Default, Clone)]
pub(crate) struct TitlePrompt {
    pub(crate) title: String,
}

impl TitlePrompt {
    pub(crate) fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.title.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.title.pop();
    }
}

/// Fields within the search form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum SearchField {
    #[default]
    Scope,
    Query,
}

/// Scope selector plus search term.
#[derive(Default, Clone)]
pub(crate) struct SearchForm {
    pub(crate) scope: SearchScope,
    pub(crate) query: String,
    pub(crate) active: SearchField,
}

impl SearchForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            SearchField::Scope => SearchField::Query,
            SearchField::Query => SearchField::Scope,
        };
    }

    /// Handle a typed character. On the scope field the digits 1-3 pick
    /// title, author, or both; anything else is ignored there.
    pub(crate) fn push_char(&mut self, ch: char) {
        match self.active {
            SearchField::Scope => match ch {
                '1' => self.scope = SearchScope::Title,
                '2' => self.scope = SearchScope::Author,
                '3' => self.scope = SearchScope::Both,
                _ => {}
            },
            SearchField::Query => {
                if !ch.is_control() {
                    self.query.push(ch);
                }
            }
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == SearchField::Query {
            self.query.pop();
        }
    }

    pub(crate) fn cycle_scope(&mut self, forward: bool) {
        if self.active != SearchField::Scope {
            return;
        }
        self.scope = if forward {
            self.scope.next()
        } else {
            self.scope.previous()
        };
    }
}
