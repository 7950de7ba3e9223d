use crate::models::Book;

/// Entries of the main menu, in the order they are numbered on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuItem {
    AddBook,
    RemoveBook,
    SearchBooks,
    UpdateBook,
    ViewAll,
    ReadingProgress,
    Exit,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 7] = [
        MenuItem::AddBook,
        MenuItem::RemoveBook,
        MenuItem::SearchBooks,
        MenuItem::UpdateBook,
        MenuItem::ViewAll,
        MenuItem::ReadingProgress,
        MenuItem::Exit,
    ];

    /// Map a typed menu number ('1'..='7') to its entry.
    pub(crate) fn from_choice(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)? as usize;
        digit
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::AddBook => "Add a new book",
            MenuItem::RemoveBook => "Remove a book",
            MenuItem::SearchBooks => "Search for books",
            MenuItem::UpdateBook => "Update book details",
            MenuItem::ViewAll => "View all books",
            MenuItem::ReadingProgress => "View reading progress",
            MenuItem::Exit => "Exit",
        }
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|item| *item == self)
            .unwrap_or_default()
    }

    /// The 1-based number printed next to the label.
    pub(crate) fn number(self) -> usize {
        self.position() + 1
    }
}

/// Highlight state for the main menu.
#[derive(Default)]
pub(crate) struct MenuScreen {
    pub(crate) selected: usize,
}

impl MenuScreen {
    pub(crate) fn current(&self) -> MenuItem {
        MenuItem::ALL[self.selected.min(MenuItem::ALL.len() - 1)]
    }

    pub(crate) fn select(&mut self, item: MenuItem) {
        self.selected = item.position();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = MenuItem::ALL.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }
}

/// A read-only, scrollable list of books (the full collection or search
/// results).
pub(crate) struct BookListScreen {
    pub(crate) heading: String,
    pub(crate) books: Vec<Book>,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn new(heading: impl Into<String>, books: Vec<Book>) -> Self {
        Self {
            heading: heading.into(),
            books,
            selected: 0,
        }
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let len = self.books.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.books.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.books.is_empty() {
            self.selected = self.books.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_to_numbers() {
        assert_eq!(MenuItem::from_choice('1'), Some(MenuItem::AddBook));
        assert_eq!(MenuItem::from_choice('7'), Some(MenuItem::Exit));
        assert_eq!(MenuItem::from_choice('0'), None);
        assert_eq!(MenuItem::from_choice('8'), None);
        assert_eq!(MenuItem::from_choice('x'), None);
        for item in MenuItem::ALL {
            let digit = char::from_digit(item.number() as u32, 10).unwrap();
            assert_eq!(MenuItem::from_choice(digit), Some(item));
        }
    }

    #[test]
    fn menu_selection_is_clamped() {
        let mut menu = MenuScreen::default();
        menu.move_selection(-1);
        assert_eq!(menu.current(), MenuItem::AddBook);
        menu.move_selection(20);
        assert_eq!(menu.current(), MenuItem::Exit);
        menu.select(MenuItem::UpdateBook);
        assert_eq!(menu.selected, 3);
    }

    #[test]
    fn list_selection_stays_in_bounds() {
        let books = vec![
            Book::new("A", "", "", "", false),
            Book::new("B", "", "", "", true),
        ];
        let mut list = BookListScreen::new("Your Book Collection:", books);
        list.move_selection(5);
        assert_eq!(list.current_book().map(|b| b.title.as_str()), Some("B"));
        list.select_first();
        assert_eq!(list.selected, 0);
        list.select_last();
        assert_eq!(list.selected, 1);

        let mut empty = BookListScreen::new("Matching Books:", Vec::new());
        empty.move_selection(1);
        assert!(empty.current_book().is_none());
    }
}
