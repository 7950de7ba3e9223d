//! Domain models that mirror the JSON storage format and get passed throughout
//! the TUI. These types stay light-weight data holders so the store can focus
//! on persistence and the UI on presentation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single entry in the collection. Field names match the keys of the
/// objects stored in `books_data.json`.
pub struct Book {
    /// Lookup key for remove/update. Compared case-insensitively and not
    /// required to be unique.
    pub title: String,
    pub author: String,
    /// Publication year as typed by the user. Kept as free text so entries like
    /// "c. 1600" or an empty string survive a round trip. Hand-edited files
    /// that store it as a JSON number are read as the number's text.
    #[serde(deserialize_with = "year_from_text_or_number")]
    pub year: String,
    pub genre: String,
    pub read: bool,
}

fn year_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(text) => text,
        Year::Number(number) => number.to_string(),
    })
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
            genre: genre.into(),
            read,
        }
    }

    /// Case-insensitive exact comparison against the title.
    pub fn has_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }

    /// Case-insensitive substring match over the fields selected by `scope`.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str, scope: SearchScope) -> bool {
        let in_title = || self.title.to_lowercase().contains(needle);
        let in_author = || self.author.to_lowercase().contains(needle);
        match scope {
            SearchScope::Title => in_title(),
            SearchScope::Author => in_author(),
            SearchScope::Both => in_title() || in_author(),
        }
    }

    /// Apply the non-blank values of `changes`, keeping everything else.
    pub(crate) fn apply(&mut self, changes: BookUpdate) {
        fn replace(slot: &mut String, value: String) {
            if !value.is_empty() {
                *slot = value;
            }
        }

        replace(&mut self.title, changes.title);
        replace(&mut self.author, changes.author);
        replace(&mut self.year, changes.year);
        replace(&mut self.genre, changes.genre);
        if let Some(read) = changes.read {
            self.read = read;
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

impl fmt::Display for Book {
    /// `Title by Author (Year) - Genre - Read`, the line shown in list views.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}

/// Replacement values for an update. Blank strings and `None` keep the
/// current value of the matching field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
    pub read: Option<bool>,
}

/// Which fields a search query is matched against.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum SearchScope {
    #[default]
    Title,
    Author,
    Both,
}

impl SearchScope {
    pub fn label(self) -> &'static str {
        match self {
            SearchScope::Title => "Title",
            SearchScope::Author => "Author",
            SearchScope::Both => "Title or author",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SearchScope::Title => SearchScope::Author,
            SearchScope::Author => SearchScope::Both,
            SearchScope::Both => SearchScope::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            SearchScope::Title => SearchScope::Both,
            SearchScope::Author => SearchScope::Title,
            SearchScope::Both => SearchScope::Author,
        }
    }
}

/// Totals reported by the reading progress view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReadingStats {
    pub total: usize,
    pub read: usize,
    /// Share of read books, 0-100, rounded to two decimals. Zero for an empty
    /// collection.
    pub percentage_read: f64,
}

impl ReadingStats {
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read = books.iter().filter(|book| book.read).count();
        let percentage_read = if total == 0 {
            0.0
        } else {
            let raw = read as f64 / total as f64 * 100.0;
            (raw * 100.0).round() / 100.0
        };

        Self {
            total,
            read,
            percentage_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book::new("Dune", "Frank Herbert", "1965", "Sci-Fi", true)
    }

    #[test]
    fn display_matches_list_format() {
        assert_eq!(
            dune().to_string(),
            "Dune by Frank Herbert (1965) - Sci-Fi - Read"
        );
        let mut unread = dune();
        unread.read = false;
        assert!(unread.to_string().ends_with("- Unread"));
    }

    #[test]
    fn numeric_year_is_read_as_text() {
        let book: Book = serde_json::from_str(
            r#"{"title":"Emma","author":"Austen","year":1815,"genre":"Novel","read":false}"#,
        )
        .unwrap();
        assert_eq!(book.year, "1815");

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["year"], serde_json::Value::String("1815".into()));
    }

    #[test]
    fn non_scalar_year_is_rejected() {
        let result = serde_json::from_str::<Book>(
            r#"{"title":"Emma","author":"Austen","year":[1815],"genre":"Novel","read":false}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn title_comparison_ignores_case() {
        assert!(dune().has_title("dUNE"));
        assert!(!dune().has_title("Dune Messiah"));
    }

    #[test]
    fn matches_respects_scope() {
        let book = dune();
        assert!(book.matches("her", SearchScope::Author));
        assert!(!book.matches("her", SearchScope::Title));
        assert!(book.matches("un", SearchScope::Title));
        assert!(book.matches("her", SearchScope::Both));
        assert!(book.matches("", SearchScope::Title));
    }

    #[test]
    fn apply_keeps_blank_fields() {
        let mut book = dune();
        book.apply(BookUpdate {
            year: "1967".into(),
            read: Some(false),
            ..BookUpdate::default()
        });
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.genre, "Sci-Fi");
        assert_eq!(book.year, "1967");
        assert!(!book.read);
    }

    #[test]
    fn stats_round_to_two_decimals() {
        let books = vec![
            Book::new("A", "", "", "", true),
            Book::new("B", "", "", "", false),
            Book::new("C", "", "", "", false),
        ];
        let stats = ReadingStats::from_books(&books);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.read, 1);
        assert_eq!(stats.percentage_read, 33.33);
    }

    #[test]
    fn stats_on_empty_collection_are_zero() {
        let stats = ReadingStats::from_books(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.read, 0);
        assert_eq!(stats.percentage_read, 0.0);
    }

    #[test]
    fn scope_cycles_through_all_variants() {
        let scope = SearchScope::Title;
        assert_eq!(scope.next().next().next(), scope);
        assert_eq!(scope.previous(), SearchScope::Both);
    }
}
