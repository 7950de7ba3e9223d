use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

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

/// `n. Title by Author (Year) - Genre - Read` with the status colored.
pub(crate) fn book_line(position: usize, book: &Book) -> Line<'static> {
    let status_style = if book.read {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Line::from(vec![
        Span::styled(
            format!("{position}. "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{} by {} ({}) - {} - ",
            book.title, book.author, book.year, book.genre
        )),
        Span::styled(book.status_label(), status_style),
    ])
}

/// Screen column just past `prefix` and `value_len` typed characters.
pub(crate) fn cursor_column(area: Rect, prefix: &str, value_len: usize) -> u16 {
    let offset = prefix.chars().count() + value_len;
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    area.x
        .saturating_add(offset)
        .min(area.right().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_line_renders_list_format() {
        let book = Book::new("Dune", "Herbert", "1965", "Sci-Fi", false);
        let text: String = book_line(2, &book)
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(text, format!("2. {book}"));
    }

    #[test]
    fn cursor_column_stays_inside_area() {
        let area = Rect::new(5, 0, 10, 1);
        assert_eq!(cursor_column(area, "Ab: ", 2), 11);
        assert_eq!(cursor_column(area, "A very long prefix: ", 40), 14);
    }
}
