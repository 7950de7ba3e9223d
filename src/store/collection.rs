use std::path::{Path, PathBuf};

use log::{debug, info};

use super::error::StoreError;
use super::storage::{read_books, write_books, STORAGE_FILE};
use crate::models::{Book, BookUpdate, ReadingStats, SearchScope};

/// The in-memory book list together with the file it is persisted to. Every
/// successful mutation writes the whole list back before returning, so the
/// file and the list only diverge if the process dies in between.
#[derive(Debug)]
pub struct BookCollection {
    path: PathBuf,
    books: Vec<Book>,
}

impl BookCollection {
    /// Load the collection stored at `path`, falling back to an empty list when
    /// the file is missing or unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let books = read_books(&path);
        info!("opened collection {} ({} books)", path.display(), books.len());
        Self { path, books }
    }

    /// Load from the default storage file in the working directory.
    pub fn open_default() -> Self {
        Self::load(STORAGE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current list to disk, replacing whatever was there.
    pub fn save(&self) -> Result<(), StoreError> {
        write_books(&self.path, &self.books)
    }

    /// Append a book and persist. No validation or duplicate check happens
    /// here; blank fields are stored as-is.
    pub fn add(&mut self, book: Book) -> Result<&Book, StoreError> {
        info!("adding {:?} by {:?}", book.title, book.author);
        self.books.push(book);
        self.save()?;
        let index = self.books.len() - 1;
        Ok(&self.books[index])
    }

    /// Remove the first book whose title matches case-insensitively. Returns
    /// `None` without touching the file when nothing matches.
    pub fn remove(&mut self, title: &str) -> Result<Option<Book>, StoreError> {
        let Some(index) = self.position(title) else {
            debug!("remove: no book titled {title:?}");
            return Ok(None);
        };

        let removed = self.books.remove(index);
        self.save()?;
        info!("removed {:?}", removed.title);
        Ok(Some(removed))
    }

    /// Books whose selected field(s) contain `query`, ignoring case, in
    /// collection order.
    pub fn find(&self, query: &str, scope: SearchScope) -> Vec<Book> {
        let needle = query.to_lowercase();
        let found: Vec<Book> = self
            .books
            .iter()
            .filter(|book| book.matches(&needle, scope))
            .cloned()
            .collect();
        debug!("find {query:?} in {scope:?}: {} hits", found.len());
        found
    }

    /// Apply `changes` to the first book whose title matches, then persist.
    /// Blank replacement values keep the current field.
    pub fn update(
        &mut self,
        title: &str,
        changes: BookUpdate,
    ) -> Result<Option<&Book>, StoreError> {
        let Some(index) = self.position(title) else {
            debug!("update: no book titled {title:?}");
            return Ok(None);
        };

        self.books[index].apply(changes);
        self.save()?;
        info!("updated {:?}", self.books[index].title);
        Ok(Some(&self.books[index]))
    }

    /// Look up the first book with a matching title without modifying it.
    pub fn get(&self, title: &str) -> Option<&Book> {
        self.position(title).map(|index| &self.books[index])
    }

    pub fn list_all(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn stats(&self) -> ReadingStats {
        ReadingStats::from_books(&self.books)
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.books.iter().position(|book| book.has_title(title))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn empty_collection() -> (TempDir, BookCollection) {
        let dir = tempfile::tempdir().unwrap();
        let collection = BookCollection::load(dir.path().join(STORAGE_FILE));
        (dir, collection)
    }

    fn dune() -> Book {
        Book::new("Dune", "Herbert", "1965", "Sci-Fi", true)
    }

    fn hobbit() -> Book {
        Book::new("The Hobbit", "Tolkien", "1937", "Fantasy", false)
    }

    #[test]
    fn add_appends_and_persists() {
        let (_dir, mut collection) = empty_collection();
        let added = collection.add(dune()).unwrap().clone();
        assert_eq!(added, dune());
        assert_eq!(collection.list_all(), &[dune()]);

        let stats = collection.stats();
        assert_eq!((stats.total, stats.read), (1, 1));
        assert_eq!(stats.percentage_read, 100.0);

        let reloaded = BookCollection::load(collection.path());
        assert_eq!(reloaded.list_all(), &[dune()]);
    }

    #[test]
    fn add_accepts_blank_fields_and_duplicates() {
        let (_dir, mut collection) = empty_collection();
        collection.add(Book::new("", "", "", "", false)).unwrap();
        collection.add(dune()).unwrap();
        collection.add(dune()).unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.list_all()[0].title, "");
    }

    #[test]
    fn remove_matches_title_case_insensitively() {
        let (_dir, mut collection) = empty_collection();
        collection.add(dune()).unwrap();
        collection.add(hobbit()).unwrap();

        let removed = collection.remove("dune").unwrap();
        assert_eq!(removed, Some(dune()));
        assert_eq!(collection.list_all(), &[hobbit()]);
        assert_eq!(
            BookCollection::load(collection.path()).list_all(),
            &[hobbit()]
        );
    }

    #[test]
    fn remove_requires_exact_title() {
        let (_dir, mut collection) = empty_collection();
        collection.add(dune()).unwrap();
        assert_eq!(collection.remove("Dun").unwrap(), None);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_missing_title_does_not_save() {
        let (_dir, mut collection) = empty_collection();
        assert_eq!(collection.remove("Dune").unwrap(), None);
        assert!(collection.is_empty());
        assert!(!collection.path().exists());
    }

    #[test]
    fn remove_only_takes_first_duplicate() {
        let (_dir, mut collection) = empty_collection();
        let mut second = dune();
        second.author = "Someone Else".into();
        collection.add(dune()).unwrap();
        collection.add(second.clone()).unwrap();

        collection.remove("DUNE").unwrap();
        assert_eq!(collection.list_all(), &[second]);
    }

    #[test]
    fn update_changes_only_non_blank_fields() {
        let (_dir, mut collection) = empty_collection();
        collection.add(dune()).unwrap();

        let changes = BookUpdate {
            year: "1967".into(),
            read: Some(false),
            ..BookUpdate::default()
        };
        let updated = collection.update("Dune", changes).unwrap().cloned();
        let expected = Book::new("Dune", "Herbert", "1967", "Sci-Fi", false);
        assert_eq!(updated, Some(expected.clone()));
        assert_eq!(
            BookCollection::load(collection.path()).list_all(),
            &[expected]
        );
    }

    #[test]
    fn update_missing_title_reports_none() {
        let (_dir, mut collection) = empty_collection();
        collection.add(hobbit()).unwrap();
        let result = collection
            .update("Dune", BookUpdate::default())
            .unwrap()
            .cloned();
        assert_eq!(result, None);
        assert_eq!(collection.list_all(), &[hobbit()]);
    }

    #[test]
    fn update_only_touches_first_duplicate() {
        let (_dir, mut collection) = empty_collection();
        collection.add(dune()).unwrap();
        collection.add(dune()).unwrap();
        let changes = BookUpdate {
            genre: "Classic".into(),
            ..BookUpdate::default()
        };
        collection.update("dune", changes).unwrap();
        assert_eq!(collection.list_all()[0].genre, "Classic");
        assert_eq!(collection.list_all()[1].genre, "Sci-Fi");
    }

    #[test]
    fn find_by_author_keeps_collection_order() {
        let (_dir, mut collection) = empty_collection();
        let children = Book::new("Children of Dune", "HERBERT", "1976", "Sci-Fi", false);
        collection.add(dune()).unwrap();
        collection.add(hobbit()).unwrap();
        collection.add(children.clone()).unwrap();

        let found = collection.find("her", SearchScope::Author);
        assert_eq!(found, vec![dune(), children]);
        assert!(collection.find("zzz", SearchScope::Both).is_empty());
    }

    #[test]
    fn find_scope_selects_fields() {
        let (_dir, mut collection) = empty_collection();
        collection.add(dune()).unwrap();
        collection.add(hobbit()).unwrap();

        assert_eq!(collection.find("hobbit", SearchScope::Title), vec![hobbit()]);
        assert!(collection.find("hobbit", SearchScope::Author).is_empty());
        assert_eq!(collection.find("T", SearchScope::Both).len(), 2);
    }

    #[test]
    fn stats_on_empty_collection() {
        let (_dir, collection) = empty_collection();
        let stats = collection.stats();
        assert_eq!((stats.total, stats.read), (0, 0));
        assert_eq!(stats.percentage_read, 0.0);
    }

    #[test]
    fn corrupt_file_loads_empty_and_is_overwritten_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        fs::write(&path, "[{]").unwrap();

        let mut collection = BookCollection::load(&path);
        assert!(collection.is_empty());
        collection.add(dune()).unwrap();
        assert_eq!(BookCollection::load(&path).list_all(), &[dune()]);
    }

    #[test]
    fn numeric_year_survives_the_next_add() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORAGE_FILE);
        fs::write(
            &path,
            r#"[{"title":"Emma","author":"Austen","year":1815,"genre":"Novel","read":false}]"#,
        )
        .unwrap();

        let mut collection = BookCollection::load(&path);
        assert_eq!(collection.len(), 1);
        collection.add(dune()).unwrap();

        let emma = Book::new("Emma", "Austen", "1815", "Novel", false);
        assert_eq!(BookCollection::load(&path).list_all(), &[emma, dune()]);
    }

    #[test]
    fn failed_save_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = BookCollection::load(dir.path().join("missing").join(STORAGE_FILE));
        let err = collection.add(dune()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn get_returns_first_match() {
        let (_dir, mut collection) = empty_collection();
        collection.add(hobbit()).unwrap();
        assert_eq!(collection.get("the hobbit"), Some(&hobbit()));
        assert_eq!(collection.get("Dune"), None);
    }
}
