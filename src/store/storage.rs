use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::error::StoreError;
use crate::models::Book;

/// File the collection lives in, relative to the working directory.
pub const STORAGE_FILE: &str = "books_data.json";

/// Indentation used when writing the file so it stays readable by hand.
const INDENT: &[u8] = b"    ";

/// Read every book stored at `path`. A missing, unreadable, or malformed file
/// yields an empty collection rather than an error.
pub fn read_books(path: &Path) -> Vec<Book> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no collection at {}, starting empty", path.display());
            return Vec::new();
        }
        Err(err) => {
            warn!("could not read {}: {err}; starting empty", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Book>>(&content) {
        Ok(books) => {
            debug!("loaded {} books from {}", books.len(), path.display());
            books
        }
        Err(err) => {
            warn!("ignoring malformed collection {}: {err}", path.display());
            Vec::new()
        }
    }
}

/// Overwrite `path` with the pretty-printed JSON array of `books`.
pub fn write_books(path: &Path, books: &[Book]) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    books.serialize(&mut serializer)?;

    fs::write(path, &buf).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("saved {} books to {}", books.len(), path.display());
    Ok(())
}
