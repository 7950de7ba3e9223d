//! Persistence layer: the book list and the JSON file behind it.

mod collection;
mod error;
mod storage;

pub use collection::BookCollection;
pub use error::StoreError;
pub use storage::{read_books, write_books, STORAGE_FILE};
