//! Core library surface for the Book Collection Manager TUI application.
//!
//! The binary only wires these pieces together, so the store can also be
//! driven directly (tests, scripts) without a terminal.
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Logging bootstrap used by `main.rs`.
pub use logging::init_logging;

/// The domain types that other layers manipulate.
pub use models::{Book, BookUpdate, ReadingStats, SearchScope};

/// The persisted collection and its failure type.
pub use store::{BookCollection, StoreError, STORAGE_FILE};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
