//! Binary entry point: start file logging, load the collection from
//! `books_data.json`, and drive the menu loop until the user exits.
use book_collection_manager::{init_logging, run_app, App, BookCollection};

/// Returning a `Result` bubbles fatal problems (for example the collection file
/// becoming unwritable) up to the terminal after the TUI has been torn down.
fn main() -> anyhow::Result<()> {
    // Logging is optional; the collection works without it.
    let _logger = init_logging()
        .map_err(|err| eprintln!("logging disabled: {err:#}"))
        .ok();

    let collection = BookCollection::open_default();
    let mut app = App::new(collection);
    run_app(&mut app)?;

    println!("Thank you for using Book Collection Manager. Goodbye!");
    Ok(())
}
