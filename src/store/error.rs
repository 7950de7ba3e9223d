use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a store operation. Loading never produces one of these;
/// an unreadable collection degrades to an empty one instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write collection to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode collection")]
    Encode(#[from] serde_json::Error),
}
