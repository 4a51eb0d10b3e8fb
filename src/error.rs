use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Everything else is recovered locally (see `config::ConfigWarning`).
#[derive(Error, Debug)]
pub enum FireError {
    /// The configuration file is missing or unreadable.
    #[error("cannot open configuration file {}: {source}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Negative or oversized grid dimensions. Rejected before anything is allocated.
    #[error(
        "invalid grid dimensions {height}x{width}: height and width must be >= 0 \
         and span at most {max} cells",
        max = crate::forest::MAX_CELLS
    )]
    InvalidDimensions { height: i64, width: i64 },
}

pub type Result<T> = std::result::Result<T, FireError>;
