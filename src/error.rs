use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures the shell itself can run into, as opposed to failures of the commands it runs.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The terminal could not be switched to raw mode. The interactive session can't start.
    #[error("cannot enter raw terminal mode: {0}")]
    RawMode(#[source] io::Error),

    /// A redirection target could not be created or opened for writing.
    #[error("{}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
