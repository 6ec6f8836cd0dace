//! Server error types.

use std::io;

use thiserror::Error;

/// Errors surfaced by server configuration and startup.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `add_static_dir` was called with an empty path.
    #[error("static path cannot be the empty string")]
    EmptyStaticPath,

    /// `add_static_dir` was called with a reserved path.
    #[error("static path {0:?} is reserved")]
    ReservedStaticPath(String),

    /// Socket or file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
