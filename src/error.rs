//! Error types for the client connection engine.
//!
//! Transport failures are reported to the application as
//! [`Event::SocketError`](crate::Event::SocketError), never as errors
//! returned into caller code; the types here cover the codec boundary,
//! driver setup, and parser diagnostics.

use std::io;

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Failures at the wire and setup boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Inbound bytes were not valid UTF-8.
    #[error("decode error: {0}")]
    Decode(#[from] std::str::Utf8Error),

    /// A line exceeded the maximum allowed length.
    #[error("line too long: {0} bytes")]
    LineTooLong(usize),

    /// Driver setup was attempted outside an async runtime.
    #[error("no async runtime: {0}")]
    Runtime(String),
}

impl ClientError {
    /// The [`io::ErrorKind`] to report for this failure.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io(err) => err.kind(),
            _ => io::ErrorKind::InvalidData,
        }
    }
}

/// Reasons an inbound line failed to split into prefix/command/params.
///
/// Diagnostic only: an unparseable line is logged and skipped, never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineParseError {
    /// Line was empty after terminator trimming.
    #[error("empty line")]
    EmptyLine,

    /// No command token was found.
    #[error("missing command")]
    MissingCommand,
}
