//! The transport contract consumed by the connection.
//!
//! The core is sans-IO: it never touches a socket or a clock. Outbound
//! traffic goes through the [`Transport`] trait it owns, and everything
//! inbound (socket lifecycle, complete lines, flush-timer ticks) is fed
//! to it as [`Input`] values by whatever loop hosts it. The `tokio`
//! feature ships a ready-made pair in [`net`](crate::net).

use std::io;

/// Reliable, ordered byte-stream transport, line-framed.
///
/// `write_line` receives the bare line; implementations append the
/// terminator. Retries, TLS, and name resolution are out of scope for the
/// core and belong behind this trait if at all.
pub trait Transport {
    /// Request a connection to `host:port`. Outcome arrives later as
    /// [`Input::Opened`] or [`Input::Error`].
    fn connect(&mut self, host: &str, port: u16);

    /// Request closure. Confirmed by [`Input::Closed`].
    fn disconnect(&mut self);

    /// Write one line to the wire.
    fn write_line(&mut self, line: &str);
}

/// External triggers a hosting loop feeds into
/// [`Connection::apply`](crate::Connection::apply).
///
/// None of these run concurrently for the same connection; the core relies
/// on that for lock-free state.
#[derive(Debug)]
pub enum Input {
    /// Transport established the connection.
    Opened,

    /// Transport closed, whether requested or by the peer.
    Closed,

    /// Transport-level failure. When fatal, `Closed` follows separately.
    Error {
        kind: io::ErrorKind,
        message: String,
    },

    /// One complete inbound line, terminator stripped.
    Line(String),

    /// Flush-timer tick; drains at most one queued outbound line.
    Tick,
}
