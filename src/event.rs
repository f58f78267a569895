//! Typed events produced by the connection.
//!
//! Each recognized inbound line becomes exactly one [`Event`]; side effects
//! (the automatic `PONG`, self-nick tracking) are applied before the event
//! reaches the application. Lifecycle transitions and transport failures
//! arrive through the same enum, so a consumer has a single ordered stream
//! to react to.

use std::io;

use chrono::{DateTime, Utc};

use crate::hostmask::HostMask;
use crate::server::ServerInfo;

/// An event surfaced to the application layer.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Event {
    /// Transport connected; the login handshake has already been written.
    Connected(ServerInfo),

    /// Transport closed. Queued-but-unsent lines were dropped.
    Disconnected(ServerInfo),

    /// The transport reported an error. Does not itself change connection
    /// state; a fatal error is followed by [`Event::Disconnected`].
    SocketError {
        kind: io::ErrorKind,
        message: String,
    },

    /// `NOTICE AUTH` from the server during registration.
    NoticeAuth { server: String, text: String },

    /// Numeric status reply. Recognized, not otherwise acted upon.
    Numeric {
        server: String,
        code: u16,
        target: String,
        text: String,
    },

    /// Notice from another user.
    Notice {
        from: HostMask,
        target: String,
        text: String,
    },

    /// Message from another user.
    Privmsg {
        from: HostMask,
        target: String,
        text: String,
    },

    /// Mode change on a target.
    Mode {
        from: HostMask,
        target: String,
        modes: String,
    },

    /// Our own nick change was confirmed by the server.
    NickChanged { old: String, new: String },

    /// Somebody else changed their nick.
    Nick { from: HostMask, nick: String },

    /// We joined a channel.
    JoinedChannel { channel: String },

    /// Somebody else joined a channel.
    Join { from: HostMask, channel: String },

    /// We left a channel.
    PartedChannel { channel: String },

    /// Somebody else left a channel.
    Part { from: HostMask, channel: String },

    /// Server ping. The `PONG` reply has already been written back.
    Ping { server: String },

    /// Channel topic change.
    Topic {
        from: HostMask,
        channel: String,
        topic: String,
    },

    /// Invitation to a channel.
    Invite {
        from: HostMask,
        target: String,
        channel: String,
    },

    /// RPL 333: who last touched the channel topic, and when.
    ChannelInfo {
        channel: String,
        creator: HostMask,
        at: DateTime<Utc>,
    },
}
