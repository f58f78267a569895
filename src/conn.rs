//! The client connection engine.
//!
//! [`Connection`] owns a [`Transport`], the address of one server, and the
//! session state for it: connected flag, login identity, the nick the
//! server currently knows us by, and a FIFO queue of outbound lines drained
//! one per flush tick. It consumes [`Input`] triggers and returns the
//! [`Event`]s they produce; it never blocks and never performs I/O itself.
//!
//! All state transitions happen strictly in response to one trigger at a
//! time (a transport notification, a timer tick, or a direct call), so a
//! single instance needs no locking.

use std::collections::VecDeque;

use chrono::{TimeZone, Utc};
use tracing::{debug, warn};

use crate::event::Event;
use crate::hostmask::HostMask;
use crate::line::Line;
use crate::server::ServerInfo;
use crate::transport::{Input, Transport};

/// Interval between outbound queue flushes, in milliseconds.
pub const FLUSH_INTERVAL_MS: u64 = 10;

/// Comparator deciding whether a sender nick refers to this session.
///
/// Defaults to literal string equality. Real networks define
/// server-specific case-insensitive nick comparison; pass
/// [`casemap::irc_eq`](crate::casemap::irc_eq) to opt into RFC 1459 rules.
pub type NickEq = fn(&str, &str) -> bool;

/// A connection to a single IRC server.
pub struct Connection<T: Transport> {
    transport: T,
    server: ServerInfo,
    connected: bool,
    password: Option<String>,
    ident: String,
    nick: String,
    desired_nick: Option<String>,
    real_name: String,
    outbox: VecDeque<String>,
    nick_eq: NickEq,
}

impl<T: Transport> Connection<T> {
    /// Create a connection for `server`. Identity defaults are empty;
    /// configure them before calling [`connect`](Self::connect).
    pub fn new(server: ServerInfo, transport: T) -> Self {
        Self {
            transport,
            server,
            connected: false,
            password: None,
            ident: String::new(),
            nick: String::new(),
            desired_nick: None,
            real_name: String::new(),
            outbox: VecDeque::new(),
            nick_eq: |a, b| a == b,
        }
    }

    /// The server this connection targets.
    pub fn server(&self) -> &ServerInfo {
        &self.server
    }

    /// Whether the transport is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The nick the server currently knows us by.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Lines waiting in the outbound queue.
    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    /// Borrow the owned transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Username (ident) sent in the `USER` handshake.
    pub fn set_ident(&mut self, ident: impl Into<String>) {
        self.ident = ident.into();
    }

    /// Real name (GECOS) sent in the `USER` handshake.
    pub fn set_real_name(&mut self, real_name: impl Into<String>) {
        self.real_name = real_name.into();
    }

    /// Server password sent as `PASS` before registration, if any.
    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Replace the nick comparator used for self/other detection.
    pub fn set_nick_comparator(&mut self, eq: NickEq) {
        self.nick_eq = eq;
    }

    /// Request a connection to the current server.
    ///
    /// When already connected this disconnects first, forcing a clean
    /// reconnect rather than stacking connections. Failures surface later
    /// as [`Event::SocketError`], never here.
    pub fn connect(&mut self) {
        if self.connected {
            self.transport.disconnect();
        }
        self.transport.connect(self.server.host(), self.server.port());
    }

    /// Request closure of the transport. Queued lines are dropped once the
    /// close is confirmed.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
    }

    /// Switch servers. No-op when `server` equals the current address;
    /// otherwise reconnects if currently connected.
    pub fn set_server(&mut self, server: ServerInfo) {
        if server == self.server {
            return;
        }
        let reconnect = self.connected;
        if reconnect {
            self.transport.disconnect();
        }
        self.server = server;
        if reconnect {
            self.transport.connect(self.server.host(), self.server.port());
        }
    }

    /// Feed one external trigger; returns the events it produced, in order.
    pub fn apply(&mut self, input: Input) -> Vec<Event> {
        match input {
            Input::Opened => self.on_opened(),
            Input::Closed => self.on_closed(),
            Input::Error { kind, message } => {
                vec![Event::SocketError { kind, message }]
            }
            Input::Line(line) => self.on_line(&line).into_iter().collect(),
            Input::Tick => {
                self.on_tick();
                Vec::new()
            }
        }
    }

    fn on_opened(&mut self) -> Vec<Event> {
        self.connected = true;
        self.authenticate();
        vec![Event::Connected(self.server.clone())]
    }

    fn on_closed(&mut self) -> Vec<Event> {
        self.outbox.clear();
        self.desired_nick = None;
        self.connected = false;
        vec![Event::Disconnected(self.server.clone())]
    }

    fn on_tick(&mut self) {
        if let Some(line) = self.outbox.pop_front() {
            self.transport.write_line(&line);
        }
    }

    /// `PASS`/`USER`/`NICK` registration, all bypassing the queue so the
    /// handshake goes out immediately and in order.
    fn authenticate(&mut self) {
        if let Some(pass) = &self.password {
            let line = format!("PASS {pass}");
            self.send_now(&line);
        }
        let host = self.server.host();
        let line = format!("USER {} {host} {host} :{}", self.ident, self.real_name);
        self.send_now(&line);
        let line = format!("NICK {}", self.nick);
        self.send_now(&line);
    }

    /// Write a line immediately, bypassing the queue.
    ///
    /// Rejected with a warning while disconnected. Trailing whitespace is
    /// trimmed; the transport appends the terminator.
    pub fn send_now(&mut self, line: &str) {
        if !self.connected {
            warn!(line, "dropping send while disconnected");
            return;
        }
        self.transport.write_line(line.trim_end());
    }

    /// Append a line to the paced outbound queue.
    ///
    /// Strict FIFO; one entry leaves per flush tick, so queued lines can
    /// wait arbitrarily long under load but never flood the wire.
    pub fn enqueue(&mut self, line: &str) {
        if !self.connected {
            warn!(line, "dropping send while disconnected");
            return;
        }
        self.outbox.push_back(line.trim_end().to_owned());
    }

    /// Join a channel, with an optional key.
    pub fn join_channel(&mut self, channel: &str, key: Option<&str>) {
        let line = match key {
            Some(key) => format!("JOIN {channel} {key}"),
            None => format!("JOIN {channel}"),
        };
        self.enqueue(&line);
    }

    /// Leave a channel.
    pub fn part_channel(&mut self, channel: &str) {
        let line = format!("PART {channel}");
        self.enqueue(&line);
    }

    /// Ask the server for a channel's topic.
    pub fn request_topic(&mut self, channel: &str) {
        let line = format!("TOPIC {channel}");
        self.enqueue(&line);
    }

    /// Set a channel's topic.
    pub fn set_topic(&mut self, channel: &str, topic: &str) {
        let line = format!("TOPIC {channel} :{topic}");
        self.enqueue(&line);
    }

    /// Ask the server for the nicks present in a channel.
    pub fn request_names(&mut self, channel: &str) {
        let line = format!("NAMES {channel}");
        self.enqueue(&line);
    }

    /// Send a message to a channel or nick.
    pub fn privmsg(&mut self, target: &str, text: &str) {
        let line = format!("PRIVMSG {target} :{text}");
        self.enqueue(&line);
    }

    /// Send a notice to a channel or nick.
    pub fn notice(&mut self, target: &str, text: &str) {
        let line = format!("NOTICE {target} :{text}");
        self.enqueue(&line);
    }

    /// Change nick.
    ///
    /// Before connecting this just updates the local identity. While
    /// connected it records the requested nick and asks the server; the
    /// session nick only changes once the server echoes the change back
    /// (surfaced as [`Event::NickChanged`]).
    pub fn set_nick(&mut self, nick: &str) {
        if !self.connected {
            self.nick = nick.to_owned();
            return;
        }
        self.desired_nick = Some(nick.to_owned());
        let line = format!("NICK {nick}");
        self.send_now(&line);
    }

    /// Send `QUIT` with a parting message, immediately. With
    /// `disconnect_after` the transport is closed right away instead of
    /// waiting for the server to drop the socket.
    pub fn quit(&mut self, message: &str, disconnect_after: bool) {
        let line = format!("QUIT :{message}");
        self.send_now(&line);
        if disconnect_after {
            self.disconnect();
        }
    }

    /// Classify one inbound line. Unrecognized lines produce no event and
    /// are logged for diagnostics.
    fn on_line(&mut self, raw: &str) -> Option<Event> {
        let line = match Line::parse(raw) {
            Ok(line) => line,
            Err(err) => {
                debug!(%err, raw, "unparsed line");
                return None;
            }
        };

        if line.command == "PING" {
            let server = line.arg(0).unwrap_or_default().to_owned();
            let pong = format!("PONG {server}");
            self.send_now(&pong);
            return Some(Event::Ping { server });
        }

        let Some(prefix) = line.prefix else {
            debug!(raw, "unhandled line without prefix");
            return None;
        };

        if let Some(code) = line.numeric() {
            return Some(self.on_numeric(prefix, code, &line));
        }

        match HostMask::parse(prefix) {
            Some(from) => self.on_user_line(from, &line, raw),
            None => self.on_server_line(prefix, &line, raw),
        }
    }

    fn on_numeric(&mut self, server: &str, code: u16, line: &Line<'_>) -> Event {
        // 333 carries the channel creator mask and a unix timestamp;
        // anything malformed degrades to the generic numeric event.
        if code == 333 {
            if let (Some(channel), Some(mask), Some(ts)) =
                (line.arg(1), line.arg(2), line.arg(3))
            {
                if let (Some(creator), Ok(secs)) = (HostMask::parse(mask), ts.parse::<i64>()) {
                    if let Some(at) = Utc.timestamp_opt(secs, 0).single() {
                        return Event::ChannelInfo {
                            channel: channel.to_owned(),
                            creator,
                            at,
                        };
                    }
                }
            }
        }
        Event::Numeric {
            server: server.to_owned(),
            code,
            target: line.arg(0).unwrap_or_default().to_owned(),
            text: line.params.last().copied().unwrap_or_default().to_owned(),
        }
    }

    fn on_server_line(&mut self, server: &str, line: &Line<'_>, raw: &str) -> Option<Event> {
        if line.command == "NOTICE" && line.arg(0) == Some("AUTH") {
            return Some(Event::NoticeAuth {
                server: server.to_owned(),
                text: line.arg(1).unwrap_or_default().to_owned(),
            });
        }
        debug!(raw, "unhandled server line");
        None
    }

    fn on_user_line(&mut self, from: HostMask, line: &Line<'_>, raw: &str) -> Option<Event> {
        let is_self = (self.nick_eq)(from.nick(), &self.nick);
        let event = match line.command {
            "NOTICE" => Event::Notice {
                from,
                target: line.arg(0)?.to_owned(),
                text: line.arg(1).unwrap_or_default().to_owned(),
            },
            "PRIVMSG" => Event::Privmsg {
                from,
                target: line.arg(0)?.to_owned(),
                text: line.arg(1).unwrap_or_default().to_owned(),
            },
            "MODE" => Event::Mode {
                from,
                target: line.arg(0)?.to_owned(),
                modes: line.params[1..].join(" "),
            },
            "NICK" => {
                let new = line.arg(0)?;
                if is_self && self.desired_nick.as_deref() == Some(new) {
                    let old = std::mem::replace(&mut self.nick, new.to_owned());
                    self.desired_nick = None;
                    Event::NickChanged {
                        old,
                        new: new.to_owned(),
                    }
                } else {
                    Event::Nick {
                        from,
                        nick: new.to_owned(),
                    }
                }
            }
            "JOIN" => {
                let channel = line.arg(0)?.to_owned();
                if is_self {
                    Event::JoinedChannel { channel }
                } else {
                    Event::Join { from, channel }
                }
            }
            "PART" => {
                let channel = line.arg(0)?.to_owned();
                if is_self {
                    Event::PartedChannel { channel }
                } else {
                    Event::Part { from, channel }
                }
            }
            "TOPIC" => Event::Topic {
                from,
                channel: line.arg(0)?.to_owned(),
                topic: line.arg(1).unwrap_or_default().to_owned(),
            },
            "INVITE" => Event::Invite {
                from,
                target: line.arg(0)?.to_owned(),
                channel: line.arg(1)?.to_owned(),
            },
            _ => {
                debug!(raw, "unhandled user line");
                return None;
            }
        };
        Some(event)
    }
}
