//! # slirc-client
//!
//! A client-side IRC connection engine. One [`Connection`] maintains the
//! session with one server: it runs the connect/authenticate/disconnect
//! lifecycle, classifies inbound lines into typed [`Event`]s, and paces
//! queued outbound commands through a fixed-interval flush.
//!
//! ## Design
//!
//! The core is sans-IO. It owns a [`Transport`] it writes through, and is
//! driven by [`Input`] notifications (socket lifecycle, complete lines,
//! flush ticks) fed to [`Connection::apply`], which returns the events
//! each trigger produced. Any event loop can host it; the default `tokio`
//! feature ships a TCP transport and timer in [`net`].
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_client::{Connection, Event, Input, ServerInfo, Transport};
//!
//! struct Wire(Vec<String>);
//!
//! impl Transport for Wire {
//!     fn connect(&mut self, _host: &str, _port: u16) {}
//!     fn disconnect(&mut self) {}
//!     fn write_line(&mut self, line: &str) {
//!         self.0.push(line.to_owned());
//!     }
//! }
//!
//! let mut conn = Connection::new(ServerInfo::new("irc.example.org", 6667), Wire(Vec::new()));
//! conn.set_ident("bot");
//! conn.set_real_name("Example Bot");
//! conn.set_nick("bot");
//! conn.connect();
//!
//! let events = conn.apply(Input::Opened);
//! assert!(matches!(events[0], Event::Connected(_)));
//!
//! let events = conn.apply(Input::Line(":alice!a@h PRIVMSG #rust :hi".into()));
//! assert!(matches!(events[0], Event::Privmsg { .. }));
//! ```
//!
//! ## With tokio
//!
//! ```no_run
//! # #[cfg(feature = "tokio")]
//! # async fn run() -> Result<(), slirc_client::ClientError> {
//! use slirc_client::{net, Connection, ServerInfo};
//!
//! let (transport, mut inputs) = net::spawn()?;
//! let mut conn = Connection::new(ServerInfo::new("irc.libera.chat", 6667), transport);
//! conn.set_ident("bot");
//! conn.set_real_name("Example Bot");
//! conn.set_nick("slirc_bot");
//! conn.connect();
//!
//! while let Some(input) = inputs.recv().await {
//!     for event in conn.apply(input) {
//!         println!("{event:?}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod casemap;
pub mod colors;
pub mod conn;
pub mod error;
pub mod event;
pub mod hostmask;
pub mod line;
pub mod server;
pub mod transport;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::colors::FormattedStringExt;
pub use self::conn::{Connection, NickEq, FLUSH_INTERVAL_MS};
pub use self::error::{ClientError, LineParseError};
pub use self::event::Event;
pub use self::hostmask::HostMask;
pub use self::line::Line;
pub use self::server::ServerInfo;
pub use self::transport::{Input, Transport};

#[cfg(feature = "tokio")]
pub mod net;
#[cfg(feature = "tokio")]
pub use self::net::{LineCodec, TcpTransport, MAX_LINE_LEN};
