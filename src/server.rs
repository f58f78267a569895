//! Server address value type.

use std::fmt;

/// Address of an IRC server.
///
/// Plain value semantics: two `ServerInfo`s are equal exactly when both
/// host and port are equal. [`Connection`](crate::Connection) compares the
/// current and the newly requested address to decide whether a reconnect
/// is needed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ServerInfo {
    host: String,
    port: u16,
}

impl ServerInfo {
    /// Create a new server address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Hostname of the server.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port number to connect to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Replace the hostname. No-op when unchanged.
    pub fn set_host(&mut self, host: impl Into<String>) {
        let host = host.into();
        if self.host != host {
            self.host = host;
        }
    }

    /// Replace the port. No-op when unchanged.
    pub fn set_port(&mut self, port: u16) {
        if self.port != port {
            self.port = port;
        }
    }
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
