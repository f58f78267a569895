//! User hostmask (`nick!user@host`) value type.

use std::fmt;

/// The identity prefix IRC servers attach to messages from a user.
///
/// Produced by [`HostMask::parse`] from the prefix of an incoming line.
/// Carries no validation of its own; the line dispatcher decides which
/// prefixes are user masks and which are server names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostMask {
    nick: String,
    user: String,
    host: String,
}

impl HostMask {
    /// Assemble a hostmask from its parts.
    pub fn new(
        nick: impl Into<String>,
        user: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            user: user.into(),
            host: host.into(),
        }
    }

    /// Split a `nick!user@host` prefix.
    ///
    /// Returns `None` when the prefix lacks the `!`/`@` structure, which is
    /// how server prefixes are told apart from user prefixes.
    pub fn parse(prefix: &str) -> Option<Self> {
        let (nick, rest) = prefix.split_once('!')?;
        let (user, host) = rest.split_once('@')?;
        if nick.is_empty() {
            return None;
        }
        Some(Self::new(nick, user, host))
    }

    /// Nickname part of the mask.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Username (ident) part of the mask.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Hostname part of the mask.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for HostMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.user, self.host)
    }
}
