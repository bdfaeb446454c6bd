//! Message prefix (origin token).
//!
//! A prefix identifies where a message came from: either a server name or a
//! user's `nick!user@host` mask.

use std::fmt;

/// IRC message prefix - identifies the origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Create a user prefix from nick, user and host components.
    pub fn new(
        nick: impl Into<String>,
        user: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Parse a prefix string.
    ///
    /// Lenient: components are not validated. A dot before any `!`/`@` marks a
    /// server name.
    pub fn new_from_str(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Name,
            User,
            Host,
        }

        let mut name = String::new();
        let mut user = String::new();
        let mut host = String::new();
        let mut part = Part::Name;
        let mut is_server = false;

        for c in s.chars() {
            if c == '.' && part == Part::Name {
                is_server = true;
            }

            match c {
                '!' if part == Part::Name => {
                    is_server = false;
                    part = Part::User;
                }
                '@' if part != Part::Host => {
                    is_server = false;
                    part = Part::Host;
                }
                _ => match part {
                    Part::Name => name.push(c),
                    Part::User => user.push(c),
                    Part::Host => host.push(c),
                },
            }
        }

        if is_server {
            Prefix::ServerName(name)
        } else {
            Prefix::Nickname(name, user, host)
        }
    }

    /// The nickname, if this is a user prefix.
    pub fn nickname(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) => Some(nick),
            Prefix::ServerName(_) => None,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => match (user.is_empty(), host.is_empty()) {
                (true, true) => write!(f, "{nick}"),
                (false, true) => write!(f, "{nick}!{user}"),
                (true, false) => write!(f, "{nick}@{host}"),
                (false, false) => write!(f, "{nick}!{user}@{host}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Prefix;

    #[test]
    fn full_mask_parses_and_renders() {
        let prefix = Prefix::new_from_str("bob!bob@host1");
        assert_eq!(prefix, Prefix::new("bob", "bob", "host1"));
        assert_eq!(prefix.to_string(), "bob!bob@host1");
    }

    #[test]
    fn dotted_name_is_a_server() {
        assert_eq!(
            Prefix::new_from_str("irc.skerry.test"),
            Prefix::ServerName("irc.skerry.test".into())
        );
        // A dotted host after '@' does not make it a server
        assert_eq!(
            Prefix::new_from_str("alice@a.b").nickname(),
            Some("alice")
        );
    }

    #[test]
    fn partial_masks_render_without_separators() {
        assert_eq!(Prefix::new("n", "", "").to_string(), "n");
        assert_eq!(Prefix::new("n", "u", "").to_string(), "n!u");
        assert_eq!(Prefix::new("n", "", "h").to_string(), "n@h");
    }
}
