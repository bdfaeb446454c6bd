//! Owned IRC messages.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::command::Command;
use crate::error::MessageParseError;
use crate::parse::ParsedLine;
use crate::prefix::Prefix;

/// An owned IRC message: optional origin plus a command.
///
/// # Example
///
/// ```
/// use skerry_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.source_nickname(), Some("nick"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message prefix/source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The IRC command and its parameters.
    pub command: Command,
}

impl Message {
    /// Attach an origin prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nickname)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message {
            prefix: None,
            command,
        }
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = ParsedLine::parse(s)?;
        Ok(Message {
            prefix: parsed.prefix.map(Prefix::new_from_str),
            command: Command::new(parsed.command, parsed.params.into_vec())?,
        })
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{prefix} ")?;
        }
        write!(f, "{}\r\n", self.command)
    }
}
