//! # skerry-proto
//!
//! Parsing and composition of the line-oriented IRC dialect spoken by
//! `skerryd`.
//!
//! The crate is deliberately stateless: [`Message`] parses from one raw line
//! and displays back into one CRLF-terminated line, and [`LineCodec`] frames
//! a byte stream into raw lines. Turning a raw line into a [`Message`] is left
//! to the caller so that a malformed line can be dropped without tearing down
//! the stream it arrived on.
//!
//! ```rust
//! use skerry_proto::{Command, Message, Prefix};
//!
//! let msg: Message = "PRIVMSG #a,#b :hi there".parse().unwrap();
//! assert_eq!(msg.command, Command::PRIVMSG("#a,#b".into(), "hi there".into()));
//!
//! let relay = Message::from(Command::JOIN("#rust".into(), None))
//!     .with_prefix(Prefix::new("bob", "bob", "host1"));
//! assert_eq!(relay.to_string(), ":bob!bob@host1 JOIN #rust\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
mod parse;
pub mod prefix;
pub mod response;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::{Line, LineCodec};
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;

/// Split a comma-separated protocol list (`#a,#b`) into its non-empty items.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::split_list;

    #[test]
    fn split_list_keeps_order_and_skips_empty_items() {
        assert_eq!(split_list("a,b"), vec!["a", "b"]);
        assert_eq!(split_list("#x,,#y,"), vec!["#x", "#y"]);
        assert!(split_list("").is_empty());
    }
}
