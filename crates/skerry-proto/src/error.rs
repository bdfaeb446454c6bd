//! Error types for framing and parsing.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing a byte stream into lines.
///
/// Everything except [`ProtocolError::Io`] describes a single bad line; the
/// codec has already consumed it, so the stream itself stays usable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a line.
    #[error("invalid UTF-8 in line at byte {byte_pos}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
    },

    /// Line exceeded the maximum allowed length.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

impl ProtocolError {
    /// Whether the underlying stream is broken (as opposed to one bad line).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Errors encountered when parsing a line into a [`crate::Message`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty (or whitespace only).
    #[error("empty message")]
    EmptyMessage,

    /// Command token was missing or not `1*letter / 3digit`.
    #[error("invalid command in {input:?} at position {position}")]
    InvalidCommand {
        /// The offending line.
        input: String,
        /// Character position where parsing stopped.
        position: usize,
    },

    /// A known command arrived without its mandatory parameters.
    #[error("not enough arguments for {command}: expected {expected}, got {got}")]
    NotEnoughArguments {
        /// Command token.
        command: String,
        /// Expected number of arguments.
        expected: usize,
        /// Actual number of arguments.
        got: usize,
    },

    /// Numeric reply code outside the known set.
    #[error("unknown numeric: {0}")]
    UnknownNumeric(u16),
}
