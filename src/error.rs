//! Error taxonomy for skerryd.
//!
//! Every failure a connection actor can hit is one of these. Only transport
//! failures end a session; the rest are contained to the mailbox message that
//! produced them.

use crate::state::SessionId;
use skerry_proto::{MessageParseError, ProtocolError, Response};
use thiserror::Error;

// ============================================================================
// Authority Errors (delegated operations)
// ============================================================================

/// Reasons the central authority refuses an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("erroneous nickname: {0:?}")]
    ErroneousNickname(String),

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("no such channel: {0}")]
    NoSuchChannel(String),

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("not on channel: {0}")]
    NotOnChannel(String),

    #[error("bad channel key: {0}")]
    BadChannelKey(String),

    #[error("not registered")]
    NotRegistered,

    #[error("authority unavailable")]
    Unavailable,
}

impl AuthorityError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ErroneousNickname(_) => "erroneous_nickname",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::NoSuchChannel(_) => "no_such_channel",
            Self::NoSuchNick(_) => "no_such_nick",
            Self::NotOnChannel(_) => "not_on_channel",
            Self::BadChannelKey(_) => "bad_channel_key",
            Self::NotRegistered => "not_registered",
            Self::Unavailable => "unavailable",
        }
    }

    /// The numeric a full server would answer with.
    pub fn numeric(&self) -> Option<Response> {
        match self {
            Self::ErroneousNickname(_) => Some(Response::ERR_ERRONEUSNICKNAME),
            Self::NicknameInUse(_) => Some(Response::ERR_NICKNAMEINUSE),
            Self::NoSuchChannel(_) => Some(Response::ERR_NOSUCHCHANNEL),
            Self::NoSuchNick(_) => Some(Response::ERR_NOSUCHNICK),
            Self::NotOnChannel(_) => Some(Response::ERR_NOTONCHANNEL),
            Self::BadChannelKey(_) => Some(Response::ERR_BADCHANNELKEY),
            Self::NotRegistered => Some(Response::ERR_NOTREGISTERED),
            Self::Unavailable => None,
        }
    }
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Peer registry lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("session {0} is not registered")]
    NotFound(SessionId),
}

// ============================================================================
// Session Errors (connection actor)
// ============================================================================

/// Errors produced while a connection actor handles one mailbox message.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The line arrived but could not be framed (too long, bad UTF-8, NUL).
    #[error("unreadable line: {0}")]
    Unreadable(ProtocolError),

    #[error("parse error: {0}")]
    Parse(#[from] MessageParseError),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} refused: {source}")]
    Authority {
        command: &'static str,
        #[source]
        source: AuthorityError,
    },

    #[error("identity resolution failed: {0}")]
    IdentityResolution(#[from] RegistryError),

    #[error("transport error: {0}")]
    Transport(#[from] ProtocolError),
}

impl SessionError {
    /// Wrap an authority refusal with the command that triggered it.
    pub fn authority(command: &'static str, source: AuthorityError) -> Self {
        Self::Authority { command, source }
    }

    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreadable(_) => "unreadable_line",
            Self::Parse(_) => "parse_error",
            Self::UnknownCommand(_) => "unknown_command",
            Self::Authority { source, .. } => source.error_code(),
            Self::IdentityResolution(_) => "identity_resolution",
            Self::Transport(_) => "transport_error",
        }
    }

    /// Whether this failure ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
