use crate::error::AuthorityError;
use crate::state::{Identity, SessionId};
use skerry_proto::Message;
use tokio::sync::{mpsc, oneshot};

/// Sending side of a connection actor's mailbox.
pub type Mailbox = mpsc::Sender<SessionEvent>;

/// Reply channel for one authority request.
pub type Reply<T> = oneshot::Sender<Result<T, AuthorityError>>;

/// Everything that can land in a connection actor's mailbox besides its own
/// inbound lines.
#[derive(Debug)]
pub enum SessionEvent {
    /// Another session did something this one must see.
    Relay(RelayEvent),
    /// A reply composed by the actor itself, queued for ordered delivery.
    Deliver(Message),
}

/// A broadcast about a channel action, addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEvent {
    pub target: RelayTarget,
    pub kind: RelayKind,
    /// Session that performed the action.
    pub origin: SessionId,
}

/// Where the relayed action happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayTarget {
    Channel(String),
    /// Addressed to the receiving session's own nickname.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayKind {
    Join,
    Part,
    Privmsg(String),
}

/// Arguments of a login call.
#[derive(Debug)]
pub struct LoginRequest {
    pub nickname: String,
    pub identity: Identity,
    pub remote_host: String,
    /// Where relays for this session are pushed from now on.
    pub mailbox: Mailbox,
}

/// One entry of a successful join: the channel, its members in join order,
/// and its topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedChannel {
    pub name: String,
    pub members: Vec<String>,
    pub topic: String,
}

/// Requests understood by the authority actor.
#[derive(Debug)]
pub enum AuthorityRequest {
    Login {
        session: SessionId,
        request: LoginRequest,
        reply_tx: Reply<()>,
    },
    NickChange {
        session: SessionId,
        nickname: String,
        reply_tx: Reply<()>,
    },
    Join {
        session: SessionId,
        channels: Vec<String>,
        /// Paired with `channels` by position.
        keys: Vec<String>,
        reply_tx: Reply<Vec<JoinedChannel>>,
    },
    Part {
        session: SessionId,
        channels: Vec<String>,
        reply_tx: Reply<()>,
    },
    Privmsg {
        session: SessionId,
        targets: Vec<String>,
        text: String,
        reply_tx: Reply<()>,
    },
    /// Forget the session everywhere.
    Disconnect {
        session: SessionId,
        reply_tx: oneshot::Sender<()>,
    },
}
