//! Central authority for cross-session state.
//!
//! A single task owns nicknames, channels and memberships. Connection actors
//! talk to it through [`AuthorityHandle`]; every request carries a oneshot
//! reply, and requests are applied strictly one at a time, so each call is
//! atomic from the caller's point of view.
//!
//! # Architecture
//!
//! - **State Ownership**: only the authority task touches channel or nickname state.
//! - **Validation first**: multi-target calls check every target before changing anything.
//! - **Relays**: pushed into session mailboxes with `try_send`; a full mailbox
//!   loses that one event instead of stalling every other session.

use crate::config::Config;
use crate::error::AuthorityError;
use crate::state::SessionId;
use skerry_proto::irc_to_lower;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

mod handle;
mod types;

pub use handle::AuthorityHandle;
pub use types::{
    AuthorityRequest, JoinedChannel, LoginRequest, Mailbox, RelayEvent, RelayKind, RelayTarget,
    SessionEvent,
};

/// What the authority knows about one session.
#[derive(Debug, Default)]
struct Link {
    nickname: Option<String>,
    /// Present once the session has logged in.
    mailbox: Option<Mailbox>,
    /// Case-folded names of joined channels, in join order.
    channels: Vec<String>,
}

impl Link {
    fn is_logged_in(&self) -> bool {
        self.mailbox.is_some()
    }
}

#[derive(Debug)]
struct ChannelState {
    /// Name as given by the creator.
    name: String,
    key: Option<String>,
    topic: String,
    /// In join order.
    members: Vec<SessionId>,
}

enum Recipient {
    Channel(String),
    Session(SessionId),
}

/// The authority actor.
pub struct Authority {
    sessions: HashMap<SessionId, Link>,
    /// Case-folded nickname to holder.
    nicknames: HashMap<String, SessionId>,
    /// Case-folded channel name to state.
    channels: HashMap<String, ChannelState>,
    default_topic: String,
}

/// Valid name for a channel to be created or joined.
fn is_valid_channel_name(name: &str) -> bool {
    name.len() > 1
        && name.starts_with(['#', '&'])
        && !name.contains([' ', ',', '\x07'])
}

/// Valid nickname: addressable as a PRIVMSG target and usable in a prefix.
fn is_valid_nickname(nick: &str) -> bool {
    !nick.is_empty()
        && !nick.starts_with(['#', '&', ':', '-'])
        && !nick.starts_with(|c: char| c.is_ascii_digit())
        && !nick.contains(|c: char| c.is_control() || " ,*?!@".contains(c))
}

fn looks_like_channel(target: &str) -> bool {
    target.starts_with(['#', '&'])
}

/// Push one relay to each recipient that has a mailbox.
fn relay(sessions: &HashMap<SessionId, Link>, recipients: &[SessionId], event: RelayEvent) {
    for id in recipients {
        let Some(mailbox) = sessions.get(id).and_then(|link| link.mailbox.as_ref()) else {
            continue;
        };
        match mailbox.try_send(SessionEvent::Relay(event.clone())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(session = %id, origin = %event.origin, "Mailbox full - relay dropped");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(session = %id, "Mailbox closed - relay dropped");
            }
        }
    }
}

fn nicknames_of(sessions: &HashMap<SessionId, Link>, members: &[SessionId]) -> Vec<String> {
    members
        .iter()
        .filter_map(|id| sessions.get(id).and_then(|link| link.nickname.clone()))
        .collect()
}

impl Authority {
    pub fn new(default_topic: impl Into<String>) -> Self {
        Self {
            sessions: HashMap::new(),
            nicknames: HashMap::new(),
            channels: HashMap::new(),
            default_topic: default_topic.into(),
        }
    }

    /// Create the authority and spawn it, returning the handle.
    pub fn spawn(config: &Config) -> AuthorityHandle {
        let (tx, rx) = mpsc::channel(config.limits.authority_queue);
        let actor = Self::new(config.channels.default_topic.clone());
        tokio::spawn(actor.run(rx));
        AuthorityHandle::new(tx)
    }

    /// The main actor loop. Ends when every handle is dropped.
    pub async fn run(mut self, mut rx: mpsc::Receiver<AuthorityRequest>) {
        info!("Authority started");
        while let Some(request) = rx.recv().await {
            self.handle_request(request);
        }
        info!("Authority stopped");
    }

    fn handle_request(&mut self, request: AuthorityRequest) {
        match request {
            AuthorityRequest::Login {
                session,
                request,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.login(session, request));
            }
            AuthorityRequest::NickChange {
                session,
                nickname,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.nick_change(session, &nickname));
            }
            AuthorityRequest::Join {
                session,
                channels,
                keys,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.join(session, channels, &keys));
            }
            AuthorityRequest::Part {
                session,
                channels,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.part(session, &channels));
            }
            AuthorityRequest::Privmsg {
                session,
                targets,
                text,
                reply_tx,
            } => {
                let _ = reply_tx.send(self.privmsg(session, &targets, &text));
            }
            AuthorityRequest::Disconnect { session, reply_tx } => {
                self.disconnect(session);
                let _ = reply_tx.send(());
            }
        }
    }

    fn require_login(&self, session: SessionId) -> Result<(), AuthorityError> {
        if self.sessions.get(&session).is_some_and(Link::is_logged_in) {
            Ok(())
        } else {
            Err(AuthorityError::NotRegistered)
        }
    }

    /// Reserve `nickname` for `session`, releasing whatever it held before.
    fn nick_change(&mut self, session: SessionId, nickname: &str) -> Result<(), AuthorityError> {
        if !is_valid_nickname(nickname) {
            return Err(AuthorityError::ErroneousNickname(nickname.to_string()));
        }
        let folded = irc_to_lower(nickname);
        if let Some(holder) = self.nicknames.get(&folded)
            && *holder != session
        {
            return Err(AuthorityError::NicknameInUse(nickname.to_string()));
        }

        let link = self.sessions.entry(session).or_default();
        if let Some(previous) = link.nickname.replace(nickname.to_string()) {
            let previous = irc_to_lower(&previous);
            if previous != folded {
                self.nicknames.remove(&previous);
            }
        }
        self.nicknames.insert(folded, session);
        Ok(())
    }

    fn login(&mut self, session: SessionId, request: LoginRequest) -> Result<(), AuthorityError> {
        self.nick_change(session, &request.nickname)?;
        let link = self.sessions.entry(session).or_default();
        link.mailbox = Some(request.mailbox);
        debug!(
            %session,
            nick = %request.nickname,
            login = %request.identity.login_name,
            host = %request.remote_host,
            "Session logged in"
        );
        Ok(())
    }

    fn join(
        &mut self,
        session: SessionId,
        channels: Vec<String>,
        keys: &[String],
    ) -> Result<Vec<JoinedChannel>, AuthorityError> {
        self.require_login(session)?;

        for (index, name) in channels.iter().enumerate() {
            if !is_valid_channel_name(name) {
                return Err(AuthorityError::NoSuchChannel(name.clone()));
            }
            if let Some(channel) = self.channels.get(&irc_to_lower(name))
                && !channel.members.contains(&session)
                && channel.key.is_some()
                && channel.key.as_deref() != keys.get(index).map(String::as_str)
            {
                return Err(AuthorityError::BadChannelKey(name.clone()));
            }
        }

        let mut joined = Vec::with_capacity(channels.len());
        for (index, name) in channels.into_iter().enumerate() {
            let folded = irc_to_lower(&name);
            let channel = self
                .channels
                .entry(folded.clone())
                .or_insert_with(|| ChannelState {
                    name,
                    key: keys.get(index).filter(|key| !key.is_empty()).cloned(),
                    topic: self.default_topic.clone(),
                    members: Vec::new(),
                });

            if !channel.members.contains(&session) {
                channel.members.push(session);
                if let Some(link) = self.sessions.get_mut(&session) {
                    link.channels.push(folded);
                }
                relay(
                    &self.sessions,
                    &channel.members,
                    RelayEvent {
                        target: RelayTarget::Channel(channel.name.clone()),
                        kind: RelayKind::Join,
                        origin: session,
                    },
                );
            }

            joined.push(JoinedChannel {
                name: channel.name.clone(),
                members: nicknames_of(&self.sessions, &channel.members),
                topic: channel.topic.clone(),
            });
        }
        Ok(joined)
    }

    fn part(&mut self, session: SessionId, channels: &[String]) -> Result<(), AuthorityError> {
        self.require_login(session)?;

        for name in channels {
            let channel = self
                .channels
                .get(&irc_to_lower(name))
                .ok_or_else(|| AuthorityError::NoSuchChannel(name.clone()))?;
            if !channel.members.contains(&session) {
                return Err(AuthorityError::NotOnChannel(name.clone()));
            }
        }

        for name in channels {
            let folded = irc_to_lower(name);
            let Some(channel) = self.channels.get_mut(&folded) else {
                continue;
            };
            // Listed twice in one PART
            if !channel.members.contains(&session) {
                continue;
            }
            relay(
                &self.sessions,
                &channel.members,
                RelayEvent {
                    target: RelayTarget::Channel(channel.name.clone()),
                    kind: RelayKind::Part,
                    origin: session,
                },
            );
            channel.members.retain(|member| *member != session);
            if channel.members.is_empty() {
                self.channels.remove(&folded);
            }
            if let Some(link) = self.sessions.get_mut(&session) {
                link.channels.retain(|joined| *joined != folded);
            }
        }
        Ok(())
    }

    fn privmsg(
        &mut self,
        session: SessionId,
        targets: &[String],
        text: &str,
    ) -> Result<(), AuthorityError> {
        self.require_login(session)?;

        let mut recipients = Vec::with_capacity(targets.len());
        for target in targets {
            if looks_like_channel(target) {
                let folded = irc_to_lower(target);
                let channel = self
                    .channels
                    .get(&folded)
                    .ok_or_else(|| AuthorityError::NoSuchChannel(target.clone()))?;
                if !channel.members.contains(&session) {
                    return Err(AuthorityError::NotOnChannel(target.clone()));
                }
                recipients.push(Recipient::Channel(folded));
            } else {
                let id = self
                    .nicknames
                    .get(&irc_to_lower(target))
                    .copied()
                    .filter(|id| self.sessions.get(id).is_some_and(Link::is_logged_in))
                    .ok_or_else(|| AuthorityError::NoSuchNick(target.clone()))?;
                recipients.push(Recipient::Session(id));
            }
        }

        for recipient in recipients {
            match recipient {
                Recipient::Channel(folded) => {
                    let Some(channel) = self.channels.get(&folded) else {
                        continue;
                    };
                    let others: Vec<SessionId> = channel
                        .members
                        .iter()
                        .copied()
                        .filter(|member| *member != session)
                        .collect();
                    relay(
                        &self.sessions,
                        &others,
                        RelayEvent {
                            target: RelayTarget::Channel(channel.name.clone()),
                            kind: RelayKind::Privmsg(text.to_string()),
                            origin: session,
                        },
                    );
                }
                Recipient::Session(id) => relay(
                    &self.sessions,
                    &[id],
                    RelayEvent {
                        target: RelayTarget::Direct,
                        kind: RelayKind::Privmsg(text.to_string()),
                        origin: session,
                    },
                ),
            }
        }
        Ok(())
    }

    /// Drop the session from nicknames and channels. Remaining members are
    /// not notified: the session's registry entry is going away with it, so
    /// a relay naming it could not be rendered.
    fn disconnect(&mut self, session: SessionId) {
        let Some(link) = self.sessions.remove(&session) else {
            return;
        };

        if let Some(nickname) = &link.nickname {
            let folded = irc_to_lower(nickname);
            if self.nicknames.get(&folded) == Some(&session) {
                self.nicknames.remove(&folded);
            }
        }

        for folded in &link.channels {
            if let Some(channel) = self.channels.get_mut(folded) {
                channel.members.retain(|member| *member != session);
                if channel.members.is_empty() {
                    self.channels.remove(folded);
                }
            }
        }

        debug!(%session, channels = link.channels.len(), "Session removed");
    }
}
