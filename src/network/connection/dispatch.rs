//! Command dispatch for one parsed line.

use super::{ClientStream, Connection, Flow};
use crate::error::SessionError;
use crate::state::{Identity, PeerField};
use skerry_proto::{Command, Response, split_list};
use tracing::{debug, info};

impl<S: ClientStream> Connection<S> {
    /// Apply one command. All of its effects, replies included, are queued or
    /// written before this returns.
    pub(super) async fn dispatch(&mut self, command: Command) -> Result<Flow, SessionError> {
        match command {
            Command::NICK(nickname) => self.handle_nick(nickname).await?,
            Command::USER(login_name, declared_hostname, declared_server_name, real_name) => {
                let identity = Identity {
                    login_name,
                    declared_hostname,
                    declared_server_name,
                    real_name,
                };
                self.handle_user(identity).await?;
            }
            Command::QUIT(reason) => {
                info!(reason = reason.as_deref().unwrap_or(""), "Client quit");
                return Ok(Flow::Quit);
            }
            Command::JOIN(channels, keys) => self.handle_join(&channels, keys.as_deref()).await?,
            Command::PART(channels, _) => {
                self.state
                    .authority
                    .part(self.session.id, split_list(&channels))
                    .await
                    .map_err(|e| SessionError::authority("PART", e))?;
            }
            Command::PRIVMSG(targets, text) => {
                self.state
                    .authority
                    .privmsg(self.session.id, split_list(&targets), text)
                    .await
                    .map_err(|e| SessionError::authority("PRIVMSG", e))?;
            }
            Command::MODE(target, Some(mode)) => self.handle_mode(&target, mode)?,
            Command::MODE(_, None) => debug!("Ignoring MODE query"),
            Command::PING(token) => {
                let server = self.state.config.server.name.clone();
                self.reply(Command::PONG(server, Some(token)).into()).await?;
            }
            Command::PONG(..) => {}
            other => return Err(SessionError::UnknownCommand(other.name())),
        }
        Ok(Flow::Continue)
    }

    async fn handle_join(&mut self, channels: &str, keys: Option<&str>) -> Result<(), SessionError> {
        let (channels, keys) = pair_join_keys(channels, keys);

        let joined = self
            .state
            .authority
            .join(self.session.id, channels, keys)
            .await
            .map_err(|e| SessionError::authority("JOIN", e))?;

        let nick = self.session.addressee().to_string();
        for channel in joined {
            self.reply(Response::names_reply(&nick, &channel.name, &channel.members))
                .await?;
            self.reply(Response::end_of_names(&nick, &channel.name)).await?;
            self.reply(Response::topic(&nick, &channel.name, &channel.topic))
                .await?;
        }
        Ok(())
    }

    /// MODE on the session's own nickname; anything else is silently ignored.
    fn handle_mode(&mut self, target: &str, mode: String) -> Result<(), SessionError> {
        if !self.session.is_own_nickname(target) {
            debug!(target, "Ignoring MODE for another nickname");
            return Ok(());
        }
        self.state
            .registry
            .update_own_entry(self.session.id, PeerField::Mode, mode.clone())?;
        self.session.mode = Some(mode);
        Ok(())
    }
}

/// Split JOIN's channel and key lists. Keys pair with channels by their
/// position in the raw lists; empty channel slots are dropped after pairing.
fn pair_join_keys(channels: &str, keys: Option<&str>) -> (Vec<String>, Vec<String>) {
    let keys: Option<Vec<&str>> = keys.map(|k| k.split(',').collect());
    let mut names = Vec::new();
    let mut paired = Vec::new();

    for (index, name) in channels.split(',').enumerate() {
        if name.is_empty() {
            continue;
        }
        names.push(name.to_string());
        if let Some(keys) = &keys {
            paired.push(keys.get(index).copied().unwrap_or_default().to_string());
        }
    }
    (names, paired)
}
