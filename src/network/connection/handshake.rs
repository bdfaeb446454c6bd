//! Login handshake: NICK and USER, in either order.

use super::{ClientStream, Connection};
use crate::authority::LoginRequest;
use crate::error::SessionError;
use crate::state::{Identity, PeerField};
use skerry_proto::Response;
use tracing::{debug, info};

impl<S: ClientStream> Connection<S> {
    /// NICK: take the nickname locally, complete login if this was the
    /// missing half, otherwise claim the nickname with the authority.
    ///
    /// On any authority failure the previous nickname is restored. Login
    /// itself reserves the nickname, so a NICK that completes login makes no
    /// second call that could fail after login was committed.
    pub(super) async fn handle_nick(&mut self, nickname: String) -> Result<(), SessionError> {
        let previous = self.session.nickname.replace(nickname.clone());
        let was_logged_in = self.session.is_logged_in();

        let outcome = match self.complete_login().await {
            Ok(()) if !was_logged_in && self.session.is_logged_in() => Ok(()),
            Ok(()) => self
                .state
                .authority
                .nick_change(self.session.id, nickname.clone())
                .await
                .map_err(|e| SessionError::authority("NICK", e)),
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            self.session.nickname = previous;
            return Err(e);
        }

        self.state
            .registry
            .update_own_entry(self.session.id, PeerField::Nickname, nickname)?;
        Ok(())
    }

    /// USER: record the declared identity once, then complete login if the
    /// nickname is already known.
    pub(super) async fn handle_user(&mut self, identity: Identity) -> Result<(), SessionError> {
        if self.session.identity.is_some() {
            debug!("Ignoring repeated USER");
            return Ok(());
        }

        let login_name = identity.login_name.clone();
        self.session.identity = Some(identity);

        if let Err(e) = self.complete_login().await {
            self.session.identity = None;
            return Err(e);
        }

        self.state
            .registry
            .update_own_entry(self.session.id, PeerField::LoginName, login_name)?;
        Ok(())
    }

    /// Send the MOTD and log in with the authority, the first time both
    /// nickname and identity are present. Later calls do nothing.
    async fn complete_login(&mut self) -> Result<(), SessionError> {
        if !self.session.login_ready() {
            return Ok(());
        }
        let (Some(nickname), Some(identity)) =
            (self.session.nickname.clone(), self.session.identity.clone())
        else {
            return Ok(());
        };

        let server_name = self.state.config.server.name.clone();
        let motd = self.state.config.motd.lines.clone();

        self.reply(Response::motd_start(&nickname, &server_name)).await?;
        for line in &motd {
            self.reply(Response::motd_line(&nickname, line)).await?;
        }
        self.reply(Response::end_of_motd(&nickname)).await?;

        let request = LoginRequest {
            nickname: nickname.clone(),
            identity,
            remote_host: self.session.remote_host.clone(),
            mailbox: self.mailbox_tx.clone(),
        };
        self.state
            .authority
            .login(self.session.id, request)
            .await
            .map_err(|e| SessionError::authority("LOGIN", e))?;

        self.session.mark_logged_in();
        info!(nick = %nickname, host = %self.session.remote_host, "Session logged in");
        Ok(())
    }
}
