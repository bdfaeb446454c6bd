//! Client side of the authority actor.

use super::types::{AuthorityRequest, JoinedChannel, LoginRequest, Reply};
use crate::error::AuthorityError;
use crate::state::SessionId;
use tokio::sync::{mpsc, oneshot};

/// Cloneable request/response handle to the central authority.
///
/// Every call suspends until the authority answers. If the authority task has
/// gone away the call fails with [`AuthorityError::Unavailable`].
#[derive(Debug, Clone)]
pub struct AuthorityHandle {
    tx: mpsc::Sender<AuthorityRequest>,
}

impl AuthorityHandle {
    pub fn new(tx: mpsc::Sender<AuthorityRequest>) -> Self {
        Self { tx }
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> AuthorityRequest,
    ) -> Result<T, AuthorityError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| AuthorityError::Unavailable)?;
        reply_rx.await.map_err(|_| AuthorityError::Unavailable)?
    }

    pub async fn login(
        &self,
        session: SessionId,
        request: LoginRequest,
    ) -> Result<(), AuthorityError> {
        self.call(|reply_tx| AuthorityRequest::Login {
            session,
            request,
            reply_tx,
        })
        .await
    }

    pub async fn nick_change(
        &self,
        session: SessionId,
        nickname: String,
    ) -> Result<(), AuthorityError> {
        self.call(|reply_tx| AuthorityRequest::NickChange {
            session,
            nickname,
            reply_tx,
        })
        .await
    }

    pub async fn join(
        &self,
        session: SessionId,
        channels: Vec<String>,
        keys: Vec<String>,
    ) -> Result<Vec<JoinedChannel>, AuthorityError> {
        self.call(|reply_tx| AuthorityRequest::Join {
            session,
            channels,
            keys,
            reply_tx,
        })
        .await
    }

    pub async fn part(
        &self,
        session: SessionId,
        channels: Vec<String>,
    ) -> Result<(), AuthorityError> {
        self.call(|reply_tx| AuthorityRequest::Part {
            session,
            channels,
            reply_tx,
        })
        .await
    }

    pub async fn privmsg(
        &self,
        session: SessionId,
        targets: Vec<String>,
        text: String,
    ) -> Result<(), AuthorityError> {
        self.call(|reply_tx| AuthorityRequest::Privmsg {
            session,
            targets,
            text,
            reply_tx,
        })
        .await
    }

    /// Remove the session from all authority state. Waits for the removal to
    /// be applied; a missing authority is not an error here.
    pub async fn disconnect(&self, session: SessionId) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self
            .tx
            .send(AuthorityRequest::Disconnect { session, reply_tx })
            .await
            .is_ok()
        {
            let _ = reply_rx.await;
        }
    }
}
