//! Outbound delivery: replies, relays and the single write primitive.

use super::{ClientStream, Connection, error_handling};
use crate::authority::{RelayEvent, RelayKind, RelayTarget, SessionEvent};
use crate::error::SessionError;
use futures_util::SinkExt;
use skerry_proto::{Command, Message, Prefix};
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::{debug, trace};

impl<S: ClientStream> Connection<S> {
    /// Compose and write one message. A no-op once disconnected.
    pub(super) async fn write(&mut self, message: &Message) -> Result<(), SessionError> {
        let Some(transport) = self.transport.as_mut() else {
            return Ok(());
        };
        let line = message.to_string();
        debug!(sent = %line.trim_end(), "Sending");
        transport.writer.send(line).await?;
        Ok(())
    }

    /// Queue a server reply behind everything already in the mailbox.
    ///
    /// The actor is the only consumer of its own mailbox, so a full mailbox is
    /// drained here, oldest first, until the reply fits.
    pub(super) async fn reply(&mut self, message: Message) -> Result<(), SessionError> {
        let prefix = Prefix::ServerName(self.state.config.server.name.clone());
        let mut event = SessionEvent::Deliver(message.with_prefix(prefix));

        loop {
            match self.mailbox_tx.try_send(event) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Closed(_)) => return Ok(()),
                Err(TrySendError::Full(returned)) => {
                    event = returned;
                    match self.mailbox_rx.try_recv() {
                        Ok(queued) => match self.handle_event(queued).await {
                            Ok(()) => {}
                            Err(e) if e.is_terminal() => return Err(e),
                            Err(e) => error_handling::report_contained(&e, None),
                        },
                        Err(TryRecvError::Empty) => tokio::task::yield_now().await,
                        Err(TryRecvError::Disconnected) => return Ok(()),
                    }
                }
            }
        }
    }

    /// Handle one non-wire mailbox message.
    pub(super) async fn handle_event(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Deliver(message) => self.write(&message).await,
            SessionEvent::Relay(relay) => self.deliver_relay(relay).await,
        }
    }

    /// Render another session's action, stamped with that session's identity.
    async fn deliver_relay(&mut self, relay: RelayEvent) -> Result<(), SessionError> {
        let origin = self.state.registry.lookup(relay.origin)?;

        let target = match relay.target {
            RelayTarget::Channel(name) => name,
            RelayTarget::Direct => self.session.addressee().to_string(),
        };

        let command = match relay.kind {
            RelayKind::Join => Command::JOIN(target, None),
            RelayKind::Part => Command::PART(target, None),
            RelayKind::Privmsg(text) => Command::PRIVMSG(target, text),
        };
        trace!(origin = %relay.origin, command = %command.name(), "Relaying");

        self.write(&Message::from(command).with_prefix(origin.prefix()))
            .await
    }
}
