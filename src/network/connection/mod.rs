//! Connection - the actor owning one client session.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!    ┌──────────────────────────────────────────────────────┐
//!    │                 Connection task                      │
//!    │                                                      │
//!    │  mailbox (relays, own replies) ──┐                   │
//!    │  FramedRead<LineCodec> ──────────┼─▶ tokio::select!  │
//!    │  shutdown broadcast ─────────────┘     (biased)      │
//!    │                                          │           │
//!    │              dispatch ◀──────────────────┘           │
//!    │                 │  authority calls, replies queued   │
//!    │                 ▼  back into the mailbox             │
//!    │           FramedWrite<LineCodec>                     │
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! One mailbox message is handled to completion before the next is taken.
//! The mailbox is polled first, so replies queued while handling a line reach
//! the wire before the next line is read.

mod delivery;
mod dispatch;
mod error_handling;
mod handshake;


use crate::authority::{Mailbox, SessionEvent};
use crate::error::SessionError;
use crate::state::{ServerState, Session, SessionId};
use crate::telemetry;
use futures_util::{SinkExt, StreamExt};
use skerry_proto::{Command, Line, LineCodec, Message, ProtocolError};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, info, warn};

/// Byte streams a connection can run over.
pub trait ClientStream: AsyncRead + AsyncWrite + Send + 'static {}

impl<T: AsyncRead + AsyncWrite + Send + 'static> ClientStream for T {}

/// What the loop does after one mailbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

enum Step {
    Event(SessionEvent),
    Frame(Option<Result<Line, ProtocolError>>),
    Shutdown,
}

struct Transport<S> {
    reader: FramedRead<ReadHalf<S>, LineCodec>,
    writer: FramedWrite<WriteHalf<S>, LineCodec>,
}

/// A client connection actor.
pub struct Connection<S> {
    session: Session,
    state: Arc<ServerState>,
    /// `None` once disconnected.
    transport: Option<Transport<S>>,
    mailbox_tx: Mailbox,
    mailbox_rx: mpsc::Receiver<SessionEvent>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<S: ClientStream> Connection<S> {
    /// Take ownership of an accepted stream and register the session.
    pub fn new(
        id: SessionId,
        stream: S,
        remote_host: String,
        state: Arc<ServerState>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let limits = &state.config.limits;
        let (read_half, write_half) = tokio::io::split(stream);
        let transport = Transport {
            reader: FramedRead::new(read_half, LineCodec::with_max_len(limits.max_line_len)),
            writer: FramedWrite::new(write_half, LineCodec::with_max_len(limits.max_line_len)),
        };
        let (mailbox_tx, mailbox_rx) = mpsc::channel(limits.mailbox_capacity);

        state.registry.register(id, remote_host.clone());

        Self {
            session: Session::new(id, remote_host),
            state,
            transport: Some(transport),
            mailbox_tx,
            mailbox_rx,
            shutdown_rx,
        }
    }

    /// Run until QUIT, end of stream, transport failure or shutdown.
    pub async fn run(mut self) {
        info!(host = %self.session.remote_host, "Connection actor started");

        loop {
            let Some(transport) = self.transport.as_mut() else {
                break;
            };

            let step = tokio::select! {
                biased;

                Some(event) = self.mailbox_rx.recv() => Step::Event(event),

                frame = transport.reader.next() => Step::Frame(frame),

                _ = self.shutdown_rx.recv() => Step::Shutdown,
            };

            let (outcome, input) = match step {
                Step::Event(event) => (self.handle_event(event).await.map(|()| Flow::Continue), None),
                Step::Frame(Some(Ok(Ok(line)))) => {
                    let outcome = self.handle_line(&line).await;
                    (outcome, Some(line))
                }
                Step::Frame(Some(Ok(Err(e)))) => (Err(SessionError::Unreadable(e)), None),
                Step::Frame(Some(Err(e))) => (Err(SessionError::Transport(e)), None),
                Step::Frame(None) => {
                    info!("Client closed connection");
                    (Ok(Flow::Quit), None)
                }
                Step::Shutdown => {
                    info!("Shutdown signal received - disconnecting client");
                    self.send_closing_link("Server shutting down").await;
                    (Ok(Flow::Quit), None)
                }
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.is_terminal() => {
                    warn!(error = %e, "Transport failure - disconnecting");
                    break;
                }
                Err(e) => error_handling::report_contained(&e, input.as_deref()),
            }
        }

        self.disconnect().await;
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow, SessionError> {
        let message: Message = line.parse()?;
        let name = message.command.name();
        let span = telemetry::spans::command(&name, self.session.addressee());
        self.dispatch(message.command).instrument(span).await
    }

    /// Best-effort `ERROR :Closing Link` before going away.
    async fn send_closing_link(&mut self, reason: &str) {
        let closing = Message::from(Command::ERROR(format!(
            "Closing Link: {} ({reason})",
            self.session.remote_host
        )));
        if let Err(e) = self.write(&closing).await {
            debug!(error = %e, "Could not send closing link");
        }
    }

    /// Close the transport and forget the session. Idempotent.
    pub(crate) async fn disconnect(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };
        if let Err(e) = transport.writer.close().await {
            debug!(error = %e, "Error while closing transport");
        }
        drop(transport);

        let id = self.session.id;
        self.state.registry.remove(id);
        self.state.authority.disconnect(id).await;
        info!(
            nick = %self.session.addressee(),
            logged_in = self.session.is_logged_in(),
            remaining = self.state.registry.len(),
            "Session closed"
        );
    }
}
