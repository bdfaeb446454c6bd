//! Test IRC client.
//!
//! Sends commands and asserts on received responses.

use skerry_proto::{Command, Message, Response};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send a raw line, adding CRLF when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes as they are.
    #[allow(dead_code)]
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send an IRC command.
    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&Message::from(cmd).to_string()).await
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        line.trim_end()
            .parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error: {e}"))
    }

    /// True once the server has closed the connection.
    #[allow(dead_code)]
    pub async fn is_closed(&mut self) -> anyhow::Result<bool> {
        let mut line = String::new();
        let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        Ok(read == 0)
    }

    /// Receive messages until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Log in (NICK + USER) and wait for the end of the MOTD.
    pub async fn register(&mut self) -> anyhow::Result<Vec<Message>> {
        self.send(Command::NICK(self.nick.clone())).await?;
        self.send(Command::USER(
            self.nick.clone(),
            "host1".to_string(),
            "serv".to_string(),
            format!("Test User {}", self.nick),
        ))
        .await?;

        self.recv_until(|msg| is_numeric(msg, Response::RPL_ENDOFMOTD))
            .await
    }

    /// Round-trip a PING and return everything received before its PONG.
    #[allow(dead_code)]
    pub async fn sync(&mut self) -> anyhow::Result<Vec<Message>> {
        self.send(Command::PING("sync".to_string())).await?;
        let mut messages = self
            .recv_until(|msg| matches!(&msg.command, Command::PONG(_, Some(t)) if t == "sync"))
            .await?;
        messages.pop();
        Ok(messages)
    }

    /// Join channels.
    #[allow(dead_code)]
    pub async fn join(&mut self, channels: &str) -> anyhow::Result<()> {
        self.send(Command::JOIN(channels.to_string(), None)).await
    }

    /// Send a PRIVMSG.
    #[allow(dead_code)]
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send(Command::PRIVMSG(target.to_string(), text.to_string()))
            .await
    }

    /// Send QUIT.
    #[allow(dead_code)]
    pub async fn quit(&mut self, reason: Option<String>) -> anyhow::Result<()> {
        self.send(Command::QUIT(reason)).await
    }
}

/// True if `msg` is the numeric `response`.
pub fn is_numeric(msg: &Message, response: Response) -> bool {
    matches!(&msg.command, Command::Response(resp, _) if *resp == response)
}
