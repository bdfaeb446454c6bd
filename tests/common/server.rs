//! Test server management.
//!
//! Spawns and manages skerryd instances for integration testing.

use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// Server name every test config uses.
pub const SERVER_NAME: &str = "irc.skerry.test";

/// A test server instance. Killed on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    // Held so the config outlives the process
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a new test server listening on `port`.
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;

        let config_path = data_dir.path().join("skerryd.toml");
        let config_content = format!(
            r#"
[server]
name = "{SERVER_NAME}"
network = "SkerryTest"

[listen]
address = "127.0.0.1:{port}"
resolve_hostnames = false

[motd]
lines = ["Test Server"]

[channels]
default_topic = "fresh channel"
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_skerryd"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
