//! End-to-end session behavior against a spawned skerryd.

mod common;

use common::client::is_numeric;
use common::server::SERVER_NAME;
use common::{TestClient, TestServer};
use skerry_proto::{Command, Message, Prefix, Response};
use std::time::Duration;

fn from_server(msg: &Message) -> bool {
    msg.prefix == Some(Prefix::ServerName(SERVER_NAME.to_string()))
}

fn response_args(msg: &Message, response: Response) -> Vec<String> {
    match &msg.command {
        Command::Response(resp, args) if *resp == response => args.clone(),
        other => panic!("expected {response:?}, got {other:?}"),
    }
}

/// Join `channel` and return everything up to and including the topic reply.
async fn join(client: &mut TestClient, channel: &str) -> anyhow::Result<Vec<Message>> {
    client.join(channel).await?;
    client
        .recv_until(|msg| is_numeric(msg, Response::RPL_TOPIC))
        .await
}

#[tokio::test]
async fn login_sends_motd_in_order() -> anyhow::Result<()> {
    let server = TestServer::spawn(26601).await?;
    let mut bob = server.connect("bob").await?;

    let motd = bob.register().await?;
    assert_eq!(motd.len(), 3);
    assert!(motd.iter().all(from_server));
    assert_eq!(
        response_args(&motd[0], Response::RPL_MOTDSTART),
        vec!["bob", "- irc.skerry.test Message of the day - "]
    );
    assert_eq!(
        response_args(&motd[1], Response::RPL_MOTD),
        vec!["bob", "- Test Server"]
    );
    assert!(is_numeric(&motd[2], Response::RPL_ENDOFMOTD));

    // Nothing else is pending
    assert!(bob.sync().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn user_before_nick_logs_in_too() -> anyhow::Result<()> {
    let server = TestServer::spawn(26602).await?;
    let mut bob = server.connect("bob").await?;

    bob.send_raw("USER bob host1 serv :Bob").await?;
    assert!(bob.sync().await?.is_empty());

    bob.send_raw("NICK bob").await?;
    let motd = bob
        .recv_until(|msg| is_numeric(msg, Response::RPL_ENDOFMOTD))
        .await?;
    assert_eq!(motd.len(), 3);
    Ok(())
}

#[tokio::test]
async fn join_relays_and_replies() -> anyhow::Result<()> {
    let server = TestServer::spawn(26603).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    alice.register().await?;
    bob.register().await?;

    let replies = join(&mut alice, "#chan").await?;
    assert_eq!(
        replies[0].to_string(),
        ":alice!alice@127.0.0.1 JOIN #chan\r\n"
    );
    assert_eq!(
        response_args(&replies[1], Response::RPL_NAMREPLY),
        vec!["alice", "=", "#chan", "alice"]
    );
    assert_eq!(
        response_args(&replies[2], Response::RPL_ENDOFNAMES),
        vec!["alice", "#chan", "End of /NAMES list."]
    );
    assert_eq!(
        response_args(&replies[3], Response::RPL_TOPIC),
        vec!["alice", "#chan", "fresh channel"]
    );

    let replies = join(&mut bob, "#chan").await?;
    assert_eq!(
        response_args(&replies[1], Response::RPL_NAMREPLY),
        vec!["bob", "=", "#chan", "alice bob"]
    );

    let seen = alice.recv().await?;
    assert_eq!(seen.to_string(), ":bob!bob@127.0.0.1 JOIN #chan\r\n");
    Ok(())
}

#[tokio::test]
async fn privmsg_reaches_channel_and_nick() -> anyhow::Result<()> {
    let server = TestServer::spawn(26604).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    alice.register().await?;
    bob.register().await?;
    join(&mut alice, "#chan").await?;
    join(&mut bob, "#chan").await?;
    alice.recv().await?; // bob's JOIN

    bob.privmsg("#chan", "hello there").await?;
    assert_eq!(
        alice.recv().await?.to_string(),
        ":bob!bob@127.0.0.1 PRIVMSG #chan :hello there\r\n"
    );
    // Sender does not hear itself
    assert!(bob.sync().await?.is_empty());

    alice.privmsg("bob", "psst").await?;
    assert_eq!(
        bob.recv().await?.to_string(),
        ":alice!alice@127.0.0.1 PRIVMSG bob :psst\r\n"
    );

    bob.send_raw("PART #chan").await?;
    let seen = alice.recv().await?;
    assert_eq!(seen.to_string(), ":bob!bob@127.0.0.1 PART #chan\r\n");
    Ok(())
}

#[tokio::test]
async fn mode_for_other_nick_is_silent() -> anyhow::Result<()> {
    let server = TestServer::spawn(26605).await?;
    let mut bob = server.connect("bob").await?;
    bob.register().await?;

    bob.send_raw("MODE alice +i").await?;
    bob.send_raw("MODE bob +i").await?;
    bob.send_raw("MODE bob").await?;
    assert!(bob.sync().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_input_keeps_session_alive() -> anyhow::Result<()> {
    let server = TestServer::spawn(26606).await?;
    let mut bob = server.connect("bob").await?;
    bob.register().await?;

    bob.send_raw("").await?;
    bob.send_raw("NICK").await?;
    bob.send_raw("WHOIS alice").await?;
    bob.send_bytes(b"PRIVMSG #a :\xc3\x28\r\n").await?;
    bob.send_raw(&format!("PRIVMSG #a :{}", "x".repeat(700))).await?;
    // Channel commands without a matching channel are refused silently
    bob.send_raw("PART #nowhere").await?;
    bob.send_raw("PRIVMSG nobody :hi").await?;

    assert!(bob.sync().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_nick_is_silent_until_retried() -> anyhow::Result<()> {
    let server = TestServer::spawn(26607).await?;
    let mut first = server.connect("alice").await?;
    first.register().await?;

    let mut second = server.connect("alice").await?;
    second.send_raw("NICK alice").await?;
    second.send_raw("USER al host2 serv :Second").await?;
    second.send_raw("JOIN #chan").await?;
    assert!(second.sync().await?.is_empty());

    second.send_raw("NICK alice2").await?;
    let motd = second
        .recv_until(|msg| is_numeric(msg, Response::RPL_ENDOFMOTD))
        .await?;
    assert_eq!(response_args(&motd[0], Response::RPL_MOTDSTART)[0], "alice2");
    Ok(())
}

#[tokio::test]
async fn quit_closes_connection_and_frees_nick() -> anyhow::Result<()> {
    let server = TestServer::spawn(26608).await?;
    let mut alice = server.connect("alice").await?;
    let mut bob = server.connect("bob").await?;
    alice.register().await?;
    bob.register().await?;
    join(&mut alice, "#chan").await?;
    join(&mut bob, "#chan").await?;
    alice.recv().await?; // bob's JOIN

    bob.quit(Some("bye".to_string())).await?;
    assert!(bob.is_closed().await?);

    // Remaining members see no relay for the departed session
    assert!(alice.sync().await?.is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut again = server.connect("bob").await?;
    let motd = again.register().await?;
    assert_eq!(motd.len(), 3);

    let replies = join(&mut again, "#chan").await?;
    assert_eq!(
        response_args(&replies[1], Response::RPL_NAMREPLY),
        vec!["bob", "=", "#chan", "alice bob"]
    );
    Ok(())
}
