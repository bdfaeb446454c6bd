//! IRC command types.
//!
//! Known commands get typed variants; any other token is kept verbatim in
//! [`Command::Raw`]. Token matching is case-sensitive: `nick` is not `NICK`.

use std::fmt::{self, Display, Formatter};

use crate::error::MessageParseError;
use crate::response::Response;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `NICK nickname`
    NICK(String),
    /// `USER username hostname servername :realname`
    USER(String, String, String, String),
    /// `QUIT [:message]`
    QUIT(Option<String>),
    /// `JOIN channels [keys]`
    JOIN(String, Option<String>),
    /// `PART channels [:message]`
    PART(String, Option<String>),
    /// `PRIVMSG targets :text`
    PRIVMSG(String, String),
    /// `MODE target [modestring]`
    MODE(String, Option<String>),
    /// `PING token`
    PING(String),
    /// `PONG server [token]`
    PONG(String, Option<String>),
    /// `ERROR :text`
    ERROR(String),
    /// Numeric reply with its parameters (the first is the addressee).
    Response(Response, Vec<String>),
    /// Any other command token, with its raw parameters.
    Raw(String, Vec<String>),
}

fn require(cmd: &str, args: &[&str], expected: usize) -> Result<(), MessageParseError> {
    if args.len() < expected {
        return Err(MessageParseError::NotEnoughArguments {
            command: cmd.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn owned(arg: Option<&&str>) -> Option<String> {
    arg.map(|s| (*s).to_string())
}

impl Command {
    /// Build a command from its token and parameters.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        let command = match cmd {
            "NICK" => {
                // `NICK :` carries no nickname at all
                let nick = args.first().copied().filter(|nick| !nick.is_empty());
                let nick = nick.ok_or(MessageParseError::NotEnoughArguments {
                    command: cmd.to_string(),
                    expected: 1,
                    got: 0,
                })?;
                Command::NICK(nick.to_string())
            }
            "USER" => {
                require(cmd, &args, 4)?;
                Command::USER(
                    args[0].to_string(),
                    args[1].to_string(),
                    args[2].to_string(),
                    args[3].to_string(),
                )
            }
            "QUIT" => Command::QUIT(owned(args.first())),
            "JOIN" => {
                require(cmd, &args, 1)?;
                Command::JOIN(args[0].to_string(), owned(args.get(1)))
            }
            "PART" => {
                require(cmd, &args, 1)?;
                Command::PART(args[0].to_string(), owned(args.get(1)))
            }
            "PRIVMSG" => {
                require(cmd, &args, 2)?;
                Command::PRIVMSG(args[0].to_string(), args[1].to_string())
            }
            "MODE" => {
                require(cmd, &args, 1)?;
                Command::MODE(args[0].to_string(), owned(args.get(1)))
            }
            "PING" => {
                require(cmd, &args, 1)?;
                Command::PING(args[0].to_string())
            }
            "PONG" => {
                require(cmd, &args, 1)?;
                Command::PONG(args[0].to_string(), owned(args.get(1)))
            }
            "ERROR" => {
                require(cmd, &args, 1)?;
                Command::ERROR(args[0].to_string())
            }
            numeric if numeric.len() == 3 && numeric.bytes().all(|b| b.is_ascii_digit()) => {
                let code: u16 = numeric.parse().unwrap_or_default();
                let response =
                    Response::from_code(code).ok_or(MessageParseError::UnknownNumeric(code))?;
                Command::Response(response, args.into_iter().map(str::to_string).collect())
            }
            other => Command::Raw(
                other.to_string(),
                args.into_iter().map(str::to_string).collect(),
            ),
        };
        Ok(command)
    }

    /// The command token as it appears on the wire.
    pub fn name(&self) -> String {
        match self {
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::JOIN(..) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::MODE(..) => "MODE".into(),
            Command::PING(_) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::ERROR(_) => "ERROR".into(),
            Command::Response(resp, _) => resp.to_string(),
            Command::Raw(name, _) => name.clone(),
        }
    }
}

fn needs_colon(arg: &str) -> bool {
    arg.is_empty() || arg.starts_with(':') || arg.contains(' ')
}

/// Write `name middle... [:trailing]`.
///
/// `force_trailing` always emits the colon, for parameters that are free text.
fn write_args(
    f: &mut Formatter<'_>,
    name: &str,
    args: &[&str],
    force_trailing: bool,
) -> fmt::Result {
    f.write_str(name)?;
    if let Some((last, middle)) = args.split_last() {
        for arg in middle {
            write!(f, " {arg}")?;
        }
        if force_trailing || needs_colon(last) {
            write!(f, " :{last}")?;
        } else {
            write!(f, " {last}")?;
        }
    }
    Ok(())
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(nick) => write_args(f, "NICK", &[nick.as_str()], false),
            Command::USER(user, host, server, real) => write_args(
                f,
                "USER",
                &[user.as_str(), host.as_str(), server.as_str(), real.as_str()],
                true,
            ),
            Command::QUIT(Some(msg)) => write_args(f, "QUIT", &[msg.as_str()], true),
            Command::QUIT(None) => write_args(f, "QUIT", &[], false),
            Command::JOIN(chans, keys) => {
                let mut args = vec![chans.as_str()];
                args.extend(keys.as_deref());
                write_args(f, "JOIN", &args, false)
            }
            Command::PART(chans, Some(msg)) => {
                write_args(f, "PART", &[chans.as_str(), msg.as_str()], true)
            }
            Command::PART(chans, None) => write_args(f, "PART", &[chans.as_str()], false),
            Command::PRIVMSG(targets, text) => {
                write_args(f, "PRIVMSG", &[targets.as_str(), text.as_str()], true)
            }
            Command::MODE(target, modes) => {
                let mut args = vec![target.as_str()];
                args.extend(modes.as_deref());
                write_args(f, "MODE", &args, false)
            }
            Command::PING(token) => write_args(f, "PING", &[token.as_str()], false),
            Command::PONG(server, token) => {
                let mut args = vec![server.as_str()];
                args.extend(token.as_deref());
                write_args(f, "PONG", &args, false)
            }
            Command::ERROR(text) => write_args(f, "ERROR", &[text.as_str()], true),
            Command::Response(resp, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_args(f, &resp.to_string(), &args, args.len() > 1)
            }
            Command::Raw(name, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                write_args(f, name, &args, false)
            }
        }
    }
}
