//! Numeric replies.
//!
//! Only the numerics the daemon actually emits or reports on are listed.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol

#![allow(non_camel_case_types)]

use std::fmt;

use crate::command::Command;
use crate::message::Message;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 331 - No topic is set
    RPL_NOTOPIC = 331,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 353 - Channel member list
    RPL_NAMREPLY = 353,
    /// 366 - End of member list
    RPL_ENDOFNAMES = 366,
    /// 372 - MOTD body line
    RPL_MOTD = 372,
    /// 375 - MOTD start
    RPL_MOTDSTART = 375,
    /// 376 - MOTD end
    RPL_ENDOFMOTD = 376,
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 432 - Erroneous nickname
    ERR_ERRONEUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 451 - You have not registered
    ERR_NOTREGISTERED = 451,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 475 - Cannot join channel (+k)
    ERR_BADCHANNELKEY = 475,
}

impl Response {
    const ALL: [Response; 17] = [
        Response::RPL_WELCOME,
        Response::RPL_NOTOPIC,
        Response::RPL_TOPIC,
        Response::RPL_NAMREPLY,
        Response::RPL_ENDOFNAMES,
        Response::RPL_MOTD,
        Response::RPL_MOTDSTART,
        Response::RPL_ENDOFMOTD,
        Response::ERR_NOSUCHNICK,
        Response::ERR_NOSUCHCHANNEL,
        Response::ERR_UNKNOWNCOMMAND,
        Response::ERR_ERRONEUSNICKNAME,
        Response::ERR_NICKNAMEINUSE,
        Response::ERR_NOTONCHANNEL,
        Response::ERR_NOTREGISTERED,
        Response::ERR_NEEDMOREPARAMS,
        Response::ERR_BADCHANNELKEY,
    ];

    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Self::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Check if this is an error response (4xx, 5xx)
    #[inline]
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.code())
    }

    fn reply(self, args: Vec<String>) -> Message {
        Message::from(Command::Response(self, args))
    }

    /// `375 <client> :- <server> Message of the day - `
    pub fn motd_start(client: &str, server: &str) -> Message {
        Self::RPL_MOTDSTART.reply(vec![
            client.to_string(),
            format!("- {server} Message of the day - "),
        ])
    }

    /// `372 <client> :- <line>`
    pub fn motd_line(client: &str, line: &str) -> Message {
        Self::RPL_MOTD.reply(vec![client.to_string(), format!("- {line}")])
    }

    /// `376 <client> :End of /MOTD command.`
    pub fn end_of_motd(client: &str) -> Message {
        Self::RPL_ENDOFMOTD.reply(vec![
            client.to_string(),
            "End of /MOTD command.".to_string(),
        ])
    }

    /// `353 <client> = <channel> :<names>`
    pub fn names_reply(client: &str, channel: &str, names: &[String]) -> Message {
        Self::RPL_NAMREPLY.reply(vec![
            client.to_string(),
            "=".to_string(),
            channel.to_string(),
            names.join(" "),
        ])
    }

    /// `366 <client> <channel> :End of /NAMES list.`
    pub fn end_of_names(client: &str, channel: &str) -> Message {
        Self::RPL_ENDOFNAMES.reply(vec![
            client.to_string(),
            channel.to_string(),
            "End of /NAMES list.".to_string(),
        ])
    }

    /// `332 <client> <channel> :<topic>`
    pub fn topic(client: &str, channel: &str, topic: &str) -> Message {
        Self::RPL_TOPIC.reply(vec![
            client.to_string(),
            channel.to_string(),
            topic.to_string(),
        ])
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        assert_eq!(Response::RPL_NAMREPLY.code(), 353);
        assert_eq!(Response::from_code(376), Some(Response::RPL_ENDOFMOTD));
        assert_eq!(Response::from_code(999), None);
    }

    #[test]
    fn numerics_display_zero_padded() {
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert!(Response::ERR_BADCHANNELKEY.is_error());
        assert!(!Response::RPL_TOPIC.is_error());
    }

    #[test]
    fn names_reply_joins_members_into_trailing() {
        let msg = Response::names_reply("bob", "#chan", &["bob".into(), "alice".into()]);
        assert_eq!(msg.to_string(), "353 bob = #chan :bob alice\r\n");
    }

    #[test]
    fn empty_topic_is_still_a_trailing_parameter() {
        let msg = Response::topic("bob", "#chan", "");
        assert_eq!(msg.to_string(), "332 bob #chan :\r\n");
    }
}
