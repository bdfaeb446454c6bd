//! Nom-based line parser.
//!
//! Produces a borrowed [`ParsedLine`] which [`crate::Message`] turns into
//! owned, typed form.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;

/// RFC 2812 parameter limit.
const MAX_PARAMS: usize = 15;

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Parse `[:prefix] command`, leaving the parameter section.
fn parse_head(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    Ok((input, (prefix, command)))
}

/// Split the parameter section into middle parameters and an optional trailing one.
///
/// Consecutive spaces count as one separator. At most [`MAX_PARAMS`] are kept.
fn parse_params(input: &str) -> SmallVec<[&str; MAX_PARAMS]> {
    let mut params: SmallVec<[&str; MAX_PARAMS]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        if params.len() >= MAX_PARAMS {
            break;
        }

        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

/// A parsed line with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token, as sent.
    pub command: &'a str,
    /// Command parameters, including trailing.
    pub params: SmallVec<[&'a str; MAX_PARAMS]>,
}

impl<'a> ParsedLine<'a> {
    /// Parse one line. Line terminators are stripped first.
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let input = line.trim_end_matches(['\r', '\n']);
        if input.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        let parsed = parse_head(input);

        match parsed {
            Ok((rest, (prefix, command))) => {
                // Anything glued to the command token (e.g. "NICK:bob") is malformed
                if !rest.is_empty() && !rest.starts_with(' ') {
                    return Err(MessageParseError::InvalidCommand {
                        input: input.to_string(),
                        position: input.len() - rest.len(),
                    });
                }
                Ok(ParsedLine {
                    prefix,
                    command,
                    params: parse_params(rest),
                })
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(MessageParseError::InvalidCommand {
                    input: input.to_string(),
                    position: input.len() - e.input.len(),
                })
            }
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::InvalidCommand {
                input: input.to_string(),
                position: input.len(),
            }),
        }
    }
}
