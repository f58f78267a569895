//! Inbound protocol line structure.
//!
//! Splits one newline-delimited IRC line into prefix, command, and
//! parameters. Matching is anchored and single-pass; there is no
//! backtracking for a hostile server to stress. Classification into
//! [`Event`](crate::Event)s happens in [`conn`](crate::conn).
//!
//! IRCv3 message tags are not part of the grammar here.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::opt,
    sequence::preceded,
    IResult,
};

use crate::error::LineParseError;

/// One protocol line split into its structural parts.
///
/// Borrows from the input; the trailing parameter loses its leading `:`
/// but is otherwise verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// Sender prefix (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command token.
    pub command: &'a str,
    /// Parameters, trailing last.
    pub params: Vec<&'a str>,
}

fn prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

fn command(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

fn line(input: &str) -> IResult<&str, Line<'_>> {
    let (input, pfx) = opt(prefix)(input)?;
    let (input, _) = space0(input)?;
    let (mut rest, cmd) = command(input)?;

    let mut params = Vec::new();
    while let Some(after) = rest.strip_prefix(' ') {
        if let Some(trailing) = after.strip_prefix(':') {
            params.push(trailing);
            rest = "";
            break;
        }
        let end = after.find(' ').unwrap_or(after.len());
        if end == 0 {
            rest = after;
            break;
        }
        params.push(&after[..end]);
        rest = &after[end..];
    }

    Ok((
        rest,
        Line {
            prefix: pfx,
            command: cmd,
            params,
        },
    ))
}

impl<'a> Line<'a> {
    /// Parse a single line, tolerating a trailing `\r\n` or `\n`.
    pub fn parse(input: &'a str) -> Result<Self, LineParseError> {
        let input = input.trim_end_matches(['\r', '\n']);
        if input.is_empty() {
            return Err(LineParseError::EmptyLine);
        }
        match line(input) {
            Ok((_rest, parsed)) => Ok(parsed),
            Err(_) => Err(LineParseError::MissingCommand),
        }
    }

    /// Parameter at position `i`.
    pub fn arg(&self, i: usize) -> Option<&'a str> {
        self.params.get(i).copied()
    }

    /// The three-digit numeric code, when the command is one.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit()) {
            self.command.parse().ok()
        } else {
            None
        }
    }
}
