//! The memcached-family text wire protocol.
//!
//! Implemented only so the storage core can be exercised end to end — this
//! parser and its dispatch are kept deliberately thin, separate from the
//! `SimpleLru`/`StripedLru`/`Executor` core. Grounded in the
//! line-then-payload command shape of
//! `examples/original_source/src/protocol/Parser.cpp`, reduced to the
//! single blocking-read model this crate's server uses instead of an
//! epoll reactor.

use std::io::{self, BufRead, Write};

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: Vec<u8>, flags: u32, exptime: i64, value: Vec<u8> },
    Add { key: Vec<u8>, flags: u32, exptime: i64, value: Vec<u8> },
    Replace { key: Vec<u8>, flags: u32, exptime: i64, value: Vec<u8> },
    Append { key: Vec<u8>, flags: u32, exptime: i64, value: Vec<u8> },
    Get { keys: Vec<Vec<u8>> },
    Delete { key: Vec<u8> },
}

/// A reply to write back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Stored,
    NotStored,
    Deleted,
    NotFound,
    /// `(key, flags, value)` for each key present, in request order.
    Values(Vec<(Vec<u8>, u32, Vec<u8>)>),
    ClientError(String),
}

/// Parse errors. `Malformed` keeps the connection open (the caller writes
/// a `CLIENT_ERROR` reply); `Io` is fatal to the connection.
#[derive(Debug)]
pub enum ProtocolError {
    Io(io::Error),
    Malformed(String),
}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        ProtocolError::Io(e)
    }
}

/// Reads one command from `reader`. `Ok(None)` means the peer closed the
/// connection cleanly before sending anything (EOF on the command line).
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Option<Command>, ProtocolError> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }
    let line = line.trim_end_matches(['\r', '\n']);
    let mut tokens = line.split_ascii_whitespace();
    let verb = tokens.next().ok_or_else(|| ProtocolError::Malformed("empty command".into()))?;

    match verb {
        "set" | "add" | "replace" | "append" => {
            let key = tokens
                .next()
                .ok_or_else(|| ProtocolError::Malformed("missing key".into()))?
                .as_bytes()
                .to_vec();
            let flags: u32 = parse_token(tokens.next(), "flags")?;
            let exptime: i64 = parse_token(tokens.next(), "exptime")?;
            let bytes: usize = parse_token(tokens.next(), "bytes")?;

            let mut payload = vec![0u8; bytes];
            reader.read_exact(&mut payload)?;
            let mut trailer = [0u8; 2];
            reader.read_exact(&mut trailer)?;
            if &trailer != b"\r\n" {
                return Err(ProtocolError::Malformed("payload missing trailing CRLF".into()));
            }

            Ok(Some(match verb {
                "set" => Command::Set { key, flags, exptime, value: payload },
                "add" => Command::Add { key, flags, exptime, value: payload },
                "replace" => Command::Replace { key, flags, exptime, value: payload },
                _ => Command::Append { key, flags, exptime, value: payload },
            }))
        }
        "get" => {
            let keys: Vec<Vec<u8>> = tokens.map(|t| t.as_bytes().to_vec()).collect();
            if keys.is_empty() {
                return Err(ProtocolError::Malformed("get requires at least one key".into()));
            }
            Ok(Some(Command::Get { keys }))
        }
        "delete" => {
            let key = tokens
                .next()
                .ok_or_else(|| ProtocolError::Malformed("missing key".into()))?
                .as_bytes()
                .to_vec();
            Ok(Some(Command::Delete { key }))
        }
        other => Err(ProtocolError::Malformed(format!("unknown command {other:?}"))),
    }
}

fn parse_token<T: std::str::FromStr>(tok: Option<&str>, name: &str) -> Result<T, ProtocolError> {
    tok.ok_or_else(|| ProtocolError::Malformed(format!("missing {name}")))?
        .parse()
        .map_err(|_| ProtocolError::Malformed(format!("invalid {name}")))
}

/// Writes `reply` in the memcached text wire format.
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> io::Result<()> {
    match reply {
        Reply::Stored => writer.write_all(b"STORED\r\n"),
        Reply::NotStored => writer.write_all(b"NOT_STORED\r\n"),
        Reply::Deleted => writer.write_all(b"DELETED\r\n"),
        Reply::NotFound => writer.write_all(b"NOT_FOUND\r\n"),
        Reply::Values(values) => {
            for (key, flags, value) in values {
                write!(writer, "VALUE ")?;
                writer.write_all(key)?;
                writeln!(writer, " {flags} {}\r", value.len())?;
                writer.write_all(value)?;
                writer.write_all(b"\r\n")?;
            }
            writer.write_all(b"END\r\n")
        }
        Reply::ClientError(reason) => writeln!(writer, "CLIENT_ERROR {reason}\r"),
    }
}
