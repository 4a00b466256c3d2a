//! Wire framing for the control channel.
//!
//! One request per line: a verb and its arguments separated by tabs,
//! terminated by a newline. The daemon answers with a single line: `ok`,
//! or `err` followed by a tab and a reason.

use thiserror::Error;

pub const VERB_START: &str = "start";
pub const RESPONSE_OK: &str = "ok";
pub const RESPONSE_ERR: &str = "err";
pub const SEPARATOR: char = '\t';

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("argument contains a framing character: {0:?}")]
    IllegalArgument(String),

    #[error("malformed response line: {0:?}")]
    MalformedResponse(String),
}

/// Encode a start request for the given command.
///
/// Arguments holding a tab or newline cannot be framed and are rejected;
/// commands assembled by the launch layer never contain them.
pub fn encode_start(command: &[String]) -> Result<String, ProtocolError> {
    let mut line = String::from(VERB_START);
    for arg in command {
        if arg.contains(['\t', '\n']) {
            return Err(ProtocolError::IllegalArgument(arg.clone()));
        }
        line.push(SEPARATOR);
        line.push_str(arg);
    }
    line.push('\n');
    Ok(line)
}

/// Decoded daemon response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok,
    Err(String),
}

/// Decode one response line; the trailing newline is tolerated either way.
pub fn decode_response(line: &str) -> Result<Response, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line == RESPONSE_OK {
        return Ok(Response::Ok);
    }
    if line == RESPONSE_ERR {
        return Ok(Response::Err(String::new()));
    }
    match line.split_once(SEPARATOR) {
        Some((RESPONSE_ERR, reason)) => Ok(Response::Err(reason.to_string())),
        _ => Err(ProtocolError::MalformedResponse(line.to_string())),
    }
}
