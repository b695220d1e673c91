// ABOUTME: SMPP client error taxonomy covering transport, protocol, session and codec failures
// ABOUTME: Provides structured error reporting with automatic conversion from underlying I/O errors

use crate::client::session::SessionState;
use crate::codec::CodecError;
use crate::datatypes::{CommandId, CommandStatus};
use std::io;
use thiserror::Error;

/// Errors surfaced by SMPP client operations.
///
/// Internal runtime errors never crash the process: the receive and dequeue
/// loops log them and enter backoff. What reaches the caller is what the
/// caller can act on.
#[derive(Debug, Error)]
pub enum SmppError {
    /// TCP connect failure, EOF from the peer, or a read/write failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// Inbound bytes that do not parse as an SMPP v3.4 PDU. The receive
    /// loop closes the session on this.
    #[error("malformed pdu: {0}")]
    MalformedPdu(String),

    /// The PDU is not admitted in the current session state; nothing was
    /// written to the wire.
    #[error("{command} cannot be sent while the session is {state}")]
    IllegalSessionState {
        command: CommandId,
        state: SessionState,
    },

    /// The SMSC answered our bind with a non-OK status. The session stays
    /// OPEN.
    #[error("smsc rejected bind: {0}")]
    BindRejected(CommandStatus),

    /// Text could not be converted under the configured error policy.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The encoded short message does not fit the submit_sm field.
    #[error("short_message is {octets} octets; submit_sm carries at most 254")]
    MessageTooLong { octets: usize },

    /// The external broker failed to enqueue or dequeue.
    #[error("broker error: {0}")]
    Broker(String),

    /// The configuration aggregate failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,
}

/// Result type alias for SMPP client operations.
pub type SmppResult<T> = Result<T, SmppError>;

impl From<Box<dyn std::error::Error + Send + Sync>> for SmppError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<io::Error>() {
            Ok(io_err) => SmppError::Transport(*io_err),
            Err(other) => SmppError::MalformedPdu(other.to_string()),
        }
    }
}
