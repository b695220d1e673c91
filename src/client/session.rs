// ABOUTME: SMPP session state machine for a transceiver-mode ESME
// ABOUTME: Gates every outgoing PDU on the per-state admissibility rules of Section 2.3

use crate::client::error::SmppError;
use crate::datatypes::CommandId;
use core::fmt;

/// The states an ESME transceiver session moves through (SMPP v3.4
/// Section 2.2). The states for other bind modes do not apply here.
///
/// ```text
/// CLOSED --connect--> OPEN --bind_transceiver_resp(OK)--> BOUND_TRX
///   ^                                                        |
///   +------------- unbind / unbind_resp / disconnect --------+
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// TCP connection established, no bind issued yet.
    Open,
    /// Bind confirmed by the SMSC; full message traffic allowed.
    BoundTrx,
    /// No usable connection. Initial state, and terminal after unbind or
    /// disconnect.
    Closed,
}

impl SessionState {
    /// Check whether `command` may be sent in this state. Only binds may
    /// travel on an OPEN session; a bound session carries everything except
    /// another bind; a closed session carries nothing.
    pub fn admit(&self, command: CommandId) -> Result<(), SmppError> {
        let allowed = match self {
            SessionState::Open => command.is_bind(),
            SessionState::BoundTrx => !command.is_bind(),
            SessionState::Closed => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(SmppError::IllegalSessionState {
                command,
                state: *self,
            })
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SessionState::Open => "OPEN",
            SessionState::BoundTrx => "BOUND_TRX",
            SessionState::Closed => "CLOSED",
        };
        fmt.write_str(name)
    }
}
