// ABOUTME: Defines the SMPP v3.4 command identifiers this client speaks, per specification Table 4-1
// ABOUTME: Implements command_id validation, the response bit and the bind classification used for admissibility

use core::fmt;
use num_enum::TryFromPrimitive;

/// SMPP v3.4 Command Identifiers (Table 4-1), restricted to the commands a
/// transceiver-mode ESME exchanges with an SMSC.
///
/// ## Command ID Structure
/// - **Bit 31 (MSB)**: Response indicator bit
///   - 0 = Request PDU
///   - 1 = Response PDU
/// - **Bits 30-0**: Command type identifier
///
/// A PDU carrying any other command_id is rejected while parsing; this crate
/// does not bind as transmitter or receiver and does not implement the
/// message-management operations (query_sm, replace_sm, cancel_sm, ...).
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Copy)]
pub enum CommandId {
    /// generic_nack PDU (Section 4.3.1) - Error response for invalid PDUs
    GenericNack = 0x8000_0000,

    // Message Submission Operations (Section 4.4)
    /// submit_sm PDU (Section 4.4.1) - Submit short message
    SubmitSm = 0x0000_0004,
    /// submit_sm_resp PDU (Section 4.4.2) - Response to submit_sm
    SubmitSmResp = 0x8000_0004,

    // Message Delivery Operations (Section 4.6)
    /// deliver_sm PDU (Section 4.6.1) - Deliver message to ESME
    DeliverSm = 0x0000_0005,
    /// deliver_sm_resp PDU (Section 4.6.2) - Response to deliver_sm
    DeliverSmResp = 0x8000_0005,

    // Session Management Operations (Section 4.2)
    /// unbind PDU (Section 4.2.1) - Unbind from SMSC
    Unbind = 0x0000_0006,
    /// unbind_resp PDU (Section 4.2.2) - Response to unbind
    UnbindResp = 0x8000_0006,

    // Transceiver Operations (Section 4.2.5-4.2.6)
    /// bind_transceiver PDU (Section 4.2.5) - Bind as transceiver (TX+RX)
    BindTransceiver = 0x0000_0009,
    /// bind_transceiver_resp PDU (Section 4.2.6) - Response to bind_transceiver
    BindTransceiverResp = 0x8000_0009,

    // Link Management Operations (Section 4.11)
    /// enquire_link PDU (Section 4.11.1) - Link verification request
    EnquireLink = 0x0000_0015,
    /// enquire_link_resp PDU (Section 4.11.2) - Response to enquire_link
    EnquireLinkResp = 0x8000_0015,
}

impl CommandId {
    /// Check if this command_id represents a response PDU.
    ///
    /// generic_nack carries the response bit and never travels as a request.
    pub fn is_response(&self) -> bool {
        (*self as u32) & 0x8000_0000 != 0
    }

    /// Check if this command_id is a bind operation. Binds are the only
    /// requests admissible in the OPEN session state.
    pub fn is_bind(&self) -> bool {
        matches!(self, CommandId::BindTransceiver)
    }

    /// The wire-format name of the command, as it appears in the SMPP
    /// specification and in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandId::GenericNack => "generic_nack",
            CommandId::SubmitSm => "submit_sm",
            CommandId::SubmitSmResp => "submit_sm_resp",
            CommandId::DeliverSm => "deliver_sm",
            CommandId::DeliverSmResp => "deliver_sm_resp",
            CommandId::Unbind => "unbind",
            CommandId::UnbindResp => "unbind_resp",
            CommandId::BindTransceiver => "bind_transceiver",
            CommandId::BindTransceiverResp => "bind_transceiver_resp",
            CommandId::EnquireLink => "enquire_link",
            CommandId::EnquireLinkResp => "enquire_link_resp",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn response_bit() {
        assert!(!CommandId::SubmitSm.is_response());
        assert!(CommandId::SubmitSmResp.is_response());
        assert!(CommandId::GenericNack.is_response());
        assert_eq!(
            CommandId::SubmitSm as u32 | 0x8000_0000,
            CommandId::SubmitSmResp as u32
        );
        assert_eq!(
            CommandId::BindTransceiver as u32 | 0x8000_0000,
            CommandId::BindTransceiverResp as u32
        );
    }

    #[test]
    fn unknown_command_id_is_rejected() {
        assert!(CommandId::try_from(0x0000_0003u32).is_err()); // query_sm, unimplemented
        assert!(CommandId::try_from(0xDEAD_BEEFu32).is_err());
    }

    #[test]
    fn wire_names() {
        assert_eq!(CommandId::BindTransceiver.to_string(), "bind_transceiver");
        assert_eq!(CommandId::EnquireLinkResp.to_string(), "enquire_link_resp");
    }
}
