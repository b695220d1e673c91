// ABOUTME: Defines SMPP v3.4 command status codes per specification Section 5.1.3
// ABOUTME: Carries the full Table 5-2 taxonomy plus the throttling classification used by flow control

use core::fmt;
use num_enum::TryFromPrimitive;

/// SMPP v3.4 Command Status Codes (Section 5.1.3, Table 5-2)
///
/// The command_status field indicates the success or failure of an SMPP
/// request. Request PDUs always carry 0x00000000; response PDUs carry the
/// actual result code.
///
/// Variant doc comments give the `ESME_*` mnemonic from the specification.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// ESME_ROK - No error
    Ok = 0x0000_0000,
    /// ESME_RINVMSGLEN - Message length is invalid
    InvalidMsgLength = 0x0000_0001,
    /// ESME_RINVCMDLEN - Command length is invalid
    InvalidCommandLength = 0x0000_0002,
    /// ESME_RINVCMDID - Invalid command ID
    InvalidCommandId = 0x0000_0003,
    /// ESME_RINVBNDSTS - Incorrect BIND status for given command
    IncorrectBindStatus = 0x0000_0004,
    /// ESME_RALYBND - ESME already in bound state
    AlreadyBound = 0x0000_0005,
    /// ESME_RINVPRTFLG - Invalid priority flag
    InvalidPriorityFlag = 0x0000_0006,
    /// ESME_RINVREGDLVFLG - Invalid registered delivery flag
    InvalidRegisteredDeliveryFlag = 0x0000_0007,
    /// ESME_RSYSERR - System error
    SystemError = 0x0000_0008,
    /// ESME_RINVSRCADR - Invalid source address
    InvalidSourceAddress = 0x0000_000A,
    /// ESME_RINVDSTADR - Invalid destination address
    InvalidDestinationAddress = 0x0000_000B,
    /// ESME_RINVMSGID - Message ID is invalid
    InvalidMessageId = 0x0000_000C,
    /// ESME_RBINDFAIL - Bind failed
    BindFailed = 0x0000_000D,
    /// ESME_RINVPASWD - Invalid password
    InvalidPassword = 0x0000_000E,
    /// ESME_RINVSYSID - Invalid system ID
    InvalidSystemId = 0x0000_000F,
    /// ESME_RCANCELFAIL - Cancel SM failed
    CancelSmFailed = 0x0000_0011,
    /// ESME_RREPLACEFAIL - Replace SM failed
    ReplaceSmFailed = 0x0000_0013,
    /// ESME_RMSGQFUL - Message queue full
    MessageQueueFull = 0x0000_0014,
    /// ESME_RINVSERTYP - Invalid service type
    InvalidServiceType = 0x0000_0015,
    /// ESME_RINVNUMDESTS - Invalid number of destinations
    InvalidNumberOfDestinations = 0x0000_0033,
    /// ESME_RINVDLNAME - Invalid distribution list name
    InvalidDistributionListName = 0x0000_0034,
    /// ESME_RINVDESTFLAG - Destination flag is invalid
    InvalidDestinationFlag = 0x0000_0040,
    /// ESME_RINVSUBREP - Invalid 'submit with replace' request
    InvalidSubmitWithReplace = 0x0000_0042,
    /// ESME_RINVESMCLASS - Invalid esm_class field data
    InvalidEsmClass = 0x0000_0043,
    /// ESME_RCNTSUBDL - Cannot submit to distribution list
    CannotSubmitToDistributionList = 0x0000_0044,
    /// ESME_RSUBMITFAIL - submit_sm or submit_multi failed
    SubmitFailed = 0x0000_0045,
    /// ESME_RINVSRCTON - Invalid source address TON
    InvalidSourceTon = 0x0000_0048,
    /// ESME_RINVSRCNPI - Invalid source address NPI
    InvalidSourceNpi = 0x0000_0049,
    /// ESME_RINVDSTTON - Invalid destination address TON
    InvalidDestTon = 0x0000_0050,
    /// ESME_RINVDSTNPI - Invalid destination address NPI
    InvalidDestNpi = 0x0000_0051,
    /// ESME_RINVSYSTYP - Invalid system_type field
    InvalidSystemType = 0x0000_0053,
    /// ESME_RINVREPFLAG - Invalid replace_if_present flag
    InvalidReplaceIfPresentFlag = 0x0000_0054,
    /// ESME_RINVNUMMSGS - Invalid number of messages
    InvalidNumberOfMessages = 0x0000_0055,
    /// ESME_RTHROTTLED - Throttling error; ESME has exceeded allowed message limits
    Throttled = 0x0000_0058,
    /// ESME_RINVSCHED - Invalid scheduled delivery time
    InvalidScheduledDeliveryTime = 0x0000_0061,
    /// ESME_RINVEXPIRY - Invalid message validity period
    InvalidValidityPeriod = 0x0000_0062,
    /// ESME_RINVDFTMSGID - Predefined message is invalid or not found
    InvalidPredefinedMessageId = 0x0000_0063,
    /// ESME_RX_T_APPN - ESME receiver temporary app error code
    ReceiverTemporaryError = 0x0000_0064,
    /// ESME_RX_P_APPN - ESME receiver permanent app error code
    ReceiverPermanentError = 0x0000_0065,
    /// ESME_RX_R_APPN - ESME receiver reject message error code
    ReceiverRejectError = 0x0000_0066,
    /// ESME_RQUERYFAIL - query_sm request failed
    QueryFailed = 0x0000_0067,
    /// ESME_RINVOPTPARSTREAM - Error in the optional part of the PDU body
    InvalidOptionalParameterStream = 0x0000_00C0,
    /// ESME_ROPTPARNOTALLWD - Optional parameter not allowed
    OptionalParameterNotAllowed = 0x0000_00C1,
    /// ESME_RINVPARLEN - Invalid parameter length
    InvalidParameterLength = 0x0000_00C2,
    /// ESME_RMISSINGOPTPARAM - Expected optional parameter missing
    MissingOptionalParameter = 0x0000_00C3,
    /// ESME_RINVOPTPARAMVAL - Invalid optional parameter value
    InvalidOptionalParameterValue = 0x0000_00C4,
    /// ESME_RDELIVERYFAILURE - Delivery failure (used for data_sm_resp)
    DeliveryFailure = 0x0000_00FE,
    /// ESME_RUNKNOWNERR - Unknown error
    UnknownError = 0x0000_00FF,
}

impl CommandStatus {
    /// True for ESME_ROK.
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandStatus::Ok)
    }

    /// True for ESME_RTHROTTLED; feeds the throttle controller's rolling
    /// window.
    pub fn is_throttled(&self) -> bool {
        matches!(self, CommandStatus::Throttled)
    }

    /// Human-readable description from Table 5-2.
    pub fn description(&self) -> &'static str {
        match self {
            CommandStatus::Ok => "Success",
            CommandStatus::InvalidMsgLength => "Message Length is invalid",
            CommandStatus::InvalidCommandLength => "Command Length is invalid",
            CommandStatus::InvalidCommandId => "Invalid Command ID",
            CommandStatus::IncorrectBindStatus => "Incorrect BIND Status for given command",
            CommandStatus::AlreadyBound => "ESME Already in Bound State",
            CommandStatus::InvalidPriorityFlag => "Invalid Priority Flag",
            CommandStatus::InvalidRegisteredDeliveryFlag => "Invalid Registered Delivery Flag",
            CommandStatus::SystemError => "System Error",
            CommandStatus::InvalidSourceAddress => "Invalid Source Address",
            CommandStatus::InvalidDestinationAddress => "Invalid Dest Addr",
            CommandStatus::InvalidMessageId => "Message ID is invalid",
            CommandStatus::BindFailed => "Bind Failed",
            CommandStatus::InvalidPassword => "Invalid Password",
            CommandStatus::InvalidSystemId => "Invalid System ID",
            CommandStatus::CancelSmFailed => "Cancel SM Failed",
            CommandStatus::ReplaceSmFailed => "Replace SM Failed",
            CommandStatus::MessageQueueFull => "Message Queue Full",
            CommandStatus::InvalidServiceType => "Invalid Service Type",
            CommandStatus::InvalidNumberOfDestinations => "Invalid number of destinations",
            CommandStatus::InvalidDistributionListName => "Invalid Distribution List name",
            CommandStatus::InvalidDestinationFlag => "Destination flag is invalid",
            CommandStatus::InvalidSubmitWithReplace => "Invalid 'submit with replace' request",
            CommandStatus::InvalidEsmClass => "Invalid esm_class field data",
            CommandStatus::CannotSubmitToDistributionList => "Cannot Submit to Distribution List",
            CommandStatus::SubmitFailed => "submit_sm or submit_multi failed",
            CommandStatus::InvalidSourceTon => "Invalid Source address TON",
            CommandStatus::InvalidSourceNpi => "Invalid Source address NPI",
            CommandStatus::InvalidDestTon => "Invalid Destination address TON",
            CommandStatus::InvalidDestNpi => "Invalid Destination address NPI",
            CommandStatus::InvalidSystemType => "Invalid system_type field",
            CommandStatus::InvalidReplaceIfPresentFlag => "Invalid replace_if_present flag",
            CommandStatus::InvalidNumberOfMessages => "Invalid number of messages",
            CommandStatus::Throttled => "Throttling error (ESME has exceeded allowed message limits)",
            CommandStatus::InvalidScheduledDeliveryTime => "Invalid Scheduled Delivery Time",
            CommandStatus::InvalidValidityPeriod => "Invalid message validity period (Expiry time)",
            CommandStatus::InvalidPredefinedMessageId => "Predefined Message Invalid or Not Found",
            CommandStatus::ReceiverTemporaryError => "ESME Receiver Temporary App Error Code",
            CommandStatus::ReceiverPermanentError => "ESME Receiver Permanent App Error Code",
            CommandStatus::ReceiverRejectError => "ESME Receiver Reject Message Error Code",
            CommandStatus::QueryFailed => "query_sm request failed",
            CommandStatus::InvalidOptionalParameterStream => {
                "Error in the optional part of the PDU Body"
            }
            CommandStatus::OptionalParameterNotAllowed => "Optional Parameter not allowed",
            CommandStatus::InvalidParameterLength => "Invalid Parameter Length",
            CommandStatus::MissingOptionalParameter => "Expected Optional Parameter missing",
            CommandStatus::InvalidOptionalParameterValue => "Invalid Optional Parameter Value",
            CommandStatus::DeliveryFailure => "Delivery Failure",
            CommandStatus::UnknownError => "Unknown Error",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} (0x{:08X})", self.description(), *self as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn wire_values() {
        assert_eq!(CommandStatus::Ok as u32, 0x0000_0000);
        assert_eq!(CommandStatus::SystemError as u32, 0x0000_0008);
        assert_eq!(CommandStatus::InvalidPassword as u32, 0x0000_000E);
        assert_eq!(CommandStatus::MessageQueueFull as u32, 0x0000_0014);
        assert_eq!(CommandStatus::Throttled as u32, 0x0000_0058);
        assert_eq!(CommandStatus::UnknownError as u32, 0x0000_00FF);
    }

    #[test]
    fn throttling_classification() {
        assert!(CommandStatus::Throttled.is_throttled());
        assert!(!CommandStatus::Ok.is_throttled());
        assert!(!CommandStatus::MessageQueueFull.is_throttled());
    }

    #[test]
    fn reserved_values_are_rejected() {
        assert!(CommandStatus::try_from(0x0000_0009u32).is_err());
        assert!(CommandStatus::try_from(0x0000_0010u32).is_err());
        assert!(CommandStatus::try_from(0xFFFF_FFFFu32).is_err());
    }
}
