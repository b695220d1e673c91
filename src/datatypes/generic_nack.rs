use crate::datatypes::{CommandId, CommandStatus, ToBytes, begin_pdu, finish_pdu};
use bytes::{Bytes, BytesMut};

/// Negative acknowledgement for a PDU the peer could not parse
/// (Section 4.3.1). Header only; carries the error in command_status and,
/// when the offending sequence number could be recovered, echoes it.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericNack {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl ToBytes for GenericNack {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        begin_pdu(
            &mut buf,
            CommandId::GenericNack,
            self.command_status,
            self.sequence_number,
        );
        finish_pdu(buf)
    }
}
