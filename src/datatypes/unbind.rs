use crate::datatypes::{CommandId, CommandStatus, ToBytes, begin_pdu, finish_pdu};
use bytes::{Bytes, BytesMut};

/// Request to terminate a bound session (Section 4.2.1). Header only.
/// Either peer may initiate; the receiver answers with unbind_resp and the
/// session moves to CLOSED.
#[derive(Clone, Debug, PartialEq)]
pub struct Unbind {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

/// Response to an unbind (Section 4.2.2). Header only.
#[derive(Clone, Debug, PartialEq)]
pub struct UnbindResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl ToBytes for Unbind {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        begin_pdu(
            &mut buf,
            CommandId::Unbind,
            self.command_status,
            self.sequence_number,
        );
        finish_pdu(buf)
    }
}

impl ToBytes for UnbindResponse {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        begin_pdu(
            &mut buf,
            CommandId::UnbindResp,
            self.command_status,
            self.sequence_number,
        );
        finish_pdu(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbind_wire_format() {
        let pdu = Unbind {
            command_status: CommandStatus::Ok,
            sequence_number: 9,
        };
        let bytes = pdu.to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x06]);
        assert_eq!(&bytes[12..16], &[0x00, 0x00, 0x00, 0x09]);
    }

    #[test]
    fn unbind_resp_wire_format() {
        let pdu = UnbindResponse {
            command_status: CommandStatus::Ok,
            sequence_number: 9,
        };
        let bytes = pdu.to_bytes();
        assert_eq!(&bytes[4..8], &[0x80, 0x00, 0x00, 0x06]);
    }
}
