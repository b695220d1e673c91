use crate::datatypes::{CommandId, CommandStatus, ToBytes, begin_pdu, finish_pdu};
use bytes::{Bytes, BytesMut};

/// Liveness probe exchanged over a bound session (Section 4.11.1).
/// Header only; command_status is always NULL on a request.
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLink {
    pub sequence_number: u32,
}

/// Response to an enquire_link, echoing its sequence number (Section 4.11.2).
#[derive(Clone, Debug, PartialEq)]
pub struct EnquireLinkResponse {
    pub sequence_number: u32,
}

impl ToBytes for EnquireLink {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        begin_pdu(
            &mut buf,
            CommandId::EnquireLink,
            CommandStatus::Ok,
            self.sequence_number,
        );
        finish_pdu(buf)
    }
}

impl ToBytes for EnquireLinkResponse {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);
        begin_pdu(
            &mut buf,
            CommandId::EnquireLinkResp,
            CommandStatus::Ok,
            self.sequence_number,
        );
        finish_pdu(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enquire_link_wire_format() {
        let pdu = EnquireLink { sequence_number: 1 };
        let bytes = pdu.to_bytes();
        assert_eq!(
            bytes.as_ref(),
            &[
                0x00, 0x00, 0x00, 0x10, // command_length
                0x00, 0x00, 0x00, 0x15, // command_id
                0x00, 0x00, 0x00, 0x00, // command_status
                0x00, 0x00, 0x00, 0x01, // sequence_number
            ]
        );
    }

    #[test]
    fn enquire_link_resp_echoes_sequence() {
        let pdu = EnquireLinkResponse {
            sequence_number: 0x0000_ABCD,
        };
        let bytes = pdu.to_bytes();
        assert_eq!(&bytes[4..8], &[0x80, 0x00, 0x00, 0x15]);
        assert_eq!(&bytes[12..16], &[0x00, 0x00, 0xAB, 0xCD]);
    }
}
