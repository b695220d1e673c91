mod bind_transceiver;
mod command_id;
mod command_status;
mod deliver_sm;
mod enquire_link;
mod generic_nack;
mod interface_version;
mod submit_sm;
mod tlv;
mod unbind;

pub use bind_transceiver::{BindTransceiver, BindTransceiverResponse};
pub use command_id::CommandId;
pub use command_status::CommandStatus;
pub use deliver_sm::{DeliverSm, DeliverSmResponse};
pub use enquire_link::{EnquireLink, EnquireLinkResponse};
pub use generic_nack::GenericNack;
pub use interface_version::InterfaceVersion;
pub use submit_sm::{SubmitSm, SubmitSmResponse};
pub use tlv::{Tlv, tags};
pub use unbind::{Unbind, UnbindResponse};

use bytes::{BufMut, Bytes, BytesMut};

// SMPP v3.4 specification field length limits (excluding null terminator)
pub const MAX_SYSTEM_ID_LENGTH: usize = 15;
pub const MAX_PASSWORD_LENGTH: usize = 8;
pub const MAX_ADDRESS_LENGTH: usize = 20;
pub const MAX_SHORT_MESSAGE_LENGTH: usize = 254;

/// Serialize a PDU to its on-wire byte form.
///
/// Implementations write a placeholder command_length, append the fixed
/// header fields and the body, then backfill the real length; `finish_pdu`
/// does the backfill.
pub trait ToBytes {
    fn to_bytes(&self) -> Bytes;
}

/// Start a PDU buffer: placeholder length + command_id + command_status +
/// sequence_number.
pub(crate) fn begin_pdu(
    buf: &mut BytesMut,
    command_id: CommandId,
    command_status: CommandStatus,
    sequence_number: u32,
) {
    buf.put_u32(0_u32); // command_length, backfilled by finish_pdu
    buf.put_u32(command_id as u32);
    buf.put_u32(command_status as u32);
    buf.put_u32(sequence_number);
}

/// Backfill command_length over the placeholder written by `begin_pdu` and
/// freeze the buffer.
pub(crate) fn finish_pdu(mut buf: BytesMut) -> Bytes {
    let length = buf.len() as u32;
    buf[0..4].copy_from_slice(&length.to_be_bytes());
    buf.freeze()
}

/// Append a C-octet string: the bytes of `s` followed by a NUL terminator.
/// PDU string fields that carry non-ASCII alphabets go through the text
/// codec before reaching this point.
pub(crate) fn put_c_octet_string(buf: &mut BytesMut, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.put_u8(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_length_is_backfilled() {
        let mut buf = BytesMut::new();
        begin_pdu(&mut buf, CommandId::EnquireLink, CommandStatus::Ok, 7);
        let bytes = finish_pdu(buf);

        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x00, 0x10]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x15]);
        assert_eq!(&bytes[12..16], &[0x00, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn c_octet_string_is_nul_terminated() {
        let mut buf = BytesMut::new();
        put_c_octet_string(&mut buf, "CMT");
        assert_eq!(&buf[..], b"CMT\0");

        let mut buf = BytesMut::new();
        put_c_octet_string(&mut buf, "");
        assert_eq!(&buf[..], b"\0");
    }
}
