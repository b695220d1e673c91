use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

// Standard TLV tag constants per SMPP v3.4 specification section 5.3.2
pub mod tags {
    pub const DEST_ADDR_SUBUNIT: u16 = 0x0005;
    pub const SOURCE_ADDR_SUBUNIT: u16 = 0x000D;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const ADDITIONAL_STATUS_INFO_TEXT: u16 = 0x001D;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const MS_MSG_WAIT_FACILITIES: u16 = 0x0030;
    pub const PRIVACY_INDICATOR: u16 = 0x0201;
    pub const SOURCE_SUBADDRESS: u16 = 0x0202;
    pub const DEST_SUBADDRESS: u16 = 0x0203;
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const USER_RESPONSE_CODE: u16 = 0x0205;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020B;
    pub const SAR_MSG_REF_NUM: u16 = 0x020C;
    pub const LANGUAGE_INDICATOR: u16 = 0x020D;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
    pub const SC_INTERFACE_VERSION: u16 = 0x0210;
    pub const CALLBACK_NUM_PRES_IND: u16 = 0x0302;
    pub const CALLBACK_NUM_ATAG: u16 = 0x0303;
    pub const NUMBER_OF_MESSAGES: u16 = 0x0304;
    pub const CALLBACK_NUM: u16 = 0x0381;
    pub const DPF_RESULT: u16 = 0x0420;
    pub const SET_DPF: u16 = 0x0421;
    pub const MS_AVAILABILITY_STATUS: u16 = 0x0422;
    pub const NETWORK_ERROR_CODE: u16 = 0x0423;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const DELIVERY_FAILURE_REASON: u16 = 0x0425;
    pub const MORE_MESSAGES_TO_SEND: u16 = 0x0426;
    pub const MESSAGE_STATE: u16 = 0x0427;
    pub const USSD_SERVICE_OP: u16 = 0x0501;
    pub const DISPLAY_TIME: u16 = 0x1201;
    pub const SMS_SIGNAL: u16 = 0x1203;
    pub const MS_VALIDITY: u16 = 0x1204;
    pub const ALERT_ON_MESSAGE_DELIVERY: u16 = 0x130C;
    pub const ITS_REPLY_TYPE: u16 = 0x1380;
    pub const ITS_SESSION_INFO: u16 = 0x1383;
}

/// An SMPP optional parameter: `{ u16 tag, u16 length, value[length] }`,
/// big-endian, appended after the mandatory body.
///
/// Tags outside the section 5.3.2 dictionary are preserved by their numeric
/// value so that vendor extensions survive a parse/serialize round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct Tlv {
    /// Uniquely identifies the optional parameter.
    pub tag: u16,

    /// Length of the value field in octets. Does not include the tag and
    /// length fields themselves.
    pub length: u16,

    /// The raw parameter data. Integer-typed tags carry network-order
    /// unsigned integers of 1, 2 or 4 octets; string-typed tags carry
    /// NUL-terminated ASCII inside the value region; a handful of tags
    /// (e.g. alert_on_message_delivery) have a zero-length value.
    pub value: Bytes,
}

impl Tlv {
    /// Build a TLV from a tag and raw value bytes, deriving the length field.
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Tlv {
        let value = value.into();
        Tlv {
            tag,
            length: value.len() as u16,
            value,
        }
    }

    /// Serialized size: 2 octets tag + 2 octets length + value.
    pub fn wire_length(&self) -> usize {
        4 + self.value.len()
    }

    /// Append this TLV to an in-progress PDU body.
    pub fn put(&self, buf: &mut BytesMut) {
        buf.put_u16(self.tag);
        buf.put_u16(self.length);
        buf.extend_from_slice(&self.value);
    }

    /// Convert this TLV to standalone bytes.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_length());
        self.put(&mut buf);
        buf.freeze()
    }

    /// Decode a TLV from the buffer. Returns `None` when fewer than 4 octets
    /// remain or the declared length overruns the buffer; the caller treats
    /// that as a truncated PDU.
    pub fn get(buf: &mut Cursor<&[u8]>) -> Option<Tlv> {
        if buf.remaining() < 4 {
            return None;
        }
        let tag = buf.get_u16();
        let length = buf.get_u16();
        if buf.remaining() < length as usize {
            return None;
        }
        let value = buf.copy_to_bytes(length as usize);
        Some(Tlv { tag, length, value })
    }
}
