//! Provides a type representing an SMPP protocol frame as well as utilities
//! for parsing frames from a byte array.

use crate::datatypes::{
    BindTransceiver, BindTransceiverResponse, CommandId, CommandStatus, DeliverSm,
    DeliverSmResponse, EnquireLink, EnquireLinkResponse, GenericNack, InterfaceVersion, SubmitSm,
    SubmitSmResponse, Tlv, Unbind, UnbindResponse,
};
use bytes::{Buf, Bytes};
use core::fmt;
use num_enum::TryFromPrimitiveError;
use std::convert::TryFrom;
use std::io::Cursor;
use std::mem::size_of;

/// One parsed SMPP PDU, tagged by command.
#[derive(Clone, Debug)]
pub enum Frame {
    BindTransceiver(BindTransceiver),
    BindTransceiverResponse(BindTransceiverResponse),
    SubmitSm(Box<SubmitSm>),
    SubmitSmResponse(SubmitSmResponse),
    DeliverSm(Box<DeliverSm>),
    DeliverSmResponse(DeliverSmResponse),
    EnquireLink(EnquireLink),
    EnquireLinkResponse(EnquireLinkResponse),
    Unbind(Unbind),
    UnbindResponse(UnbindResponse),
    GenericNack(GenericNack),
}

#[derive(Debug)]
pub enum Error {
    /// Not enough data is available to parse a message
    Incomplete,

    /// Invalid message encoding
    Malformed(String),
}

/// The fixed header is four big-endian u32 fields.
pub const HEADER_LENGTH: usize = 16;

impl Frame {
    /// Checks if an entire PDU can be decoded from `src`. If it can be,
    /// returns the command_length so the connection knows how many bytes to
    /// discard after parsing.
    ///
    /// A command_length below 16 can never be valid; it is reported as
    /// malformed rather than incomplete so the connection is torn down
    /// instead of waiting for bytes that will never arrive.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<usize, Error> {
        let command_length = peek_u32(src)? as usize;
        if command_length < HEADER_LENGTH {
            return Err(Error::Malformed(format!(
                "command_length {command_length} is below the 16 octet header"
            )));
        }
        (command_length <= src.remaining())
            .then_some(command_length)
            .ok_or(Error::Incomplete)
    }

    /// Parse one PDU out of `src`. The caller has already validated with
    /// `check` that `src` holds at least `command_length` bytes.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Frame, Error> {
        // parse the header
        let command_length = get_u32(src)? as usize;
        let command_id = CommandId::try_from(get_u32(src)?)?;
        let command_status = CommandStatus::try_from(get_u32(src)?)?;
        let sequence_number = get_u32(src)?;

        // The body ends where command_length says it does; TLV iteration
        // below must not run into any bytes buffered after this PDU.
        let body_length = command_length.saturating_sub(HEADER_LENGTH);
        let start = src.position() as usize;
        let full: &[u8] = *src.get_ref();
        if full.len() - start < body_length {
            return Err(Error::Incomplete);
        }
        let mut body = Cursor::new(&full[start..start + body_length]);
        src.set_position((start + body_length) as u64);
        let src = &mut body;

        let frame = match command_id {
            CommandId::BindTransceiver => {
                let system_id = get_c_octet_string(src, 16, "system_id")?;
                let password = get_c_octet_string(src, 9, "password")?;
                let system_type = get_c_octet_string(src, 13, "system_type")?;
                let interface_version = InterfaceVersion::try_from(get_u8(src)?)?;
                let addr_ton = get_u8(src)?;
                let addr_npi = get_u8(src)?;
                let address_range = get_c_octet_string(src, 41, "address_range")?;

                Frame::BindTransceiver(BindTransceiver {
                    command_status,
                    sequence_number,
                    system_id,
                    password: (!password.is_empty()).then_some(password),
                    system_type,
                    interface_version,
                    addr_ton,
                    addr_npi,
                    address_range,
                })
            }
            CommandId::BindTransceiverResp => {
                let system_id = get_c_octet_string(src, 16, "system_id")?;
                let sc_interface_version = match src.has_remaining() {
                    true => Some(get_tlv(src)?),
                    false => None,
                };

                Frame::BindTransceiverResponse(BindTransceiverResponse {
                    command_status,
                    sequence_number,
                    system_id,
                    sc_interface_version,
                })
            }
            CommandId::SubmitSm => {
                let body = parse_sm_body(src)?;
                Frame::SubmitSm(Box::new(SubmitSm {
                    command_status,
                    sequence_number,
                    service_type: body.service_type,
                    source_addr_ton: body.source_addr_ton,
                    source_addr_npi: body.source_addr_npi,
                    source_addr: body.source_addr,
                    dest_addr_ton: body.dest_addr_ton,
                    dest_addr_npi: body.dest_addr_npi,
                    destination_addr: body.destination_addr,
                    esm_class: body.esm_class,
                    protocol_id: body.protocol_id,
                    priority_flag: body.priority_flag,
                    schedule_delivery_time: body.schedule_delivery_time,
                    validity_period: body.validity_period,
                    registered_delivery: body.registered_delivery,
                    replace_if_present_flag: body.replace_if_present_flag,
                    data_coding: body.data_coding,
                    sm_default_msg_id: body.sm_default_msg_id,
                    short_message: body.short_message,
                    tlvs: body.tlvs,
                }))
            }
            CommandId::SubmitSmResp => {
                let message_id = get_c_octet_string(src, 65, "message_id")?;
                Frame::SubmitSmResponse(SubmitSmResponse {
                    command_status,
                    sequence_number,
                    message_id,
                })
            }
            CommandId::DeliverSm => {
                let body = parse_sm_body(src)?;
                Frame::DeliverSm(Box::new(DeliverSm {
                    command_status,
                    sequence_number,
                    service_type: body.service_type,
                    source_addr_ton: body.source_addr_ton,
                    source_addr_npi: body.source_addr_npi,
                    source_addr: body.source_addr,
                    dest_addr_ton: body.dest_addr_ton,
                    dest_addr_npi: body.dest_addr_npi,
                    destination_addr: body.destination_addr,
                    esm_class: body.esm_class,
                    protocol_id: body.protocol_id,
                    priority_flag: body.priority_flag,
                    schedule_delivery_time: body.schedule_delivery_time,
                    validity_period: body.validity_period,
                    registered_delivery: body.registered_delivery,
                    replace_if_present_flag: body.replace_if_present_flag,
                    data_coding: body.data_coding,
                    sm_default_msg_id: body.sm_default_msg_id,
                    short_message: body.short_message,
                    tlvs: body.tlvs,
                }))
            }
            CommandId::DeliverSmResp => {
                let message_id = get_c_octet_string(src, 65, "message_id")?;
                Frame::DeliverSmResponse(DeliverSmResponse {
                    command_status,
                    sequence_number,
                    message_id,
                })
            }
            CommandId::EnquireLink => Frame::EnquireLink(EnquireLink { sequence_number }),
            CommandId::EnquireLinkResp => {
                Frame::EnquireLinkResponse(EnquireLinkResponse { sequence_number })
            }
            CommandId::Unbind => Frame::Unbind(Unbind {
                command_status,
                sequence_number,
            }),
            CommandId::UnbindResp => Frame::UnbindResponse(UnbindResponse {
                command_status,
                sequence_number,
            }),
            CommandId::GenericNack => Frame::GenericNack(GenericNack {
                command_status,
                sequence_number,
            }),
        };

        Ok(frame)
    }

    /// The command identifier of this frame.
    pub fn command_id(&self) -> CommandId {
        match self {
            Frame::BindTransceiver(_) => CommandId::BindTransceiver,
            Frame::BindTransceiverResponse(_) => CommandId::BindTransceiverResp,
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResponse(_) => CommandId::SubmitSmResp,
            Frame::DeliverSm(_) => CommandId::DeliverSm,
            Frame::DeliverSmResponse(_) => CommandId::DeliverSmResp,
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResponse(_) => CommandId::EnquireLinkResp,
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResponse(_) => CommandId::UnbindResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
        }
    }

    /// The command_status carried in the header. enquire_link and its
    /// response do not model a status; they are always ESME_ROK.
    pub fn command_status(&self) -> CommandStatus {
        match self {
            Frame::BindTransceiver(pdu) => pdu.command_status,
            Frame::BindTransceiverResponse(pdu) => pdu.command_status,
            Frame::SubmitSm(pdu) => pdu.command_status,
            Frame::SubmitSmResponse(pdu) => pdu.command_status,
            Frame::DeliverSm(pdu) => pdu.command_status,
            Frame::DeliverSmResponse(pdu) => pdu.command_status,
            Frame::EnquireLink(_) | Frame::EnquireLinkResponse(_) => CommandStatus::Ok,
            Frame::Unbind(pdu) => pdu.command_status,
            Frame::UnbindResponse(pdu) => pdu.command_status,
            Frame::GenericNack(pdu) => pdu.command_status,
        }
    }

    /// The sequence number carried in the header.
    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::BindTransceiver(pdu) => pdu.sequence_number,
            Frame::BindTransceiverResponse(pdu) => pdu.sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number,
            Frame::SubmitSmResponse(pdu) => pdu.sequence_number,
            Frame::DeliverSm(pdu) => pdu.sequence_number,
            Frame::DeliverSmResponse(pdu) => pdu.sequence_number,
            Frame::EnquireLink(pdu) => pdu.sequence_number,
            Frame::EnquireLinkResponse(pdu) => pdu.sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number,
            Frame::UnbindResponse(pdu) => pdu.sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number,
        }
    }
}

/// The mandatory body shared by submit_sm and deliver_sm.
struct SmBody {
    service_type: String,
    source_addr_ton: u8,
    source_addr_npi: u8,
    source_addr: String,
    dest_addr_ton: u8,
    dest_addr_npi: u8,
    destination_addr: String,
    esm_class: u8,
    protocol_id: u8,
    priority_flag: u8,
    schedule_delivery_time: String,
    validity_period: String,
    registered_delivery: u8,
    replace_if_present_flag: u8,
    data_coding: u8,
    sm_default_msg_id: u8,
    short_message: Bytes,
    tlvs: Vec<Tlv>,
}

fn parse_sm_body(src: &mut Cursor<&[u8]>) -> Result<SmBody, Error> {
    let service_type = get_c_octet_string(src, 6, "service_type")?;
    let source_addr_ton = get_u8(src)?;
    let source_addr_npi = get_u8(src)?;
    let source_addr = get_c_octet_string(src, 21, "source_addr")?;
    let dest_addr_ton = get_u8(src)?;
    let dest_addr_npi = get_u8(src)?;
    let destination_addr = get_c_octet_string(src, 21, "destination_addr")?;
    let esm_class = get_u8(src)?;
    let protocol_id = get_u8(src)?;
    let priority_flag = get_u8(src)?;
    let schedule_delivery_time = get_c_octet_string(src, 17, "schedule_delivery_time")?;
    let validity_period = get_c_octet_string(src, 17, "validity_period")?;
    let registered_delivery = get_u8(src)?;
    let replace_if_present_flag = get_u8(src)?;
    let data_coding = get_u8(src)?;
    let sm_default_msg_id = get_u8(src)?;
    let sm_length = get_u8(src)?;

    if src.remaining() < sm_length as usize {
        return Err(Error::Malformed(format!(
            "sm_length {sm_length} overruns the PDU body ({} octets left)",
            src.remaining()
        )));
    }
    let short_message = src.copy_to_bytes(sm_length as usize);

    // Anything after the short message is the optional parameter list.
    let mut tlvs = Vec::new();
    while src.has_remaining() {
        tlvs.push(get_tlv(src)?);
    }

    Ok(SmBody {
        service_type,
        source_addr_ton,
        source_addr_npi,
        source_addr,
        dest_addr_ton,
        dest_addr_npi,
        destination_addr,
        esm_class,
        protocol_id,
        priority_flag,
        schedule_delivery_time,
        validity_period,
        registered_delivery,
        replace_if_present_flag,
        data_coding,
        sm_default_msg_id,
        short_message,
        tlvs,
    })
}

/// Peek a u32 from the buffer without advancing the cursor
fn peek_u32(src: &mut Cursor<&[u8]>) -> Result<u32, Error> {
    (src.remaining() >= size_of::<u32>())
        .then(|| {
            let starting_position = src.position();
            let val = src.get_u32();
            src.set_position(starting_position);
            val
        })
        .ok_or(Error::Incomplete)
}

/// Get a u8 from the buffer
fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    src.has_remaining()
        .then(|| src.get_u8())
        .ok_or(Error::Incomplete)
}

/// Get a u32 from the buffer
fn get_u32(src: &mut Cursor<&[u8]>) -> Result<u32, Error> {
    (src.remaining() >= size_of::<u32>())
        .then(|| src.get_u32())
        .ok_or(Error::Incomplete)
}

/// Read a NUL-terminated ASCII field of at most `max_length` octets
/// (terminator included). A field with no terminator inside its bounds is a
/// truncated C-octet string and fails the parse.
fn get_c_octet_string(
    src: &mut Cursor<&[u8]>,
    max_length: usize,
    field_name: &str,
) -> Result<String, Error> {
    let available = src.remaining().min(max_length);
    let chunk = src.chunk();
    let terminator = chunk[..available.min(chunk.len())]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::Malformed(format!("truncated C-octet string in {field_name}")))?;

    let bytes = src.copy_to_bytes(terminator);
    src.advance(1); // consume the terminator
    String::from_utf8(bytes.into())
        .map_err(|e| Error::Malformed(format!("invalid text in {field_name}: {e}")))
}

fn get_tlv(src: &mut Cursor<&[u8]>) -> Result<Tlv, Error> {
    Tlv::get(src).ok_or_else(|| Error::Malformed("truncated TLV in optional parameters".into()))
}

impl fmt::Display for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{} seq={} status={:?}",
            self.command_id(),
            self.sequence_number(),
            self.command_status()
        )
    }
}

impl From<TryFromPrimitiveError<CommandId>> for Error {
    fn from(src: TryFromPrimitiveError<CommandId>) -> Error {
        Error::Malformed(format!("unknown command_id 0x{:08X}", src.number))
    }
}

impl From<TryFromPrimitiveError<CommandStatus>> for Error {
    fn from(src: TryFromPrimitiveError<CommandStatus>) -> Error {
        Error::Malformed(format!("unknown command_status 0x{:08X}", src.number))
    }
}

impl From<TryFromPrimitiveError<InterfaceVersion>> for Error {
    fn from(src: TryFromPrimitiveError<InterfaceVersion>) -> Error {
        Error::Malformed(format!("unknown interface_version 0x{:02X}", src.number))
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Incomplete => "stream ended early".fmt(fmt),
            Error::Malformed(reason) => reason.fmt(fmt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{ToBytes, tags};
    use std::io::Cursor;

    #[test]
    fn check_accepts_a_complete_pdu() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length (16: enquire_link)
            0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let mut buf = Cursor::new(data.as_slice());
        assert_eq!(Frame::check(&mut buf).unwrap(), 16);
    }

    #[test]
    fn check_reports_incomplete_until_length_arrives() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x20, // claims 32 bytes
            0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let mut buf = Cursor::new(data.as_slice());
        assert!(matches!(Frame::check(&mut buf), Err(Error::Incomplete)));
    }

    #[test]
    fn check_rejects_undersized_command_length() {
        let data: Vec<u8> = vec![0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x15];
        let mut buf = Cursor::new(data.as_slice());
        assert!(matches!(Frame::check(&mut buf), Err(Error::Malformed(_))));
    }

    #[test]
    fn parse_bind_transceiver_response() {
        let data: Vec<u8> = vec![
            // Header:
            0x00, 0x00, 0x00, 0x18, // command_length (24)
            0x80, 0x00, 0x00, 0x09, // command_id (bind_transceiver_resp)
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
            // Body:
            0x53, 0x4D, 0x50, 0x50, 0x53, 0x69, 0x6D, 0x00, // system_id "SMPPSim\0"
        ];
        let mut buf = Cursor::new(data.as_slice());
        let frame = Frame::parse(&mut buf).unwrap();

        if let Frame::BindTransceiverResponse(resp) = frame {
            assert_eq!(resp.command_status, CommandStatus::Ok);
            assert_eq!(resp.sequence_number, 1);
            assert_eq!(&resp.system_id, "SMPPSim");
            assert!(resp.sc_interface_version.is_none());
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn parse_bind_transceiver_response_with_tlv() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x1D, // command_length (29)
            0x80, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, //
            0x53, 0x4D, 0x50, 0x50, 0x53, 0x69, 0x6D, 0x00, // system_id
            0x02, 0x10, // tag (sc_interface_version)
            0x00, 0x01, // length
            0x34, // value
        ];
        let mut buf = Cursor::new(data.as_slice());
        let frame = Frame::parse(&mut buf).unwrap();

        if let Frame::BindTransceiverResponse(resp) = frame {
            let tlv = resp.sc_interface_version.unwrap();
            assert_eq!(tlv.tag, tags::SC_INTERFACE_VERSION);
            assert_eq!(tlv.value.as_ref(), &[0x34]);
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn parse_bind_rejection_keeps_status() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x11, // command_length (17)
            0x80, 0x00, 0x00, 0x09, // bind_transceiver_resp
            0x00, 0x00, 0x00, 0x0E, // ESME_RINVPASWD
            0x00, 0x00, 0x00, 0x01, //
            0x00, // system_id ""
        ];
        let mut buf = Cursor::new(data.as_slice());
        let frame = Frame::parse(&mut buf).unwrap();
        assert_eq!(frame.command_status(), CommandStatus::InvalidPassword);
    }

    #[test]
    fn parse_submit_sm_response() {
        // submit_sm_resp, status OK, seq 3, message_id "0"
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x12, // command_length (18)
            0x80, 0x00, 0x00, 0x04, // command_id (submit_sm_resp)
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x03, // sequence_number
            0x30, 0x00, // message_id "0\0"
        ];
        let mut buf = Cursor::new(data.as_slice());
        let frame = Frame::parse(&mut buf).unwrap();

        if let Frame::SubmitSmResponse(resp) = frame {
            assert_eq!(resp.command_status, CommandStatus::Ok);
            assert_eq!(resp.sequence_number, 3);
            assert_eq!(&resp.message_id, "0");
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn parse_enquire_link() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x07,
        ];
        let mut buf = Cursor::new(data.as_slice());
        let frame = Frame::parse(&mut buf).unwrap();
        if let Frame::EnquireLink(el) = frame {
            assert_eq!(el.sequence_number, 7);
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn parse_error_unknown_command_id() {
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length
            0x00, 0x00, 0xFF, 0xFF, // invalid command_id
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let mut buf = Cursor::new(data.as_slice());
        assert!(matches!(Frame::parse(&mut buf), Err(Error::Malformed(_))));
    }

    #[test]
    fn parse_error_truncated_c_octet_string() {
        // submit_sm_resp whose message_id never terminates
        let data: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x13, // command_length (19)
            0x80, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, //
            0x30, 0x31, 0x32, // "012" with no NUL
        ];
        let mut buf = Cursor::new(data.as_slice());
        assert!(matches!(Frame::parse(&mut buf), Err(Error::Malformed(_))));
    }

    #[test]
    fn submit_sm_roundtrip() {
        let original = SubmitSm {
            command_status: CommandStatus::Ok,
            sequence_number: 42,
            service_type: "CMT".to_string(),
            source_addr_ton: 0x01,
            source_addr_npi: 0x01,
            source_addr: "2547000000".to_string(),
            dest_addr_ton: 0x01,
            dest_addr_npi: 0x01,
            destination_addr: "254711999999".to_string(),
            esm_class: 0b0000_0011,
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 1,
            replace_if_present_flag: 0,
            data_coding: 0,
            sm_default_msg_id: 0,
            short_message: Bytes::from_static(b"Hello"),
            tlvs: vec![Tlv::new(tags::SOURCE_PORT, Bytes::from_static(&[0x1F, 0x90]))],
        };

        let serialized = original.to_bytes();
        let mut cursor = Cursor::new(serialized.as_ref());
        let parsed = Frame::parse(&mut cursor).unwrap();

        if let Frame::SubmitSm(parsed) = parsed {
            assert_eq!(*parsed, original);
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn deliver_sm_roundtrip_with_unknown_tlv() {
        let original = DeliverSm {
            command_status: CommandStatus::Ok,
            sequence_number: 11,
            service_type: String::new(),
            source_addr_ton: 0x01,
            source_addr_npi: 0x01,
            source_addr: "254711999999".to_string(),
            dest_addr_ton: 0x01,
            dest_addr_npi: 0x01,
            destination_addr: "2547000000".to_string(),
            esm_class: 0x04, // delivery receipt
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            replace_if_present_flag: 0,
            data_coding: 0,
            sm_default_msg_id: 0,
            short_message: Bytes::from_static(b"id:0123 stat:DELIVRD"),
            tlvs: vec![Tlv::new(0x1400, Bytes::from_static(b"vendor"))],
        };

        let serialized = original.to_bytes();
        let mut cursor = Cursor::new(serialized.as_ref());
        let parsed = Frame::parse(&mut cursor).unwrap();

        if let Frame::DeliverSm(parsed) = parsed {
            assert_eq!(*parsed, original);
            assert_eq!(parsed.tlv(0x1400).unwrap().value.as_ref(), b"vendor");
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn unbind_roundtrip() {
        let original = Unbind {
            command_status: CommandStatus::Ok,
            sequence_number: 2,
        };
        let serialized = original.to_bytes();
        let mut cursor = Cursor::new(serialized.as_ref());
        let parsed = Frame::parse(&mut cursor).unwrap();
        if let Frame::Unbind(parsed) = parsed {
            assert_eq!(parsed, original);
        } else {
            panic!("unexpected frame variant");
        }
    }

    #[test]
    fn parse_stops_at_command_length_boundary() {
        // two enquire_links back to back; parse must consume exactly one
        let mut data = EnquireLink { sequence_number: 1 }.to_bytes().to_vec();
        data.extend_from_slice(&EnquireLink { sequence_number: 2 }.to_bytes());

        let mut cursor = Cursor::new(data.as_slice());
        let first = Frame::parse(&mut cursor).unwrap();
        assert_eq!(first.sequence_number(), 1);
        assert_eq!(cursor.position(), 16);
    }
}
