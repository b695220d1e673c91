use crate::datatypes::{
    CommandId, CommandStatus, Tlv, ToBytes, begin_pdu, finish_pdu, put_c_octet_string,
};
use bytes::{BufMut, Bytes, BytesMut};

/// Submission of one short message to the SMSC for onward delivery
/// (Section 4.4.1).
///
/// `short_message` holds the already-encoded payload octets; the text codec
/// runs before PDU construction and `data_coding` declares which alphabet
/// was used. Optional parameters ride in `tlvs` in wire order, unknown tags
/// included.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    // Mandatory parameters, in body order
    pub service_type: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub source_addr: String,
    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub destination_addr: String,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub data_coding: u8,
    pub sm_default_msg_id: u8,
    pub short_message: Bytes,

    // Optional parameters
    pub tlvs: Vec<Tlv>,
}

/// Response to a submit_sm (Section 4.4.2). The body carries the SMSC
/// message_id assigned to the submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub message_id: String,
}

impl SubmitSm {
    /// Length in octets of the short_message field (0-254).
    pub fn sm_length(&self) -> u8 {
        self.short_message.len() as u8
    }

    /// Look up an optional parameter by tag.
    pub fn tlv(&self, tag: u16) -> Option<&Tlv> {
        self.tlvs.iter().find(|t| t.tag == tag)
    }
}

impl ToBytes for SubmitSm {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64 + self.short_message.len());
        begin_pdu(
            &mut buf,
            CommandId::SubmitSm,
            self.command_status,
            self.sequence_number,
        );
        put_c_octet_string(&mut buf, &self.service_type);
        buf.put_u8(self.source_addr_ton);
        buf.put_u8(self.source_addr_npi);
        put_c_octet_string(&mut buf, &self.source_addr);
        buf.put_u8(self.dest_addr_ton);
        buf.put_u8(self.dest_addr_npi);
        put_c_octet_string(&mut buf, &self.destination_addr);
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        put_c_octet_string(&mut buf, &self.schedule_delivery_time);
        put_c_octet_string(&mut buf, &self.validity_period);
        buf.put_u8(self.registered_delivery);
        buf.put_u8(self.replace_if_present_flag);
        buf.put_u8(self.data_coding);
        buf.put_u8(self.sm_default_msg_id);
        buf.put_u8(self.sm_length());
        // Octet String, NOT a C-octet string: no terminator
        buf.extend_from_slice(&self.short_message);
        for tlv in &self.tlvs {
            tlv.put(&mut buf);
        }
        finish_pdu(buf)
    }
}

impl ToBytes for SubmitSmResponse {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16 + self.message_id.len() + 1);
        begin_pdu(
            &mut buf,
            CommandId::SubmitSmResp,
            self.command_status,
            self.sequence_number,
        );
        put_c_octet_string(&mut buf, &self.message_id);
        finish_pdu(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::tags;

    fn sample() -> SubmitSm {
        SubmitSm {
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
            registered_delivery: 0b0000_0001,
            replace_if_present_flag: 0,
            data_coding: 0x00,
            sm_default_msg_id: 0,
            short_message: Bytes::from_static(b"Hello"),
            tlvs: Vec::new(),
        }
    }

    #[test]
    fn submit_sm_body_layout() {
        let pdu = sample();
        let bytes = pdu.to_bytes();

        // command_length covers header + body
        let declared = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
        assert_eq!(declared, bytes.len());
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x04]);

        // body starts with service_type "CMT\0"
        assert_eq!(&bytes[16..20], b"CMT\0");
        // trailing five bytes before the end are sm_length + "Hello"
        let tail = &bytes[bytes.len() - 6..];
        assert_eq!(tail, &[0x05, 0x48, 0x65, 0x6C, 0x6C, 0x6F]);
    }

    #[test]
    fn submit_sm_appends_tlvs_after_short_message() {
        let mut pdu = sample();
        pdu.tlvs
            .push(Tlv::new(tags::USER_MESSAGE_REFERENCE, Bytes::from_static(&[0x00, 0x01])));
        let bytes = pdu.to_bytes();

        let declared = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
        assert_eq!(declared, bytes.len());
        assert_eq!(&bytes[bytes.len() - 6..], &[0x02, 0x04, 0x00, 0x02, 0x00, 0x01]);
    }

    #[test]
    fn submit_sm_resp_carries_message_id() {
        let pdu = SubmitSmResponse {
            command_status: CommandStatus::Ok,
            sequence_number: 3,
            message_id: "0".to_string(),
        };
        let bytes = pdu.to_bytes();
        assert_eq!(
            bytes.as_ref(),
            &[
                0x00, 0x00, 0x00, 0x12, // command_length (18)
                0x80, 0x00, 0x00, 0x04, // command_id
                0x00, 0x00, 0x00, 0x00, // command_status
                0x00, 0x00, 0x00, 0x03, // sequence_number
                0x30, 0x00, // message_id "0\0"
            ]
        );
    }
}
