use crate::datatypes::{
    CommandId, CommandStatus, Tlv, ToBytes, begin_pdu, finish_pdu, put_c_octet_string,
};
use bytes::{BufMut, Bytes, BytesMut};

/// A short message or delivery receipt pushed to us by the SMSC
/// (Section 4.6.1). The body layout is identical to submit_sm;
/// schedule_delivery_time, validity_period, replace_if_present_flag and
/// sm_default_msg_id are NULL on the wire.
///
/// `short_message` is kept as raw octets; `data_coding` tells the
/// application which codec decodes it.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSm {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

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

    pub tlvs: Vec<Tlv>,
}

/// Acknowledgement of a deliver_sm (Section 4.6.2), echoing its sequence
/// number. The message_id field is unused and set to NULL.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub message_id: String,
}

impl DeliverSm {
    pub fn sm_length(&self) -> u8 {
        self.short_message.len() as u8
    }

    pub fn tlv(&self, tag: u16) -> Option<&Tlv> {
        self.tlvs.iter().find(|t| t.tag == tag)
    }
}

impl ToBytes for DeliverSm {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64 + self.short_message.len());
        begin_pdu(
            &mut buf,
            CommandId::DeliverSm,
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
        buf.extend_from_slice(&self.short_message);
        for tlv in &self.tlvs {
            tlv.put(&mut buf);
        }
        finish_pdu(buf)
    }
}

impl ToBytes for DeliverSmResponse {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16 + self.message_id.len() + 1);
        begin_pdu(
            &mut buf,
            CommandId::DeliverSmResp,
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

    #[test]
    fn deliver_sm_resp_with_empty_message_id() {
        let pdu = DeliverSmResponse {
            command_status: CommandStatus::Ok,
            sequence_number: 5,
            message_id: String::new(),
        };
        let bytes = pdu.to_bytes();
        assert_eq!(
            bytes.as_ref(),
            &[
                0x00, 0x00, 0x00, 0x11, // command_length (17)
                0x80, 0x00, 0x00, 0x05, // command_id
                0x00, 0x00, 0x00, 0x00, // command_status
                0x00, 0x00, 0x00, 0x05, // sequence_number
                0x00, // message_id ""
            ]
        );
    }
}
