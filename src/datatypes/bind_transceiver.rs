use crate::datatypes::{
    CommandId, CommandStatus, InterfaceVersion, Tlv, ToBytes, begin_pdu, finish_pdu,
    put_c_octet_string,
};
use bytes::{BufMut, Bytes, BytesMut};

/// Request to open a transceiver session (Section 4.2.5).
///
/// Body layout, in order: C-octet system_id, C-octet password, C-octet
/// system_type, u8 interface_version, u8 addr_ton, u8 addr_npi, C-octet
/// address_range.
#[derive(Clone, Debug, PartialEq)]
pub struct BindTransceiver {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub system_id: String,
    pub password: Option<String>,
    pub system_type: String,
    pub interface_version: InterfaceVersion,
    pub addr_ton: u8,
    pub addr_npi: u8,
    pub address_range: String,
}

/// Response to a bind_transceiver (Section 4.2.6). The body carries the
/// SMSC's system_id; an sc_interface_version TLV may follow.
#[derive(Clone, Debug, PartialEq)]
pub struct BindTransceiverResponse {
    pub command_status: CommandStatus,
    pub sequence_number: u32,

    pub system_id: String,
    pub sc_interface_version: Option<Tlv>,
}

impl ToBytes for BindTransceiver {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(64);
        begin_pdu(
            &mut buf,
            CommandId::BindTransceiver,
            self.command_status,
            self.sequence_number,
        );
        put_c_octet_string(&mut buf, &self.system_id);
        put_c_octet_string(&mut buf, self.password.as_deref().unwrap_or(""));
        put_c_octet_string(&mut buf, &self.system_type);
        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton);
        buf.put_u8(self.addr_npi);
        put_c_octet_string(&mut buf, &self.address_range);
        finish_pdu(buf)
    }
}

impl ToBytes for BindTransceiverResponse {
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(32);
        begin_pdu(
            &mut buf,
            CommandId::BindTransceiverResp,
            self.command_status,
            self.sequence_number,
        );
        put_c_octet_string(&mut buf, &self.system_id);
        if let Some(tlv) = &self.sc_interface_version {
            tlv.put(&mut buf);
        }
        finish_pdu(buf)
    }
}
