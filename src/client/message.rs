// ABOUTME: The broker-level message protocol: one enum variant per PDU the dequeue loop can build
// ABOUTME: SubmitSm carries the full field set with a builder seeded from the client configuration

use crate::client::config::SmppConfig;
use crate::datatypes::CommandId;

/// One logical unit on the outbound broker. The dequeue loop turns each
/// message into exactly one PDU, serializes it and hands it to the shared
/// send path.
///
/// Every variant carries a `log_id` (the application's trace token). Only
/// submissions carry `hook_metadata`; the response variants echo a peer
/// sequence number and need no correlation of their own.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// Submit one short message.
    SubmitSm(SubmitSmMessage),
    /// Answer a peer enquire_link. Normally produced internally; present in
    /// the protocol so an external broker may route responses too.
    EnquireLinkResp { log_id: String, sequence_number: u32 },
    /// Answer a peer deliver_sm.
    DeliverSmResp {
        log_id: String,
        sequence_number: u32,
        message_id: String,
    },
    /// Answer a peer unbind.
    UnbindResp { log_id: String, sequence_number: u32 },
}

impl Message {
    pub fn command_id(&self) -> CommandId {
        match self {
            Message::SubmitSm(_) => CommandId::SubmitSm,
            Message::EnquireLinkResp { .. } => CommandId::EnquireLinkResp,
            Message::DeliverSmResp { .. } => CommandId::DeliverSmResp,
            Message::UnbindResp { .. } => CommandId::UnbindResp,
        }
    }

    pub fn log_id(&self) -> &str {
        match self {
            Message::SubmitSm(m) => &m.log_id,
            Message::EnquireLinkResp { log_id, .. } => log_id,
            Message::DeliverSmResp { log_id, .. } => log_id,
            Message::UnbindResp { log_id, .. } => log_id,
        }
    }

    pub fn hook_metadata(&self) -> &str {
        match self {
            Message::SubmitSm(m) => &m.hook_metadata,
            _ => "",
        }
    }
}

/// The data needed to build one submit_sm PDU.
///
/// All PDU body fields are concrete; [`SubmitSmMessage::from_config`] seeds
/// them from the client configuration so a caller only supplies what varies
/// per message.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmMessage {
    /// Application trace token, reported back on the response.
    pub log_id: String,
    /// Opaque string handed to the request/response hooks unchanged.
    pub hook_metadata: String,

    /// Message text. Encoded with `encoding` just before PDU construction.
    pub short_message: String,
    /// Sender identifier, usually an MSISDN.
    pub source_addr: String,
    /// Recipient identifier.
    pub destination_addr: String,

    /// Alphabet name resolved against the codec registry; determines the
    /// PDU's data_coding octet.
    pub encoding: String,
    pub service_type: String,
    pub source_addr_ton: u8,
    pub source_addr_npi: u8,
    pub dest_addr_ton: u8,
    pub dest_addr_npi: u8,
    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,
    pub schedule_delivery_time: String,
    pub validity_period: String,
    pub registered_delivery: u8,
    pub replace_if_present_flag: u8,
    pub sm_default_msg_id: u8,
}

impl SubmitSmMessage {
    /// Build a submission with every PDU field taken from `config`.
    pub fn from_config(
        config: &SmppConfig,
        short_message: impl Into<String>,
        log_id: impl Into<String>,
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
    ) -> SubmitSmMessage {
        SubmitSmMessage {
            log_id: log_id.into(),
            hook_metadata: String::new(),
            short_message: short_message.into(),
            source_addr: source_addr.into(),
            destination_addr: destination_addr.into(),
            encoding: config.encoding.clone(),
            service_type: config.service_type.clone(),
            source_addr_ton: config.source_addr_ton,
            source_addr_npi: config.source_addr_npi,
            dest_addr_ton: config.dest_addr_ton,
            dest_addr_npi: config.dest_addr_npi,
            esm_class: config.esm_class,
            protocol_id: config.protocol_id,
            priority_flag: config.priority_flag,
            schedule_delivery_time: config.schedule_delivery_time.clone(),
            validity_period: config.validity_period.clone(),
            registered_delivery: config.registered_delivery,
            replace_if_present_flag: config.replace_if_present_flag,
            sm_default_msg_id: config.sm_default_msg_id,
        }
    }

    pub fn with_hook_metadata(mut self, hook_metadata: impl Into<String>) -> SubmitSmMessage {
        self.hook_metadata = hook_metadata.into();
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> SubmitSmMessage {
        self.encoding = encoding.into();
        self
    }
}
