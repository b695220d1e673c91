// ABOUTME: Client configuration aggregate with SMPP defaults, validated once at construction
// ABOUTME: Covers bind credentials, codec selection, keep-alive cadence, flow control and correlator TTL

use crate::client::error::SmppError;
use crate::codec::ErrorPolicy;
use crate::datatypes::{MAX_PASSWORD_LENGTH, MAX_SYSTEM_ID_LENGTH};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::time::Duration;

/// Everything the client needs to bind and run, as one plain aggregate.
///
/// `new` fills every optional field with the defaults an SMSC integration
/// normally starts from; callers adjust fields directly before handing the
/// config to `Client::connect`, which validates it once.
#[derive(Clone, Debug)]
pub struct SmppConfig {
    /// SMSC host name or address.
    pub smsc_host: String,
    /// SMSC port, conventionally 2775.
    pub smsc_port: u16,
    /// Identifies this ESME to the SMSC at bind time.
    pub system_id: String,
    /// Authenticates `system_id`. Redacted from all log output.
    pub password: String,
    /// ESME type forwarded in the bind (e.g. "", "VMS", "OTA").
    pub system_type: String,
    /// Always 0x34; the only version this client implements.
    pub interface_version: u8,
    /// Type of Number for the ESME address.
    pub addr_ton: u8,
    /// Numbering Plan Indicator for the ESME address.
    pub addr_npi: u8,
    /// Address range served over this session.
    pub address_range: String,

    /// Default alphabet for short messages, by codec registry name.
    pub encoding: String,
    /// Codec failure policy: strict, ignore or replace.
    pub codec_errors: ErrorPolicy,

    // submit_sm body defaults; a Message can override each per send
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

    /// Cadence of keep-alive enquire_link probes while bound.
    pub enquire_link_interval: Duration,
    /// Bound on the TCP connect.
    pub connect_timeout: Duration,

    /// Token-bucket refill rate, tokens (sends) per second.
    pub send_rate: f64,
    /// Token-bucket burst ceiling.
    pub max_tokens: f64,
    /// Sleep granularity while waiting for a token.
    pub delay_for_tokens: Duration,

    /// Throttle-controller sampling window.
    pub sampling_period: Duration,
    /// Minimum responses in a window before denials can happen.
    pub sample_size: u64,
    /// Denial threshold, in percent of throttled responses.
    pub deny_request_at: f64,
    /// Pause after a throttle denial.
    pub throttle_wait: Duration,

    /// How long an unanswered correlation entry survives.
    pub correlator_ttl: Duration,

    /// Identifies this client instance in logs. Generated when absent.
    pub client_id: String,
}

impl SmppConfig {
    pub fn new(
        smsc_host: impl Into<String>,
        smsc_port: u16,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> SmppConfig {
        SmppConfig {
            smsc_host: smsc_host.into(),
            smsc_port,
            system_id: system_id.into(),
            password: password.into(),
            system_type: String::new(),
            interface_version: 0x34,
            addr_ton: 0,
            addr_npi: 0,
            address_range: String::new(),
            encoding: "gsm0338".to_string(),
            codec_errors: ErrorPolicy::Strict,
            service_type: "CMT".to_string(),
            source_addr_ton: 0x01,
            source_addr_npi: 0x01,
            dest_addr_ton: 0x01,
            dest_addr_npi: 0x01,
            esm_class: 0b0000_0011,
            protocol_id: 0x00,
            priority_flag: 0x00,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0b0000_0001,
            replace_if_present_flag: 0x00,
            sm_default_msg_id: 0x00,
            enquire_link_interval: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(15),
            send_rate: 1000.0,
            max_tokens: 1000.0,
            delay_for_tokens: Duration::from_secs(1),
            sampling_period: Duration::from_secs(180),
            sample_size: 50,
            deny_request_at: 1.0,
            throttle_wait: Duration::from_secs(3),
            correlator_ttl: Duration::from_secs(900),
            client_id: generate_id(),
        }
    }

    /// Sanity-check the aggregate. Called once by `Client::connect`.
    pub fn validate(&self) -> Result<(), SmppError> {
        if self.interface_version != 0x34 {
            return Err(SmppError::Config(format!(
                "interface_version must be 0x34, got 0x{:02X}",
                self.interface_version
            )));
        }
        if self.system_id.is_empty() {
            return Err(SmppError::Config("system_id must not be empty".into()));
        }
        if self.system_id.len() > MAX_SYSTEM_ID_LENGTH {
            return Err(SmppError::Config(format!(
                "system_id exceeds {MAX_SYSTEM_ID_LENGTH} octets: {:?}",
                self.system_id
            )));
        }
        if self.password.len() > MAX_PASSWORD_LENGTH {
            return Err(SmppError::Config(format!(
                "password exceeds {MAX_PASSWORD_LENGTH} octets"
            )));
        }
        if !(self.send_rate > 0.0) {
            return Err(SmppError::Config(format!(
                "send_rate must be positive, got {}",
                self.send_rate
            )));
        }
        if !(self.max_tokens >= 1.0) {
            return Err(SmppError::Config(format!(
                "max_tokens must be at least 1, got {}",
                self.max_tokens
            )));
        }
        if !(0.0..=100.0).contains(&self.deny_request_at) {
            return Err(SmppError::Config(format!(
                "deny_request_at is a percentage, got {}",
                self.deny_request_at
            )));
        }
        Ok(())
    }
}

/// 17-char alphanumeric identifier for client instances and for the log ids
/// of internally originated PDUs.
pub(crate) fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(17)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SmppConfig::new("smsc.example.net", 2775, "smppclient1", "password");
        config.validate().unwrap();
        assert_eq!(config.encoding, "gsm0338");
        assert_eq!(config.enquire_link_interval, Duration::from_secs(300));
        assert_eq!(config.connect_timeout, Duration::from_secs(15));
        assert_eq!(config.correlator_ttl, Duration::from_secs(900));
        assert_eq!(config.client_id.len(), 17);
    }

    #[test]
    fn rejects_foreign_interface_versions() {
        let mut config = SmppConfig::new("h", 2775, "id", "pw");
        config.interface_version = 0x50;
        assert!(matches!(config.validate(), Err(SmppError::Config(_))));
    }

    #[test]
    fn rejects_oversized_credentials() {
        let mut config = SmppConfig::new("h", 2775, "a_system_id_that_is_too_long", "pw");
        assert!(config.validate().is_err());
        config = SmppConfig::new("h", 2775, "id", "password9");
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nonpositive_send_rate() {
        let mut config = SmppConfig::new("h", 2775, "id", "pw");
        config.send_rate = 0.0;
        assert!(config.validate().is_err());
    }
}
