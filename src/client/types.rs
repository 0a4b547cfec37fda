// ABOUTME: Supporting types for SMPP client operations including credentials and messages
// ABOUTME: Provides simplified interfaces that build bind and submit_sm PDUs with sensible defaults

use crate::codec::CodecError;
pub use crate::datatypes::BindType;
use crate::datatypes::{
    Bind, DataCoding, InterfaceVersion, NumericPlanIndicator, SubmitSm, TypeOfNumber,
};
use std::fmt;

/// SMPP bind operation credentials
///
/// Contains authentication information and bind type for establishing
/// SMPP sessions with the SMSC. `Debug` never prints the password.
#[derive(Clone)]
pub struct BindCredentials {
    /// System identifier for authentication
    pub system_id: String,
    /// Password for authentication
    pub password: String,
    /// System type (optional, defaults to empty string)
    pub system_type: Option<String>,
    /// Type of bind operation to perform
    pub bind_type: BindType,
    /// SMPP interface version to announce
    pub interface_version: InterfaceVersion,
}

impl BindCredentials {
    /// Create bind credentials for the given bind type. Announces SMPP v3.3,
    /// which SMSCs that predate v3.4 also accept.
    pub fn new(
        bind_type: BindType,
        system_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            system_id: system_id.into(),
            password: password.into(),
            system_type: None,
            bind_type,
            interface_version: InterfaceVersion::SmppV33,
        }
    }

    /// Create new bind credentials for transmitter session
    pub fn transmitter(system_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(BindType::Transmitter, system_id, password)
    }

    /// Set system type
    pub fn with_system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = Some(system_type.into());
        self
    }

    /// Set SMPP interface version
    pub fn with_version(mut self, interface_version: InterfaceVersion) -> Self {
        self.interface_version = interface_version;
        self
    }

    /// The bind PDU for these credentials
    pub fn to_bind(&self, sequence_number: u32) -> Bind {
        Bind {
            bind_type: self.bind_type,
            sequence_number,
            system_id: self.system_id.clone(),
            password: self.password.clone(),
            system_type: self.system_type.clone().unwrap_or_default(),
            interface_version: self.interface_version,
            addr_ton: TypeOfNumber::Unknown,
            addr_npi: NumericPlanIndicator::Unknown,
            address_range: String::new(),
        }
    }
}

impl fmt::Debug for BindCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindCredentials")
            .field("system_id", &self.system_id)
            .field("password_len", &self.password.len())
            .field("system_type", &self.system_type)
            .field("bind_type", &self.bind_type)
            .field("interface_version", &self.interface_version)
            .finish()
    }
}

/// Simplified SMS message for easy client usage
///
/// Hides the underlying SubmitSm PDU structure; text is encoded with
/// `data_coding` when the PDU is built.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    /// Destination phone number
    pub to: String,
    /// Source address
    pub from: String,
    /// Message text content
    pub text: String,
    /// Character encoding for the text
    pub data_coding: DataCoding,
}

impl SmsMessage {
    /// Create a new SMS message with the SMSC default alphabet
    pub fn new(to: impl Into<String>, from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            text: text.into(),
            data_coding: DataCoding::default(),
        }
    }

    pub fn with_data_coding(mut self, data_coding: DataCoding) -> Self {
        self.data_coding = data_coding;
        self
    }

    /// Encode the text and build the submit_sm. The client assigns the
    /// sequence number when it sends the PDU.
    pub fn to_submit_sm(&self) -> Result<SubmitSm, CodecError> {
        let user_data = self.data_coding.encode(&self.text)?;
        Ok(SubmitSm::new(
            0,
            self.from.as_str(),
            self.to.as_str(),
            self.data_coding,
            user_data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let credentials = BindCredentials::transmitter("gateway", "s3cr3t");
        let printed = format!("{credentials:?}");
        assert!(!printed.contains("s3cr3t"));
        assert!(printed.contains("password_len: 6"));
    }

    #[test]
    fn to_bind_uses_empty_system_type_by_default() {
        let bind = BindCredentials::new(BindType::Receiver, "gateway", "pw").to_bind(9);
        assert_eq!(bind.bind_type, BindType::Receiver);
        assert_eq!(bind.sequence_number, 9);
        assert_eq!(bind.system_type, "");
        assert_eq!(bind.interface_version, InterfaceVersion::SmppV33);

        let bind = BindCredentials::transmitter("gateway", "pw")
            .with_system_type("SMS")
            .with_version(InterfaceVersion::SmppV34)
            .to_bind(1);
        assert_eq!(bind.system_type, "SMS");
        assert_eq!(bind.interface_version, InterfaceVersion::SmppV34);
    }

    #[test]
    fn sms_message_encodes_ucs2_text() {
        let submit = SmsMessage::new("8613800000000", "gateway", "短信")
            .with_data_coding(DataCoding::Ucs2)
            .to_submit_sm()
            .unwrap();

        assert_eq!(submit.destination_addr, "8613800000000");
        assert_eq!(submit.source_addr, "gateway");
        assert_eq!(submit.data_coding, DataCoding::Ucs2);
        assert_eq!(submit.short_message.as_ref(), &[0x77, 0xED, 0x4F, 0xE1]);
        assert!(submit.message_payload.is_none());
    }

    #[test]
    fn sms_message_moves_long_text_to_payload() {
        let text = "x".repeat(200);
        let submit = SmsMessage::new("1", "gateway", text.as_str())
            .with_data_coding(DataCoding::Ucs2)
            .to_submit_sm()
            .unwrap();

        assert!(submit.short_message.is_empty());
        assert_eq!(submit.message_payload.as_ref().map(|p| p.len()), Some(400));
        assert_eq!(submit.text().unwrap(), text);
    }
}
