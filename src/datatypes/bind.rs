use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, bind_type_for, decode_cstring, decode_u8,
    encode_cstring,
};
use crate::datatypes::{
    CommandId, InterfaceVersion, NumericPlanIndicator, TypeOfNumber, MAX_PASSWORD_LENGTH,
    MAX_SYSTEM_ID_LENGTH,
};
use bytes::{Buf, BufMut, BytesMut};
use std::fmt;
use std::io::Cursor;

// SMPP v3.4 field length limits, NULL terminator included
const SYSTEM_TYPE_FIELD: usize = 13;
const ADDRESS_RANGE_FIELD: usize = 41;

/// Type of SMPP bind operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindType {
    /// Bind as transmitter (can send submit_sm)
    Transmitter,
    /// Bind as receiver (can receive deliver_sm)
    Receiver,
    /// Bind as transceiver (both transmitter and receiver capabilities)
    Transceiver,
}

impl BindType {
    pub fn command_id(self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitter,
            BindType::Receiver => CommandId::BindReceiver,
            BindType::Transceiver => CommandId::BindTransceiver,
        }
    }

    pub fn response_command_id(self) -> CommandId {
        match self {
            BindType::Transmitter => CommandId::BindTransmitterResp,
            BindType::Receiver => CommandId::BindReceiverResp,
            BindType::Transceiver => CommandId::BindTransceiverResp,
        }
    }

    /// Map either the request or the response command id back to a bind type
    pub fn from_command_id(command_id: CommandId) -> Option<Self> {
        match command_id {
            CommandId::BindTransmitter | CommandId::BindTransmitterResp => {
                Some(BindType::Transmitter)
            }
            CommandId::BindReceiver | CommandId::BindReceiverResp => Some(BindType::Receiver),
            CommandId::BindTransceiver | CommandId::BindTransceiverResp => {
                Some(BindType::Transceiver)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BindType::Transmitter => "transmitter",
            BindType::Receiver => "receiver",
            BindType::Transceiver => "transceiver",
        }
    }
}

impl fmt::Display for BindType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// bind_transmitter, bind_receiver and bind_transceiver share one body
/// layout; `bind_type` selects the command id.
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub bind_type: BindType,
    pub sequence_number: u32,

    /// 5.2.1 system_id: identification of the ESME requesting to bind.
    pub system_id: String,

    /// 5.2.2 password: used by the SMSC to authenticate the ESME.
    pub password: String,

    /// 5.2.3 system_type: categorises the type of ESME that is binding.
    pub system_type: String,

    /// 5.2.4 interface_version: SMPP version supported by the ESME.
    pub interface_version: InterfaceVersion,

    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,

    /// 5.2.7 address_range: SME addresses serviced by the ESME.
    pub address_range: String,
}

impl Encodable for Bind {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::outbound(self.bind_type.command_id(), 0, self.sequence_number).encode(buf);

        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH + 1, "system_id")?;
        encode_cstring(buf, &self.password, MAX_PASSWORD_LENGTH + 1, "password")?;
        encode_cstring(buf, &self.system_type, SYSTEM_TYPE_FIELD, "system_type")?;
        buf.put_u8(self.interface_version as u8);
        buf.put_u8(self.addr_ton as u8);
        buf.put_u8(self.addr_npi as u8);
        encode_cstring(buf, &self.address_range, ADDRESS_RANGE_FIELD, "address_range")?;

        Ok(())
    }
}

impl Decodable for Bind {
    fn decode(header: PduHeader, body: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = bind_type_for(&header)?;

        let system_id = decode_cstring(body, MAX_SYSTEM_ID_LENGTH + 1, "system_id")?;
        let password = decode_cstring(body, MAX_PASSWORD_LENGTH + 1, "password")?;
        let system_type = decode_cstring(body, SYSTEM_TYPE_FIELD, "system_type")?;

        let raw_version = decode_u8(body)?;
        let interface_version =
            InterfaceVersion::try_from(raw_version).map_err(|_| CodecError::FieldValidation {
                field: "interface_version",
                reason: format!("unsupported version {raw_version:#04x}"),
            })?;
        let addr_ton = TypeOfNumber::try_from(decode_u8(body)?).unwrap_or_default();
        let addr_npi = NumericPlanIndicator::try_from(decode_u8(body)?).unwrap_or_default();
        let address_range = decode_cstring(body, ADDRESS_RANGE_FIELD, "address_range")?;

        Ok(Bind {
            bind_type,
            sequence_number: header.sequence_number,
            system_id,
            password,
            system_type,
            interface_version,
            addr_ton,
            addr_npi,
            address_range,
        })
    }
}

/// Response to any of the bind requests.
#[derive(Clone, Debug, PartialEq)]
pub struct BindResponse {
    pub bind_type: BindType,
    pub command_status: u32,
    pub sequence_number: u32,
    /// SMSC identifier. Rejections frequently omit the body entirely, in
    /// which case this is empty.
    pub system_id: String,
}

impl BindResponse {
    pub fn new(
        bind_type: BindType,
        sequence_number: u32,
        command_status: u32,
        system_id: impl Into<String>,
    ) -> Self {
        Self {
            bind_type,
            command_status,
            sequence_number,
            system_id: system_id.into(),
        }
    }
}

impl Encodable for BindResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::outbound(
            self.bind_type.response_command_id(),
            self.command_status,
            self.sequence_number,
        )
        .encode(buf);
        encode_cstring(buf, &self.system_id, MAX_SYSTEM_ID_LENGTH + 1, "system_id")
    }
}

impl Decodable for BindResponse {
    fn decode(header: PduHeader, body: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let bind_type = bind_type_for(&header)?;

        let system_id = if body.has_remaining() {
            decode_cstring(body, MAX_SYSTEM_ID_LENGTH + 1, "system_id")?
        } else {
            String::new()
        };

        // sc_interface_version TLV, if any, is ignored
        Ok(BindResponse {
            bind_type,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            system_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Frame;

    fn sample_bind(bind_type: BindType) -> Bind {
        Bind {
            bind_type,
            sequence_number: 1,
            system_id: "SMPP3TEST".to_string(),
            password: "secret08".to_string(),
            system_type: "SUBMIT1".to_string(),
            interface_version: InterfaceVersion::SmppV34,
            addr_ton: TypeOfNumber::International,
            addr_npi: NumericPlanIndicator::Isdn,
            address_range: "".to_string(),
        }
    }

    #[test]
    fn bind_transmitter_to_bytes() {
        let bytes = sample_bind(BindType::Transmitter).to_bytes().unwrap();

        let expected: Vec<u8> = vec![
            // Header:
            0x00, 0x00, 0x00, 0x2F, // command_length
            0x00, 0x00, 0x00, 0x02, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x01, // sequence_number
            // Body:
            0x53, 0x4D, 0x50, 0x50, 0x33, 0x54, 0x45, 0x53, 0x54, 0x00, // system_id
            0x73, 0x65, 0x63, 0x72, 0x65, 0x74, 0x30, 0x38, 0x00, // password
            0x53, 0x55, 0x42, 0x4D, 0x49, 0x54, 0x31, 0x00, // system_type
            0x34, // interface_version
            0x01, // addr_ton
            0x01, // addr_npi
            0x00, // address_range
        ];

        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn bind_type_selects_command_id() {
        let bytes = sample_bind(BindType::Transceiver).to_bytes().unwrap();
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x09]);

        let bytes = sample_bind(BindType::Receiver).to_bytes().unwrap();
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn bind_rejects_oversized_password() {
        let mut bind = sample_bind(BindType::Transmitter);
        bind.password = "123456789".to_string();
        assert!(matches!(
            bind.to_bytes(),
            Err(CodecError::FieldValidation { field: "password", .. })
        ));
    }

    #[test]
    fn bind_parses_back_into_frame() {
        let original = sample_bind(BindType::Receiver);
        let bytes = original.to_bytes().unwrap();
        let frame = Frame::parse(&mut Cursor::new(bytes.as_ref())).unwrap();
        assert_eq!(frame, Frame::Bind(original));
    }

    #[test]
    fn bind_response_without_body_decodes() {
        let data: &[u8] = &[
            0x00, 0x00, 0x00, 0x10, // command_length
            0x80, 0x00, 0x00, 0x02, // bind_transmitter_resp
            0x00, 0x00, 0x00, 0x0E, // ESME_RINVPASWD
            0x00, 0x00, 0x00, 0x05, // sequence_number
        ];
        let frame = Frame::parse(&mut Cursor::new(data)).unwrap();

        match frame {
            Frame::BindResp(resp) => {
                assert_eq!(resp.bind_type, BindType::Transmitter);
                assert_eq!(resp.command_status, 0x0E);
                assert_eq!(resp.sequence_number, 5);
                assert!(resp.system_id.is_empty());
            }
            other => panic!("Expected BindResp, got {other:?}"),
        }
    }

    #[test]
    fn bind_response_skips_trailing_tlv() {
        let mut bytes = BytesMut::new();
        BindResponse::new(BindType::Transceiver, 3, 0, "SMSC")
            .encode(&mut bytes)
            .unwrap();
        // sc_interface_version TLV
        bytes.put_slice(&[0x02, 0x10, 0x00, 0x01, 0x34]);
        let length = bytes.len() as u32;
        bytes[0..4].copy_from_slice(&length.to_be_bytes());

        let frame = Frame::parse(&mut Cursor::new(bytes.as_ref())).unwrap();
        assert_eq!(
            frame,
            Frame::BindResp(BindResponse::new(BindType::Transceiver, 3, 0, "SMSC"))
        );
    }
}
