use crate::codec::{
    CodecError, Decodable, Encodable, PduHeader, decode_cstring, decode_u8, encode_cstring,
};
use crate::datatypes::tlv::{TAG_MESSAGE_PAYLOAD, Tlv};
use crate::datatypes::{
    CommandId, DataCoding, MAX_ADDRESS_LENGTH, MAX_MESSAGE_ID_LENGTH, MAX_SHORT_MESSAGE_LENGTH,
    NumericPlanIndicator, TypeOfNumber,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

// Field sizes with NULL terminator
const SERVICE_TYPE_FIELD: usize = 6;
const TIME_FIELD: usize = 17;

/// This operation is used by an ESME to submit a short message to the SMSC for onward transmission
/// to a specified short message entity (SME).
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSm {
    pub sequence_number: u32,

    /// 4.1.1 service_type: SMS application service associated with the message.
    pub service_type: String,

    pub source_addr_ton: TypeOfNumber,
    pub source_addr_npi: NumericPlanIndicator,
    /// 4.1.4 source_addr: address of the SME which originated this message.
    pub source_addr: String,

    pub dest_addr_ton: TypeOfNumber,
    pub dest_addr_npi: NumericPlanIndicator,
    /// 4.1.7 destination_addr: directory number of the recipient.
    pub destination_addr: String,

    pub esm_class: u8,
    pub protocol_id: u8,
    pub priority_flag: u8,

    /// Empty for immediate delivery
    pub schedule_delivery_time: String,
    /// Empty for the SMSC default validity period
    pub validity_period: String,

    pub registered_delivery: u8,

    /// 4.1.15 data_coding: encoding scheme of the user data.
    pub data_coding: DataCoding,

    /// 4.1.18 short_message: up to 254 octets of user data. Empty when the
    /// text travels in `message_payload` instead.
    pub short_message: Bytes,

    /// message_payload TLV (0x0424), used for user data over 254 octets.
    pub message_payload: Option<Bytes>,
}

impl SubmitSm {
    /// Build a submit_sm carrying already-encoded user data, choosing between
    /// `short_message` and the `message_payload` TLV by size.
    pub fn new(
        sequence_number: u32,
        source_addr: impl Into<String>,
        destination_addr: impl Into<String>,
        data_coding: DataCoding,
        user_data: Bytes,
    ) -> Self {
        let (short_message, message_payload) = if user_data.len() > MAX_SHORT_MESSAGE_LENGTH {
            (Bytes::new(), Some(user_data))
        } else {
            (user_data, None)
        };

        Self {
            sequence_number,
            service_type: String::new(),
            source_addr_ton: TypeOfNumber::Unknown,
            source_addr_npi: NumericPlanIndicator::Unknown,
            source_addr: source_addr.into(),
            dest_addr_ton: TypeOfNumber::Unknown,
            dest_addr_npi: NumericPlanIndicator::Unknown,
            destination_addr: destination_addr.into(),
            esm_class: 0,
            protocol_id: 0,
            priority_flag: 0,
            schedule_delivery_time: String::new(),
            validity_period: String::new(),
            registered_delivery: 0,
            data_coding,
            short_message,
            message_payload,
        }
    }

    /// The user data, wherever it was carried
    pub fn user_data(&self) -> &Bytes {
        self.message_payload.as_ref().unwrap_or(&self.short_message)
    }

    /// Decode the user data according to `data_coding`
    pub fn text(&self) -> Result<String, CodecError> {
        self.data_coding.decode(self.user_data())
    }
}

impl Encodable for SubmitSm {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.short_message.len() > MAX_SHORT_MESSAGE_LENGTH {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!(
                    "{} octets exceeds maximum of {MAX_SHORT_MESSAGE_LENGTH}; use message_payload",
                    self.short_message.len()
                ),
            });
        }

        PduHeader::outbound(CommandId::SubmitSm, 0, self.sequence_number).encode(buf);

        encode_cstring(buf, &self.service_type, SERVICE_TYPE_FIELD, "service_type")?;
        buf.put_u8(self.source_addr_ton as u8);
        buf.put_u8(self.source_addr_npi as u8);
        encode_cstring(buf, &self.source_addr, MAX_ADDRESS_LENGTH + 1, "source_addr")?;
        buf.put_u8(self.dest_addr_ton as u8);
        buf.put_u8(self.dest_addr_npi as u8);
        encode_cstring(
            buf,
            &self.destination_addr,
            MAX_ADDRESS_LENGTH + 1,
            "destination_addr",
        )?;
        buf.put_u8(self.esm_class);
        buf.put_u8(self.protocol_id);
        buf.put_u8(self.priority_flag);
        encode_cstring(buf, &self.schedule_delivery_time, TIME_FIELD, "schedule_delivery_time")?;
        encode_cstring(buf, &self.validity_period, TIME_FIELD, "validity_period")?;
        buf.put_u8(self.registered_delivery);
        buf.put_u8(0); // replace_if_present_flag
        buf.put_u8(self.data_coding as u8);
        buf.put_u8(0); // sm_default_msg_id

        // short_message is not NULL terminated; sm_length gives its size
        buf.put_u8(self.short_message.len() as u8);
        buf.put_slice(&self.short_message);

        if let Some(payload) = &self.message_payload {
            Tlv::new(TAG_MESSAGE_PAYLOAD, payload.clone()).encode(buf)?;
        }

        Ok(())
    }
}

impl Decodable for SubmitSm {
    fn decode(header: PduHeader, body: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let service_type = decode_cstring(body, SERVICE_TYPE_FIELD, "service_type")?;
        let source_addr_ton = TypeOfNumber::try_from(decode_u8(body)?).unwrap_or_default();
        let source_addr_npi = NumericPlanIndicator::try_from(decode_u8(body)?).unwrap_or_default();
        let source_addr = decode_cstring(body, MAX_ADDRESS_LENGTH + 1, "source_addr")?;
        let dest_addr_ton = TypeOfNumber::try_from(decode_u8(body)?).unwrap_or_default();
        let dest_addr_npi = NumericPlanIndicator::try_from(decode_u8(body)?).unwrap_or_default();
        let destination_addr = decode_cstring(body, MAX_ADDRESS_LENGTH + 1, "destination_addr")?;
        let esm_class = decode_u8(body)?;
        let protocol_id = decode_u8(body)?;
        let priority_flag = decode_u8(body)?;
        let schedule_delivery_time = decode_cstring(body, TIME_FIELD, "schedule_delivery_time")?;
        let validity_period = decode_cstring(body, TIME_FIELD, "validity_period")?;
        let registered_delivery = decode_u8(body)?;
        let _replace_if_present_flag = decode_u8(body)?;

        let raw_coding = decode_u8(body)?;
        let data_coding =
            DataCoding::try_from(raw_coding).map_err(|_| CodecError::FieldValidation {
                field: "data_coding",
                reason: format!("unsupported data_coding {raw_coding:#04x}"),
            })?;
        let _sm_default_msg_id = decode_u8(body)?;

        let sm_length = decode_u8(body)? as usize;
        if body.remaining() < sm_length {
            return Err(CodecError::FieldValidation {
                field: "short_message",
                reason: format!("sm_length {sm_length} exceeds remaining body"),
            });
        }
        let short_message = body.copy_to_bytes(sm_length);

        let message_payload = Tlv::decode_all(body)?
            .into_iter()
            .find(|tlv| tlv.tag == TAG_MESSAGE_PAYLOAD)
            .map(|tlv| tlv.value);

        Ok(SubmitSm {
            sequence_number: header.sequence_number,
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
            data_coding,
            short_message,
            message_payload,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmitSmResponse {
    pub command_status: u32,
    pub sequence_number: u32,

    /// 4.4.2 message_id: SMSC assigned identifier. Absent on most rejections.
    pub message_id: String,
}

impl SubmitSmResponse {
    pub fn new(sequence_number: u32, command_status: u32, message_id: impl Into<String>) -> Self {
        Self {
            command_status,
            sequence_number,
            message_id: message_id.into(),
        }
    }
}

impl Encodable for SubmitSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::outbound(
            CommandId::SubmitSmResp,
            self.command_status,
            self.sequence_number,
        )
        .encode(buf);
        encode_cstring(buf, &self.message_id, MAX_MESSAGE_ID_LENGTH + 1, "message_id")
    }
}

impl Decodable for SubmitSmResponse {
    fn decode(header: PduHeader, body: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let message_id = if body.has_remaining() {
            decode_cstring(body, MAX_MESSAGE_ID_LENGTH + 1, "message_id")?
        } else {
            String::new()
        };

        Ok(SubmitSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            message_id,
        })
    }
}
