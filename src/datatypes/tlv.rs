use crate::codec::CodecError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// message_payload: carries text longer than short_message allows
pub const TAG_MESSAGE_PAYLOAD: u16 = 0x0424;

/// An optional parameter in tag/length/value form.
#[derive(Clone, Debug, PartialEq)]
pub struct Tlv {
    /// The Tag field is used to uniquely identify the particular optional parameter in question.
    pub tag: u16,

    /// The Value field contains the actual data for the optional parameter in question.
    /// Its length is written on the wire as the Length field.
    pub value: Bytes,
}

impl Tlv {
    pub fn new(tag: u16, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let length = u16::try_from(self.value.len()).map_err(|_| CodecError::FieldValidation {
            field: "tlv",
            reason: format!("value of {} octets does not fit a TLV", self.value.len()),
        })?;

        buf.put_u16(self.tag);
        buf.put_u16(length);
        buf.put_slice(&self.value);
        Ok(())
    }

    /// Decode every TLV left in `buf`.
    pub fn decode_all(buf: &mut Cursor<&[u8]>) -> Result<Vec<Tlv>, CodecError> {
        let mut tlvs = Vec::new();
        while buf.has_remaining() {
            if buf.remaining() < 4 {
                return Err(CodecError::FieldValidation {
                    field: "tlv",
                    reason: "truncated TLV header".to_string(),
                });
            }
            let tag = buf.get_u16();
            let length = buf.get_u16() as usize;
            if buf.remaining() < length {
                return Err(CodecError::FieldValidation {
                    field: "tlv",
                    reason: format!("TLV {tag:#06x} declares {length} octets"),
                });
            }
            tlvs.push(Tlv {
                tag,
                value: buf.copy_to_bytes(length),
            });
        }
        Ok(tlvs)
    }
}
