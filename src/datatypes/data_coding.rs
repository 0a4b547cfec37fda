// ABOUTME: SMPP data_coding selector and the text encodings the gateway can produce
// ABOUTME: Converts message text to short_message octets and back for each supported scheme

use crate::codec::CodecError;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::TryFromPrimitive;

/// The data_coding values the gateway knows how to produce.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DataCoding {
    /// SMSC Default Alphabet; IA5 text is sent as-is
    #[default]
    SmscDefault = 0x00,
    /// IA5 (CCITT T.50)/ASCII
    Ascii = 0x01,
    /// Latin-1 (ISO-8859-1)
    Latin1 = 0x03,
    /// UCS-2 (ISO/IEC-10646), sent as UTF-16 big endian
    Ucs2 = 0x08,
}

impl DataCoding {
    /// Encode text into the octets that go on the wire for this scheme.
    ///
    /// Text containing characters the scheme cannot represent is rejected
    /// rather than silently replaced.
    pub fn encode(&self, text: &str) -> Result<Bytes, CodecError> {
        match self {
            DataCoding::SmscDefault | DataCoding::Ascii => {
                if !text.is_ascii() {
                    return Err(self.unrepresentable());
                }
                Ok(Bytes::copy_from_slice(text.as_bytes()))
            }
            DataCoding::Latin1 => {
                let mut buf = BytesMut::with_capacity(text.len());
                for ch in text.chars() {
                    let code = u32::from(ch);
                    if code > 0xFF {
                        return Err(self.unrepresentable());
                    }
                    buf.put_u8(code as u8);
                }
                Ok(buf.freeze())
            }
            DataCoding::Ucs2 => {
                let mut buf = BytesMut::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    buf.put_u16(unit);
                }
                Ok(buf.freeze())
            }
        }
    }

    /// Decode wire octets back into text.
    pub fn decode(&self, octets: &[u8]) -> Result<String, CodecError> {
        match self {
            DataCoding::SmscDefault | DataCoding::Ascii => {
                String::from_utf8(octets.to_vec()).map_err(|source| CodecError::Utf8Error {
                    field: "short_message",
                    source,
                })
            }
            DataCoding::Latin1 => Ok(octets.iter().map(|&b| char::from(b)).collect()),
            DataCoding::Ucs2 => {
                if octets.len() % 2 != 0 {
                    return Err(CodecError::FieldValidation {
                        field: "short_message",
                        reason: "UCS-2 payload has an odd number of octets".to_string(),
                    });
                }
                let units: Vec<u16> = octets
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| CodecError::FieldValidation {
                    field: "short_message",
                    reason: e.to_string(),
                })
            }
        }
    }

    fn unrepresentable(&self) -> CodecError {
        CodecError::FieldValidation {
            field: "short_message",
            reason: format!("text cannot be represented with data_coding {self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ucs2_encodes_wide_characters_big_endian() {
        let encoded = DataCoding::Ucs2.encode("短信").unwrap();
        assert_eq!(encoded.as_ref(), &[0x77, 0xED, 0x4F, 0xE1]);
        assert_eq!(DataCoding::Ucs2.decode(&encoded).unwrap(), "短信");
    }

    #[test]
    fn ucs2_rejects_odd_length() {
        assert!(DataCoding::Ucs2.decode(&[0x00, 0x41, 0x00]).is_err());
    }

    #[test]
    fn default_alphabet_rejects_non_ascii() {
        assert_eq!(DataCoding::SmscDefault.encode("hi").unwrap().as_ref(), b"hi");
        assert!(DataCoding::SmscDefault.encode("héllo").is_err());
    }

    #[test]
    fn latin1_accepts_only_single_octet_characters() {
        assert_eq!(DataCoding::Latin1.encode("é").unwrap().as_ref(), &[0xE9]);
        assert!(DataCoding::Latin1.encode("€").is_err());
    }

    #[test]
    fn selector_values_match_protocol() {
        assert_eq!(DataCoding::Ucs2 as u8, 8);
        assert_eq!(DataCoding::try_from(3u8).unwrap(), DataCoding::Latin1);
        assert!(DataCoding::try_from(0x42u8).is_err());
    }
}
