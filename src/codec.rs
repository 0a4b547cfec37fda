// SMPP v3.4 Codec - Separates parsing/encoding logic from domain models
//
// Each PDU implements Encodable/Decodable rather than having all parsing logic
// in a monolithic frame parser. `Frame` ties the PDUs the gateway speaks
// together and carries everything else as opaque `Unknown` frames.

use crate::datatypes::{
    Bind, BindResponse, BindType, CommandId, DeliverSmResponse, EnquireLink, EnquireLinkResponse,
    GenericNack, SubmitSm, SubmitSmResponse, Unbind, UnbindResponse,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed PDU size to prevent memory exhaustion attacks
pub const MAX_PDU_SIZE: u32 = 65536; // 64KB

/// SMPP v3.4 PDU Header (16 bytes, common to all PDUs)
///
/// `command_id` and `command_status` are kept as raw values so that PDUs and
/// status codes this crate has no type for survive decoding untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode PDU header from buffer with length validation
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id = buf.get_u32();
        let command_status = buf.get_u32();
        let sequence_number = buf.get_u32();

        if !(Self::SIZE as u32..=MAX_PDU_SIZE).contains(&command_length) {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    /// Encode PDU header to buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id);
        buf.put_u32(self.command_status);
        buf.put_u32(self.sequence_number);
    }

    /// Typed command id, if this crate knows it
    pub fn command(&self) -> Option<CommandId> {
        CommandId::try_from(self.command_id).ok()
    }

    /// Number of body octets following the header
    pub fn body_len(&self) -> usize {
        self.command_length as usize - Self::SIZE
    }

    /// Header for an outbound PDU. The length is patched by `Encodable::to_bytes`.
    pub(crate) fn outbound(command_id: CommandId, command_status: u32, sequence_number: u32) -> Self {
        PduHeader {
            command_length: 0,
            command_id: command_id as u32,
            command_status,
            sequence_number,
        }
    }
}

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this PDU (header included) to the buffer
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Encode into a fresh buffer and fix up the command_length field.
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::with_capacity(64);
        self.encode(&mut buf)?;

        let length = buf.len() as u32;
        if length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length,
                min: PduHeader::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }
        buf[0..4].copy_from_slice(&length.to_be_bytes());

        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode this PDU from its body. `body` holds exactly the octets that
    /// follow the header; trailing optional parameters may be left unread.
    fn decode(header: PduHeader, body: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Unexpected command_id: expected {expected:?}, got {actual:#x}")]
    UnexpectedCommandId { expected: CommandId, actual: u32 },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Decode a variable length C-Octet String of at most `max_len` octets
/// including the terminating NULL.
pub fn decode_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field: &'static str,
) -> Result<String, CodecError> {
    let available = &buf.chunk()[..buf.remaining().min(max_len)];
    let Some(end) = available.iter().position(|&b| b == 0) else {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("missing NULL terminator within {max_len} octets"),
        });
    };

    let value = available[..end].to_vec();
    buf.advance(end + 1);

    String::from_utf8(value).map_err(|source| CodecError::Utf8Error { field, source })
}

/// Encode a C-Octet String, rejecting values that do not fit `max_len`
/// octets including the terminating NULL.
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    max_len: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    if value.len() >= max_len {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("{} octets exceeds maximum of {}", value.len(), max_len - 1),
        });
    }

    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Decode a single byte. Bodies are always fully buffered, so running out
/// here means the PDU itself is truncated.
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::FieldValidation {
            field: "body",
            reason: "PDU body ends before its mandatory fields".to_string(),
        });
    }
    Ok(buf.get_u8())
}

/// Generic frame type that can hold any PDU the gateway exchanges
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    // Keep-alive PDUs
    EnquireLink(EnquireLink),
    EnquireLinkResp(EnquireLinkResponse),

    // Session management PDUs
    Bind(Bind),
    BindResp(BindResponse),
    Unbind(Unbind),
    UnbindResp(UnbindResponse),

    // Message PDUs
    SubmitSm(Box<SubmitSm>),
    SubmitSmResp(SubmitSmResponse),
    DeliverSmResp(DeliverSmResponse),

    GenericNack(GenericNack),

    // Anything else, kept opaque
    Unknown { header: PduHeader, body: Bytes },
}

impl Frame {
    /// Raw command_id for this frame
    pub fn command_id(&self) -> u32 {
        let id = match self {
            Frame::EnquireLink(_) => CommandId::EnquireLink,
            Frame::EnquireLinkResp(_) => CommandId::EnquireLinkResp,
            Frame::Bind(pdu) => pdu.bind_type.command_id(),
            Frame::BindResp(pdu) => pdu.bind_type.response_command_id(),
            Frame::Unbind(_) => CommandId::Unbind,
            Frame::UnbindResp(_) => CommandId::UnbindResp,
            Frame::SubmitSm(_) => CommandId::SubmitSm,
            Frame::SubmitSmResp(_) => CommandId::SubmitSmResp,
            Frame::DeliverSmResp(_) => CommandId::DeliverSmResp,
            Frame::GenericNack(_) => CommandId::GenericNack,
            Frame::Unknown { header, .. } => return header.command_id,
        };
        id as u32
    }

    /// Get the sequence number for this frame
    pub fn sequence_number(&self) -> u32 {
        match self {
            Frame::EnquireLink(pdu) => pdu.sequence_number,
            Frame::EnquireLinkResp(pdu) => pdu.sequence_number,
            Frame::Bind(pdu) => pdu.sequence_number,
            Frame::BindResp(pdu) => pdu.sequence_number,
            Frame::Unbind(pdu) => pdu.sequence_number,
            Frame::UnbindResp(pdu) => pdu.sequence_number,
            Frame::SubmitSm(pdu) => pdu.sequence_number,
            Frame::SubmitSmResp(pdu) => pdu.sequence_number,
            Frame::DeliverSmResp(pdu) => pdu.sequence_number,
            Frame::GenericNack(pdu) => pdu.sequence_number,
            Frame::Unknown { header, .. } => header.sequence_number,
        }
    }

    /// Raw command_status for this frame
    pub fn command_status(&self) -> u32 {
        match self {
            Frame::EnquireLink(pdu) => pdu.command_status,
            Frame::EnquireLinkResp(pdu) => pdu.command_status,
            Frame::Bind(_) | Frame::SubmitSm(_) => 0,
            Frame::BindResp(pdu) => pdu.command_status,
            Frame::Unbind(pdu) => pdu.command_status,
            Frame::UnbindResp(pdu) => pdu.command_status,
            Frame::SubmitSmResp(pdu) => pdu.command_status,
            Frame::DeliverSmResp(pdu) => pdu.command_status,
            Frame::GenericNack(pdu) => pdu.command_status,
            Frame::Unknown { header, .. } => header.command_status,
        }
    }

    /// Check if this frame is a response PDU
    pub fn is_response(&self) -> bool {
        self.command_id() & 0x8000_0000 != 0
    }

    /// Check whether a complete frame is buffered, returning its length.
    pub fn check(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
        if buf.remaining() < PduHeader::SIZE {
            return Err(CodecError::Incomplete);
        }

        let start = buf.position();
        let header = PduHeader::decode(buf);
        buf.set_position(start);
        let header = header?;

        if buf.remaining() < header.command_length as usize {
            return Err(CodecError::Incomplete);
        }

        Ok(header.command_length as usize)
    }

    /// Parse one complete frame, advancing the cursor past it.
    pub fn parse(buf: &mut Cursor<&[u8]>) -> Result<Frame, CodecError> {
        let header = PduHeader::decode(buf)?;
        if buf.remaining() < header.body_len() {
            return Err(CodecError::Incomplete);
        }

        let body = buf.copy_to_bytes(header.body_len());
        let mut cursor = Cursor::new(body.as_ref());

        let frame = match header.command() {
            Some(CommandId::EnquireLink) => {
                Frame::EnquireLink(EnquireLink::decode(header, &mut cursor)?)
            }
            Some(CommandId::EnquireLinkResp) => {
                Frame::EnquireLinkResp(EnquireLinkResponse::decode(header, &mut cursor)?)
            }
            Some(
                CommandId::BindTransmitter | CommandId::BindReceiver | CommandId::BindTransceiver,
            ) => Frame::Bind(Bind::decode(header, &mut cursor)?),
            Some(
                CommandId::BindTransmitterResp
                | CommandId::BindReceiverResp
                | CommandId::BindTransceiverResp,
            ) => Frame::BindResp(BindResponse::decode(header, &mut cursor)?),
            Some(CommandId::Unbind) => Frame::Unbind(Unbind::decode(header, &mut cursor)?),
            Some(CommandId::UnbindResp) => {
                Frame::UnbindResp(UnbindResponse::decode(header, &mut cursor)?)
            }
            Some(CommandId::SubmitSm) => {
                Frame::SubmitSm(Box::new(SubmitSm::decode(header, &mut cursor)?))
            }
            Some(CommandId::SubmitSmResp) => {
                Frame::SubmitSmResp(SubmitSmResponse::decode(header, &mut cursor)?)
            }
            Some(CommandId::DeliverSmResp) => {
                Frame::DeliverSmResp(DeliverSmResponse::decode(header, &mut cursor)?)
            }
            Some(CommandId::GenericNack) => {
                Frame::GenericNack(GenericNack::decode(header, &mut cursor)?)
            }
            _ => Frame::Unknown { header, body },
        };

        Ok(frame)
    }

    /// Encode this frame to wire bytes
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        match self {
            Frame::EnquireLink(pdu) => pdu.to_bytes(),
            Frame::EnquireLinkResp(pdu) => pdu.to_bytes(),
            Frame::Bind(pdu) => pdu.to_bytes(),
            Frame::BindResp(pdu) => pdu.to_bytes(),
            Frame::Unbind(pdu) => pdu.to_bytes(),
            Frame::UnbindResp(pdu) => pdu.to_bytes(),
            Frame::SubmitSm(pdu) => pdu.to_bytes(),
            Frame::SubmitSmResp(pdu) => pdu.to_bytes(),
            Frame::DeliverSmResp(pdu) => pdu.to_bytes(),
            Frame::GenericNack(pdu) => pdu.to_bytes(),
            Frame::Unknown { header, body } => {
                let mut buf = BytesMut::with_capacity(PduHeader::SIZE + body.len());
                PduHeader {
                    command_length: (PduHeader::SIZE + body.len()) as u32,
                    ..*header
                }
                .encode(&mut buf);
                buf.put_slice(body);
                Ok(buf.freeze())
            }
        }
    }
}

/// Bind PDUs share one struct; the command id selects the bind type.
pub(crate) fn bind_type_for(header: &PduHeader) -> Result<BindType, CodecError> {
    header
        .command()
        .and_then(BindType::from_command_id)
        .ok_or(CodecError::UnexpectedCommandId {
            expected: CommandId::BindTransmitter,
            actual: header.command_id,
        })
}
