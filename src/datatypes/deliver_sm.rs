use crate::codec::{CodecError, Decodable, Encodable, PduHeader};
use crate::datatypes::CommandId;
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// Acknowledges a deliver_sm pushed by the SMSC. The gateway never reads
/// deliver_sm contents; it only answers so receiver binds do not stall.
#[derive(Clone, Debug, PartialEq)]
pub struct DeliverSmResponse {
    pub command_status: u32,
    pub sequence_number: u32,
}

impl DeliverSmResponse {
    pub fn new(sequence_number: u32) -> Self {
        Self {
            command_status: 0,
            sequence_number,
        }
    }
}

impl Encodable for DeliverSmResponse {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        PduHeader::outbound(
            CommandId::DeliverSmResp,
            self.command_status,
            self.sequence_number,
        )
        .encode(buf);
        // message_id is unused and must be NULL
        buf.put_u8(0);
        Ok(())
    }
}

impl Decodable for DeliverSmResponse {
    fn decode(header: PduHeader, _body: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(DeliverSmResponse {
            command_status: header.command_status,
            sequence_number: header.sequence_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_sm_resp_has_null_message_id() {
        let bytes = DeliverSmResponse::new(11).to_bytes().unwrap();
        assert_eq!(bytes.len(), 17);
        assert_eq!(&bytes[4..8], &[0x80, 0x00, 0x00, 0x05]);
        assert_eq!(bytes[16], 0x00);
    }
}
