use crate::datatypes::CommandId;

header_only_pdu!(
    /// Sent by either side to confirm the link is still alive. Carries no
    /// body; the peer must answer with enquire_link_resp.
    EnquireLink,
    CommandId::EnquireLink
);

header_only_pdu!(EnquireLinkResponse, CommandId::EnquireLinkResp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, Frame};
    use std::io::Cursor;

    #[test]
    fn enquire_link_to_bytes() {
        let bytes = EnquireLink::new(42).to_bytes().unwrap();
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length
            0x00, 0x00, 0x00, 0x15, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x2A, // sequence_number
        ];
        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn enquire_link_response_parses() {
        let bytes = EnquireLinkResponse::new(7).to_bytes().unwrap();
        let frame = Frame::parse(&mut Cursor::new(bytes.as_ref())).unwrap();
        assert_eq!(frame, Frame::EnquireLinkResp(EnquireLinkResponse::new(7)));
    }
}
