use crate::datatypes::CommandId;

header_only_pdu!(
    /// The purpose of the SMPP unbind operation is to deregister an instance of an ESME from the
    /// SMSC and inform the SMSC that the ESME no longer wishes to use this network connection for
    /// the submission or delivery of messages.
    Unbind,
    CommandId::Unbind
);

header_only_pdu!(UnbindResponse, CommandId::UnbindResp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, Frame};
    use std::io::Cursor;

    #[test]
    fn unbind_to_bytes() {
        let bytes = Unbind::new(3).to_bytes().unwrap();
        let expected: Vec<u8> = vec![
            0x00, 0x00, 0x00, 0x10, // command_length
            0x00, 0x00, 0x00, 0x06, // command_id
            0x00, 0x00, 0x00, 0x00, // command_status
            0x00, 0x00, 0x00, 0x03, // sequence_number
        ];
        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[test]
    fn unbind_response_keeps_status() {
        let bytes = UnbindResponse::with_status(4, 0x08).to_bytes().unwrap();
        let frame = Frame::parse(&mut Cursor::new(bytes.as_ref())).unwrap();
        assert_eq!(frame.command_status(), 0x08);
        assert_eq!(frame.sequence_number(), 4);
    }
}
