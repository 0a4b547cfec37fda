use crate::datatypes::{CommandId, CommandStatus};

header_only_pdu!(
    /// GenericNack acknowledges a PDU the receiver cannot process, such as
    /// one with an unrecognised command_id. It has no body.
    GenericNack,
    CommandId::GenericNack
);

impl GenericNack {
    /// Creates a GenericNack for an invalid command ID error
    pub fn invalid_command_id(sequence_number: u32) -> Self {
        Self::with_status(sequence_number, CommandStatus::InvalidCommandId as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Encodable, Frame};
    use std::io::Cursor;

    #[test]
    fn generic_nack_is_a_response() {
        let bytes = GenericNack::invalid_command_id(456).to_bytes().unwrap();
        let frame = Frame::parse(&mut Cursor::new(bytes.as_ref())).unwrap();

        assert!(frame.is_response());
        assert_eq!(frame.command_status(), CommandStatus::InvalidCommandId as u32);
        assert_eq!(frame.sequence_number(), 456);
    }
}
