use num_enum::TryFromPrimitive;
use std::fmt;

/// Response ids are the request id with the top bit set
const RESPONSE_BIT: u32 = 0x8000_0000;

/// Command ids of the PDUs this crate can name.
///
/// Anything else still travels as `Frame::Unknown` with its raw id; it just
/// has no variant here.
#[derive(TryFromPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    GenericNack = 0x8000_0000,
    BindReceiver = 0x0000_0001,
    BindReceiverResp = 0x8000_0001,
    BindTransmitter = 0x0000_0002,
    BindTransmitterResp = 0x8000_0002,
    QuerySm = 0x0000_0003,
    SubmitSm = 0x0000_0004,
    SubmitSmResp = 0x8000_0004,
    DeliverSm = 0x0000_0005,
    DeliverSmResp = 0x8000_0005,
    Unbind = 0x0000_0006,
    UnbindResp = 0x8000_0006,
    BindTransceiver = 0x0000_0009,
    BindTransceiverResp = 0x8000_0009,
    EnquireLink = 0x0000_0015,
    EnquireLinkResp = 0x8000_0015,
}

impl CommandId {
    pub fn is_response(self) -> bool {
        self as u32 & RESPONSE_BIT != 0
    }

    /// The matching response id, for requests that have one
    pub fn response(self) -> Option<CommandId> {
        if self.is_response() {
            return None;
        }
        CommandId::try_from(self as u32 | RESPONSE_BIT).ok()
    }

    /// Wire name, as used in logs
    pub fn name(self) -> &'static str {
        match self {
            CommandId::GenericNack => "generic_nack",
            CommandId::BindReceiver => "bind_receiver",
            CommandId::BindReceiverResp => "bind_receiver_resp",
            CommandId::BindTransmitter => "bind_transmitter",
            CommandId::BindTransmitterResp => "bind_transmitter_resp",
            CommandId::QuerySm => "query_sm",
            CommandId::SubmitSm => "submit_sm",
            CommandId::SubmitSmResp => "submit_sm_resp",
            CommandId::DeliverSm => "deliver_sm",
            CommandId::DeliverSmResp => "deliver_sm_resp",
            CommandId::Unbind => "unbind",
            CommandId::UnbindResp => "unbind_resp",
            CommandId::BindTransceiver => "bind_transceiver",
            CommandId::BindTransceiverResp => "bind_transceiver_resp",
            CommandId::EnquireLink => "enquire_link",
            CommandId::EnquireLinkResp => "enquire_link_resp",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_ids_have_top_bit() {
        assert!(CommandId::SubmitSmResp.is_response());
        assert!(CommandId::GenericNack.is_response());
        assert!(!CommandId::EnquireLink.is_response());
    }

    #[test]
    fn request_maps_to_response() {
        assert_eq!(CommandId::SubmitSm.response(), Some(CommandId::SubmitSmResp));
        assert_eq!(
            CommandId::BindTransceiver.response(),
            Some(CommandId::BindTransceiverResp)
        );
        assert_eq!(CommandId::SubmitSmResp.response(), None);
        // query_sm_resp is never decoded, so it has no variant
        assert_eq!(CommandId::QuerySm.response(), None);
    }

    #[test]
    fn unknown_ids_do_not_convert() {
        assert!(CommandId::try_from(0x0000_0021).is_err());
        assert_eq!(
            CommandId::try_from(0x8000_0004).ok(),
            Some(CommandId::SubmitSmResp)
        );
    }

    #[test]
    fn displays_wire_name() {
        assert_eq!(CommandId::EnquireLinkResp.to_string(), "enquire_link_resp");
    }
}
