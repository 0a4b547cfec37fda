// ABOUTME: Macros that remove boilerplate from header-only SMPP PDU implementations
// ABOUTME: Used for enquire_link, unbind, generic_nack and their responses

/// Implements the struct, constructors and codec traits for a PDU that is
/// nothing but the standard 16 octet header.
///
/// # Arguments
/// * `$pdu_type` - The PDU struct name (e.g., EnquireLink)
/// * `$command_id` - The CommandId variant (e.g., CommandId::EnquireLink)
macro_rules! header_only_pdu {
    ($(#[$meta:meta])* $pdu_type:ident, $command_id:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $pdu_type {
            pub command_status: u32,
            pub sequence_number: u32,
        }

        impl $pdu_type {
            pub fn new(sequence_number: u32) -> Self {
                Self {
                    command_status: 0,
                    sequence_number,
                }
            }

            pub fn with_status(sequence_number: u32, command_status: u32) -> Self {
                Self {
                    command_status,
                    sequence_number,
                }
            }
        }

        impl $crate::codec::Decodable for $pdu_type {
            fn decode(
                header: $crate::codec::PduHeader,
                _body: &mut std::io::Cursor<&[u8]>,
            ) -> Result<Self, $crate::codec::CodecError> {
                if header.command_id != $command_id as u32 {
                    return Err($crate::codec::CodecError::UnexpectedCommandId {
                        expected: $command_id,
                        actual: header.command_id,
                    });
                }

                // Some SMSCs pad header-only PDUs; any body is ignored.
                Ok($pdu_type {
                    command_status: header.command_status,
                    sequence_number: header.sequence_number,
                })
            }
        }

        impl $crate::codec::Encodable for $pdu_type {
            fn encode(&self, buf: &mut bytes::BytesMut) -> Result<(), $crate::codec::CodecError> {
                $crate::codec::PduHeader::outbound(
                    $command_id,
                    self.command_status,
                    self.sequence_number,
                )
                .encode(buf);
                Ok(())
            }
        }
    };
}
