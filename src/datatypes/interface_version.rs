use num_enum::TryFromPrimitive;

/// This parameter is used to indicate the version of the SMPP protocol.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InterfaceVersion {
    /// Advertised by default; older SMSCs reject anything newer.
    #[default]
    SmppV33 = 0x33,
    SmppV34 = 0x34,
    SmppV50 = 0x50,
}
