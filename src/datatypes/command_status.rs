use num_enum::TryFromPrimitive;

/// The command_status field of an SMPP message response indicates the success
/// or failure of an SMPP request. It is relevant only in the SMPP response
/// message and should be set to NULL in SMPP request messages.
///
/// Status values travel through the crate as raw `u32`s; this table only
/// exists to turn them into something readable for logs.
macro_rules! command_statuses {
    ($($variant:ident = $code:literal => $name:literal, $description:literal;)*) => {
        #[derive(TryFromPrimitive)]
        #[repr(u32)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum CommandStatus {
            $($variant = $code,)*
        }

        impl CommandStatus {
            /// The ESME_* mnemonic from SMPP v3.4
            pub fn name(&self) -> &'static str {
                match self {
                    $(CommandStatus::$variant => $name,)*
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(CommandStatus::$variant => $description,)*
                }
            }
        }
    };
}

command_statuses! {
    Ok = 0x0000_0000 => "ESME_ROK", "No Error";
    InvalidMsgLength = 0x0000_0001 => "ESME_RINVMSGLEN", "Message Length is invalid";
    InvalidCommandLength = 0x0000_0002 => "ESME_RINVCMDLEN", "Command Length is invalid";
    InvalidCommandId = 0x0000_0003 => "ESME_RINVCMDID", "Invalid Command ID";
    IncorrectBindStatus = 0x0000_0004 => "ESME_RINVBNDSTS", "Incorrect BIND Status for given command";
    AlreadyBoundState = 0x0000_0005 => "ESME_RALYBND", "ESME Already in Bound State";
    InvalidPriorityFlag = 0x0000_0006 => "ESME_RINVPRTFLG", "Invalid Priority Flag";
    InvalidRegisteredDeliveryFlag = 0x0000_0007 => "ESME_RINVREGDLVFLG", "Invalid Registered Delivery Flag";
    SystemError = 0x0000_0008 => "ESME_RSYSERR", "System Error";
    InvalidSourceAddress = 0x0000_000A => "ESME_RINVSRCADR", "Invalid Source Address";
    InvalidDestinationAddress = 0x0000_000B => "ESME_RINVDSTADR", "Invalid Dest Addr";
    InvalidMessageId = 0x0000_000C => "ESME_RINVMSGID", "Message ID is invalid";
    BindFailed = 0x0000_000D => "ESME_RBINDFAIL", "Bind Failed";
    InvalidPassword = 0x0000_000E => "ESME_RINVPASWD", "Invalid Password";
    InvalidSystemId = 0x0000_000F => "ESME_RINVSYSID", "Invalid System ID";
    CancelSmFailed = 0x0000_0011 => "ESME_RCANCELFAIL", "Cancel SM Failed";
    ReplaceSmFailed = 0x0000_0013 => "ESME_RREPLACEFAIL", "Replace SM Failed";
    MessageQueueFull = 0x0000_0014 => "ESME_RMSGQFUL", "Message Queue Full";
    InvalidServiceType = 0x0000_0015 => "ESME_RINVSERTYP", "Invalid Service Type";
    InvalidNumberOfDestinations = 0x0000_0033 => "ESME_RINVNUMDESTS", "Invalid number of destinations";
    InvalidDistributionListName = 0x0000_0034 => "ESME_RINVDLNAME", "Invalid Distribution List name";
    InvalidDestinationFlag = 0x0000_0040 => "ESME_RINVDESTFLAG", "Destination flag is invalid";
    InvalidSubmitWithReplaceRequest = 0x0000_0042 => "ESME_RINVSUBREP", "Invalid 'submit with replace' request";
    InvalidEsmClassFieldData = 0x0000_0043 => "ESME_RINVESMCLASS", "Invalid esm_class field data";
    CannotSubmitToDistributionList = 0x0000_0044 => "ESME_RCNTSUBDL", "Cannot Submit to Distribution List";
    SubmitFailed = 0x0000_0045 => "ESME_RSUBMITFAIL", "submit_sm or submit_multi failed";
    InvalidSourceAddressTon = 0x0000_0048 => "ESME_RINVSRCTON", "Invalid Source address TON";
    InvalidSourceAddressNpi = 0x0000_0049 => "ESME_RINVSRCNPI", "Invalid Source address NPI";
    InvalidDestinationAddressTon = 0x0000_0050 => "ESME_RINVDSTTON", "Invalid Destination address TON";
    InvalidDestinationAddressNpi = 0x0000_0051 => "ESME_RINVDSTNPI", "Invalid Destination address NPI";
    InvalidSystemTypeField = 0x0000_0053 => "ESME_RINVSYSTYP", "Invalid system_type field";
    InvalidReplaceIfPresentFlag = 0x0000_0054 => "ESME_RINVREPFLAG", "Invalid replace_if_present flag";
    InvalidNumberOfMessages = 0x0000_0055 => "ESME_RINVNUMMSGS", "Invalid number of messages";
    ThrottlingError = 0x0000_0058 => "ESME_RTHROTTLED", "Throttling error (ESME has exceeded allowed message limits)";
    InvalidScheduledDeliveryTime = 0x0000_0061 => "ESME_RINVSCHED", "Invalid Scheduled Delivery Time";
    InvalidExpiryTime = 0x0000_0062 => "ESME_RINVEXPIRY", "Invalid message validity period (Expiry time)";
    InvalidPredefinedMessageId = 0x0000_0063 => "ESME_RINVDFTMSGID", "Predefined Message Invalid or Not Found";
    ReceiverTemporaryAppError = 0x0000_0064 => "ESME_RX_T_APPN", "ESME Receiver Temporary App Error Code";
    ReceiverPermanentAppError = 0x0000_0065 => "ESME_RX_P_APPN", "ESME Receiver Permanent App Error Code";
    ReceiverRejectMessageError = 0x0000_0066 => "ESME_RX_R_APPN", "ESME Receiver Reject Message Error Code";
    QuerySmRequestFailed = 0x0000_0067 => "ESME_RQUERYFAIL", "query_sm request failed";
    ErrorInOptionalPartOfPduBody = 0x0000_00C0 => "ESME_RINVOPTPARSTREAM", "Error in the optional part of the PDU Body";
    OptionalParameterNotAllowed = 0x0000_00C1 => "ESME_ROPTPARNOTALLWD", "Optional Parameter not allowed";
    InvalidParameterLength = 0x0000_00C2 => "ESME_RINVPARLEN", "Invalid Parameter Length";
    ExpectedOptionalParameterMissing = 0x0000_00C3 => "ESME_RMISSINGOPTPARAM", "Expected Optional Parameter missing";
    InvalidOptionalParameterValue = 0x0000_00C4 => "ESME_RINVOPTPARAMVAL", "Invalid Optional Parameter Value";
    DeliveryFailed = 0x0000_00FE => "ESME_RDELIVERYFAILURE", "Delivery Failure";
    UnknownError = 0x0000_00FF => "ESME_RUNKNOWNERR", "Unknown Error";
}

/// Render a raw status code for diagnostics, e.g. `ESME_ROK (No Error)`.
///
/// Codes outside the table render as `unknown status code: <n>`. Never use
/// the result for control flow; compare the raw code instead.
pub fn describe_status(code: u32) -> String {
    match CommandStatus::try_from(code) {
        Ok(status) => format!("{} ({})", status.name(), status.description()),
        Err(_) => format!("unknown status code: {code}"),
    }
}
