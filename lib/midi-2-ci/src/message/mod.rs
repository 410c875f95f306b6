// =============================================================================
// Message
// =============================================================================

//! The MIDI-CI record catalog: one type per concrete message shape, grouped
//! into the four categories the protocol itself uses (Management, Profile
//! Configuration, Property Exchange, Process Inquiry).
//!
//! Variable-length payloads (sysex bodies, profile ID lists, property
//! exchange header/data chunks) are borrowed `&'a [u8]` slices into the
//! dispatcher's internal buffer; no record type owns a heap allocation.

pub mod management;
pub mod process_inquiry;
pub mod profile;
pub mod property_exchange;

/// A 5-byte Profile ID (`bank MSB`, `bank LSB`, `number`, `version`, `level`).
pub type ProfileId = [u8; 5];

/// The CI message type byte (historically "sub-ID #2"), selecting one of
/// the roughly three dozen concrete shapes across all four categories.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MessageType(pub u8);

impl MessageType {
    pub const DISCOVERY: Self = Self(0x70);
    pub const DISCOVERY_REPLY: Self = Self(0x71);
    pub const ENDPOINT_INFO: Self = Self(0x72);
    pub const ENDPOINT_INFO_REPLY: Self = Self(0x73);
    pub const INVALIDATE_MUID: Self = Self(0x7e);
    pub const ACK: Self = Self(0x7d);
    pub const NAK: Self = Self(0x7f);

    pub const PROFILE_INQUIRY: Self = Self(0x20);
    pub const PROFILE_INQUIRY_REPLY: Self = Self(0x21);
    pub const PROFILE_ON: Self = Self(0x22);
    pub const PROFILE_OFF: Self = Self(0x23);
    pub const PROFILE_ENABLED: Self = Self(0x24);
    pub const PROFILE_DISABLED: Self = Self(0x25);
    pub const PROFILE_ADDED: Self = Self(0x26);
    pub const PROFILE_REMOVED: Self = Self(0x27);
    pub const PROFILE_DETAILS: Self = Self(0x28);
    pub const PROFILE_DETAILS_REPLY: Self = Self(0x29);
    pub const PROFILE_SPECIFIC_DATA: Self = Self(0x2f);

    pub const PE_CAPABILITIES: Self = Self(0x30);
    pub const PE_CAPABILITIES_REPLY: Self = Self(0x31);
    pub const PE_GET: Self = Self(0x34);
    pub const PE_GET_REPLY: Self = Self(0x35);
    pub const PE_SET: Self = Self(0x36);
    pub const PE_SET_REPLY: Self = Self(0x37);
    pub const PE_SUBSCRIPTION: Self = Self(0x38);
    pub const PE_SUBSCRIPTION_REPLY: Self = Self(0x39);
    pub const PE_NOTIFY: Self = Self(0x3f);

    pub const PI_CAPABILITIES: Self = Self(0x40);
    pub const PI_CAPABILITIES_REPLY: Self = Self(0x41);
    pub const PI_MIDI_MESSAGE_REPORT: Self = Self(0x42);
    pub const PI_MIDI_MESSAGE_REPORT_REPLY: Self = Self(0x43);
    pub const PI_MIDI_MESSAGE_REPORT_END: Self = Self(0x44);
}
