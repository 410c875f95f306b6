// =============================================================================
// Profile Configuration
// =============================================================================

//! Profile Configuration messages: discovering, enabling, and configuring
//! the standard and manufacturer-specific Profiles a device supports.

use super::ProfileId;

/// Profile Inquiry (`0x20`). No body.
#[derive(Clone, Copy, Debug)]
pub struct Inquiry;

/// Profile Inquiry Reply (`0x21`). Borrows its two ID lists as flat
/// `5 * count` byte slices rather than owning a `Vec<ProfileId>`.
#[derive(Clone, Copy, Debug)]
pub struct InquiryReply<'a> {
    enabled: &'a [u8],
    disabled: &'a [u8],
}

impl<'a> InquiryReply<'a> {
    /// # Panics
    /// Panics if either slice's length is not a multiple of 5.
    #[must_use]
    pub fn new(enabled: &'a [u8], disabled: &'a [u8]) -> Self {
        assert!(enabled.len() % 5 == 0 && disabled.len() % 5 == 0);
        Self { enabled, disabled }
    }

    pub fn enabled(&self) -> impl Iterator<Item = ProfileId> + '_ {
        self.enabled.chunks_exact(5).map(|c| c.try_into().unwrap())
    }

    pub fn disabled(&self) -> impl Iterator<Item = ProfileId> + '_ {
        self.disabled.chunks_exact(5).map(|c| c.try_into().unwrap())
    }

    #[must_use]
    pub fn enabled_count(&self) -> u16 {
        (self.enabled.len() / 5) as u16
    }

    #[must_use]
    pub fn disabled_count(&self) -> u16 {
        (self.disabled.len() / 5) as u16
    }
}

/// Set Profile On (`0x22`).
#[derive(Clone, Copy, Debug)]
pub struct On {
    pub profile: ProfileId,
    pub num_channels: u16,
}

/// Set Profile Off (`0x23`).
#[derive(Clone, Copy, Debug)]
pub struct Off {
    pub profile: ProfileId,
}

/// Profile Enabled (`0x24`), reported unsolicited when a Profile turns on.
#[derive(Clone, Copy, Debug)]
pub struct Enabled {
    pub profile: ProfileId,
    pub num_channels: u16,
}

/// Profile Disabled (`0x25`).
#[derive(Clone, Copy, Debug)]
pub struct Disabled {
    pub profile: ProfileId,
    pub num_channels: u16,
}

/// Profile Added (`0x26`), always broadcast.
#[derive(Clone, Copy, Debug)]
pub struct Added {
    pub profile: ProfileId,
}

/// Profile Removed (`0x27`), always broadcast.
#[derive(Clone, Copy, Debug)]
pub struct Removed {
    pub profile: ProfileId,
}

/// Profile Details Inquiry (`0x28`).
#[derive(Clone, Copy, Debug)]
pub struct Details {
    pub profile: ProfileId,
    pub target: u8,
}

/// Profile Details Reply (`0x29`).
#[derive(Clone, Copy, Debug)]
pub struct DetailsReply<'a> {
    pub profile: ProfileId,
    pub target: u8,
    pub data: &'a [u8],
}

/// Profile Specific Data (`0x2F`).
#[derive(Clone, Copy, Debug)]
pub struct SpecificData<'a> {
    pub profile: ProfileId,
    pub data: &'a [u8],
}
