// =============================================================================
// Management
// =============================================================================

//! Discovery and connection-management messages: the handshake every CI
//! exchange starts with, plus the endpoint-info and error-reporting shapes.

/// Discovery (`0x70`). Broadcast by an initiator to find CI-capable devices,
/// and by a responder in reply to its own unsolicited [`DiscoveryReply`].
#[derive(Clone, Copy, Debug)]
pub struct Discovery {
    pub manufacturer: [u8; 3],
    pub family: u16,
    pub model: u16,
    pub version: [u8; 4],
    pub capability: u8,
    pub max_sysex_size: u32,
    /// Present from CI version 1.2 onward; ignored when building a v1 message.
    pub output_path_id: u8,
}

/// Discovery Reply (`0x71`).
#[derive(Clone, Copy, Debug)]
pub struct DiscoveryReply {
    pub manufacturer: [u8; 3],
    pub family: u16,
    pub model: u16,
    pub version: [u8; 4],
    pub capability: u8,
    pub max_sysex_size: u32,
    pub output_path_id: u8,
    pub function_block: u8,
}

/// Endpoint Info (`0x72`). `status` is a 7-bit request selector.
#[derive(Clone, Copy, Debug)]
pub struct EndpointInfo {
    pub status: u8,
}

/// Endpoint Info Reply (`0x73`).
#[derive(Clone, Copy, Debug)]
pub struct EndpointInfoReply<'a> {
    pub status: u8,
    pub information: &'a [u8],
}

/// Invalidate MUID (`0x7E`). Broadcast when a device has detected that
/// `target_muid` is no longer valid (e.g. a MUID collision).
#[derive(Clone, Copy, Debug)]
pub struct InvalidateMuid {
    pub target_muid: crate::le7::Muid,
}

/// ACK (`0x7D`). Acknowledges an earlier message, optionally carrying a
/// status code/data pair and free-form text.
#[derive(Clone, Copy, Debug)]
pub struct Ack<'a> {
    pub original_id: u8,
    pub status_code: u8,
    pub status_data: u8,
    pub details: [u8; 5],
    pub message: &'a [u8],
}

/// NAK (`0x7F`). A version-1 NAK carries no body; a version-2-or-later NAK
/// has the same shape as [`Ack`].
#[derive(Clone, Copy, Debug)]
pub struct Nak<'a> {
    pub original_id: u8,
    pub status_code: u8,
    pub status_data: u8,
    pub details: [u8; 5],
    pub message: &'a [u8],
}

impl<'a> Nak<'a> {
    /// A version-1 NAK, carrying no detail fields.
    #[must_use]
    pub const fn v1() -> Self {
        Self {
            original_id: 0,
            status_code: 0,
            status_data: 0,
            details: [0; 5],
            message: &[],
        }
    }
}
