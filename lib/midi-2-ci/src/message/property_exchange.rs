// =============================================================================
// Property Exchange
// =============================================================================

//! Property Exchange messages: a JSON header chunk (request metadata) paired
//! with a data chunk, both of which may be split across several CI messages
//! when they exceed the negotiated chunk size (reassembly is a caller
//! concern; this catalog models one wire message, not a reassembled stream).

/// PE Capabilities (`0x30`). No body in version 1; version 2 adds the major
/// and minor PE specification version the initiator supports.
#[derive(Clone, Copy, Debug)]
pub struct Capabilities {
    pub num_simultaneous_requests: u8,
    pub major_version: u8,
    pub minor_version: u8,
}

/// PE Capabilities Reply (`0x31`). Same shape as [`Capabilities`].
#[derive(Clone, Copy, Debug)]
pub struct CapabilitiesReply {
    pub num_simultaneous_requests: u8,
    pub major_version: u8,
    pub minor_version: u8,
}

/// One PE chunk: a JSON header plus a data payload, together with the
/// request ID and chunk-sequencing fields shared by every PE message.
#[derive(Clone, Copy, Debug)]
pub struct Chunk<'a> {
    pub request_id: u8,
    pub header: &'a [u8],
    pub total_chunks: u16,
    pub chunk_number: u16,
    pub data: &'a [u8],
}

impl<'a> Chunk<'a> {
    #[must_use]
    pub const fn single(request_id: u8, header: &'a [u8], data: &'a [u8]) -> Self {
        Self {
            request_id,
            header,
            total_chunks: 1,
            chunk_number: 1,
            data,
        }
    }
}

/// Inquiry: Get Property Data (`0x34`).
pub type Get<'a> = Chunk<'a>;
/// Reply To Get Property Data (`0x35`).
pub type GetReply<'a> = Chunk<'a>;
/// Inquiry: Set Property Data (`0x36`).
pub type Set<'a> = Chunk<'a>;
/// Reply To Set Property Data (`0x37`).
pub type SetReply<'a> = Chunk<'a>;
/// Subscription (`0x38`).
pub type Subscription<'a> = Chunk<'a>;
/// Reply To Subscription (`0x39`).
pub type SubscriptionReply<'a> = Chunk<'a>;
/// Notify (`0x3F`).
pub type Notify<'a> = Chunk<'a>;
