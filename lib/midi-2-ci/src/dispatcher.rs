// =============================================================================
// Dispatcher
// =============================================================================

//! The MIDI-CI streaming byte dispatcher.
//!
//! A [`CiDispatcher`] decodes one MIDI-CI message per call to
//! [`CiDispatcher::start_sysex7`]/[`CiDispatcher::push`], byte at a time,
//! into a fixed `N`-byte accumulator (`512` by default). Unlike the UMP
//! dispatcher, which always knows a message's total length from its first
//! word, a CI message's length depends on fields discovered partway through
//! decoding it (a property exchange header length, a profile list count, an
//! ACK's trailing text length...). The dispatcher tracks this as a sequence
//! of *segments*: a fixed number of bytes are accumulated, then a
//! transition function either starts the next segment (using bytes already
//! read to size it) or finalizes the message and dispatches it to a
//! [`Handlers`] implementation.
//!
//! The accumulator grows monotonically across segments of the same
//! message; it is only rewound by [`CiDispatcher::start_sysex7`] (the start
//! of the next message) or by an overflow, so a malformed message can never
//! corrupt the one that follows it.

use crate::{
    header::{
        Header,
        HEADER_LEN_WITH_TYPE,
    },
    le7::{
        read_u14,
        read_u28,
        Muid,
    },
    message::{
        management,
        process_inquiry,
        profile,
        property_exchange,
        MessageType,
    },
};

/// Bytes in the segment common to every message: CI message type, version,
/// source MUID, destination MUID. Pushed bytes begin here (the
/// `F0 7E <device id> 0D` sysex preamble is supplied to
/// [`CiDispatcher::start_sysex7`] rather than pushed).
const HEADER_LEN: usize = HEADER_LEN_WITH_TYPE;

// -----------------------------------------------------------------------------

// Handlers

/// The complete set of callbacks a [`CiDispatcher`] may invoke.
///
/// Every method has a no-op default; [`check_muid`](Handlers::check_muid)
/// defaults to accepting every destination MUID, since a responder with no
/// MUID of its own assigned yet cannot meaningfully filter.
#[allow(unused_variables)]
pub trait Handlers {
    /// Consulted exactly once per message, immediately after the common
    /// header has been decoded (skipped when the destination MUID is the
    /// broadcast MUID). Returning `false` discards the message.
    fn check_muid(&mut self, group: u8, destination_muid: Muid) -> bool {
        true
    }

    /// Called for a message type byte this catalog does not recognize.
    fn unknown_midici(&mut self, header: Header, message_type: u8) {}

    /// Called when a message would exceed the dispatcher's fixed buffer.
    fn buffer_overflow(&mut self, capacity: usize) {}

    // Management

    fn discovery(&mut self, header: Header, message: management::Discovery) {}
    fn discovery_reply(&mut self, header: Header, message: management::DiscoveryReply) {}
    fn endpoint_info(&mut self, header: Header, message: management::EndpointInfo) {}
    fn endpoint_info_reply(&mut self, header: Header, message: management::EndpointInfoReply<'_>) {}
    fn invalidate_muid(&mut self, header: Header, message: management::InvalidateMuid) {}
    fn ack(&mut self, header: Header, message: management::Ack<'_>) {}
    fn nak(&mut self, header: Header, message: management::Nak<'_>) {}

    // Profile Configuration

    fn profile_inquiry(&mut self, header: Header, message: profile::Inquiry) {}
    fn profile_inquiry_reply(&mut self, header: Header, message: profile::InquiryReply<'_>) {}
    fn profile_on(&mut self, header: Header, message: profile::On) {}
    fn profile_off(&mut self, header: Header, message: profile::Off) {}
    fn profile_enabled(&mut self, header: Header, message: profile::Enabled) {}
    fn profile_disabled(&mut self, header: Header, message: profile::Disabled) {}
    fn profile_added(&mut self, header: Header, message: profile::Added) {}
    fn profile_removed(&mut self, header: Header, message: profile::Removed) {}
    fn profile_details(&mut self, header: Header, message: profile::Details) {}
    fn profile_details_reply(&mut self, header: Header, message: profile::DetailsReply<'_>) {}
    fn profile_specific_data(&mut self, header: Header, message: profile::SpecificData<'_>) {}

    // Property Exchange

    fn pe_capabilities(&mut self, header: Header, message: property_exchange::Capabilities) {}
    fn pe_capabilities_reply(&mut self, header: Header, message: property_exchange::CapabilitiesReply) {}
    fn pe_get(&mut self, header: Header, message: property_exchange::Get<'_>) {}
    fn pe_get_reply(&mut self, header: Header, message: property_exchange::GetReply<'_>) {}
    fn pe_set(&mut self, header: Header, message: property_exchange::Set<'_>) {}
    fn pe_set_reply(&mut self, header: Header, message: property_exchange::SetReply<'_>) {}
    fn pe_subscription(&mut self, header: Header, message: property_exchange::Subscription<'_>) {}
    fn pe_subscription_reply(&mut self, header: Header, message: property_exchange::SubscriptionReply<'_>) {}
    fn pe_notify(&mut self, header: Header, message: property_exchange::Notify<'_>) {}

    // Process Inquiry

    fn pi_capabilities(&mut self, header: Header, message: process_inquiry::Capabilities) {}
    fn pi_capabilities_reply(&mut self, header: Header, message: process_inquiry::CapabilitiesReply) {}
    fn pi_midi_message_report(&mut self, header: Header, message: process_inquiry::MidiMessageReport) {}
    fn pi_midi_message_report_reply(&mut self, header: Header, message: process_inquiry::MidiMessageReportReply) {}
    fn pi_midi_message_report_end(&mut self, header: Header, message: process_inquiry::MidiMessageReportEnd) {}
}

// -----------------------------------------------------------------------------

// Segment plan

/// What a message type's body looks like after the common header, used to
/// drive the segment machine without a bespoke transition per message.
#[derive(Clone, Copy)]
enum Plan {
    /// A fixed number of trailing bytes with no length-prefixed blob.
    Fixed(usize),
    /// `tail_len` fixed bytes ending in a 2-byte LE7 length, followed by
    /// that many blob bytes.
    Blob { tail_len: usize },
    /// Profile Inquiry Reply's two same-shaped lists.
    ProfileInquiryReply,
    /// Property Exchange's header-chunk-then-data-chunk shape.
    PropertyExchange,
}

fn plan_for(message_type: u8, version: u8) -> Option<Plan> {
    let v2 = version >= 0x02;
    match MessageType(message_type) {
        MessageType::DISCOVERY => Some(Plan::Fixed(if v2 { 17 } else { 16 })),
        MessageType::DISCOVERY_REPLY => Some(Plan::Fixed(if v2 { 18 } else { 16 })),
        MessageType::ENDPOINT_INFO => Some(Plan::Fixed(1)),
        MessageType::ENDPOINT_INFO_REPLY => Some(Plan::Blob { tail_len: 3 }),
        MessageType::INVALIDATE_MUID => Some(Plan::Fixed(4)),
        MessageType::ACK => Some(Plan::Blob { tail_len: 10 }),
        MessageType::NAK => Some(if v2 { Plan::Blob { tail_len: 10 } } else { Plan::Fixed(0) }),

        MessageType::PROFILE_INQUIRY => Some(Plan::Fixed(0)),
        MessageType::PROFILE_INQUIRY_REPLY => Some(Plan::ProfileInquiryReply),
        MessageType::PROFILE_ON | MessageType::PROFILE_OFF | MessageType::PROFILE_ENABLED | MessageType::PROFILE_DISABLED => {
            Some(Plan::Fixed(7))
        }
        MessageType::PROFILE_ADDED | MessageType::PROFILE_REMOVED => Some(Plan::Fixed(5)),
        MessageType::PROFILE_DETAILS => Some(Plan::Fixed(6)),
        MessageType::PROFILE_DETAILS_REPLY => Some(Plan::Blob { tail_len: 8 }),
        MessageType::PROFILE_SPECIFIC_DATA => Some(Plan::Blob { tail_len: 7 }),

        MessageType::PE_CAPABILITIES | MessageType::PE_CAPABILITIES_REPLY => Some(Plan::Fixed(if v2 { 3 } else { 1 })),
        MessageType::PE_GET
        | MessageType::PE_GET_REPLY
        | MessageType::PE_SET
        | MessageType::PE_SET_REPLY
        | MessageType::PE_SUBSCRIPTION
        | MessageType::PE_SUBSCRIPTION_REPLY
        | MessageType::PE_NOTIFY => Some(Plan::PropertyExchange),

        MessageType::PI_CAPABILITIES | MessageType::PI_MIDI_MESSAGE_REPORT_END => Some(Plan::Fixed(0)),
        MessageType::PI_CAPABILITIES_REPLY => Some(Plan::Fixed(1)),
        MessageType::PI_MIDI_MESSAGE_REPORT => Some(Plan::Fixed(5)),
        MessageType::PI_MIDI_MESSAGE_REPORT_REPLY => Some(Plan::Fixed(4)),

        _ => None,
    }
}

// -----------------------------------------------------------------------------

// Segment

/// Where the segment machine currently is within one message.
enum Segment {
    /// Reading the 10-byte common header.
    Header,
    /// Reading `len` more bytes, after which the message finalizes (no
    /// blob); `len == 0` is valid and finalizes immediately.
    Fixed { header: Header, message_type: u8, len: usize },
    /// Reading the fixed tail of a single-blob message; once read, the
    /// trailing 2-byte LE7 length in `buf[tail_start..]` sizes the blob.
    BlobTail { header: Header, message_type: u8, tail_start: usize, tail_len: usize },
    /// Reading a single blob of `len` bytes starting at `blob_start`.
    BlobBody { header: Header, message_type: u8, blob_start: usize },
    /// Profile Inquiry Reply: reading the 2-byte enabled-list count.
    ProfileEnabledCount { header: Header },
    /// Reading `enabled_len` bytes of enabled profile IDs.
    ProfileEnabledIds { header: Header, enabled_start: usize },
    /// Reading the 2-byte disabled-list count.
    ProfileDisabledCount { header: Header, enabled_start: usize, enabled_len: usize },
    /// Reading `disabled_len` bytes of disabled profile IDs.
    ProfileDisabledIds { header: Header, enabled_start: usize, enabled_len: usize, disabled_start: usize },
    /// Property Exchange: reading the 3-byte (request ID + header length) preamble.
    PePt1 { header: Header, message_type: u8 },
    /// Reading the JSON header chunk.
    PeHeader { header: Header, message_type: u8, request_id: u8, header_start: usize },
    /// Reading the 6-byte (total chunks + chunk number + data length) preamble.
    PePt2 { header: Header, message_type: u8, request_id: u8, header_start: usize, header_len: usize },
    /// Reading the data chunk.
    PeData {
        header: Header,
        message_type: u8,
        request_id: u8,
        header_start: usize,
        header_len: usize,
        total_chunks: u16,
        chunk_number: u16,
        data_start: usize,
    },
    /// Ignoring bytes until the next `start_sysex7` (unrecognized message
    /// type, or a MUID that was not ours).
    Discard,
}

// -----------------------------------------------------------------------------

// Dispatcher

/// Streaming byte-at-a-time MIDI-CI dispatcher with a fixed `N`-byte buffer.
pub struct CiDispatcher<H, const N: usize = 512> {
    buf: [u8; N],
    pos: usize,
    count: usize,
    segment: Segment,
    group: u8,
    device_id: u8,
    handlers: H,
}

impl<H, const N: usize> CiDispatcher<H, N>
where
    H: Handlers,
{
    /// Creates a dispatcher, idle until the first [`CiDispatcher::start_sysex7`].
    pub const fn new(handlers: H) -> Self {
        Self {
            buf: [0; N],
            pos: 0,
            count: HEADER_LEN,
            segment: Segment::Header,
            group: 0,
            device_id: 0,
            handlers,
        }
    }

    pub const fn handlers(&self) -> &H {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut H {
        &mut self.handlers
    }

    pub fn into_handlers(self) -> H {
        self.handlers
    }

    /// Begins decoding a new MIDI-CI message carried on `group`, addressed
    /// to `device_id`. Discards any message in progress.
    pub fn start_sysex7(&mut self, group: u8, device_id: u8) {
        self.pos = 0;
        self.count = HEADER_LEN;
        self.segment = Segment::Header;
        self.group = group;
        self.device_id = device_id;
    }

    /// Feeds one byte of the CI payload (beginning at the message type
    /// byte, see [`CiDispatcher::start_sysex7`]).
    pub fn push(&mut self, byte: u8) {
        if matches!(self.segment, Segment::Discard) {
            return;
        }

        if self.count > 0 {
            if self.pos >= N {
                self.handlers.buffer_overflow(N);
                self.segment = Segment::Discard;
                return;
            }
            self.buf[self.pos] = byte;
            self.pos += 1;
            self.count -= 1;
        }

        if self.count == 0 {
            self.advance();
        }
    }

    /// Feeds every byte of a complete CI payload, in order.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push(byte);
        }
    }

    fn discard(&mut self) {
        self.segment = Segment::Discard;
    }

    #[allow(clippy::too_many_lines)]
    fn advance(&mut self) {
        let segment = core::mem::replace(&mut self.segment, Segment::Discard);

        match segment {
            Segment::Header => {
                let message_type = self.buf[0];
                let version = self.buf[1];
                let source_muid = Muid::from_le7_bytes(self.buf[2..6].try_into().unwrap());
                let destination_muid = Muid::from_le7_bytes(self.buf[6..10].try_into().unwrap());
                let header = Header::new(self.device_id, version, source_muid, destination_muid);

                if !destination_muid.is_broadcast() && !self.handlers.check_muid(self.group, destination_muid) {
                    return self.discard();
                }

                match plan_for(message_type, version) {
                    None => {
                        self.handlers.unknown_midici(header, message_type);
                        self.discard();
                    }
                    Some(Plan::Fixed(len)) => {
                        self.segment = Segment::Fixed { header, message_type, len };
                        self.count = len;
                        if len == 0 {
                            self.advance();
                        }
                    }
                    Some(Plan::Blob { tail_len }) => {
                        self.segment = Segment::BlobTail {
                            header,
                            message_type,
                            tail_start: self.pos,
                            tail_len,
                        };
                        self.count = tail_len;
                    }
                    Some(Plan::ProfileInquiryReply) => {
                        self.segment = Segment::ProfileEnabledCount { header };
                        self.count = 2;
                    }
                    Some(Plan::PropertyExchange) => {
                        self.segment = Segment::PePt1 { header, message_type };
                        self.count = 3;
                    }
                }
            }

            Segment::Fixed { header, message_type, len } => {
                let tail = &self.buf[self.pos - len..self.pos];
                Self::finalize_fixed(&mut self.handlers, header, message_type, tail);
                self.discard();
            }

            Segment::BlobTail { header, message_type, tail_start, tail_len } => {
                let tail = &self.buf[tail_start..tail_start + tail_len];
                let len = read_u14([tail[tail_len - 2], tail[tail_len - 1]]) as usize;
                self.segment = Segment::BlobBody {
                    header,
                    message_type,
                    blob_start: self.pos,
                };
                self.count = len;
                if len == 0 {
                    self.advance();
                }
            }

            Segment::BlobBody { header, message_type, blob_start } => {
                let tail_start = match message_type {
                    m if m == MessageType::ENDPOINT_INFO_REPLY.0 => blob_start - 3,
                    m if m == MessageType::ACK.0 || m == MessageType::NAK.0 => blob_start - 10,
                    m if m == MessageType::PROFILE_DETAILS_REPLY.0 => blob_start - 8,
                    m if m == MessageType::PROFILE_SPECIFIC_DATA.0 => blob_start - 7,
                    _ => blob_start,
                };
                let tail = &self.buf[tail_start..blob_start];
                let blob = &self.buf[blob_start..self.pos];
                Self::finalize_blob(&mut self.handlers, header, message_type, tail, blob);
                self.discard();
            }

            Segment::ProfileEnabledCount { header } => {
                let count = read_u14([self.buf[self.pos - 2], self.buf[self.pos - 1]]) as usize;
                let enabled_start = self.pos;
                let enabled_len = count * 5;
                self.segment = Segment::ProfileEnabledIds { header, enabled_start };
                self.count = enabled_len;
                if enabled_len == 0 {
                    self.advance();
                }
            }

            Segment::ProfileEnabledIds { header, enabled_start } => {
                let enabled_len = self.pos - enabled_start;
                self.segment = Segment::ProfileDisabledCount { header, enabled_start, enabled_len };
                self.count = 2;
            }

            Segment::ProfileDisabledCount { header, enabled_start, enabled_len } => {
                let count = read_u14([self.buf[self.pos - 2], self.buf[self.pos - 1]]) as usize;
                let disabled_start = self.pos;
                let disabled_len = count * 5;
                self.segment = Segment::ProfileDisabledIds {
                    header,
                    enabled_start,
                    enabled_len,
                    disabled_start,
                };
                self.count = disabled_len;
                if disabled_len == 0 {
                    self.advance();
                }
            }

            Segment::ProfileDisabledIds { header, enabled_start, enabled_len, disabled_start } => {
                let enabled = &self.buf[enabled_start..enabled_start + enabled_len];
                let disabled = &self.buf[disabled_start..self.pos];
                self.handlers
                    .profile_inquiry_reply(header, profile::InquiryReply::new(enabled, disabled));
                self.discard();
            }

            Segment::PePt1 { header, message_type } => {
                let start = self.pos - 3;
                let request_id = self.buf[start];
                let header_len = read_u14([self.buf[start + 1], self.buf[start + 2]]) as usize;
                let header_start = self.pos;
                self.segment = Segment::PeHeader {
                    header,
                    message_type,
                    request_id,
                    header_start,
                };
                self.count = header_len;
                if header_len == 0 {
                    self.advance();
                }
            }

            Segment::PeHeader { header, message_type, request_id, header_start } => {
                let header_len = self.pos - header_start;
                self.segment = Segment::PePt2 {
                    header,
                    message_type,
                    request_id,
                    header_start,
                    header_len,
                };
                self.count = 6;
            }

            Segment::PePt2 { header, message_type, request_id, header_start, header_len } => {
                let start = self.pos - 6;
                let total_chunks = read_u14([self.buf[start], self.buf[start + 1]]);
                let chunk_number = read_u14([self.buf[start + 2], self.buf[start + 3]]);
                let data_len = read_u14([self.buf[start + 4], self.buf[start + 5]]) as usize;
                let data_start = self.pos;
                self.segment = Segment::PeData {
                    header,
                    message_type,
                    request_id,
                    header_start,
                    header_len,
                    total_chunks,
                    chunk_number,
                    data_start,
                };
                self.count = data_len;
                if data_len == 0 {
                    self.advance();
                }
            }

            Segment::PeData {
                header,
                message_type,
                request_id,
                header_start,
                header_len,
                total_chunks,
                chunk_number,
                data_start,
            } => {
                let chunk = property_exchange::Chunk {
                    request_id,
                    header: &self.buf[header_start..header_start + header_len],
                    total_chunks,
                    chunk_number,
                    data: &self.buf[data_start..self.pos],
                };
                Self::finalize_pe(&mut self.handlers, header, message_type, chunk);
                self.discard();
            }

            Segment::Discard => {}
        }
    }

    fn finalize_fixed(handlers: &mut H, header: Header, message_type: u8, tail: &[u8]) {
        match MessageType(message_type) {
            MessageType::DISCOVERY => {
                handlers.discovery(header, decode_discovery(header, tail));
            }
            MessageType::DISCOVERY_REPLY => {
                handlers.discovery_reply(header, decode_discovery_reply(header, tail));
            }
            MessageType::ENDPOINT_INFO => handlers.endpoint_info(header, management::EndpointInfo { status: tail[0] }),
            MessageType::INVALIDATE_MUID => handlers.invalidate_muid(
                header,
                management::InvalidateMuid {
                    target_muid: Muid::from_le7_bytes(tail[0..4].try_into().unwrap()),
                },
            ),
            MessageType::NAK => handlers.nak(header, management::Nak::v1()),
            MessageType::PROFILE_INQUIRY => handlers.profile_inquiry(header, profile::Inquiry),
            MessageType::PROFILE_ON => {
                let (profile_id, num_channels) = decode_profile_count(tail);
                handlers.profile_on(
                    header,
                    profile::On {
                        profile: profile_id,
                        num_channels,
                    },
                );
            }
            MessageType::PROFILE_OFF => handlers.profile_off(
                header,
                profile::Off {
                    profile: tail[0..5].try_into().unwrap(),
                },
            ),
            MessageType::PROFILE_ENABLED => {
                let (profile_id, num_channels) = decode_profile_count(tail);
                handlers.profile_enabled(
                    header,
                    profile::Enabled {
                        profile: profile_id,
                        num_channels,
                    },
                );
            }
            MessageType::PROFILE_DISABLED => {
                let (profile_id, num_channels) = decode_profile_count(tail);
                handlers.profile_disabled(
                    header,
                    profile::Disabled {
                        profile: profile_id,
                        num_channels,
                    },
                );
            }
            MessageType::PROFILE_ADDED => handlers.profile_added(
                header,
                profile::Added {
                    profile: tail[0..5].try_into().unwrap(),
                },
            ),
            MessageType::PROFILE_REMOVED => handlers.profile_removed(
                header,
                profile::Removed {
                    profile: tail[0..5].try_into().unwrap(),
                },
            ),
            MessageType::PROFILE_DETAILS => handlers.profile_details(
                header,
                profile::Details {
                    profile: tail[0..5].try_into().unwrap(),
                    target: tail[5],
                },
            ),
            MessageType::PE_CAPABILITIES => handlers.pe_capabilities(header, decode_pe_capabilities(tail)),
            MessageType::PE_CAPABILITIES_REPLY => {
                let c = decode_pe_capabilities(tail);
                handlers.pe_capabilities_reply(
                    header,
                    property_exchange::CapabilitiesReply {
                        num_simultaneous_requests: c.num_simultaneous_requests,
                        major_version: c.major_version,
                        minor_version: c.minor_version,
                    },
                );
            }
            MessageType::PI_CAPABILITIES => handlers.pi_capabilities(header, process_inquiry::Capabilities),
            MessageType::PI_CAPABILITIES_REPLY => handlers.pi_capabilities_reply(
                header,
                process_inquiry::CapabilitiesReply {
                    supported_features: tail[0],
                },
            ),
            MessageType::PI_MIDI_MESSAGE_REPORT => handlers.pi_midi_message_report(
                header,
                process_inquiry::MidiMessageReport {
                    message_data_control: tail[0],
                    system_messages: process_inquiry::SystemMessages::from_bits(tail[1]),
                    channel_controller_messages: process_inquiry::ChannelControllerMessages::from_bits(tail[3]),
                    note_data_messages: process_inquiry::NoteDataMessages::from_bits(tail[4]),
                },
            ),
            MessageType::PI_MIDI_MESSAGE_REPORT_REPLY => handlers.pi_midi_message_report_reply(
                header,
                process_inquiry::MidiMessageReportReply {
                    system_messages: process_inquiry::SystemMessages::from_bits(tail[0]),
                    channel_controller_messages: process_inquiry::ChannelControllerMessages::from_bits(tail[2]),
                    note_data_messages: process_inquiry::NoteDataMessages::from_bits(tail[3]),
                },
            ),
            MessageType::PI_MIDI_MESSAGE_REPORT_END => {
                handlers.pi_midi_message_report_end(header, process_inquiry::MidiMessageReportEnd);
            }
            _ => {}
        }
    }

    fn finalize_blob(handlers: &mut H, header: Header, message_type: u8, tail: &[u8], blob: &[u8]) {
        match MessageType(message_type) {
            MessageType::ENDPOINT_INFO_REPLY => handlers.endpoint_info_reply(
                header,
                management::EndpointInfoReply {
                    status: tail[0],
                    information: blob,
                },
            ),
            MessageType::ACK => handlers.ack(header, decode_ack(tail, blob)),
            MessageType::NAK => handlers.nak(header, decode_nak(tail, blob)),
            MessageType::PROFILE_DETAILS_REPLY => handlers.profile_details_reply(
                header,
                profile::DetailsReply {
                    profile: tail[0..5].try_into().unwrap(),
                    target: tail[5],
                    data: blob,
                },
            ),
            MessageType::PROFILE_SPECIFIC_DATA => handlers.profile_specific_data(
                header,
                profile::SpecificData {
                    profile: tail[0..5].try_into().unwrap(),
                    data: blob,
                },
            ),
            _ => {}
        }
    }

    fn finalize_pe(handlers: &mut H, header: Header, message_type: u8, chunk: property_exchange::Chunk<'_>) {
        match MessageType(message_type) {
            MessageType::PE_GET => handlers.pe_get(header, chunk),
            MessageType::PE_GET_REPLY => handlers.pe_get_reply(header, chunk),
            MessageType::PE_SET => handlers.pe_set(header, chunk),
            MessageType::PE_SET_REPLY => handlers.pe_set_reply(header, chunk),
            MessageType::PE_SUBSCRIPTION => handlers.pe_subscription(header, chunk),
            MessageType::PE_SUBSCRIPTION_REPLY => handlers.pe_subscription_reply(header, chunk),
            MessageType::PE_NOTIFY => handlers.pe_notify(header, chunk),
            _ => {}
        }
    }
}

fn decode_discovery(header: Header, tail: &[u8]) -> management::Discovery {
    management::Discovery {
        manufacturer: [tail[0], tail[1], tail[2]],
        family: read_u14([tail[3], tail[4]]),
        model: read_u14([tail[5], tail[6]]),
        version: [tail[7], tail[8], tail[9], tail[10]],
        capability: tail[11],
        max_sysex_size: read_u28([tail[12], tail[13], tail[14], tail[15]]),
        output_path_id: if header.is_version_2_or_later() { tail[16] } else { 0 },
    }
}

fn decode_discovery_reply(header: Header, tail: &[u8]) -> management::DiscoveryReply {
    let (output_path_id, function_block) = if header.is_version_2_or_later() {
        (tail[16], tail[17])
    } else {
        (0, 0)
    };
    management::DiscoveryReply {
        manufacturer: [tail[0], tail[1], tail[2]],
        family: read_u14([tail[3], tail[4]]),
        model: read_u14([tail[5], tail[6]]),
        version: [tail[7], tail[8], tail[9], tail[10]],
        capability: tail[11],
        max_sysex_size: read_u28([tail[12], tail[13], tail[14], tail[15]]),
        output_path_id,
        function_block,
    }
}

fn decode_profile_count(tail: &[u8]) -> (profile::ProfileId, u16) {
    (tail[0..5].try_into().unwrap(), read_u14([tail[5], tail[6]]))
}

fn decode_ack(tail: &[u8], message: &[u8]) -> management::Ack<'_> {
    management::Ack {
        original_id: tail[0],
        status_code: tail[1],
        status_data: tail[2],
        details: tail[3..8].try_into().unwrap(),
        message,
    }
}

fn decode_nak(tail: &[u8], message: &[u8]) -> management::Nak<'_> {
    management::Nak {
        original_id: tail[0],
        status_code: tail[1],
        status_data: tail[2],
        details: tail[3..8].try_into().unwrap(),
        message,
    }
}

fn decode_pe_capabilities(tail: &[u8]) -> property_exchange::Capabilities {
    property_exchange::Capabilities {
        num_simultaneous_requests: tail[0],
        major_version: tail.get(1).copied().unwrap_or(0),
        minor_version: tail.get(2).copied().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CiDispatcher,
        Handlers,
    };
    use crate::{
        header::Header,
        le7::Muid,
        message::{
            management,
            profile,
            property_exchange,
        },
    };

    #[derive(Default)]
    struct Recorder {
        discoveries: Vec<([u8; 3], u32)>,
        profiles_added: Vec<profile::ProfileId>,
        pe_gets: Vec<(Vec<u8>, Vec<u8>)>,
        inquiry_replies: Vec<(Vec<profile::ProfileId>, Vec<profile::ProfileId>)>,
        unknown: Vec<u8>,
        overflows: usize,
    }

    impl Handlers for Recorder {
        fn discovery(&mut self, _header: Header, message: management::Discovery) {
            self.discoveries.push((message.manufacturer, message.max_sysex_size));
        }

        fn profile_added(&mut self, _header: Header, message: profile::Added) {
            self.profiles_added.push(message.profile);
        }

        fn profile_inquiry_reply(&mut self, _header: Header, message: profile::InquiryReply<'_>) {
            self.inquiry_replies
                .push((message.enabled().collect(), message.disabled().collect()));
        }

        fn pe_get(&mut self, _header: Header, message: property_exchange::Get<'_>) {
            self.pe_gets.push((message.header.to_vec(), message.data.to_vec()));
        }

        fn unknown_midici(&mut self, _header: Header, message_type: u8) {
            self.unknown.push(message_type);
        }

        fn buffer_overflow(&mut self, _capacity: usize) {
            self.overflows += 1;
        }
    }

    fn push_message(dispatcher: &mut CiDispatcher<Recorder>, group: u8, device_id: u8, payload: &[u8]) {
        dispatcher.start_sysex7(group, device_id);
        dispatcher.push_bytes(payload);
    }

    fn header_bytes(message_type: u8, version: u8, source: Muid, destination: Muid) -> Vec<u8> {
        let mut out = vec![message_type, version];
        out.extend_from_slice(&source.to_le7_bytes());
        out.extend_from_slice(&destination.to_le7_bytes());
        out
    }

    #[test]
    fn decodes_a_v2_discovery_message() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let mut payload = header_bytes(0x70, 0x02, Muid::new(0x1234_5678), Muid::BROADCAST);
        payload.extend_from_slice(&[0x7d, 0x00, 0x00]); // manufacturer
        payload.extend_from_slice(&[0x12, 0x00]); // family
        payload.extend_from_slice(&[0x34, 0x00]); // model
        payload.extend_from_slice(&[1, 0, 0, 0]); // version
        payload.push(0x7f); // capability
        payload.extend_from_slice(&[0x00, 0x02, 0x00, 0x00]); // max_sysex_size = 256
        payload.push(0x05); // output_path_id

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().discoveries, vec![([0x7d, 0x00, 0x00], 256)]);
    }

    #[test]
    fn decodes_a_v1_discovery_message_without_output_path_id() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let mut payload = header_bytes(0x70, 0x01, Muid::new(1), Muid::BROADCAST);
        payload.extend_from_slice(&[0x7d, 0x00, 0x00]);
        payload.extend_from_slice(&[0x00, 0x00]);
        payload.extend_from_slice(&[0x00, 0x00]);
        payload.extend_from_slice(&[1, 0, 0, 0]);
        payload.push(0x00);
        payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().discoveries.len(), 1);
    }

    #[test]
    fn routes_an_unrecognized_message_type_to_unknown() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let payload = header_bytes(0x5a, 0x02, Muid::new(1), Muid::new(2));

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().unknown, vec![0x5a]);
    }

    #[test]
    fn decodes_profile_added_broadcast() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let mut payload = header_bytes(0x26, 0x02, Muid::new(1), Muid::BROADCAST);
        payload.extend_from_slice(&[0x7e, 0x00, 0x01, 0x00, 0x00]);

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().profiles_added, vec![[0x7e, 0x00, 0x01, 0x00, 0x00]]);
    }

    #[test]
    fn decodes_profile_inquiry_reply_with_both_lists() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let mut payload = header_bytes(0x21, 0x02, Muid::new(1), Muid::new(2));
        payload.extend_from_slice(&[0x01, 0x00]); // enabled_count = 1
        payload.extend_from_slice(&[0xaa, 0, 0, 0, 1]);
        payload.extend_from_slice(&[0x01, 0x00]); // disabled_count = 1
        payload.extend_from_slice(&[0xbb, 0, 0, 0, 2]);

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(
            dispatcher.handlers().inquiry_replies,
            vec![(vec![[0xaa, 0, 0, 0, 1]], vec![[0xbb, 0, 0, 0, 2]])]
        );
    }

    #[test]
    fn decodes_a_property_exchange_get_with_empty_data() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        let mut payload = header_bytes(0x34, 0x02, Muid::new(1), Muid::new(2));
        payload.push(0x01); // request_id
        let json = br#"{"resource":"DeviceInfo"}"#;
        payload.extend_from_slice(&(json.len() as u16).to_le_bytes()[..1]);
        payload.push(0x00);
        payload.extend_from_slice(json);
        payload.extend_from_slice(&[1, 0]); // total_chunks
        payload.extend_from_slice(&[1, 0]); // chunk_number
        payload.extend_from_slice(&[0, 0]); // data_len

        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().pe_gets, vec![(json.to_vec(), Vec::new())]);
    }

    #[test]
    fn reports_buffer_overflow_instead_of_panicking() {
        let mut dispatcher = CiDispatcher::<Recorder, 8>::new(Recorder::default());

        dispatcher.start_sysex7(0, 0x7f);
        dispatcher.push_bytes(&[0; 16]);

        assert_eq!(dispatcher.handlers().overflows, 1);
    }

    #[test]
    fn a_malformed_message_does_not_desynchronize_the_next_one() {
        let mut dispatcher = CiDispatcher::<Recorder>::new(Recorder::default());

        // An unrecognized type discards this message...
        push_message(&mut dispatcher, 0, 0x7f, &header_bytes(0x5a, 0x02, Muid::new(1), Muid::new(2)));
        // ...but a fresh start_sysex7 decodes cleanly regardless.
        let mut payload = header_bytes(0x27, 0x02, Muid::new(1), Muid::BROADCAST);
        payload.extend_from_slice(&[1, 2, 3, 4, 5]);
        push_message(&mut dispatcher, 0, 0x7f, &payload);

        assert_eq!(dispatcher.handlers().unknown, vec![0x5a]);
    }
}
