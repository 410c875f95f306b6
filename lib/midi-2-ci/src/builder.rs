// =============================================================================
// Builder
// =============================================================================

//! Serializes a [`Header`] and a record from the [`message`](crate::message)
//! catalog into an output buffer as a MIDI-CI sysex body.
//!
//! Every `write_*` function is all-or-nothing: if `out` is too small to hold
//! the complete message, nothing is written and [`Error::Truncated`] is
//! returned, rather than silently emitting a partial message.

use crate::{
    header::{
        Header,
        MIDI_CI,
        UNIVERSAL_NON_REALTIME,
    },
    le7,
    message::{
        management,
        process_inquiry,
        profile,
        property_exchange,
        MessageType,
    },
    Error,
};

// -----------------------------------------------------------------------------

// Writer

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn u8(&mut self, value: u8) -> Result<(), Error> {
        if self.remaining() < 1 {
            return Err(Error::Truncated);
        }
        self.buf[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    fn bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        if self.remaining() < value.len() {
            return Err(Error::Truncated);
        }
        self.buf[self.pos..self.pos + value.len()].copy_from_slice(value);
        self.pos += value.len();
        Ok(())
    }

    fn le7_14(&mut self, value: u16) -> Result<(), Error> {
        self.bytes(&le7::write_u14(value)?)
    }

    fn le7_28(&mut self, value: u32) -> Result<(), Error> {
        self.bytes(&le7::write_u28(value)?)
    }

    fn muid(&mut self, value: le7::Muid) -> Result<(), Error> {
        self.bytes(&value.to_le7_bytes())
    }

    const fn finish(self) -> usize {
        self.pos
    }
}

fn write_header(writer: &mut Writer<'_>, header: &Header, message_type: MessageType) -> Result<(), Error> {
    writer.u8(UNIVERSAL_NON_REALTIME)?;
    writer.u8(header.device_id)?;
    writer.u8(MIDI_CI)?;
    writer.u8(message_type.0)?;
    writer.u8(header.version)?;
    writer.muid(header.source_muid)?;
    writer.muid(header.destination_muid)?;
    Ok(())
}

// -----------------------------------------------------------------------------

// Management

/// Builds a Discovery message. Writes `output_path_id` only for version 2
/// and later.
/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn discovery(out: &mut [u8], header: &Header, body: &management::Discovery) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::DISCOVERY)?;
    w.bytes(&body.manufacturer)?;
    w.le7_14(body.family)?;
    w.le7_14(body.model)?;
    w.bytes(&body.version)?;
    w.u8(body.capability)?;
    w.le7_28(body.max_sysex_size)?;
    if header.is_version_2_or_later() {
        w.u8(body.output_path_id)?;
    }
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn discovery_reply(out: &mut [u8], header: &Header, body: &management::DiscoveryReply) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::DISCOVERY_REPLY)?;
    w.bytes(&body.manufacturer)?;
    w.le7_14(body.family)?;
    w.le7_14(body.model)?;
    w.bytes(&body.version)?;
    w.u8(body.capability)?;
    w.le7_28(body.max_sysex_size)?;
    if header.is_version_2_or_later() {
        w.u8(body.output_path_id)?;
        w.u8(body.function_block)?;
    }
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn endpoint_info(out: &mut [u8], header: &Header, body: &management::EndpointInfo) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::ENDPOINT_INFO)?;
    w.u8(body.status & 0x7f)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn endpoint_info_reply(
    out: &mut [u8],
    header: &Header,
    body: &management::EndpointInfoReply<'_>,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::ENDPOINT_INFO_REPLY)?;
    w.u8(body.status & 0x7f)?;
    w.le7_14(body.information.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(body.information)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn invalidate_muid(out: &mut [u8], header: &Header, body: &management::InvalidateMuid) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::INVALIDATE_MUID)?;
    w.muid(body.target_muid)?;
    Ok(w.finish())
}

fn write_ack_or_nak_body(w: &mut Writer<'_>, original_id: u8, status_code: u8, status_data: u8, details: [u8; 5], message: &[u8]) -> Result<(), Error> {
    w.u8(original_id)?;
    w.u8(status_code)?;
    w.u8(status_data)?;
    w.bytes(&details)?;
    w.le7_14(message.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(message)?;
    Ok(())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn ack(out: &mut [u8], header: &Header, body: &management::Ack<'_>) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::ACK)?;
    write_ack_or_nak_body(&mut w, body.original_id, body.status_code, body.status_data, body.details, body.message)?;
    Ok(w.finish())
}

/// Builds a NAK. Version 1 writes the header only; version 2 and later
/// writes the full [`management::Nak`] body.
/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn nak(out: &mut [u8], header: &Header, body: &management::Nak<'_>) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::NAK)?;
    if header.is_version_2_or_later() {
        write_ack_or_nak_body(&mut w, body.original_id, body.status_code, body.status_data, body.details, body.message)?;
    }
    Ok(w.finish())
}

// -----------------------------------------------------------------------------

// Profile Configuration

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_inquiry(out: &mut [u8], header: &Header, _body: &profile::Inquiry) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_INQUIRY)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_inquiry_reply(out: &mut [u8], header: &Header, body: &profile::InquiryReply<'_>) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_INQUIRY_REPLY)?;
    w.le7_14(body.enabled_count())?;
    for profile in body.enabled() {
        w.bytes(&profile)?;
    }
    w.le7_14(body.disabled_count())?;
    for profile in body.disabled() {
        w.bytes(&profile)?;
    }
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_on(out: &mut [u8], header: &Header, body: &profile::On) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_ON)?;
    w.bytes(&body.profile)?;
    w.le7_14(body.num_channels)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_off(out: &mut [u8], header: &Header, body: &profile::Off) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_OFF)?;
    w.bytes(&body.profile)?;
    w.bytes(&[0, 0])?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_enabled(out: &mut [u8], header: &Header, body: &profile::Enabled) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_ENABLED)?;
    w.bytes(&body.profile)?;
    w.le7_14(body.num_channels)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_disabled(out: &mut [u8], header: &Header, body: &profile::Disabled) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_DISABLED)?;
    w.bytes(&body.profile)?;
    w.le7_14(body.num_channels)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_added(out: &mut [u8], header: &Header, body: &profile::Added) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_ADDED)?;
    w.bytes(&body.profile)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_removed(out: &mut [u8], header: &Header, body: &profile::Removed) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_REMOVED)?;
    w.bytes(&body.profile)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_details(out: &mut [u8], header: &Header, body: &profile::Details) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_DETAILS)?;
    w.bytes(&body.profile)?;
    w.u8(body.target)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_details_reply(out: &mut [u8], header: &Header, body: &profile::DetailsReply<'_>) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_DETAILS_REPLY)?;
    w.bytes(&body.profile)?;
    w.u8(body.target)?;
    w.le7_14(body.data.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(body.data)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn profile_specific_data(out: &mut [u8], header: &Header, body: &profile::SpecificData<'_>) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PROFILE_SPECIFIC_DATA)?;
    w.bytes(&body.profile)?;
    w.le7_14(body.data.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(body.data)?;
    Ok(w.finish())
}

// -----------------------------------------------------------------------------

// Property Exchange

fn write_pe_chunk(w: &mut Writer<'_>, message_type: MessageType, header: &Header, body: &property_exchange::Chunk<'_>) -> Result<(), Error> {
    write_header(w, header, message_type)?;
    w.u8(body.request_id)?;
    w.le7_14(body.header.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(body.header)?;
    w.le7_14(body.total_chunks)?;
    w.le7_14(body.chunk_number)?;
    w.le7_14(body.data.len().try_into().map_err(|_| Error::Truncated)?)?;
    w.bytes(body.data)?;
    Ok(())
}

macro_rules! pe_builder {
    ($name:ident, $message_type:expr) => {
        /// # Errors
        /// Returns an error if `out` is too small to hold the complete message.
        pub fn $name(out: &mut [u8], header: &Header, body: &property_exchange::Chunk<'_>) -> Result<usize, Error> {
            let mut w = Writer::new(out);
            write_pe_chunk(&mut w, $message_type, header, body)?;
            Ok(w.finish())
        }
    };
}

pe_builder!(pe_get, MessageType::PE_GET);
pe_builder!(pe_get_reply, MessageType::PE_GET_REPLY);
pe_builder!(pe_set, MessageType::PE_SET);
pe_builder!(pe_set_reply, MessageType::PE_SET_REPLY);
pe_builder!(pe_subscription, MessageType::PE_SUBSCRIPTION);
pe_builder!(pe_subscription_reply, MessageType::PE_SUBSCRIPTION_REPLY);
pe_builder!(pe_notify, MessageType::PE_NOTIFY);

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pe_capabilities(out: &mut [u8], header: &Header, body: &property_exchange::Capabilities) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PE_CAPABILITIES)?;
    w.u8(body.num_simultaneous_requests)?;
    if header.is_version_2_or_later() {
        w.u8(body.major_version)?;
        w.u8(body.minor_version)?;
    }
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pe_capabilities_reply(
    out: &mut [u8],
    header: &Header,
    body: &property_exchange::CapabilitiesReply,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PE_CAPABILITIES_REPLY)?;
    w.u8(body.num_simultaneous_requests)?;
    if header.is_version_2_or_later() {
        w.u8(body.major_version)?;
        w.u8(body.minor_version)?;
    }
    Ok(w.finish())
}

// -----------------------------------------------------------------------------

// Process Inquiry

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pi_capabilities(out: &mut [u8], header: &Header, _body: &process_inquiry::Capabilities) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PI_CAPABILITIES)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pi_capabilities_reply(
    out: &mut [u8],
    header: &Header,
    body: &process_inquiry::CapabilitiesReply,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PI_CAPABILITIES_REPLY)?;
    w.u8(body.supported_features)?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pi_midi_message_report(
    out: &mut [u8],
    header: &Header,
    body: &process_inquiry::MidiMessageReport,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PI_MIDI_MESSAGE_REPORT)?;
    w.u8(body.message_data_control)?;
    w.u8(body.system_messages.to_bits())?;
    w.u8(0)?;
    w.u8(body.channel_controller_messages.to_bits())?;
    w.u8(body.note_data_messages.to_bits())?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pi_midi_message_report_reply(
    out: &mut [u8],
    header: &Header,
    body: &process_inquiry::MidiMessageReportReply,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PI_MIDI_MESSAGE_REPORT_REPLY)?;
    w.u8(body.system_messages.to_bits())?;
    w.u8(0)?;
    w.u8(body.channel_controller_messages.to_bits())?;
    w.u8(body.note_data_messages.to_bits())?;
    Ok(w.finish())
}

/// # Errors
/// Returns an error if `out` is too small to hold the complete message.
pub fn pi_midi_message_report_end(
    out: &mut [u8],
    header: &Header,
    _body: &process_inquiry::MidiMessageReportEnd,
) -> Result<usize, Error> {
    let mut w = Writer::new(out);
    write_header(&mut w, header, MessageType::PI_MIDI_MESSAGE_REPORT_END)?;
    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::{
        ack,
        discovery,
        invalidate_muid,
    };
    use crate::{
        header::Header,
        le7::Muid,
        message::management,
    };

    fn header(version: u8) -> Header {
        Header::new(0x7f, version, Muid::new(0x7f7e_7d7c), Muid::new(0x6216_6326))
    }

    #[test]
    fn discovery_v1_omits_output_path_id() {
        let mut buf = [0u8; 64];
        let body = management::Discovery {
            manufacturer: [0x7d, 0x00, 0x00],
            family: 0x1234 & 0x3fff,
            model: 0x5678 & 0x3fff,
            version: [1, 0, 0, 0],
            capability: 0x7f,
            max_sysex_size: 0x0000_0200,
            output_path_id: 0x05,
        };

        let v1_len = discovery(&mut buf, &header(0x01), &body).unwrap();
        let v2_len = discovery(&mut buf, &header(0x02), &body).unwrap();

        assert_eq!(v2_len, v1_len + 1);
    }

    #[test]
    fn invalidate_muid_writes_broadcast_as_four_0x7f_bytes() {
        let mut buf = [0u8; 32];
        let body = management::InvalidateMuid {
            target_muid: Muid::BROADCAST,
        };

        let len = invalidate_muid(&mut buf, &header(0x02), &body).unwrap();

        assert_eq!(&buf[len - 4..len], [0x7f, 0x7f, 0x7f, 0x7f]);
    }

    #[test]
    fn ack_message_too_small_returns_truncated_without_partial_write() {
        let mut buf = [0u8; 4];
        let body = management::Ack {
            original_id: 0,
            status_code: 0,
            status_data: 0,
            details: [0; 5],
            message: &[],
        };

        assert!(ack(&mut buf, &header(0x02), &body).is_err());
    }
}
