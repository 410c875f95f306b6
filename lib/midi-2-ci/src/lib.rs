// =============================================================================
// MIDI 2 Capability Inquiry
// =============================================================================

//! MIDI-CI (Capability Inquiry) record catalog, streaming byte dispatcher,
//! and message builder.
//!
//! Mirrors the layered design of [`midi-2-protocol`](../midi_2_protocol/index.html):
//! a record catalog ([`message`]) of the roughly three dozen CI message
//! shapes, a zero-copy streaming [`dispatcher`] that classifies and decodes
//! a byte-at-a-time sysex body into those shapes, and a [`builder`] that
//! performs the inverse, serializing a shape into an output buffer.

pub mod builder;
pub mod dispatcher;
pub mod header;
pub mod le7;
pub mod message;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Overflow: Attempted to store value {0} in a {1} bit field.")]
    Overflow(u32, u8),
    #[error("Conversion: {0} is not a valid variant for this field.")]
    Conversion(u8),
    #[error("Truncated: the output buffer has insufficient space to hold this message.")]
    Truncated,
}
