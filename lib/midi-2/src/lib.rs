// =============================================================================
// MIDI 2
// =============================================================================

//! MIDI 2.0 Universal MIDI Packet and MIDI-CI, end to end.
//!
//! This crate is the facade over [`midi-2-protocol`](midi_2_protocol) (the
//! UMP message catalog and streaming dispatcher) and
//! [`midi-2-ci`](midi_2_ci) (the Capability Inquiry record catalog and
//! dispatcher), re-exported here as [`ump`] and [`ci`], plus the pieces that
//! sit between UMP and the legacy MIDI 1.0 bytestream world that neither of
//! those crates needs to know about:
//!
//! - [`scale`]: bit-resolution rescaling between MIDI 1.0 and MIDI 2.x
//!   Channel Voice value widths.
//! - [`fifo`]: the fixed-capacity queue the transcoders above stream their
//!   output words/bytes through.
//! - [`transcoder`]: MIDI 1.0 bytestream to UMP.
//! - [`back_translate`]: UMP to MIDI 1.0 bytestream, the supplementary
//!   inverse direction.

pub mod back_translate;
pub mod fifo;
pub mod scale;
pub mod transcoder;

pub use midi_2_ci as ci;
pub use midi_2_protocol as ump;
