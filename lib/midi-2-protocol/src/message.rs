// =============================================================================
// Message
// =============================================================================

//! UMP Format messages for MIDI 2.x.
//!
//! The message types, and associated field types implemented as part of
//! [`message`](crate::message) implement a typed approach to working with UMP
//! Format messages (as Universal MIDI Packets -- variable-length arrays of N *
//! 32-bits). See the specification ([M2-104-UMP][1]) for the full details of
//! the UMP Format and the MIDI 2.x Protocol.
//!
//! (Note that references are made to the specification throughout, including
//! relevant section numbers where appropriate).
//!
//! This covers the full current (non-legacy) message set: Utility, System,
//! MIDI 1.0 Channel Voice, MIDI 2.x Channel Voice, Data (Sysex7/Sysex8 and
//! Mixed Data Set), Flex Data, and UMP Stream messages.
//!
//! # Examples
//!
//! Working with typed messages uses a layered approach. It is assumed that the
//! underlying data will always be some form of N * 32-bit storage, which may
//! either be received (and thus need reading in-place) or which may be created,
//! and then modified in-place.
//!
//! For this reason, the message types implement several options for working
//! with new or existing data.
//!
//! ## New Messages
//!
//! Each message type implements a `packet()` function, which will create a
//! `u32` array of the correct length to hold the data for that message type
//! (e.g. calling `packet()` on a MIDI 2.x Channel Voice message, which is a
//! 64-bit message type in UMP, will return a `[u32; 2]` array).
//!
//! This can then be initialized using the `try_init(...)` function for the
//! message type (this may fail if given a packet of incorrect size). This will
//! initialize the packet to contain the supplied message data, and return a
//! type which can further modify the packet as needed.
//!
//! [1]: https://midi.org/specifications/universal-midi-packet-ump-and-midi-2-0-protocol-specification/download

pub mod data64;
pub mod data128;
pub mod flex_data;
pub mod m1cvm;
pub mod m2cvm;
pub mod stream;
pub mod system;
pub mod utility;

use bitvec::{
    order::Msb0,
    slice::BitSlice,
};
use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};

use crate::{
    field,
    packet::{
        Packet,
        TryReadField,
        WriteField,
    },
    Error,
};

// -----------------------------------------------------------------------------

// Fields

// Message Type

/// Message Type field type.
///
/// The `MessageType` field type accesses the 4-bit Message Type field present
/// in all UMP messages **([M2-104-UM 2.1.2])**. The top nibble of a message's
/// first word; it both names the message's family and fixes the number of
/// 32-bit words the message occupies.
///
/// # Examples
///
/// ```rust
/// # use midi_2_protocol::*;
/// # use midi_2_protocol::message::*;
/// # use midi_2_protocol::message::system::real_time::*;
/// #
/// let mut packet = TimingClock::packet();
/// let mut message = TimingClock::try_init(&mut packet)?;
///
/// assert_eq!(message.message_type()?, MessageType::System);
/// #
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum MessageType {
    Utility = 0x0,
    System = 0x1,
    Midi1ChannelVoice = 0x2,
    SystemExclusiveData = 0x3,
    Midi2ChannelVoice = 0x4,
    Data = 0x5,
    FlexData = 0xd,
    Stream = 0xf,
}

field::impl_field_trait_field!(MessageType, u8, 0..=3);

/// Returns the word count (1, 2, or 4) implied by a message type nibble, or
/// `None` for a reserved message type that this catalog does not decode.
#[must_use]
pub const fn words_for_message_type(message_type: u8) -> Option<u8> {
    match message_type {
        0x0 | 0x1 | 0x2 | 0x6 | 0x7 => Some(1),
        0x3 | 0x4 | 0x8 | 0x9 | 0xa => Some(2),
        0xb | 0xc => Some(3),
        0x5 | 0xd | 0xe | 0xf => Some(4),
        _ => None,
    }
}

// Group

field::impl_field!(
    /// Group field type.
    ///
    /// The `Group` field type accesses the 4-bit Group field present in most
    /// UMP messages (excluding Utility and Stream messages)
    /// **([M2-104-UM 2.1.2])**. Messages which contain a Group field provide
    /// `group(...)` and `set_group(...)` functions to read and write the
    /// Group value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use midi_2_protocol::*;
    /// # use midi_2_protocol::message::*;
    /// # use midi_2_protocol::message::system::real_time::*;
    /// #
    /// let mut packet = TimingClock::packet();
    /// let mut message = TimingClock::try_init(&mut packet)?;
    ///
    /// assert_eq!(message.group()?, Group::new(0x0));
    /// // packet is [0x10f80000]...
    ///
    /// let mut message = message.set_group(Group::new(0x3));
    ///
    /// assert_eq!(message.group()?, Group::new(0x3));
    /// // packet is now [0x13f80000]...
    /// #
    /// # Ok::<(), Error>(())
    /// ```
    pub Group { u8, 4..=7, 4 }
);

// -----------------------------------------------------------------------------

// Macros

// Enumeration

/// Generates the outer enum type wrapping every concrete message shape in a
/// family, plus a `Debug` impl that forwards to whichever variant is active.
/// Each family module layers its own `try_new` on top, dispatching on that
/// family's status/opcode field.
macro_rules! impl_enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis $enum:ident, [
            $($message:ident,)*
        ]
    ) => {
        $(#[$meta])*
        $vis enum $enum<'a> {
            $($message($message<'a>),)*
        }

        impl<'a> ::core::fmt::Debug for $enum<'a> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    $(Self::$message(message) => ::core::fmt::Debug::fmt(message, f),)*
                }
            }
        }
    };
}

// Message

macro_rules! impl_message {
    (
        $(#[$meta:meta])*
        $vis:vis $message:ident { $size:literal, [
            $({ $name:ident, $type:ty },)*
        ] }
    ) => {
        message::impl_message_struct!($($meta)*, $vis, $message);
        message::impl_message_constructor!($message, $size);
        message::impl_message_packet!($message, $size);
        message::impl_message_trait_bits!($message);
        message::impl_message_trait_debug!($message, $({ $name },)*);
        message::impl_message_fields!($message, $({ $name, $type },)*);
    };
}

macro_rules! impl_message_struct {
    ($($meta:meta)*, $vis:vis, $message:ident) => {
        $(#[$meta])*
        $vis struct $message<'a> {
            bits: &'a mut BitSlice<u32, Msb0>,
        }
    };
}

macro_rules! impl_message_constructor {
    ($message:ident, $size:literal) => {
        impl<'a> $message<'a> {
            pub(crate) fn try_new(bits: &'a mut BitSlice<u32, Msb0>) -> Result<Self, Error> {
                match bits.len() {
                    len if len == $size * 32 => Ok(Self { bits }),
                    len => Err(Error::size($size * 32, len.try_into().unwrap_or(u8::MAX))),
                }
            }
        }
    };
}

macro_rules! impl_message_packet {
    ($message:ident, $size:literal) => {
        impl<'a> $message<'a> {
            /// Returns an appropriately sized `u32` array for this message.
            #[must_use]
            pub fn packet() -> [u32; $size] {
                [0u32; $size]
            }
        }
    };
}

macro_rules! impl_message_fields {
    ($message:ident, $({ $name:ident, $type:ty },)*) => {
        impl<'a> $message<'a> {
            $(
                ::paste::paste! {
                    pub fn $name(&self) -> Result<$type, Error> {
                        self.try_read_field::<$type>()
                    }

                    #[must_use]
                    pub fn [<set_ $name>](self, $name: $type) -> Self {
                        self.write_field($name)
                    }
                }
            )*
        }
    };
}

macro_rules! impl_message_trait_bits {
    ($message:ident) => {
        impl<'a> Packet for $message<'a> {
            fn get(&self) -> &BitSlice<u32, Msb0> {
                self.bits
            }

            fn get_mut(&mut self) -> &mut BitSlice<u32, Msb0> {
                self.bits
            }

            fn reset(self) -> Self {
                self.bits.fill(false);
                self
            }
        }
    };
}

macro_rules! impl_message_trait_debug {
    ($message:ident, $({ $name:ident },)*) => {
        impl<'a> ::core::fmt::Debug for $message<'a> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!($message))
                  $(.field(stringify!($name), &self.$name().unwrap()))*
                    .finish()
            }
        }
    };
}

// -----------------------------------------------------------------------------

// Macro Exports

pub(crate) use impl_enumeration;
pub(crate) use impl_message;
pub(crate) use impl_message_constructor;
pub(crate) use impl_message_fields;
pub(crate) use impl_message_packet;
pub(crate) use impl_message_struct;
pub(crate) use impl_message_trait_bits;
pub(crate) use impl_message_trait_debug;
