// =============================================================================
// Data64 (Sysex7)
// =============================================================================

//! 64-bit Data messages: 7-bit System Exclusive framed across one or more
//! UMPs **([M2-104-UM 7.7])**.
//!
//! Each shape is a 2-word UMP carrying up to six 7-bit data bytes: two in
//! word 0 alongside the 4-bit status and byte count, four in word 1.

use bitvec::{
    order::Msb0,
    slice::BitSlice,
    view::BitView,
};
use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};

use crate::{
    field,
    message::{
        self,
        data64,
        Group,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

/// The 4-bit status selecting one of the four Sysex7 framing shapes.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Status {
    /// The entire message fits in a single frame (6 or fewer bytes).
    In1 = 0x0,
    /// The first frame of a multi-frame message.
    Start = 0x1,
    /// A middle frame of a multi-frame message.
    Continue = 0x2,
    /// The final frame of a multi-frame message.
    End = 0x3,
}

field::impl_field_trait_field!(Status, u8, 8..=11);

field::impl_field!(
    /// How many of the six data byte slots are populated (0-6).
    pub NumberOfBytes { u8, 12..=15, 4 }
);

field::impl_field!(pub Data0 { u8, 16..=23 });
field::impl_field!(pub Data1 { u8, 24..=31 });
field::impl_field!(pub Data2 { u8, 32..=39 });
field::impl_field!(pub Data3 { u8, 40..=47 });
field::impl_field!(pub Data4 { u8, 48..=55 });
field::impl_field!(pub Data5 { u8, 56..=63 });

// -----------------------------------------------------------------------------

// Messages

macro_rules! sysex7_message {
    ($(#[$meta:meta])* $vis:vis $message:ident, $status:expr) => {
        data64::impl_message!(
            $(#[$meta])*
            $vis $message { $status, [
                { number_of_bytes, NumberOfBytes },
                { data0, Data0 },
                { data1, Data1 },
                { data2, Data2 },
                { data3, Data3 },
                { data4, Data4 },
                { data5, Data5 },
            ] }
        );

        data64::impl_message_try_init!($message);
    };
}

sysex7_message!(
    /// A complete Sysex7 payload of 6 or fewer bytes.
    pub Sysex7In1, Status::In1
);
sysex7_message!(
    /// The first frame of a multi-frame Sysex7 payload.
    pub Sysex7Start, Status::Start
);
sysex7_message!(
    /// A middle frame of a multi-frame Sysex7 payload.
    pub Sysex7Continue, Status::Continue
);
sysex7_message!(
    /// The final frame of a multi-frame Sysex7 payload.
    pub Sysex7End, Status::End
);

// -----------------------------------------------------------------------------

// Enumeration

data64::impl_enumeration!(
    /// Any one of the four Sysex7 framing shapes.
    pub Data64, [
        Sysex7In1,
        Sysex7Start,
        Sysex7Continue,
        Sysex7End,
    ]
);

// -----------------------------------------------------------------------------

// Macros

// Enumeration

macro_rules! impl_enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis $enum:ident, [
            $($message:ident,)*
        ]
    ) => {
        message::impl_enumeration!(
            $(#[$meta])*
            $vis $enum, [
                $($message,)*
            ]
        );

        impl<'a> $enum<'a> {
            pub(crate) fn try_new(bits: &'a mut BitSlice<u32, Msb0>) -> Result<Self, Error> {
                match bits.try_read_field::<Status>()? {
                    $(Status::$message => Ok(Self::$message($message::try_new(bits)?)),)*
                }
            }
        }
    };
}

// Message

macro_rules! impl_message {
    (
        $(#[$meta:meta])*
        $vis:vis $message:ident { $status:expr, [
            $({ $name:ident, $type:ty },)*
        ] }
    ) => {
            message::impl_message!(
                $(#[$meta])*
                $vis $message { 2, [
                    { message_type, MessageType },
                    { group, Group },
                    { status, Status },
                  $({ $name, $type },)*
                ] }
            );

            impl<'a> $message<'a> {
                pub(crate) const STATUS: Status = $status;

                fn try_init_internal(packet: &'a mut [u32]) -> Result<Self, Error> {
                    let bits = packet.view_bits_mut();

                    Ok(Self::try_new(bits)?
                        .reset()
                        .set_message_type(MessageType::SystemExclusiveData)
                        .set_group(Group::default())
                        .set_status(Self::STATUS))
                }
            }
    };
}

macro_rules! impl_message_try_init {
    ($message:ident) => {
        impl<'a> $message<'a> {
            /// # Errors
            /// Returns an error if `packet` is not sized for this message.
            pub fn try_init(packet: &'a mut [u32]) -> Result<Self, Error> {
                Self::try_init_internal(packet)
            }
        }
    };
}

// -----------------------------------------------------------------------------

// Macro Exports

pub(crate) use impl_enumeration;
pub(crate) use impl_message;
pub(crate) use impl_message_try_init;
