// =============================================================================
// Utility
// =============================================================================

//! Utility messages **([M2-104-UM 7.2])**: jitter-reduction timestamps and
//! clocking, the simplest UMP family at one word each with no Group field.

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
        utility,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

// Status

/// The 4-bit status nibble selecting one of the five Utility message shapes.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Status {
    Noop = 0x0,
    JrClock = 0x1,
    JrTimestamp = 0x2,
    DeltaClockstampTpqn = 0x3,
    DeltaClockstamp = 0x4,
}

field::impl_field_trait_field!(Status, u8, 4..=7);

field::impl_field!(
    /// 16-bit JR Clock time, in units of 1/31250 second.
    pub ClockTime { u16, 16..=31 }
);

field::impl_field!(
    /// 16-bit JR Timestamp.
    pub Timestamp { u16, 16..=31 }
);

field::impl_field!(
    /// 16-bit Delta Clockstamp Ticks Per Quarter Note.
    pub TicksPerQuarterNote { u16, 16..=31 }
);

field::impl_field!(
    /// 20-bit Delta Clockstamp tick count.
    pub Ticks { u32, 12..=31, 20 }
);

// -----------------------------------------------------------------------------

// Messages

// Noop

utility::impl_message!(
    /// No operation.
    pub Noop { Status::Noop, [] }
);

utility::impl_message_try_init!(Noop);

// JR Clock

utility::impl_message!(
    /// Jitter-Reduction Clock.
    pub JrClock { Status::JrClock, [
        { clock_time, ClockTime },
    ] }
);

impl<'a> JrClock<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], clock_time: ClockTime) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_clock_time(clock_time))
    }
}

// JR Timestamp

utility::impl_message!(
    /// Jitter-Reduction Timestamp.
    pub JrTimestamp { Status::JrTimestamp, [
        { timestamp, Timestamp },
    ] }
);

impl<'a> JrTimestamp<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], timestamp: Timestamp) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_timestamp(timestamp))
    }
}

// Delta Clockstamp Ticks Per Quarter Note

utility::impl_message!(
    /// Delta Clockstamp Ticks Per Quarter Note.
    pub DeltaClockstampTpqn { Status::DeltaClockstampTpqn, [
        { ticks_per_quarter_note, TicksPerQuarterNote },
    ] }
);

impl<'a> DeltaClockstampTpqn<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], ticks_per_quarter_note: TicksPerQuarterNote) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_ticks_per_quarter_note(ticks_per_quarter_note))
    }
}

// Delta Clockstamp

utility::impl_message!(
    /// Delta Clockstamp ticks since the last Clockstamp.
    pub DeltaClockstamp { Status::DeltaClockstamp, [
        { ticks, Ticks },
    ] }
);

impl<'a> DeltaClockstamp<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], ticks: Ticks) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_ticks(ticks))
    }
}

// -----------------------------------------------------------------------------

// Enumeration

utility::impl_enumeration!(
    /// Any one of the five Utility message shapes.
    pub Utility, [
        Noop,
        JrClock,
        JrTimestamp,
        DeltaClockstampTpqn,
        DeltaClockstamp,
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
                    _ => unreachable!(),
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
                $vis $message { 1, [
                    { message_type, MessageType },
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
                        .set_message_type(MessageType::Utility)
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
