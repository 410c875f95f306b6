// =============================================================================
// Data128 (Sysex8 and Mixed Data Set)
// =============================================================================

//! 128-bit Data messages: 8-bit System Exclusive framing and the Mixed Data
//! Set transfer used for larger opaque payloads **([M2-104-UM 7.8])**.
//!
//! Every shape here is a 4-word (128-bit) UMP.

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
        data128,
        Group,
        MessageType,
    },
    packet::TryReadField,
    Error,
};

// -----------------------------------------------------------------------------

// Fields

/// The 4-bit status selecting one of the six Data128 shapes.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Status {
    /// The entire Sysex8 message fits in a single frame.
    Sysex8In1 = 0x0,
    /// The first frame of a multi-frame Sysex8 message.
    Sysex8Start = 0x1,
    /// A middle frame of a multi-frame Sysex8 message.
    Sysex8Continue = 0x2,
    /// The final frame of a multi-frame Sysex8 message.
    Sysex8End = 0x3,
    /// A Mixed Data Set header chunk.
    MdsHeader = 0x8,
    /// A Mixed Data Set payload chunk.
    MdsPayload = 0x9,
}

field::impl_field_trait_field!(Status, u8, 8..=11);

// Sysex8

field::impl_field!(
    /// How many of the thirteen data byte slots are populated (0-13).
    pub NumberOfBytes { u8, 12..=15, 4 }
);

field::impl_field!(
    /// Stream identifier, used to interleave multiple concurrent Sysex8
    /// transfers on the same group.
    pub StreamId { u8, 16..=23 }
);

field::impl_field!(pub Data0 { u8, 24..=31 });
field::impl_field!(pub Data1 { u8, 32..=39 });
field::impl_field!(pub Data2 { u8, 40..=47 });
field::impl_field!(pub Data3 { u8, 48..=55 });
field::impl_field!(pub Data4 { u8, 56..=63 });
field::impl_field!(pub Data5 { u8, 64..=71 });
field::impl_field!(pub Data6 { u8, 72..=79 });
field::impl_field!(pub Data7 { u8, 80..=87 });
field::impl_field!(pub Data8 { u8, 88..=95 });
field::impl_field!(pub Data9 { u8, 96..=103 });
field::impl_field!(pub Data10 { u8, 104..=111 });
field::impl_field!(pub Data11 { u8, 112..=119 });
field::impl_field!(pub Data12 { u8, 120..=127 });

// Mixed Data Set

field::impl_field!(
    /// Which Mixed Data Set (0-15) this chunk belongs to.
    pub MdsId { u8, 12..=15, 4 }
);

field::impl_field!(pub BytesInChunk { u16, 16..=31 });
field::impl_field!(pub ChunksInMds { u16, 32..=47 });
field::impl_field!(pub ChunkNum { u16, 48..=63 });
field::impl_field!(pub ManufacturerId { u16, 64..=79 });
field::impl_field!(pub DeviceId { u16, 80..=95 });
field::impl_field!(pub SubId1 { u8, 96..=103 });
field::impl_field!(pub SubId2 { u8, 104..=111 });

field::impl_field!(pub Payload0 { u8, 16..=23 });
field::impl_field!(pub Payload1 { u8, 24..=31 });
field::impl_field!(pub Payload2 { u8, 32..=39 });
field::impl_field!(pub Payload3 { u8, 40..=47 });
field::impl_field!(pub Payload4 { u8, 48..=55 });
field::impl_field!(pub Payload5 { u8, 56..=63 });
field::impl_field!(pub Payload6 { u8, 64..=71 });
field::impl_field!(pub Payload7 { u8, 72..=79 });
field::impl_field!(pub Payload8 { u8, 80..=87 });
field::impl_field!(pub Payload9 { u8, 88..=95 });
field::impl_field!(pub Payload10 { u8, 96..=103 });
field::impl_field!(pub Payload11 { u8, 104..=111 });
field::impl_field!(pub Payload12 { u8, 112..=119 });
field::impl_field!(pub Payload13 { u8, 120..=127 });

// -----------------------------------------------------------------------------

// Messages

macro_rules! sysex8_message {
    ($(#[$meta:meta])* $vis:vis $message:ident, $status:expr) => {
        data128::impl_message!(
            $(#[$meta])*
            $vis $message { $status, [
                { number_of_bytes, NumberOfBytes },
                { stream_id, StreamId },
                { data0, Data0 },
                { data1, Data1 },
                { data2, Data2 },
                { data3, Data3 },
                { data4, Data4 },
                { data5, Data5 },
                { data6, Data6 },
                { data7, Data7 },
                { data8, Data8 },
                { data9, Data9 },
                { data10, Data10 },
                { data11, Data11 },
                { data12, Data12 },
            ] }
        );

        data128::impl_message_try_init!($message);
    };
}

sysex8_message!(
    /// A complete Sysex8 payload of 13 or fewer bytes.
    pub Sysex8In1, Status::Sysex8In1
);
sysex8_message!(
    /// The first frame of a multi-frame Sysex8 payload.
    pub Sysex8Start, Status::Sysex8Start
);
sysex8_message!(
    /// A middle frame of a multi-frame Sysex8 payload.
    pub Sysex8Continue, Status::Sysex8Continue
);
sysex8_message!(
    /// The final frame of a multi-frame Sysex8 payload.
    pub Sysex8End, Status::Sysex8End
);

data128::impl_message!(
    /// A Mixed Data Set header chunk.
    pub MdsHeader { Status::MdsHeader, [
        { mds_id, MdsId },
        { bytes_in_chunk, BytesInChunk },
        { chunks_in_mds, ChunksInMds },
        { chunk_num, ChunkNum },
        { manufacturer_id, ManufacturerId },
        { device_id, DeviceId },
        { sub_id_1, SubId1 },
        { sub_id_2, SubId2 },
    ] }
);

data128::impl_message_try_init!(MdsHeader);

data128::impl_message!(
    /// A Mixed Data Set payload chunk, opaque 14 bytes.
    pub MdsPayload { Status::MdsPayload, [
        { mds_id, MdsId },
        { payload0, Payload0 },
        { payload1, Payload1 },
        { payload2, Payload2 },
        { payload3, Payload3 },
        { payload4, Payload4 },
        { payload5, Payload5 },
        { payload6, Payload6 },
        { payload7, Payload7 },
        { payload8, Payload8 },
        { payload9, Payload9 },
        { payload10, Payload10 },
        { payload11, Payload11 },
        { payload12, Payload12 },
        { payload13, Payload13 },
    ] }
);

data128::impl_message_try_init!(MdsPayload);

// -----------------------------------------------------------------------------

// Enumeration

data128::impl_enumeration!(
    /// Any one of the six Data128 shapes.
    pub Data128, [
        Sysex8In1,
        Sysex8Start,
        Sysex8Continue,
        Sysex8End,
        MdsHeader,
        MdsPayload,
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
                $vis $message { 4, [
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
                        .set_message_type(MessageType::Data)
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
