// =============================================================================
// Stream
// =============================================================================

//! UMP Stream messages **([M2-104-UM 7.10])**: endpoint and function block
//! discovery/configuration, carried outside any Group.
//!
//! Unlike every other family, the status field here is 10 bits wide rather
//! than 4, and a 2-bit `Format` field precedes it to support chunking the
//! name notifications across more than one packet.

use bitvec::{
    field::BitField,
    order::Msb0,
    slice::BitSlice,
    view::BitView,
};
use num_enum::{
    IntoPrimitive,
    TryFromPrimitive,
};

use crate::{
    field::{
        self,
        TryReadFromPacket,
        WriteToPacket,
    },
    message::{
        self,
        stream,
        MessageType,
    },
    packet::{
        GetBitSlice,
        TryReadField,
    },
    Error,
};

// -----------------------------------------------------------------------------

// Fields

/// Chunking format for messages whose payload may span more than one
/// packet, such as the name notifications.
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Format {
    Complete = 0x0,
    Start = 0x1,
    Continue = 0x2,
    End = 0x3,
}

field::impl_field_trait_field!(Format, u8, 4..=5);

/// The 10-bit status selecting one of the Stream message shapes.
///
/// The field occupies 10 bits on the wire, but every concrete status value
/// fits in a `u8`; the bit-level load/store is done at `u16` width and
/// narrowed at the boundary instead of widening [`Error::conversion`].
#[derive(Debug, Eq, IntoPrimitive, PartialEq, TryFromPrimitive)]
#[num_enum(error_type(name = Error, constructor = Error::conversion))]
#[repr(u8)]
pub enum Status {
    EndpointDiscovery = 0x00,
    EndpointInfoNotification = 0x01,
    DeviceIdentityNotification = 0x02,
    EndpointNameNotification = 0x03,
    ProductInstanceIdNotification = 0x04,
    JrConfigurationRequest = 0x05,
    JrConfigurationNotification = 0x06,
    FunctionBlockDiscovery = 0x10,
    FunctionBlockInfoNotification = 0x11,
    FunctionBlockNameNotification = 0x12,
    StartOfClip = 0x20,
    EndOfClip = 0x21,
}

impl TryReadFromPacket for Status {
    fn try_read_from_packet<P>(packet: &P) -> Result<Self, Error>
    where
        P: GetBitSlice + ?Sized,
    {
        let bit_slice = packet.get_bit_slice();
        let integral = bit_slice[6..=15].load_be::<u16>();
        let integral = u8::try_from(integral).map_err(|_| Error::conversion(u8::MAX))?;

        Self::try_from(integral)
    }
}

impl WriteToPacket for Status {
    fn write_to_packet<P>(self, mut packet: P) -> P
    where
        P: GetBitSlice,
    {
        let bit_slice = packet.get_bit_slice_mut();
        let integral = u16::from(u8::from(self));

        bit_slice[6..=15].store_be::<u16>(integral);
        packet
    }
}

// Endpoint Discovery / Info

field::impl_field!(pub UmpVersionMajor { u8, 16..=23 });
field::impl_field!(pub UmpVersionMinor { u8, 24..=31 });
field::impl_field!(
    /// Bitmap of endpoint information the sender is requesting be sent back.
    pub FilterBitmap { u8, 32..=39 }
);

field::impl_field!(pub StaticFunctionBlocks { u8, 32..=32, 1 });
field::impl_field!(pub NumberOfFunctionBlocks { u8, 33..=39, 7 });
field::impl_field!(pub SupportsMidi2Protocol { u8, 41..=41, 1 });
field::impl_field!(pub SupportsMidi1Protocol { u8, 42..=42, 1 });
field::impl_field!(pub SupportsRxJrTimestamp { u8, 43..=43, 1 });
field::impl_field!(pub SupportsTxJrTimestamp { u8, 44..=44, 1 });

// Device Identity

field::impl_field!(
    /// 24-bit SysEx manufacturer ID.
    pub DeviceManufacturer { u32, 40..=63, 24 }
);
field::impl_field!(pub DeviceFamily { u16, 64..=79 });
field::impl_field!(pub DeviceFamilyModelNumber { u16, 80..=95 });
field::impl_field!(pub SoftwareRevision { u32, 96..=127 });

// Name / Product Instance Id text (14 bytes: bits 16-127)

field::impl_field!(pub EndpointTextByte0 { u8, 16..=23 });
field::impl_field!(pub EndpointTextByte1 { u8, 24..=31 });
field::impl_field!(pub EndpointTextByte2 { u8, 32..=39 });
field::impl_field!(pub EndpointTextByte3 { u8, 40..=47 });
field::impl_field!(pub EndpointTextByte4 { u8, 48..=55 });
field::impl_field!(pub EndpointTextByte5 { u8, 56..=63 });
field::impl_field!(pub EndpointTextByte6 { u8, 64..=71 });
field::impl_field!(pub EndpointTextByte7 { u8, 72..=79 });
field::impl_field!(pub EndpointTextByte8 { u8, 80..=87 });
field::impl_field!(pub EndpointTextByte9 { u8, 88..=95 });
field::impl_field!(pub EndpointTextByte10 { u8, 96..=103 });
field::impl_field!(pub EndpointTextByte11 { u8, 104..=111 });
field::impl_field!(pub EndpointTextByte12 { u8, 112..=119 });
field::impl_field!(pub EndpointTextByte13 { u8, 120..=127 });

// Jr Configuration

field::impl_field!(pub Protocol { u8, 16..=23 });
field::impl_field!(pub RxJrTimestamp { u8, 24..=24, 1 });
field::impl_field!(pub TxJrTimestamp { u8, 25..=25, 1 });

// Function Block

field::impl_field!(pub FunctionBlockNumber { u8, 16..=23 });
field::impl_field!(pub FunctionBlockFilter { u8, 24..=31 });
field::impl_field!(pub FunctionBlockActive { u8, 16..=16, 1 });
field::impl_field!(pub FunctionBlockNumberInfo { u8, 17..=23, 7 });
field::impl_field!(pub FunctionBlockDirection { u8, 24..=25, 2 });
field::impl_field!(pub FunctionBlockFirstGroup { u8, 32..=39 });
field::impl_field!(pub FunctionBlockNumberOfGroupsSpanned { u8, 40..=47 });

// Function Block Name text (13 bytes: bits 24-127)

field::impl_field!(pub FunctionBlockTextByte0 { u8, 24..=31 });
field::impl_field!(pub FunctionBlockTextByte1 { u8, 32..=39 });
field::impl_field!(pub FunctionBlockTextByte2 { u8, 40..=47 });
field::impl_field!(pub FunctionBlockTextByte3 { u8, 48..=55 });
field::impl_field!(pub FunctionBlockTextByte4 { u8, 56..=63 });
field::impl_field!(pub FunctionBlockTextByte5 { u8, 64..=71 });
field::impl_field!(pub FunctionBlockTextByte6 { u8, 72..=79 });
field::impl_field!(pub FunctionBlockTextByte7 { u8, 80..=87 });
field::impl_field!(pub FunctionBlockTextByte8 { u8, 88..=95 });
field::impl_field!(pub FunctionBlockTextByte9 { u8, 96..=103 });
field::impl_field!(pub FunctionBlockTextByte10 { u8, 104..=111 });
field::impl_field!(pub FunctionBlockTextByte11 { u8, 112..=119 });
field::impl_field!(pub FunctionBlockTextByte12 { u8, 120..=127 });

// -----------------------------------------------------------------------------

// Messages

stream::impl_message!(
    /// Endpoint Discovery: request the receiving endpoint identify itself.
    pub EndpointDiscovery { Status::EndpointDiscovery, [
        { ump_version_major, UmpVersionMajor },
        { ump_version_minor, UmpVersionMinor },
        { filter_bitmap, FilterBitmap },
    ] }
);

impl<'a> EndpointDiscovery<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        ump_version_major: UmpVersionMajor,
        ump_version_minor: UmpVersionMinor,
        filter_bitmap: FilterBitmap,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_ump_version_major(ump_version_major)
            .set_ump_version_minor(ump_version_minor)
            .set_filter_bitmap(filter_bitmap))
    }
}

stream::impl_message!(
    /// Endpoint Info Notification.
    pub EndpointInfoNotification { Status::EndpointInfoNotification, [
        { ump_version_major, UmpVersionMajor },
        { ump_version_minor, UmpVersionMinor },
        { static_function_blocks, StaticFunctionBlocks },
        { number_of_function_blocks, NumberOfFunctionBlocks },
        { supports_midi2_protocol, SupportsMidi2Protocol },
        { supports_midi1_protocol, SupportsMidi1Protocol },
        { supports_rx_jr_timestamp, SupportsRxJrTimestamp },
        { supports_tx_jr_timestamp, SupportsTxJrTimestamp },
    ] }
);

impl<'a> EndpointInfoNotification<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    #[allow(clippy::too_many_arguments)]
    pub fn try_init(
        packet: &'a mut [u32],
        ump_version_major: UmpVersionMajor,
        ump_version_minor: UmpVersionMinor,
        static_function_blocks: StaticFunctionBlocks,
        number_of_function_blocks: NumberOfFunctionBlocks,
        supports_midi2_protocol: SupportsMidi2Protocol,
        supports_midi1_protocol: SupportsMidi1Protocol,
        supports_rx_jr_timestamp: SupportsRxJrTimestamp,
        supports_tx_jr_timestamp: SupportsTxJrTimestamp,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_ump_version_major(ump_version_major)
            .set_ump_version_minor(ump_version_minor)
            .set_static_function_blocks(static_function_blocks)
            .set_number_of_function_blocks(number_of_function_blocks)
            .set_supports_midi2_protocol(supports_midi2_protocol)
            .set_supports_midi1_protocol(supports_midi1_protocol)
            .set_supports_rx_jr_timestamp(supports_rx_jr_timestamp)
            .set_supports_tx_jr_timestamp(supports_tx_jr_timestamp))
    }
}

stream::impl_message!(
    /// Device Identity Notification, mirroring a MIDI 1.0 Identity Reply.
    pub DeviceIdentityNotification { Status::DeviceIdentityNotification, [
        { device_manufacturer, DeviceManufacturer },
        { device_family, DeviceFamily },
        { device_family_model_number, DeviceFamilyModelNumber },
        { software_revision, SoftwareRevision },
    ] }
);

impl<'a> DeviceIdentityNotification<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        device_manufacturer: DeviceManufacturer,
        device_family: DeviceFamily,
        device_family_model_number: DeviceFamilyModelNumber,
        software_revision: SoftwareRevision,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_device_manufacturer(device_manufacturer)
            .set_device_family(device_family)
            .set_device_family_model_number(device_family_model_number)
            .set_software_revision(software_revision))
    }
}

macro_rules! endpoint_text_message {
    ($(#[$meta:meta])* $vis:vis $message:ident, $status:expr) => {
        stream::impl_message!(
            $(#[$meta])*
            $vis $message { $status, [
                { text_byte_0, EndpointTextByte0 },
                { text_byte_1, EndpointTextByte1 },
                { text_byte_2, EndpointTextByte2 },
                { text_byte_3, EndpointTextByte3 },
                { text_byte_4, EndpointTextByte4 },
                { text_byte_5, EndpointTextByte5 },
                { text_byte_6, EndpointTextByte6 },
                { text_byte_7, EndpointTextByte7 },
                { text_byte_8, EndpointTextByte8 },
                { text_byte_9, EndpointTextByte9 },
                { text_byte_10, EndpointTextByte10 },
                { text_byte_11, EndpointTextByte11 },
                { text_byte_12, EndpointTextByte12 },
                { text_byte_13, EndpointTextByte13 },
            ] }
        );

        impl<'a> $message<'a> {
            /// # Errors
            /// Returns an error if `packet` is not sized for this message.
            pub fn try_init(packet: &'a mut [u32], format: Format) -> Result<Self, Error> {
                Ok(Self::try_init_internal(packet)?.set_format(format))
            }
        }
    };
}

endpoint_text_message!(
    /// Endpoint Name Notification, possibly chunked across several packets.
    pub EndpointNameNotification, Status::EndpointNameNotification
);
endpoint_text_message!(
    /// Product Instance Id Notification, possibly chunked across several
    /// packets.
    pub ProductInstanceIdNotification, Status::ProductInstanceIdNotification
);

macro_rules! jr_configuration_message {
    ($(#[$meta:meta])* $vis:vis $message:ident, $status:expr) => {
        stream::impl_message!(
            $(#[$meta])*
            $vis $message { $status, [
                { protocol, Protocol },
                { rx_jr_timestamp, RxJrTimestamp },
                { tx_jr_timestamp, TxJrTimestamp },
            ] }
        );

        impl<'a> $message<'a> {
            /// # Errors
            /// Returns an error if `packet` is not sized for this message.
            pub fn try_init(
                packet: &'a mut [u32],
                protocol: Protocol,
                rx_jr_timestamp: RxJrTimestamp,
                tx_jr_timestamp: TxJrTimestamp,
            ) -> Result<Self, Error> {
                Ok(Self::try_init_internal(packet)?
                    .set_protocol(protocol)
                    .set_rx_jr_timestamp(rx_jr_timestamp)
                    .set_tx_jr_timestamp(tx_jr_timestamp))
            }
        }
    };
}

jr_configuration_message!(
    /// Jitter-Reduction Timestamp Configuration Request.
    pub JrConfigurationRequest, Status::JrConfigurationRequest
);
jr_configuration_message!(
    /// Jitter-Reduction Timestamp Configuration Notification.
    pub JrConfigurationNotification, Status::JrConfigurationNotification
);

stream::impl_message!(
    /// Function Block Discovery: request information about one or all
    /// function blocks.
    pub FunctionBlockDiscovery { Status::FunctionBlockDiscovery, [
        { function_block_number, FunctionBlockNumber },
        { function_block_filter, FunctionBlockFilter },
    ] }
);

impl<'a> FunctionBlockDiscovery<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        function_block_number: FunctionBlockNumber,
        function_block_filter: FunctionBlockFilter,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_function_block_number(function_block_number)
            .set_function_block_filter(function_block_filter))
    }
}

stream::impl_message!(
    /// Function Block Info Notification.
    pub FunctionBlockInfoNotification { Status::FunctionBlockInfoNotification, [
        { function_block_active, FunctionBlockActive },
        { function_block_number_info, FunctionBlockNumberInfo },
        { function_block_direction, FunctionBlockDirection },
        { function_block_first_group, FunctionBlockFirstGroup },
        { function_block_number_of_groups_spanned, FunctionBlockNumberOfGroupsSpanned },
    ] }
);

impl<'a> FunctionBlockInfoNotification<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        function_block_active: FunctionBlockActive,
        function_block_number_info: FunctionBlockNumberInfo,
        function_block_direction: FunctionBlockDirection,
        function_block_first_group: FunctionBlockFirstGroup,
        function_block_number_of_groups_spanned: FunctionBlockNumberOfGroupsSpanned,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_function_block_active(function_block_active)
            .set_function_block_number_info(function_block_number_info)
            .set_function_block_direction(function_block_direction)
            .set_function_block_first_group(function_block_first_group)
            .set_function_block_number_of_groups_spanned(function_block_number_of_groups_spanned))
    }
}

stream::impl_message!(
    /// Function Block Name Notification, possibly chunked across several
    /// packets.
    pub FunctionBlockNameNotification { Status::FunctionBlockNameNotification, [
        { function_block_number, FunctionBlockNumber },
        { text_byte_0, FunctionBlockTextByte0 },
        { text_byte_1, FunctionBlockTextByte1 },
        { text_byte_2, FunctionBlockTextByte2 },
        { text_byte_3, FunctionBlockTextByte3 },
        { text_byte_4, FunctionBlockTextByte4 },
        { text_byte_5, FunctionBlockTextByte5 },
        { text_byte_6, FunctionBlockTextByte6 },
        { text_byte_7, FunctionBlockTextByte7 },
        { text_byte_8, FunctionBlockTextByte8 },
        { text_byte_9, FunctionBlockTextByte9 },
        { text_byte_10, FunctionBlockTextByte10 },
        { text_byte_11, FunctionBlockTextByte11 },
        { text_byte_12, FunctionBlockTextByte12 },
    ] }
);

impl<'a> FunctionBlockNameNotification<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(
        packet: &'a mut [u32],
        function_block_number: FunctionBlockNumber,
        format: Format,
    ) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?
            .set_function_block_number(function_block_number)
            .set_format(format))
    }
}

stream::impl_message!(
    /// Start Of Clip: marks the start of a MIDI file or clip being streamed.
    pub StartOfClip { Status::StartOfClip, [] }
);

stream::impl_message_try_init!(StartOfClip);

stream::impl_message!(
    /// End Of Clip: marks the end of a MIDI file or clip being streamed.
    pub EndOfClip { Status::EndOfClip, [] }
);

stream::impl_message_try_init!(EndOfClip);

// -----------------------------------------------------------------------------

// Enumeration

stream::impl_enumeration!(
    /// Any one of the Stream message shapes.
    pub Stream, [
        EndpointDiscovery,
        EndpointInfoNotification,
        DeviceIdentityNotification,
        EndpointNameNotification,
        ProductInstanceIdNotification,
        JrConfigurationRequest,
        JrConfigurationNotification,
        FunctionBlockDiscovery,
        FunctionBlockInfoNotification,
        FunctionBlockNameNotification,
        StartOfClip,
        EndOfClip,
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
                    { format, Format },
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
                        .set_message_type(MessageType::Stream)
                        .set_format(Format::Complete)
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
