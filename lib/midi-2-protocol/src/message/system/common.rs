// =============================================================================
// Common
// =============================================================================

//! System Common message and value types **([M2-104-UM 7.6])**.

use bitvec::{
    field::BitField,
    order::Msb0,
    slice::BitSlice,
    view::BitView,
};

use crate::{
    field,
    message::system::{
        self,
        Status,
    },
    packet::{
        GetBitSlice,
        TryReadField,
        WriteField,
    },
    Error,
};

// -----------------------------------------------------------------------------

// Fields

// Quarter Frame

/// The combined Data/Type payload of a MIDI Time Code Quarter Frame message.
#[derive(Debug)]
pub struct QuarterFrame(pub Data, pub Type);

impl field::TryReadFromPacket for QuarterFrame {
    fn try_read_from_packet<P>(packet: &P) -> Result<Self, Error>
    where
        P: GetBitSlice + ?Sized,
    {
        Ok(Self(
            packet.try_read_field::<Data>()?,
            packet.try_read_field::<Type>()?,
        ))
    }
}

impl field::WriteToPacket for QuarterFrame {
    fn write_to_packet<P>(self, packet: P) -> P
    where
        P: GetBitSlice,
    {
        packet.write_field(self.0).write_field(self.1)
    }
}

// Data

field::impl_field!(
    /// The 4-bit nibble value carried by a Quarter Frame message.
    pub Data { u8, 20..=23, 4 }
);

// Type

/// Which of the eight Quarter Frame nibbles (frames/seconds/minutes/hours,
/// least/most significant half) this message carries.
#[derive(Debug)]
pub enum Type {
    Frames(Significance),
    Seconds(Significance),
    Minutes(Significance),
    Hours(Significance),
}

field::impl_field_trait_field!(Type, u8, 17..=19);

impl From<Type> for u8 {
    fn from(value: Type) -> Self {
        match value {
            Type::Frames(significance) => Into::<u8>::into(significance),
            Type::Seconds(significance) => 2 + Into::<u8>::into(significance),
            Type::Minutes(significance) => 4 + Into::<u8>::into(significance),
            Type::Hours(significance) => 6 + Into::<u8>::into(significance),
        }
    }
}

impl TryFrom<u8> for Type {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Type::Frames(Significance::Least)),
            1 => Ok(Type::Frames(Significance::Most)),
            2 => Ok(Type::Seconds(Significance::Least)),
            3 => Ok(Type::Seconds(Significance::Most)),
            4 => Ok(Type::Minutes(Significance::Least)),
            5 => Ok(Type::Minutes(Significance::Most)),
            6 => Ok(Type::Hours(Significance::Least)),
            7 => Ok(Type::Hours(Significance::Most)),
            _ => Err(Error::conversion(value)),
        }
    }
}

/// Whether a Quarter Frame nibble carries the least or most significant half
/// of its value.
#[derive(Debug)]
pub enum Significance {
    Least,
    Most,
}

impl From<Significance> for u8 {
    fn from(value: Significance) -> Self {
        match value {
            Significance::Least => 0,
            Significance::Most => 1,
        }
    }
}

// -----------------------------------------------------------------------------

// Messages

// MIDI Time Code

system::impl_message!(
    /// MIDI Time Code Quarter Frame **([M2-104-UM 7.6])**.
    pub MIDITimeCode { Status::MIDITimeCode, [
        { quarter_frame, QuarterFrame },
    ]}
);

impl<'a> MIDITimeCode<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], quarter_frame: QuarterFrame) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_quarter_frame(quarter_frame))
    }
}

// Song Position Pointer

field::impl_field!(
    /// Song Position Pointer least-significant 7 bits.
    pub PositionLsb { u8, 17..=23, 7 }
);

field::impl_field!(
    /// Song Position Pointer most-significant 7 bits.
    pub PositionMsb { u8, 25..=31, 7 }
);

/// The combined 14-bit Song Position Pointer value, carried as two
/// independent 7-bit bytes separated by a reserved bit on each side.
#[derive(Debug)]
pub struct Position(pub PositionLsb, pub PositionMsb);

impl Position {
    /// Splits a 14-bit position value into its LSB/MSB byte pair.
    ///
    /// # Errors
    /// Returns an error if `value` does not fit in 14 bits.
    pub fn try_new(value: u16) -> Result<Self, Error> {
        if value > 0x3fff {
            return Err(Error::overflow(value, 14));
        }

        Ok(Self(
            PositionLsb::new((value & 0x7f) as u8),
            PositionMsb::new(((value >> 7) & 0x7f) as u8),
        ))
    }

    /// Recombines the LSB/MSB byte pair into a 14-bit position value.
    #[must_use]
    pub fn value(self) -> u16 {
        (u8::from(self.1) as u16) << 7 | u8::from(self.0) as u16
    }
}

impl field::TryReadFromPacket for Position {
    fn try_read_from_packet<P>(packet: &P) -> Result<Self, Error>
    where
        P: GetBitSlice + ?Sized,
    {
        Ok(Self(
            packet.try_read_field::<PositionLsb>()?,
            packet.try_read_field::<PositionMsb>()?,
        ))
    }
}

impl field::WriteToPacket for Position {
    fn write_to_packet<P>(self, packet: P) -> P
    where
        P: GetBitSlice,
    {
        packet.write_field(self.0).write_field(self.1)
    }
}

system::impl_message!(
    /// Song Position Pointer **([M2-104-UM 7.6])**.
    pub SongPositionPointer { Status::SongPositionPointer, [
        { position, Position },
    ]}
);

impl<'a> SongPositionPointer<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], position: Position) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_position(position))
    }
}

// Song Select

field::impl_field!(
    /// The selected song/sequence number.
    pub Song { u8, 17..=23, 7 }
);

system::impl_message!(
    /// Song Select **([M2-104-UM 7.6])**.
    pub SongSelect { Status::SongSelect, [
        { song, Song },
    ]}
);

impl<'a> SongSelect<'a> {
    /// # Errors
    /// Returns an error if `packet` is not sized for this message.
    pub fn try_init(packet: &'a mut [u32], song: Song) -> Result<Self, Error> {
        Ok(Self::try_init_internal(packet)?.set_song(song))
    }
}

// Tune Request

system::impl_message!(
    /// Tune Request **([M2-104-UM 7.6])**.
    pub TuneRequest { Status::TuneRequest, [] }
);

system::impl_message_try_init!(TuneRequest);

// -----------------------------------------------------------------------------

// Enumeration

system::impl_enumeration!(
    /// Any one of the four System Common message shapes.
    pub Common, [
        MIDITimeCode,
        SongPositionPointer,
        SongSelect,
        TuneRequest,
    ]
);

// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use bitvec::view::BitView;

    use super::{
        Position,
        SongPositionPointer,
    };

    #[test]
    fn song_position_pointer_round_trips_a_nonzero_position() {
        let mut packet = [0u32];
        let position = Position::try_new(0x0001).unwrap();

        let message = SongPositionPointer::try_init(&mut packet, position).unwrap();

        assert_eq!(packet[0] & 0x0000_ffff, 0x0000_0100);
        assert_eq!(message.position().unwrap().value(), 0x0001);
    }

    #[test]
    fn song_position_pointer_ignores_the_reserved_bits() {
        let mut packet = [0x12f2_8080u32];
        let bits = packet.view_bits_mut();

        let message = SongPositionPointer::try_new(bits).unwrap();

        assert_eq!(message.position().unwrap().value(), 0x0000);
    }

    #[test]
    fn position_combines_lsb_and_msb_in_the_correct_order() {
        let position = Position::try_new(0x2041).unwrap();

        assert_eq!(u8::from(position.0), 0x41);
        assert_eq!(u8::from(position.1), 0x40);
    }
}
